use crate::metrics::{
    DistributionBucket, Insight, InsightSet, StreakOptions, StreakResult, distribution, mean,
    percent_of, round_half_up, std_dev, streak, top,
};
use crate::models::Session;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_INSIGHTS: usize = 5;

const POSITIVE_EMOTIONS: [&str; 9] = [
    "Joy",
    "Gratitude",
    "Peace",
    "Contentment",
    "Excitement",
    "Hope",
    "Love",
    "Pride",
    "Calm",
];

const MOOD_LABELS: [&str; 10] = [
    "Very Sad",
    "Sad",
    "Neutral",
    "Content",
    "Happy",
    "Very Happy",
    "Excited",
    "Peaceful",
    "Grateful",
    "Blissful",
];

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    /// 1 (very sad) to 10 (blissful).
    #[serde(deserialize_with = "mood_score")]
    pub mood: u8,
    #[serde(default)]
    pub mood_emoji: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub intensity: u8,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub physical_symptoms: Vec<String>,
    #[serde(default)]
    pub energy_level: u8,
    #[serde(default)]
    pub sleep_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn mood_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let score = u8::deserialize(deserializer)?;
    if (1..=10).contains(&score) {
        Ok(score)
    } else {
        Err(serde::de::Error::custom(format!(
            "mood must be between 1 and 10, got {score}"
        )))
    }
}

impl MoodEntry {
    fn logged_at(&self) -> (NaiveDate, NaiveTime) {
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.time, "%H:%M:%S"))
            .unwrap_or(NaiveTime::MIN);
        (self.date, time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayPattern {
    pub day_of_week: &'static str,
    pub average_mood: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub current_mood: u8,
    pub average_mood: f64,
    pub mood_trend: i8,
    pub streak: StreakResult,
    pub emotional_balance: f64,
    pub mood_consistency: f64,
    pub dominant_emotion: Option<String>,
    pub high_energy_days: usize,
    pub weekday_patterns: Vec<WeekdayPattern>,
    pub emotion_distribution: Vec<DistributionBucket>,
    pub insights: Vec<Insight>,
}

pub fn mood_label(value: f64) -> &'static str {
    let rounded = round_half_up(value);
    if (1.0..=10.0).contains(&rounded) {
        MOOD_LABELS[rounded as usize - 1]
    } else {
        "Neutral"
    }
}

pub fn summarize(entries: &[MoodEntry], session: &Session) -> MoodSummary {
    let today = session.today;
    let moods: Vec<f64> = entries.iter().map(|e| f64::from(e.mood)).collect();

    let latest = entries.iter().fold(None::<&MoodEntry>, |best, entry| match best {
        Some(b) if b.logged_at() >= entry.logged_at() => Some(b),
        _ => Some(entry),
    });
    let current_mood = latest.map(|e| e.mood).unwrap_or(0);
    let average_mood = mean(&moods);

    let week_cutoff = today - Duration::days(7);
    let previous_cutoff = today - Duration::days(14);
    let last_week: Vec<f64> = entries
        .iter()
        .filter(|e| e.date >= week_cutoff)
        .map(|e| f64::from(e.mood))
        .collect();
    let previous_week: Vec<f64> = entries
        .iter()
        .filter(|e| e.date >= previous_cutoff && e.date < week_cutoff)
        .map(|e| f64::from(e.mood))
        .collect();
    let mood_trend = if last_week.is_empty() || previous_week.is_empty() {
        0
    } else {
        match mean(&last_week).partial_cmp(&mean(&previous_week)) {
            Some(std::cmp::Ordering::Greater) => 1,
            Some(std::cmp::Ordering::Less) => -1,
            _ => 0,
        }
    };

    let streak = streak(entries.iter().map(|e| e.date), today, StreakOptions::strict());

    let positive = entries.iter().filter(|e| e.mood >= 6).count();
    let emotional_balance = percent_of(positive as f64, entries.len() as f64);

    let mood_consistency = if entries.len() >= 2 {
        (100.0 - std_dev(&moods) * 10.0).max(0.0)
    } else {
        0.0
    };

    let emotions = distribution(entries.iter().map(|e| e.emotion.as_str()));
    let dominant_emotion = emotions
        .first()
        .filter(|bucket| !bucket.label.is_empty())
        .map(|bucket| bucket.label.clone());
    let emotion_distribution = top(emotions, 5);

    let high_energy_days = entries.iter().filter(|e| e.energy_level >= 7).count();

    let mut insights = InsightSet::new();
    if latest.is_some() {
        let label = mood_label(f64::from(current_mood));
        if current_mood >= 8 {
            insights.push(Insight::positive(format!(
                "Excellent mood! You're feeling {label}. Keep nurturing this positive energy!"
            )));
        } else if current_mood >= 6 {
            insights.push(Insight::positive(format!(
                "Good mood! You're feeling {label}. Maintain this positivity!"
            )));
        } else if current_mood >= 4 {
            insights.push(Insight::neutral(
                "Neutral mood. Everything is okay. Consider activities that bring you joy!",
            ));
        } else {
            insights.push(Insight::warning(
                "You seem to be having a tough time. Remember, emotions are temporary. Consider talking to someone or trying mindfulness.",
            ));
        }
    }

    if emotional_balance >= 70.0 {
        insights.push(Insight::positive(format!(
            "Great emotional balance! {}% positive moods shows excellent emotional wellbeing!",
            round_half_up(emotional_balance)
        )));
    } else if emotional_balance >= 50.0 {
        insights.push(Insight::positive(
            "Good emotional balance. You're managing your emotions well. Keep tracking!",
        ));
    } else if emotional_balance > 0.0 {
        insights.push(Insight::warning(
            "Consider adding more positive activities to your routine to improve emotional balance.",
        ));
    }

    match mood_trend {
        1 => insights.push(Insight::positive(
            "Your mood is trending upward! Whatever you're doing, keep it up!",
        )),
        -1 => insights.push(Insight::warning(
            "Your mood trend is slightly down. Check if any patterns are affecting you.",
        )),
        _ => {}
    }

    if mood_consistency >= 80.0 {
        insights.push(Insight::positive(
            "Excellent mood consistency! You maintain stable emotional levels.",
        ));
    }

    if let Some(emotion) = &dominant_emotion {
        if POSITIVE_EMOTIONS.contains(&emotion.as_str()) {
            insights.push(Insight::positive(format!(
                "Your dominant emotion \"{emotion}\" is positive! This greatly impacts your wellbeing."
            )));
        } else {
            insights.push(Insight::warning(format!(
                "Your dominant emotion \"{emotion}\" is challenging. Consider mindfulness or journaling to process it."
            )));
        }
    }

    let high_mood_high_energy = entries
        .iter()
        .filter(|e| e.mood >= 7 && e.energy_level >= 7)
        .count();
    let high_mood_low_energy = entries
        .iter()
        .filter(|e| e.mood >= 7 && e.energy_level <= 4)
        .count();
    if high_mood_high_energy > high_mood_low_energy * 2 {
        insights.push(Insight::neutral(
            "High energy often accompanies good moods for you! Keep your energy levels up!",
        ));
    }

    let rested: Vec<f64> = entries
        .iter()
        .filter(|e| e.sleep_hours >= 7.0)
        .map(|e| f64::from(e.mood))
        .collect();
    if !rested.is_empty() && mean(&rested) > average_mood + 1.0 {
        insights.push(Insight::neutral(
            "Good sleep (7+ hours) correlates with better moods for you! Prioritize rest.",
        ));
    }

    MoodSummary {
        current_mood,
        average_mood,
        mood_trend,
        streak,
        emotional_balance,
        mood_consistency,
        dominant_emotion,
        high_energy_days,
        weekday_patterns: weekday_patterns(entries),
        emotion_distribution,
        insights: insights.finish_capped(
            Insight::neutral(
                "Start tracking your mood daily to uncover patterns and improve emotional wellbeing!",
            ),
            MAX_INSIGHTS,
        ),
    }
}

fn weekday_patterns(entries: &[MoodEntry]) -> Vec<WeekdayPattern> {
    let mut totals = [(0.0f64, 0u32); 7];
    for entry in entries {
        let slot = &mut totals[entry.date.weekday().num_days_from_sunday() as usize];
        slot.0 += f64::from(entry.mood);
        slot.1 += 1;
    }
    WEEKDAYS
        .iter()
        .zip(totals)
        .map(|(day, (total, count))| WeekdayPattern {
            day_of_week: day,
            average_mood: if count > 0 { total / f64::from(count) } else { 0.0 },
            count,
        })
        .collect()
}
