use crate::metrics::{
    DistributionBucket, Insight, InsightSet, StreakOptions, StreakResult, distribution, mean,
    round_half_up, streak, top,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    #[default]
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionMood {
    Terrible,
    Bad,
    Neutral,
    Good,
    Excellent,
}

impl ReflectionMood {
    pub fn score(self) -> f64 {
        match self {
            ReflectionMood::Terrible => 1.0,
            ReflectionMood::Bad => 2.0,
            ReflectionMood::Neutral => 3.0,
            ReflectionMood::Good => 4.0,
            ReflectionMood::Excellent => 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionEntry {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    pub energy_level: u8,
    pub mood: ReflectionMood,
    pub focus_level: u8,
    pub productivity_score: u8,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub lessons_learned: Vec<String>,
    #[serde(default)]
    pub gratitude: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub goals_for_tomorrow: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub sleep_hours: f64,
    #[serde(default)]
    pub exercise_minutes: f64,
    #[serde(default)]
    pub meditation_minutes: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mood: f64,
    pub energy: u8,
    pub productivity: u8,
    pub focus: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionSummary {
    pub total_entries: usize,
    pub streak: StreakResult,
    pub average_mood: f64,
    pub average_energy: f64,
    pub average_productivity: f64,
    pub average_focus: f64,
    pub total_wins: usize,
    pub total_challenges: usize,
    pub total_lessons: usize,
    pub total_gratitude: usize,
    pub total_improvements: usize,
    pub win_categories: Vec<DistributionBucket>,
    pub challenge_categories: Vec<DistributionBucket>,
    pub trend: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
}

const KEYWORD_CATEGORIES: [(&str, [&str; 3]); 7] = [
    ("Work", ["work", "job", "career"]),
    ("Health", ["health", "exercise", "diet"]),
    ("Relationships", ["family", "friend", "relationship"]),
    ("Learning", ["learn", "study", "skill"]),
    ("Finance", ["money", "finance", "budget"]),
    ("Hobbies", ["hobby", "fun", "leisure"]),
    ("Growth", ["goal", "achieve", "progress"]),
];

pub fn categorize(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    KEYWORD_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or("Other")
}

pub fn summarize(entries: &[ReflectionEntry], session: &Session) -> ReflectionSummary {
    let total_entries = entries.len();
    let streak = streak(entries.iter().map(|e| e.date), session.today, StreakOptions::strict());

    let average = |f: fn(&ReflectionEntry) -> f64| mean(&entries.iter().map(f).collect::<Vec<_>>());
    let average_mood = average(|e| e.mood.score());
    let average_energy = average(|e| f64::from(e.energy_level));
    let average_productivity = average(|e| f64::from(e.productivity_score));
    let average_focus = average(|e| f64::from(e.focus_level));

    let total_wins: usize = entries.iter().map(|e| e.wins.len()).sum();
    let total_challenges: usize = entries.iter().map(|e| e.challenges.len()).sum();
    let total_lessons: usize = entries.iter().map(|e| e.lessons_learned.len()).sum();
    let total_gratitude: usize = entries.iter().map(|e| e.gratitude.len()).sum();
    let total_improvements: usize = entries.iter().map(|e| e.improvements.len()).sum();

    let win_categories = top(
        distribution(entries.iter().flat_map(|e| e.wins.iter()).map(|w| categorize(w))),
        5,
    );
    let challenge_categories = top(
        distribution(entries.iter().flat_map(|e| e.challenges.iter()).map(|c| categorize(c))),
        5,
    );

    let mut recent: Vec<&ReflectionEntry> = entries.iter().collect();
    recent.sort_by_key(|e| e.date);
    let trend = recent[recent.len().saturating_sub(7)..]
        .iter()
        .map(|e| TrendPoint {
            date: e.date,
            mood: e.mood.score(),
            energy: e.energy_level,
            productivity: e.productivity_score,
            focus: e.focus_level,
        })
        .collect();

    let mut insights = InsightSet::new();
    if streak.current_streak >= 7 {
        insights.push(Insight::positive(format!(
            "Impressive {}-day reflection streak! Consistency breeds self-awareness.",
            streak.current_streak
        )));
    }

    if total_entries > 0 {
        if average_mood >= 4.0 {
            insights.push(Insight::positive(format!(
                "Your average mood is {average_mood:.1}/5. Keep cultivating that positivity!"
            )));
        } else if average_mood <= 2.0 {
            insights.push(Insight::warning(format!(
                "Your mood has been low ({average_mood:.1}/5). Consider what might help uplift your spirits."
            )));
        }

        if average_productivity >= 4.0 && average_focus >= 4.0 {
            insights.push(Insight::positive(
                "Great focus and productivity levels! You're in the zone.",
            ));
        } else if average_productivity <= 2.0 || average_focus <= 2.0 {
            insights.push(Insight::warning(format!(
                "Consider strategies to improve focus ({average_focus:.1}/5) and productivity ({average_productivity:.1}/5)."
            )));
        }
    }

    // Wins without any challenges count as a strong balance.
    let win_ratio = if total_challenges > 0 {
        Some(total_wins as f64 / total_challenges as f64)
    } else if total_wins > 0 {
        Some(f64::INFINITY)
    } else {
        None
    };
    match win_ratio {
        Some(ratio) if ratio > 2.0 => insights.push(Insight::positive(format!(
            "You're celebrating {total_wins} wins vs {total_challenges} challenges. Great balance!"
        ))),
        Some(ratio) if ratio < 0.5 => insights.push(Insight::warning(format!(
            "More challenges ({total_challenges}) than wins ({total_wins}) noted. Try to find silver linings."
        ))),
        _ => {}
    }

    if let Some(win) = win_categories.first() {
        insights.push(Insight::neutral(format!(
            "Most of your wins are in {} ({}%). Play to your strengths!",
            win.label.to_lowercase(),
            round_half_up(win.percentage)
        )));
    }
    if let Some(challenge) = challenge_categories.first() {
        insights.push(Insight::warning(format!(
            "Most challenges in {} ({}%). Opportunity for growth!",
            challenge.label.to_lowercase(),
            round_half_up(challenge.percentage)
        )));
    }

    if total_lessons > total_entries * 2 {
        insights.push(Insight::positive(format!(
            "You're learning a lot! {total_lessons} lessons from {total_entries} days shows great reflection depth."
        )));
    }

    let fallback = if total_entries > 0 {
        Insight::positive("Daily reflection builds self-awareness and growth. Keep up the great work!")
    } else {
        Insight::warning(
            "Start your daily reflection journey today! Self-awareness is the first step to growth.",
        )
    };

    ReflectionSummary {
        total_entries,
        streak,
        average_mood,
        average_energy,
        average_productivity,
        average_focus,
        total_wins,
        total_challenges,
        total_lessons,
        total_gratitude,
        total_improvements,
        win_categories,
        challenge_categories,
        trend,
        insights: insights.finish(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InsightTone;
    use chrono::Duration;

    fn reflection(date: NaiveDate, mood: ReflectionMood, score: u8) -> ReflectionEntry {
        ReflectionEntry {
            id: date.to_string(),
            date,
            time_of_day: TimeOfDay::Evening,
            energy_level: score,
            mood,
            focus_level: score,
            productivity_score: score,
            wins: Vec::new(),
            challenges: Vec::new(),
            lessons_learned: Vec::new(),
            gratitude: Vec::new(),
            improvements: Vec::new(),
            goals_for_tomorrow: Vec::new(),
            location: String::new(),
            weather: String::new(),
            sleep_hours: 7.0,
            exercise_minutes: 0.0,
            meditation_minutes: 0.0,
            tags: Vec::new(),
            is_private: false,
            created_at: String::new(),
        }
    }

    #[test]
    fn keyword_categories() {
        assert_eq!(categorize("Shipped the release at WORK"), "Work");
        assert_eq!(categorize("went to the gym for exercise"), "Health");
        assert_eq!(categorize("dinner with friends"), "Relationships");
        assert_eq!(categorize("learned a new skill"), "Learning");
        assert_eq!(categorize("stuck to the budget"), "Finance");
        assert_eq!(categorize("painting hobby"), "Hobbies");
        assert_eq!(categorize("made progress"), "Growth");
        assert_eq!(categorize("slept in"), "Other");
        // First matching group wins.
        assert_eq!(categorize("work friend"), "Work");
    }

    #[test]
    fn empty_reflection_has_single_start_prompt() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let summary = summarize(&[], &Session::at("u1", today, 21));
        assert_eq!(summary.insights.len(), 1);
        assert!(summary.insights[0].message.starts_with("Start your daily reflection journey"));
        assert_eq!(summary.insights[0].tone, InsightTone::Warning);
    }

    #[test]
    fn strong_week() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
        let mut entries: Vec<ReflectionEntry> = (0..8)
            .map(|i| reflection(today - Duration::days(i), ReflectionMood::Good, 4))
            .collect();
        entries[0].wins = vec!["Closed a deal at work".into(), "Finished work report".into(), "Fun hike".into()];
        entries[0].challenges = vec!["Skipped exercise".into()];
        entries[0].lessons_learned = (0..17).map(|i| format!("lesson {i}")).collect();

        let summary = summarize(&entries, &Session::at("u1", today, 21));
        assert_eq!(summary.streak.current_streak, 8);
        assert_eq!(summary.average_mood, 4.0);
        assert_eq!(summary.trend.len(), 7);
        assert_eq!(summary.trend.last().unwrap().date, today);
        assert_eq!(summary.win_categories[0].label, "Work");

        let messages: Vec<_> = summary.insights.iter().map(|i| i.message.as_str()).collect();
        assert!(messages[0].starts_with("Impressive 8-day"));
        assert!(messages.contains(&"Your average mood is 4.0/5. Keep cultivating that positivity!"));
        assert!(messages.contains(&"Great focus and productivity levels! You're in the zone."));
        assert!(messages.iter().any(|m| m.starts_with("You're celebrating 3 wins vs 1 challenges")));
        assert!(messages.iter().any(|m| m.starts_with("Most of your wins are in work (67%)")));
        assert!(messages.iter().any(|m| m.starts_with("Most challenges in health (100%)")));
        assert!(messages.iter().any(|m| m.starts_with("You're learning a lot! 17 lessons")));
    }

    #[test]
    fn low_days_call_for_growth() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
        let mut entry = reflection(today - Duration::days(3), ReflectionMood::Bad, 2);
        entry.challenges = vec!["money worries".into(), "bad diet".into(), "work stress".into()];
        let summary = summarize(&[entry], &Session::at("u1", today, 21));

        let warnings = summary
            .insights
            .iter()
            .filter(|i| i.tone == InsightTone::Warning)
            .count();
        assert_eq!(warnings, 4);
        assert!(summary.insights[0].message.starts_with("Your mood has been low (2.0/5)"));
        assert!(summary.insights.iter().any(|i| i.message.starts_with("More challenges (3) than wins (0)")));
    }
}
