use crate::metrics::{
    DistributionBucket, Insight, InsightSet, StreakOptions, StreakResult, distribution,
    month_start, round_half_up, round_to, streak, week_start,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GratitudeCategory {
    People,
    Experiences,
    Health,
    Achievements,
    SimplePleasures,
    Growth,
    Other,
}

impl GratitudeCategory {
    pub fn key(self) -> &'static str {
        match self {
            GratitudeCategory::People => "people",
            GratitudeCategory::Experiences => "experiences",
            GratitudeCategory::Health => "health",
            GratitudeCategory::Achievements => "achievements",
            GratitudeCategory::SimplePleasures => "simple_pleasures",
            GratitudeCategory::Growth => "growth",
            GratitudeCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GratitudeCategory::People => "People",
            GratitudeCategory::Experiences => "Experiences",
            GratitudeCategory::Health => "Health",
            GratitudeCategory::Achievements => "Achievements",
            GratitudeCategory::SimplePleasures => "Simple Pleasures",
            GratitudeCategory::Growth => "Growth",
            GratitudeCategory::Other => "Other",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [
            GratitudeCategory::People,
            GratitudeCategory::Experiences,
            GratitudeCategory::Health,
            GratitudeCategory::Achievements,
            GratitudeCategory::SimplePleasures,
            GratitudeCategory::Growth,
            GratitudeCategory::Other,
        ]
        .into_iter()
        .find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GratitudeMood {
    Joyful,
    Grateful,
    Peaceful,
    Hopeful,
    Content,
    Reflective,
}

impl GratitudeMood {
    pub fn key(self) -> &'static str {
        match self {
            GratitudeMood::Joyful => "joyful",
            GratitudeMood::Grateful => "grateful",
            GratitudeMood::Peaceful => "peaceful",
            GratitudeMood::Hopeful => "hopeful",
            GratitudeMood::Content => "content",
            GratitudeMood::Reflective => "reflective",
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            GratitudeMood::Joyful => 100.0,
            GratitudeMood::Grateful => 95.0,
            GratitudeMood::Peaceful => 85.0,
            GratitudeMood::Hopeful => 80.0,
            GratitudeMood::Content => 75.0,
            GratitudeMood::Reflective => 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeEntry {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    pub content: String,
    pub category: GratitudeCategory,
    pub mood: GratitudeMood,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeSummary {
    pub total_entries: usize,
    pub streak: StreakResult,
    pub entries_this_week: usize,
    pub entries_this_month: usize,
    pub average_per_week: f64,
    pub mood_distribution: Vec<DistributionBucket>,
    pub category_distribution: Vec<DistributionBucket>,
    pub positivity_score: f64,
    pub consistency_score: i64,
    pub insights: Vec<Insight>,
}

pub fn summarize(entries: &[GratitudeEntry], session: &Session) -> GratitudeSummary {
    let today = session.today;
    let total_entries = entries.len();
    let streak = streak(entries.iter().map(|e| e.date), today, StreakOptions::strict());

    let monday = week_start(today);
    let first_of_month = month_start(today);
    let entries_this_week = entries
        .iter()
        .filter(|e| e.date >= monday && e.date <= today)
        .count();
    let entries_this_month = entries
        .iter()
        .filter(|e| e.date >= first_of_month && e.date <= today)
        .count();

    let weeks_tracked = total_entries.div_ceil(7).max(1);
    let average_per_week = total_entries as f64 / weeks_tracked as f64;

    // Sorting by the enum first makes ties fall back to the declared order.
    let mut moods: Vec<GratitudeMood> = entries.iter().map(|e| e.mood).collect();
    moods.sort();
    let mood_distribution = distribution(moods.iter().map(|m| m.key()));

    let mut categories: Vec<GratitudeCategory> = entries.iter().map(|e| e.category).collect();
    categories.sort();
    let category_distribution = distribution(categories.iter().map(|c| c.key()));

    let positivity_score = if total_entries == 0 {
        0.0
    } else {
        let weighted: f64 = moods.iter().map(|m| m.weight()).sum();
        round_to(weighted / total_entries as f64, 1)
    };

    let consistency_score = consistency_score(entries, &streak, average_per_week);

    let mut insights = InsightSet::new();
    let current = streak.current_streak;
    if current >= 7 {
        insights.push(Insight::positive(format!(
            "Amazing {current}-day streak! Your consistency is building positive habits."
        )));
    } else if current >= 3 {
        insights.push(Insight::neutral(format!(
            "Great {current}-day streak! Keep the momentum going."
        )));
    } else if total_entries > 0 && current == 0 {
        insights.push(Insight::neutral(
            "Time to start a new streak! Remember why gratitude matters to you.",
        ));
    }

    if positivity_score >= 85.0 {
        insights.push(Insight::positive(format!(
            "Your positivity score is {positivity_score}/100! Your gratitude practice is radiating positive energy."
        )));
    } else if positivity_score >= 70.0 {
        insights.push(Insight::positive(format!(
            "Good positivity score of {positivity_score}/100. You're cultivating a thankful mindset."
        )));
    }

    if let Some(top) = category_distribution.first().filter(|b| b.percentage >= 40.0) {
        let label = GratitudeCategory::from_key(&top.label)
            .map(GratitudeCategory::label)
            .unwrap_or("Other");
        insights.push(Insight::neutral(format!(
            "You're most grateful for {} ({}%). Consider exploring other areas too.",
            label.to_lowercase(),
            round_half_up(top.percentage)
        )));
    }

    if let Some(top) = mood_distribution.first().filter(|b| b.percentage >= 50.0) {
        insights.push(Insight::neutral(format!(
            "Your dominant mood is {}. Notice how this feeling colors your experiences.",
            top.label
        )));
    }

    if consistency_score >= 80 {
        insights.push(Insight::positive(format!(
            "Excellent consistency ({consistency_score}%)! Your dedication to gratitude is creating lasting benefits."
        )));
    } else if consistency_score <= 40 {
        insights.push(Insight::neutral(format!(
            "Consistency is key to reaping gratitude's benefits ({consistency_score}%). Try setting a daily reminder."
        )));
    }

    let fallback = if total_entries > 0 {
        Insight::positive(
            "Every gratitude entry is a step toward greater happiness and resilience. Keep writing!",
        )
    } else {
        Insight::neutral(
            "Welcome to your gratitude journal! Start by writing three things you're grateful for today.",
        )
    };

    GratitudeSummary {
        total_entries,
        streak,
        entries_this_week,
        entries_this_month,
        average_per_week,
        mood_distribution,
        category_distribution,
        positivity_score,
        consistency_score,
        insights: insights.finish(fallback),
    }
}

fn consistency_score(entries: &[GratitudeEntry], streak: &StreakResult, average_per_week: f64) -> i64 {
    if entries.is_empty() {
        return 0;
    }
    let streak_score = if streak.longest_streak > 0 {
        f64::from(streak.current_streak) / f64::from(streak.longest_streak) * 100.0
    } else {
        0.0
    };
    let frequency_score = (average_per_week / 7.0 * 100.0).min(100.0);

    let days: BTreeSet<NaiveDate> = entries.iter().map(|e| e.date).collect();
    let span = match (days.first(), days.last()) {
        (Some(first), Some(last)) if entries.len() >= 2 => (*last - *first).num_days() + 1,
        _ => 1,
    };
    let coverage_score = days.len() as f64 / span.max(1) as f64 * 100.0;

    round_half_up(streak_score * 0.4 + frequency_score * 0.3 + coverage_score * 0.3) as i64
}
