use crate::metrics::{Insight, InsightSet, StreakOptions, StreakResult, percent_of, round_half_up, streak};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub habits: Vec<HabitCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCheck {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStreak {
    pub name: String,
    #[serde(flatten)]
    pub streak: StreakResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub today_progress: i64,
    pub completed_today: usize,
    pub total_today: usize,
    pub streaks: Vec<HabitStreak>,
    pub insights: Vec<Insight>,
}

pub fn summarize(entries: &[HabitEntry], session: &Session) -> HabitSummary {
    // Several entries can share a date; today's checks are pooled.
    let todays: Vec<&HabitCheck> = entries
        .iter()
        .filter(|entry| entry.date == session.today)
        .flat_map(|entry| entry.habits.iter())
        .collect();
    let total_today = todays.len();
    let completed_today = todays.iter().filter(|habit| habit.completed).count();
    let today_progress =
        round_half_up(percent_of(completed_today as f64, total_today as f64)) as i64;

    let streaks = habit_streaks(entries, session.today);

    let mut insights = InsightSet::new();
    if total_today > 0 {
        let total = total_today as f64;
        let completed = completed_today as f64;
        if completed_today == total_today {
            insights.push(Insight::positive(
                "Perfect day! 100% of habits completed, you're unstoppable today!",
            ));
        } else if completed >= total * 0.7 {
            insights.push(Insight::positive(format!(
                "Strong performance! {completed_today}/{total_today} habits done, almost there!"
            )));
        } else if completed > total * 0.3 {
            insights.push(Insight::neutral(
                "Good start! Keep the momentum, small wins build big habits.",
            ));
        }
    }

    for habit in &streaks {
        let days = habit.streak.current_streak;
        if days >= 10 {
            insights.push(Insight::positive(format!(
                "Legendary! {} at {days} days streak, pure discipline!",
                habit.name
            )));
        } else if days >= 5 {
            insights.push(Insight::positive(format!(
                "You're crushing it! {} at {days} days, stay consistent!",
                habit.name
            )));
        }
    }

    HabitSummary {
        today_progress,
        completed_today,
        total_today,
        streaks,
        insights: insights.finish(Insight::neutral(
            "Every journey starts with one step. Add a habit today!",
        )),
    }
}

pub fn habit_streaks(entries: &[HabitEntry], today: NaiveDate) -> Vec<HabitStreak> {
    let mut by_name: Vec<(&str, Vec<NaiveDate>)> = Vec::new();
    for entry in entries {
        for habit in entry.habits.iter().filter(|habit| habit.completed) {
            match by_name.iter_mut().find(|(name, _)| *name == habit.name) {
                Some((_, dates)) => dates.push(entry.date),
                None => by_name.push((habit.name.as_str(), vec![entry.date])),
            }
        }
    }

    by_name
        .into_iter()
        .map(|(name, dates)| HabitStreak {
            name: name.to_string(),
            streak: streak(dates, today, StreakOptions::grace_day()),
        })
        .collect()
}
