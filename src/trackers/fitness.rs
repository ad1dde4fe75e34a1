use crate::metrics::{
    Insight, InsightSet, StreakOptions, StreakResult, display_percent, percent_of, round_half_up,
    streak,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DAILY_WORKOUT_GOAL: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<WorkoutSession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutKind {
    Yoga,
    Fitness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub activity: String,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub duration: f64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessSummary {
    pub today_yoga_minutes: f64,
    pub today_fitness_minutes: f64,
    pub total_yoga_minutes: f64,
    pub total_fitness_minutes: f64,
    pub daily_goal: f64,
    pub progress_percent: f64,
    pub completion_rate: f64,
    pub streak: StreakResult,
    pub insights: Vec<Insight>,
}

pub fn summarize(entries: &[PlannerEntry], session: &Session) -> FitnessSummary {
    let (mut today_yoga, mut today_fitness) = (0.0, 0.0);
    let (mut total_yoga, mut total_fitness) = (0.0, 0.0);

    for entry in entries {
        let is_today = entry.date == session.today;
        for workout in &entry.sessions {
            match workout.kind {
                WorkoutKind::Yoga => {
                    total_yoga += workout.duration;
                    if is_today {
                        today_yoga += workout.duration;
                    }
                }
                WorkoutKind::Fitness => {
                    total_fitness += workout.duration;
                    if is_today {
                        today_fitness += workout.duration;
                    }
                }
            }
        }
    }

    let today_total = today_yoga + today_fitness;
    let progress_percent = display_percent(percent_of(today_total, DAILY_WORKOUT_GOAL));

    let total_sessions: usize = entries.iter().map(|e| e.sessions.len()).sum();
    let completed = entries
        .iter()
        .flat_map(|e| e.sessions.iter())
        .filter(|s| s.completed)
        .count();
    let completion_rate = percent_of(completed as f64, total_sessions as f64);

    let streak = streak(entries.iter().map(|e| e.date), session.today, StreakOptions::strict());

    let mut insights = InsightSet::new();
    if today_total >= DAILY_WORKOUT_GOAL {
        insights.push(Insight::positive(format!(
            "Amazing! {today_total} minutes of activity today, you've crushed your goal!"
        )));
    } else if today_total >= DAILY_WORKOUT_GOAL * 0.7 {
        insights.push(Insight::positive(format!(
            "Great work! {today_total}/{DAILY_WORKOUT_GOAL} minutes, keep going!"
        )));
    } else if today_total > 0.0 {
        insights.push(Insight::neutral(format!(
            "Good start with {today_total} minutes today. Every movement counts!"
        )));
    }

    if today_total > 0.0 {
        let yoga_pct = percent_of(today_yoga, today_total);
        let fitness_pct = percent_of(today_fitness, today_total);
        if (yoga_pct - fitness_pct).abs() < 20.0 {
            insights.push(Insight::positive(format!(
                "Perfect balance! {}% yoga, {}% fitness.",
                round_half_up(yoga_pct),
                round_half_up(fitness_pct)
            )));
        } else if yoga_pct > 70.0 {
            insights.push(Insight::neutral(
                "Great focus on yoga today! Consider adding some strength training for balance.",
            ));
        } else if fitness_pct > 70.0 {
            insights.push(Insight::neutral(
                "Strong fitness focus! A bit of yoga could help with recovery and flexibility.",
            ));
        }
    }

    let days = streak.current_streak;
    if days >= 7 {
        insights.push(Insight::positive(format!(
            "Incredible {days}-day streak! Your consistency is inspiring!"
        )));
    } else if days >= 3 {
        insights.push(Insight::positive(format!(
            "Nice {days}-day streak! Building powerful wellness habits!"
        )));
    }

    if completion_rate >= 90.0 {
        insights.push(Insight::positive(format!(
            "Excellent discipline! {}% of activities completed!",
            round_half_up(completion_rate)
        )));
    }

    FitnessSummary {
        today_yoga_minutes: today_yoga,
        today_fitness_minutes: today_fitness,
        total_yoga_minutes: total_yoga,
        total_fitness_minutes: total_fitness,
        daily_goal: DAILY_WORKOUT_GOAL,
        progress_percent,
        completion_rate,
        streak,
        insights: insights.finish(Insight::neutral(
            "Start your wellness journey! Track your yoga and fitness activities to see insights!",
        )),
    }
}
