use crate::metrics::{Insight, InsightSet, display_percent, percent_of};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DAILY_CALORIE_GOAL: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub today_calories: f64,
    pub daily_goal: f64,
    pub progress_percent: f64,
    pub recent_days_with_meals: usize,
    pub insights: Vec<Insight>,
}

pub fn summarize(entries: &[MealEntry], session: &Session) -> MealSummary {
    let today_calories: f64 = entries
        .iter()
        .filter(|e| e.date == session.today)
        .flat_map(|e| e.meals.iter())
        .map(|m| m.calories)
        .sum();
    let progress_percent = display_percent(percent_of(today_calories, DAILY_CALORIE_GOAL));

    let goal = DAILY_CALORIE_GOAL;
    let mut insights = InsightSet::new();
    if today_calories > goal * 1.2 {
        insights.push(Insight::warning(format!(
            "Whoa! {today_calories} calories today, consider balancing with lighter meals tomorrow."
        )));
    } else if today_calories > goal {
        insights.push(Insight::neutral(format!(
            "Slightly over goal ({today_calories}/{goal}). Keep tracking for balance!"
        )));
    } else if today_calories >= goal * 0.8 {
        insights.push(Insight::positive(format!(
            "Great balance! {today_calories}/{goal} calories, you're on track!"
        )));
    } else if today_calories > 0.0 {
        insights.push(Insight::neutral(format!(
            "Good start! {today_calories}/{goal} calories, fuel your body well!"
        )));
    }

    let recent = &entries[entries.len().saturating_sub(7)..];
    let recent_days_with_meals = recent.iter().filter(|e| !e.meals.is_empty()).count();
    if recent.len() >= 5 {
        if recent_days_with_meals == 7 {
            insights.push(Insight::positive(
                "Perfect consistency! 7 days in a row tracking meals, amazing commitment!",
            ));
        } else if recent_days_with_meals >= 5 {
            insights.push(Insight::positive(format!(
                "Strong consistency! Tracked {recent_days_with_meals} of last 7 days, keep it up!"
            )));
        }
    }

    MealSummary {
        today_calories,
        daily_goal: goal,
        progress_percent,
        recent_days_with_meals,
        insights: insights.finish(Insight::neutral(
            "Track your meals to see insights and stay accountable!",
        )),
    }
}
