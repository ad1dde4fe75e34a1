use crate::metrics::{
    Insight, InsightSet, StreakOptions, StreakResult, aggregate, last_n_days, percent_of,
    round_half_up, streak, weighted_score,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_DAILY_GOAL_ML: f64 = 2000.0;
const STREAK_LOOKBACK_DAYS: u32 = 30;
const ML_PER_OZ: f64 = 29.5735;
const ML_PER_CUP: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    #[default]
    Ml,
    Oz,
    Cups,
}

impl VolumeUnit {
    pub fn to_ml(self, amount: f64) -> f64 {
        match self {
            VolumeUnit::Ml => amount,
            VolumeUnit::Oz => amount * ML_PER_OZ,
            VolumeUnit::Cups => amount * ML_PER_CUP,
        }
    }

    pub fn from_ml(self, ml: f64) -> f64 {
        match self {
            VolumeUnit::Ml => ml,
            VolumeUnit::Oz => ml / ML_PER_OZ,
            VolumeUnit::Cups => ml / ML_PER_CUP,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Ml => "ml",
            VolumeUnit::Oz => "oz",
            VolumeUnit::Cups => "cups",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkKind {
    #[default]
    Water,
    Tea,
    Coffee,
    Juice,
    Soda,
    Smoothie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cold,
    #[default]
    Room,
    Warm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntake {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: VolumeUnit,
    #[serde(default, rename = "type")]
    pub kind: DrinkKind,
    #[serde(default)]
    pub temperature: Temperature,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timestamp: String,
}

impl WaterIntake {
    pub fn ml(&self) -> f64 {
        self.unit.to_ml(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSettings {
    #[serde(default = "default_goal")]
    pub daily_goal: f64,
    #[serde(default)]
    pub unit: VolumeUnit,
    #[serde(default = "default_reminder")]
    pub reminder_frequency: u32,
}

fn default_goal() -> f64 {
    DEFAULT_DAILY_GOAL_ML
}

fn default_reminder() -> u32 {
    120
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            daily_goal: default_goal(),
            unit: VolumeUnit::Ml,
            reminder_frequency: default_reminder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterData {
    #[serde(default)]
    pub daily_intakes: Vec<WaterIntake>,
    #[serde(default)]
    pub settings: WaterSettings,
}

impl WaterData {
    pub fn daily_ml(&self) -> BTreeMap<NaiveDate, f64> {
        let mut days = BTreeMap::new();
        for intake in &self.daily_intakes {
            *days.entry(intake.date).or_insert(0.0) += intake.ml();
        }
        days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    BelowGoal,
    AtGoal,
    ExceededGoal,
}

impl GoalStatus {
    fn for_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            GoalStatus::ExceededGoal
        } else if progress >= 90.0 {
            GoalStatus::AtGoal
        } else {
            GoalStatus::BelowGoal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHistory {
    pub date: NaiveDate,
    pub total_amount: f64,
    pub goal_amount: f64,
    pub progress: f64,
    pub entries: usize,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSummary {
    pub today_total: f64,
    pub daily_goal: f64,
    /// Unclamped.
    pub goal_progress: f64,
    pub goal_exceeded: bool,
    pub streak: StreakResult,
    pub today_started: bool,
    pub weekly_average: f64,
    pub hydration_score: i64,
    pub weekly_history: Vec<DayHistory>,
    pub insights: Vec<Insight>,
}

impl WaterSummary {
    /// Streak as shown to the user: a started day counts as one.
    pub fn streak_days(&self) -> u32 {
        if self.today_started {
            self.streak.current_streak.max(1)
        } else {
            self.streak.current_streak
        }
    }
}

pub fn summarize(data: &WaterData, session: &Session) -> WaterSummary {
    let today = session.today;
    let goal = data.settings.daily_goal;
    let by_day = data.daily_ml();

    let today_metrics = aggregate(
        data.daily_intakes
            .iter()
            .filter(|i| i.date == today)
            .map(|i| Some(i.ml())),
        Some(goal),
    );
    let today_total = today_metrics.total;
    let goal_progress = today_metrics.goal_progress_percent;

    let goal_days = by_day
        .iter()
        .filter(|(_, total)| goal > 0.0 && **total >= goal)
        .map(|(date, _)| *date);
    let streak = streak(
        goal_days,
        today,
        StreakOptions::strict().with_lookback(STREAK_LOOKBACK_DAYS),
    );
    let today_started = today_total > 0.0 && goal_progress < 100.0;

    let last_week = last_n_days(today, 7);
    // Days with nothing logged stay out of the average.
    let weekly_average =
        aggregate(last_week.iter().map(|date| by_day.get(date).copied()), None).average;

    let kinds_today: BTreeSet<DrinkKind> = data
        .daily_intakes
        .iter()
        .filter(|i| i.date == today)
        .map(|i| i.kind)
        .collect();

    let weekly_history: Vec<DayHistory> = last_week
        .iter()
        .map(|date| {
            let total_amount = by_day.get(date).copied().unwrap_or(0.0);
            let progress = percent_of(total_amount, goal);
            DayHistory {
                date: *date,
                total_amount,
                goal_amount: goal,
                progress,
                entries: data.daily_intakes.iter().filter(|i| i.date == *date).count(),
                status: GoalStatus::for_progress(progress),
            }
        })
        .collect();

    let mut summary = WaterSummary {
        today_total,
        daily_goal: goal,
        goal_progress,
        goal_exceeded: today_metrics.goal_exceeded(),
        streak,
        today_started,
        weekly_average,
        hydration_score: 0,
        weekly_history,
        insights: Vec::new(),
    };

    let streak_days = summary.streak_days();
    let consistency = if goal > 0.0 { weekly_average / goal } else { 0.0 };
    summary.hydration_score = weighted_score(&[
        ((goal_progress / 100.0).min(1.0), 0.4),
        ((f64::from(streak_days) / 7.0).min(1.0) * 0.3, 0.3),
        (consistency * 0.4, 0.2),
        ((kinds_today.len() as f64 / 3.0).min(1.0) * 0.3, 0.1),
    ]);

    summary.insights = insights(&summary, data.settings.unit, session.hour);
    summary
}

fn format_amount(ml: f64, unit: VolumeUnit) -> String {
    format!("{} {}", round_half_up(unit.from_ml(ml)), unit.symbol())
}

fn insights(summary: &WaterSummary, unit: VolumeUnit, hour: u32) -> Vec<Insight> {
    let progress = summary.goal_progress;
    let goal = summary.daily_goal;
    let mut insights = InsightSet::new();

    if progress >= 100.0 {
        insights.push(Insight::positive(format!(
            "Congratulations! You've reached your daily water goal of {}!",
            format_amount(goal, unit)
        )));
    } else if progress >= 75.0 {
        insights.push(Insight::positive(format!(
            "You're {}% away from your daily goal! Almost there!",
            round_half_up(100.0 - progress)
        )));
    } else if progress >= 50.0 {
        insights.push(Insight::neutral(format!(
            "Halfway there! You've consumed {} of your {} goal.",
            format_amount(summary.today_total, unit),
            format_amount(goal, unit)
        )));
    } else if progress > 0.0 {
        insights.push(Insight::neutral(format!(
            "You've started your hydration journey. {} to go!",
            format_amount(goal - summary.today_total, unit)
        )));
    } else {
        insights.push(Insight::warning(format!(
            "Time to start hydrating! Your goal is {} today.",
            format_amount(goal, unit)
        )));
    }

    let days = summary.streak_days();
    if days >= 7 {
        insights.push(Insight::positive(format!(
            "Amazing {days}-day hydration streak! Keep it going!"
        )));
    } else if days >= 3 {
        insights.push(Insight::positive(format!(
            "{days} days in a row! Building a strong hydration habit!"
        )));
    }

    if hour >= 12 && progress < 30.0 {
        insights.push(Insight::warning(
            "It's past noon and you're behind schedule. Time to catch up on hydration!",
        ));
    }
    if hour >= 18 && progress < 70.0 {
        insights.push(Insight::warning(
            "Evening approaching. Don't forget to hydrate before the day ends!",
        ));
    }

    let score = summary.hydration_score;
    if score >= 90 {
        insights.push(Insight::positive(format!(
            "Excellent hydration score: {score}/100! You're a hydration champion!"
        )));
    } else if score >= 70 {
        insights.push(Insight::positive(format!(
            "Good hydration habits! Your score is {score}/100."
        )));
    }

    insights.finish(Insight::neutral(
        "Start tracking your water intake to stay hydrated and healthy!",
    ))
}
