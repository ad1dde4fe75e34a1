use crate::metrics::{
    Insight, InsightSet, StreakOptions, StreakResult, display_percent, mean, percent_of, streak,
    variance,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DAILY_SLEEP_GOAL: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<SleepSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    #[serde(default)]
    pub sleep_time: String,
    #[serde(default)]
    pub wake_time: String,
    pub duration: f64,
    /// 1 (poor) to 5 (excellent).
    pub quality: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub today_duration: f64,
    pub daily_goal: f64,
    pub progress_percent: f64,
    pub average_duration: f64,
    pub average_quality: f64,
    pub deep_sleep_hours: f64,
    pub rem_sleep_hours: f64,
    pub consistency_score: f64,
    pub streak: StreakResult,
    pub insights: Vec<Insight>,
}

pub fn summarize(entries: &[SleepEntry], session: &Session) -> SleepSummary {
    let today_duration: f64 = entries
        .iter()
        .filter(|entry| entry.date == session.today)
        .flat_map(|entry| entry.sessions.iter())
        .map(|s| s.duration)
        .sum();

    let sessions: Vec<&SleepSession> = entries.iter().flat_map(|e| e.sessions.iter()).collect();
    let average_duration = mean(&sessions.iter().map(|s| s.duration).collect::<Vec<_>>());
    let average_quality = mean(&sessions.iter().map(|s| f64::from(s.quality)).collect::<Vec<_>>());

    // Restorative phases are estimated only for nights rated 4 or better.
    let restful_hours: f64 = sessions
        .iter()
        .filter(|s| s.quality >= 4)
        .map(|s| s.duration)
        .sum();
    let deep_sleep_hours = restful_hours * 0.25;
    let rem_sleep_hours = restful_hours * 0.20;

    let progress_percent = display_percent(percent_of(today_duration, DAILY_SLEEP_GOAL));
    let streak = streak(entries.iter().map(|e| e.date), session.today, StreakOptions::strict());
    let consistency_score = consistency_score(entries);

    let mut insights = InsightSet::new();
    if today_duration >= DAILY_SLEEP_GOAL {
        insights.push(Insight::positive(format!(
            "Perfect! {today_duration} hours of sleep, you're well-rested!"
        )));
    } else if today_duration >= DAILY_SLEEP_GOAL * 0.8 {
        insights.push(Insight::positive(format!(
            "Good sleep! {today_duration}/{DAILY_SLEEP_GOAL} hours, nearly optimal!"
        )));
    } else if today_duration > 0.0 {
        insights.push(Insight::warning(format!(
            "You slept {today_duration} hours. Aim for 7-9 hours for optimal health!"
        )));
    }

    if average_quality >= 4.0 {
        insights.push(Insight::positive(
            "Excellent sleep quality! Keep maintaining your bedtime routine!",
        ));
    } else if average_quality >= 3.0 {
        insights.push(Insight::neutral(
            "Good sleep quality. Consider reducing screen time before bed!",
        ));
    } else if average_quality > 0.0 {
        insights.push(Insight::warning(
            "Your sleep quality needs improvement. Try relaxation techniques before bed!",
        ));
    }

    if consistency_score >= 80.0 {
        insights.push(Insight::positive(
            "Amazing consistency! Your regular sleep schedule boosts recovery!",
        ));
    } else if consistency_score >= 60.0 {
        insights.push(Insight::neutral(
            "Good consistency. Try going to bed at the same time daily!",
        ));
    }

    let days = streak.current_streak;
    if days >= 7 {
        insights.push(Insight::positive(format!(
            "Incredible {days}-day tracking streak! Your dedication is inspiring!"
        )));
    } else if days >= 3 {
        insights.push(Insight::positive(format!(
            "Nice {days}-day streak! Tracking leads to better habits!"
        )));
    }

    if deep_sleep_hours > 0.0
        && rem_sleep_hours > 0.0
        && deep_sleep_hours + rem_sleep_hours >= average_duration * 0.4
    {
        insights.push(Insight::positive(
            "Great! You're getting quality restorative and REM sleep!",
        ));
    }

    SleepSummary {
        today_duration,
        daily_goal: DAILY_SLEEP_GOAL,
        progress_percent,
        average_duration,
        average_quality,
        deep_sleep_hours,
        rem_sleep_hours,
        consistency_score,
        streak,
        insights: insights.finish(Insight::neutral(
            "Track your sleep to optimize recovery, mood, and productivity!",
        )),
    }
}

fn consistency_score(entries: &[SleepEntry]) -> f64 {
    if entries.len() < 3 {
        return 0.0;
    }
    let recent = &entries[entries.len().saturating_sub(7)..];
    let durations: Vec<f64> = recent
        .iter()
        .flat_map(|e| e.sessions.iter().map(|s| s.duration))
        .collect();
    if durations.len() <= 1 {
        return 0.0;
    }
    (100.0 - variance(&durations) * 20.0).max(0.0)
}
