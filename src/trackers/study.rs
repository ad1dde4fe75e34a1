use crate::metrics::{
    Insight, InsightSet, StreakOptions, StreakResult, display_percent, percent_of, round_half_up,
    streak,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DAILY_STUDY_GOAL: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub studies: Vec<StudySession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub subject: String,
    pub duration: f64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
    pub today_minutes: f64,
    pub daily_goal: f64,
    pub progress_percent: f64,
    pub average_minutes: f64,
    pub completion_rate: f64,
    pub focused_subjects: usize,
    pub streak: StreakResult,
    pub insights: Vec<Insight>,
}

fn entry_minutes(entry: &StudyEntry) -> f64 {
    entry.studies.iter().map(|s| s.duration).sum()
}

pub fn summarize(entries: &[StudyEntry], session: &Session) -> StudySummary {
    let today_minutes: f64 = entries
        .iter()
        .filter(|e| e.date == session.today)
        .map(entry_minutes)
        .sum();
    let progress_percent = display_percent(percent_of(today_minutes, DAILY_STUDY_GOAL));

    // Averaged per entry over the seven most recent entries.
    let recent = &entries[entries.len().saturating_sub(7)..];
    let average_minutes = if recent.is_empty() {
        0.0
    } else {
        recent.iter().map(entry_minutes).sum::<f64>() / recent.len() as f64
    };

    let total_tasks: usize = entries.iter().map(|e| e.studies.len()).sum();
    let completed_tasks = entries
        .iter()
        .flat_map(|e| e.studies.iter())
        .filter(|s| s.completed)
        .count();
    let completion_rate = percent_of(completed_tasks as f64, total_tasks as f64);

    let focused_subjects = entries
        .iter()
        .flat_map(|e| e.studies.iter().map(|s| s.subject.as_str()))
        .collect::<BTreeSet<_>>()
        .len();

    let streak = streak(entries.iter().map(|e| e.date), session.today, StreakOptions::strict());

    let mut insights = InsightSet::new();
    if today_minutes >= DAILY_STUDY_GOAL {
        insights.push(Insight::positive(format!(
            "Excellent! {today_minutes} minutes of focused study today, you're crushing it!"
        )));
    } else if today_minutes >= DAILY_STUDY_GOAL * 0.7 {
        insights.push(Insight::positive(format!(
            "Great progress! {today_minutes}/{DAILY_STUDY_GOAL} minutes, almost at your goal!"
        )));
    } else if today_minutes > 0.0 {
        insights.push(Insight::neutral(format!(
            "Good start! {today_minutes} minutes studied. Every minute counts toward mastery!"
        )));
    }

    let days = streak.current_streak;
    if days >= 7 {
        insights.push(Insight::positive(format!(
            "Incredible consistency! {days}-day study streak, you're building powerful habits!"
        )));
    } else if days >= 3 {
        insights.push(Insight::positive(format!(
            "Nice streak! {days} days in a row, momentum is building!"
        )));
    }

    let rate = round_half_up(completion_rate);
    if completion_rate >= 90.0 {
        insights.push(Insight::positive(format!(
            "Amazing focus! {rate}% of tasks completed, exceptional discipline!"
        )));
    } else if completion_rate >= 70.0 {
        insights.push(Insight::positive(format!(
            "Solid completion rate of {rate}%. Keep finishing what you start!"
        )));
    }

    if focused_subjects >= 5 {
        insights.push(Insight::positive(format!(
            "Great subject diversity! {focused_subjects} different topics studied, well-rounded learning!"
        )));
    }

    StudySummary {
        today_minutes,
        daily_goal: DAILY_STUDY_GOAL,
        progress_percent,
        average_minutes,
        completion_rate,
        focused_subjects,
        streak,
        insights: insights.finish(Insight::neutral(
            "Start your study journey! Track your sessions to unlock insights and boost productivity!",
        )),
    }
}
