use crate::metrics::{Insight, InsightSet, month_start, round_half_up, variance, week_start};
use crate::models::Session;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BUSY_DAY_EVENTS: usize = 3;
const EVENTS_PER_GRID_DAY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Work,
    Personal,
    Meeting,
    Health,
    Social,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub priority: EventPriority,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub recurring: Recurrence,
    #[serde(default)]
    pub reminders: Vec<u32>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    pub total_events: usize,
    pub events_today: usize,
    pub events_this_week: usize,
    pub upcoming_events: usize,
    pub past_events: usize,
    pub busy_days: usize,
    pub free_days: i64,
    pub average_events_per_day: f64,
    pub schedule_efficiency: f64,
    pub meeting_count: usize,
    pub personal_count: usize,
    pub free_upcoming_days: Vec<NaiveDate>,
    pub month: Vec<CalendarDay>,
    pub insights: Vec<Insight>,
}

pub fn summarize(events: &[CalendarEvent], session: &Session) -> CalendarSummary {
    let today = session.today;
    let monday = week_start(today);
    let sunday = monday + Duration::days(6);
    let next_week = today + Duration::days(7);

    let total_events = events.len();
    let events_today = events.iter().filter(|e| e.date == today).count();
    let events_this_week = events
        .iter()
        .filter(|e| e.date >= monday && e.date <= sunday)
        .count();
    let upcoming_events = events
        .iter()
        .filter(|e| e.date > today && e.date <= next_week)
        .count();
    let past_events = events.iter().filter(|e| e.date < today).count();

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        *per_day.entry(event.date).or_insert(0) += 1;
    }
    let busy_days = per_day.values().filter(|&&n| n >= BUSY_DAY_EVENTS).count();
    let free_days = 30 - busy_days as i64;
    let average_events_per_day = if per_day.is_empty() {
        0.0
    } else {
        total_events as f64 / per_day.len() as f64
    };
    let counts: Vec<f64> = per_day.values().map(|&n| n as f64).collect();
    let schedule_efficiency = (100.0 - variance(&counts) * 10.0).max(0.0);

    let meeting_count = events
        .iter()
        .filter(|e| e.category == EventCategory::Meeting)
        .count();
    let personal_count = events
        .iter()
        .filter(|e| {
            matches!(
                e.category,
                EventCategory::Personal | EventCategory::Health | EventCategory::Social
            )
        })
        .count();

    let free_upcoming_days: Vec<NaiveDate> = (1..=7)
        .map(|offset| today + Duration::days(offset))
        .filter(|date| !per_day.contains_key(date))
        .collect();

    let mut insights = InsightSet::new();
    if busy_days > 20 {
        insights.push(Insight::warning(format!(
            "You have {busy_days} busy days this month. Consider spreading events more evenly."
        )));
    }
    if events_today > 5 {
        insights.push(Insight::critical(format!(
            "You have {events_today} events today! Make sure to take breaks between meetings."
        )));
    } else if events_today == 0 {
        insights.push(Insight::positive(
            "No events scheduled for today. Perfect time for focused work or planning!",
        ));
    }
    if upcoming_events > 10 {
        insights.push(Insight::warning(format!(
            "You have {upcoming_events} upcoming events next week. Consider prioritizing or rescheduling some."
        )));
    }
    if meeting_count > personal_count * 2 {
        insights.push(Insight::neutral(format!(
            "Meetings dominate your schedule ({meeting_count} meetings vs {personal_count} personal events). Balance is key!"
        )));
    }
    if schedule_efficiency >= 80.0 {
        insights.push(Insight::positive(
            "Excellent schedule efficiency! Your events are well-distributed.",
        ));
    } else if schedule_efficiency <= 50.0 {
        insights.push(Insight::warning(format!(
            "Schedule efficiency is low ({}%). Events are too clustered. Consider better distribution.",
            round_half_up(schedule_efficiency)
        )));
    }
    if free_upcoming_days.len() > 2 {
        insights.push(Insight::positive(format!(
            "You have {} free days coming up. Great for strategic planning!",
            free_upcoming_days.len()
        )));
    }

    CalendarSummary {
        total_events,
        events_today,
        events_this_week,
        upcoming_events,
        past_events,
        busy_days,
        free_days,
        average_events_per_day,
        schedule_efficiency,
        meeting_count,
        personal_count,
        free_upcoming_days,
        month: month_grid(events, today, today),
        insights: insights.finish(Insight::positive(
            "Your schedule looks balanced! Keep up the good organization.",
        )),
    }
}

/// Whole Sunday-to-Saturday weeks covering the month of `month_of`. Each
/// day carries at most its first two events.
pub fn month_grid(events: &[CalendarEvent], month_of: NaiveDate, today: NaiveDate) -> Vec<CalendarDay> {
    let first = month_start(month_of);
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first);

    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let end = last + Duration::days(6 - last.weekday().num_days_from_sunday() as i64);

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarDay {
            date,
            is_current_month: date.month() == first.month() && date.year() == first.year(),
            is_today: date == today,
            events: events
                .iter()
                .filter(|e| e.date == date)
                .take(EVENTS_PER_GRID_DAY)
                .cloned()
                .collect(),
        })
        .collect()
}
