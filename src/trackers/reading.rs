use crate::metrics::{
    DailyPoint, DistributionBucket, Insight, InsightSet, StreakOptions, StreakResult, WeeklyPoint,
    daily_totals, distribution, last_n_days, percent_of, round_half_up, streak, weekly_totals,
    weighted_score,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const STREAK_LOOKBACK_DAYS: u32 = 365;
const TARGET_DAILY_MINUTES: f64 = 60.0;
const TARGET_STREAK_DAYS: f64 = 30.0;
const TARGET_DAILY_PAGES: f64 = 50.0;
const TARGET_FINISHED_BOOKS: f64 = 10.0;
const HISTORY_WEEKS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingFormat {
    #[default]
    Physical,
    Ebook,
    Audiobook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    #[default]
    ToRead,
    Reading,
    Finished,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Book,
}

impl std::fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GoalPeriod::Daily => "daily",
            GoalPeriod::Weekly => "weekly",
            GoalPeriod::Monthly => "monthly",
            GoalPeriod::Yearly => "yearly",
            GoalPeriod::Book => "book",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub pages_read: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reading_type: ReadingFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Book {
    pub fn progress(&self) -> f64 {
        percent_of(f64::from(self.current_page), f64::from(self.total_pages))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoal {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub period: GoalPeriod,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ReadingGoal {
    pub fn progress(&self) -> f64 {
        percent_of(f64::from(self.current), f64::from(self.target))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingData {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub reading_sessions: Vec<ReadingSession>,
    #[serde(default)]
    pub reading_goals: Vec<ReadingGoal>,
}

impl ReadingData {
    pub fn daily_pages(&self) -> BTreeMap<NaiveDate, u32> {
        let mut days: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for session in &self.reading_sessions {
            let pages = days.entry(session.date).or_insert(0);
            *pages = pages.saturating_add(session.pages_read);
        }
        days
    }
}

/// Sum that stops at `u32::MAX` instead of overflowing.
pub fn saturating_total<I>(values: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    values.into_iter().fold(0, u32::saturating_add)
}

pub fn derive_progress(data: &ReadingData, today: NaiveDate) -> Vec<Book> {
    data.books
        .iter()
        .map(|book| {
            let mut book = book.clone();
            if book.status == BookStatus::Reading {
                let pages = saturating_total(
                    data.reading_sessions
                        .iter()
                        .filter(|s| s.book_id == book.id)
                        .map(|s| s.pages_read),
                );
                book.current_page = pages.min(book.total_pages);
                if book.current_page >= book.total_pages {
                    book.status = BookStatus::Finished;
                    book.finish_date = Some(today);
                }
            }
            book
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSummary {
    pub today_minutes: u32,
    pub today_pages: u32,
    pub weekly_minutes: u32,
    pub monthly_minutes: u32,
    pub daily_minutes: Vec<DailyPoint>,
    pub weekly_history: Vec<WeeklyPoint>,
    pub total_books_read: usize,
    pub total_pages_read: u32,
    pub streak: StreakResult,
    pub average_daily_pages: f64,
    pub reading_score: i64,
    pub books: Vec<Book>,
    pub genres: Vec<DistributionBucket>,
    pub insights: Vec<Insight>,
}

pub fn summarize(data: &ReadingData, session: &Session) -> ReadingSummary {
    let today = session.today;
    let sessions = &data.reading_sessions;

    let minutes_within = |days: &[NaiveDate]| -> u32 {
        let window: BTreeSet<&NaiveDate> = days.iter().collect();
        saturating_total(
            sessions
                .iter()
                .filter(|s| window.contains(&s.date))
                .map(|s| s.duration),
        )
    };

    let today_minutes =
        saturating_total(sessions.iter().filter(|s| s.date == today).map(|s| s.duration));
    let today_pages =
        saturating_total(sessions.iter().filter(|s| s.date == today).map(|s| s.pages_read));
    let last_week = last_n_days(today, 7);
    let weekly_minutes = minutes_within(&last_week);
    let monthly_minutes = minutes_within(&last_n_days(today, 30));

    let minute_points = || sessions.iter().map(|s| (s.date, f64::from(s.duration)));
    let daily_minutes = daily_totals(minute_points(), &last_week);
    let weekly_history = weekly_totals(minute_points(), today, HISTORY_WEEKS);

    let books = derive_progress(data, today);
    let total_books_read = books
        .iter()
        .filter(|b| b.status == BookStatus::Finished)
        .count();
    let total_pages_read = saturating_total(sessions.iter().map(|s| s.pages_read));

    let mut minutes_by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for s in sessions {
        let minutes = minutes_by_day.entry(s.date).or_insert(0);
        *minutes = minutes.saturating_add(s.duration);
    }
    let reading_days: Vec<NaiveDate> = minutes_by_day
        .iter()
        .filter(|(_, minutes)| **minutes > 0)
        .map(|(date, _)| *date)
        .collect();
    let streak = streak(
        reading_days.iter().copied(),
        today,
        StreakOptions::strict().with_lookback(STREAK_LOOKBACK_DAYS),
    );

    let average_daily_pages = if reading_days.is_empty() {
        0.0
    } else {
        f64::from(total_pages_read) / reading_days.len() as f64
    };

    let reading_score = weighted_score(&[
        ((f64::from(today_minutes) / TARGET_DAILY_MINUTES).min(1.0), 0.3),
        ((f64::from(streak.current_streak) / TARGET_STREAK_DAYS).min(1.0), 0.2),
        (average_daily_pages / TARGET_DAILY_PAGES, 0.2),
        ((total_books_read as f64 / TARGET_FINISHED_BOOKS).min(1.0), 0.3),
    ]);

    let genres = distribution(
        books
            .iter()
            .filter(|b| !b.genre.is_empty())
            .map(|b| b.genre.clone()),
    );

    let mut summary = ReadingSummary {
        today_minutes,
        today_pages,
        weekly_minutes,
        monthly_minutes,
        daily_minutes,
        weekly_history,
        total_books_read,
        total_pages_read,
        streak,
        average_daily_pages,
        reading_score,
        books,
        genres,
        insights: Vec::new(),
    };
    summary.insights = insights(&summary, &data.reading_goals);
    summary
}

pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{minutes} minutes")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

fn insights(summary: &ReadingSummary, goals: &[ReadingGoal]) -> Vec<Insight> {
    let mut insights = InsightSet::new();

    let minutes = summary.today_minutes;
    if minutes >= 60 {
        insights.push(Insight::positive(format!(
            "Great job! You've read for {} today!",
            format_minutes(minutes)
        )));
    } else if minutes >= 30 {
        insights.push(Insight::positive(format!(
            "You're making good progress: {} today.",
            format_minutes(minutes)
        )));
    } else if minutes > 0 {
        insights.push(Insight::neutral("You've started reading today. Keep going!"));
    } else {
        insights.push(Insight::warning(
            "Time to pick up a book! Even 15 minutes of reading can make a difference.",
        ));
    }

    let days = summary.streak.current_streak;
    if days >= 7 {
        insights.push(Insight::positive(format!(
            "Amazing {days}-day reading streak! You're building a great habit!"
        )));
    } else if days >= 3 {
        insights.push(Insight::positive(format!(
            "{days} days in a row! Consistency is key to building habits."
        )));
    }

    for goal in goals.iter().filter(|g| g.status == GoalStatus::Active) {
        let progress = goal.progress();
        if progress >= 100.0 {
            insights.push(Insight::positive(format!(
                "Congratulations! You've completed your {} reading goal!",
                goal.period
            )));
        } else if progress >= 75.0 {
            insights.push(Insight::positive(format!(
                "You're {}% away from your {} goal!",
                round_half_up(100.0 - progress),
                goal.period
            )));
        }
    }

    if !summary.books.iter().any(|b| b.status == BookStatus::Reading) {
        insights.push(Insight::warning(
            "You're not currently reading any books. Start a new one!",
        ));
    }

    let score = summary.reading_score;
    if score >= 90 {
        insights.push(Insight::positive(format!(
            "Excellent reading score: {score}/100! You're a reading champion!"
        )));
    } else if score >= 70 {
        insights.push(Insight::positive(format!(
            "Good reading habits! Your score is {score}/100."
        )));
    }

    insights.finish(Insight::neutral(
        "Start tracking your reading to build a lifelong learning habit!",
    ))
}
