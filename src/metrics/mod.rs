pub mod aggregate;
pub mod distribution;
pub mod insight;
pub mod series;
pub mod streak;

pub use aggregate::{
    AggregateMetrics, aggregate, consistency, display_percent, mean, percent_of, round_half_up,
    round_to, std_dev, trend_label, variance, weighted_score,
};
pub use distribution::{DistributionBucket, distribution, top};
pub use insight::{Insight, InsightSet, InsightTone};
pub use series::{DailyPoint, WeeklyPoint, daily_totals, last_n_days, weekly_totals};
pub use streak::{Leniency, StreakOptions, StreakResult, streak};

use chrono::{Datelike, Duration, NaiveDate};

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
