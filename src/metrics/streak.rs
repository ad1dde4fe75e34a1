use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Leniency {
    /// The current streak must include today.
    #[default]
    Strict,
    /// A run ending yesterday still counts as current.
    GraceDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakOptions {
    pub leniency: Leniency,
    pub lookback: Option<u32>,
}

impl StreakOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn grace_day() -> Self {
        Self {
            leniency: Leniency::GraceDay,
            lookback: None,
        }
    }

    pub fn with_lookback(mut self, days: u32) -> Self {
        self.lookback = Some(days);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_tracked_days: u32,
    pub last_tracked_date: Option<NaiveDate>,
}

pub fn streak<I>(dates: I, today: NaiveDate, options: StreakOptions) -> StreakResult
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
    if days.is_empty() {
        return StreakResult::default();
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    let anchor = if days.contains(&today) {
        Some(today)
    } else {
        let yesterday = today - Duration::days(1);
        match options.leniency {
            Leniency::GraceDay if days.contains(&yesterday) => Some(yesterday),
            _ => None,
        }
    };

    let mut current = 0u32;
    if let Some(mut day) = anchor {
        while days.contains(&day) {
            if options.lookback.is_some_and(|limit| current >= limit) {
                break;
            }
            current += 1;
            day -= Duration::days(1);
        }
    }

    StreakResult {
        current_streak: current,
        longest_streak: longest,
        total_tracked_days: days.len() as u32,
        last_tracked_date: days.iter().next_back().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let result = streak(Vec::new(), day(2024, 1, 5), StreakOptions::strict());
        assert_eq!(result, StreakResult::default());
    }

    #[test]
    fn five_consecutive_days_ending_today() {
        let dates = (1..=5).map(|d| day(2024, 1, d));
        let result = streak(dates, day(2024, 1, 5), StreakOptions::strict());
        assert_eq!(result.longest_streak, 5);
        assert_eq!(result.current_streak, 5);
        assert_eq!(result.total_tracked_days, 5);
        assert_eq!(result.last_tracked_date, Some(day(2024, 1, 5)));
    }

    #[test]
    fn gap_breaks_longest_and_strict_current() {
        let dates = vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 5)];
        let result = streak(dates, day(2024, 1, 6), StreakOptions::strict());
        assert_eq!(result.longest_streak, 2);
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.total_tracked_days, 3);
    }

    #[test]
    fn grace_day_lets_yesterday_anchor() {
        let dates = vec![day(2024, 1, 4), day(2024, 1, 5)];
        let strict = streak(dates.clone(), day(2024, 1, 6), StreakOptions::strict());
        let lenient = streak(dates, day(2024, 1, 6), StreakOptions::grace_day());
        assert_eq!(strict.current_streak, 0);
        assert_eq!(lenient.current_streak, 2);
    }

    #[test]
    fn duplicates_do_not_inflate() {
        let dates = vec![
            day(2024, 1, 3),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 2),
            day(2024, 1, 3),
        ];
        let result = streak(dates, day(2024, 1, 3), StreakOptions::strict());
        assert_eq!(result.current_streak, 2);
        assert_eq!(result.longest_streak, 2);
        assert_eq!(result.total_tracked_days, 2);
    }

    #[test]
    fn lookback_caps_current_only() {
        let dates = (1..=20).map(|d| day(2024, 1, d));
        let result = streak(dates, day(2024, 1, 20), StreakOptions::strict().with_lookback(7));
        assert_eq!(result.current_streak, 7);
        assert_eq!(result.longest_streak, 20);
    }

    #[test]
    fn current_never_exceeds_longest_or_total() {
        let today = day(2024, 3, 10);
        let samples: Vec<Vec<NaiveDate>> = vec![
            vec![today],
            vec![today, today - Duration::days(2)],
            (0..9).map(|i| today - Duration::days(i * 2)).collect(),
            (0..30).map(|i| today - Duration::days(i)).collect(),
            vec![today + Duration::days(3), today + Duration::days(4)],
        ];
        for dates in samples {
            for options in [StreakOptions::strict(), StreakOptions::grace_day()] {
                let result = streak(dates.clone(), today, options);
                assert!(result.current_streak <= result.longest_streak);
                assert!(result.longest_streak <= result.total_tracked_days);
            }
        }
    }
}
