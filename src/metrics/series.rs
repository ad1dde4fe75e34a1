use super::{week_label, week_start};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: f64,
    pub days_counted: u8,
    pub average: f64,
}

pub fn last_n_days(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n as i64)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

pub fn daily_totals<I>(values: I, days: &[NaiveDate]) -> Vec<DailyPoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let sums = sum_by_day(values);
    days.iter()
        .map(|date| DailyPoint {
            date: *date,
            value: sums.get(date).copied().unwrap_or(0.0),
        })
        .collect()
}

pub fn weekly_totals<I>(values: I, today: NaiveDate, weeks: u32) -> Vec<WeeklyPoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let sums = sum_by_day(values);
    let newest = week_start(today);

    (0..i64::from(weeks))
        .rev()
        .map(|back| {
            let start_date = newest - Duration::weeks(back);
            let end_date = start_date + Duration::days(6);
            let total: f64 = sums.range(start_date..=end_date).map(|(_, v)| v).sum();
            let days_counted = ((today - start_date).num_days() + 1).clamp(1, 7) as u8;
            WeeklyPoint {
                week: week_label(start_date),
                start_date,
                end_date,
                total,
                days_counted,
                average: total / f64::from(days_counted),
            }
        })
        .collect()
}

fn sum_by_day<I>(values: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut sums = BTreeMap::new();
    for (date, value) in values {
        *sums.entry(date).or_insert(0.0) += value;
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_7_days_ends_today() {
        let today = day(2026, 1, 5);
        let days = last_n_days(today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], day(2025, 12, 30));
        assert_eq!(days[6], today);
    }

    #[test]
    fn daily_totals_fill_missing_days() {
        let today = day(2026, 1, 5);
        let two_days_ago = today - Duration::days(2);
        let points = daily_totals(
            vec![(two_days_ago, 3.0), (two_days_ago, 1.5), (day(2020, 1, 1), 9.0)],
            &last_n_days(today, 7),
        );
        assert_eq!(points.len(), 7);
        let point = points
            .iter()
            .find(|p| p.date == two_days_ago)
            .expect("missing day");
        assert_eq!(point.value, 4.5);
        assert_eq!(points.iter().map(|p| p.value).sum::<f64>(), 4.5);
    }

    #[test]
    fn weekly_series_lengths_and_partial_week() {
        // 2026-01-07 is a Wednesday.
        let today = day(2026, 1, 7);
        let points = weekly_totals(vec![(day(2026, 1, 5), 6.0), (today, 3.0)], today, 8);
        assert_eq!(points.len(), 8);

        let current = points.last().unwrap();
        assert_eq!(current.start_date, day(2026, 1, 5));
        assert_eq!(current.days_counted, 3);
        assert_eq!(current.total, 9.0);
        assert_eq!(current.average, 3.0);
        assert_eq!(points[0].days_counted, 7);
    }
}
