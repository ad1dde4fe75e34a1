use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Unclamped; above 100 means the goal was exceeded.
    pub goal_progress_percent: f64,
}

impl AggregateMetrics {
    pub fn goal_exceeded(&self) -> bool {
        self.goal_progress_percent > 100.0
    }
}

/// `None` values count toward neither the sum nor the mean.
pub fn aggregate<I>(values: I, goal: Option<f64>) -> AggregateMetrics
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut count = 0usize;
    let mut total = 0.0;
    for value in values.into_iter().flatten() {
        count += 1;
        total += value;
    }

    let average = if count > 0 { total / count as f64 } else { 0.0 };
    let goal_progress_percent = goal.map(|g| percent_of(total, g)).unwrap_or(0.0);

    AggregateMetrics {
        count,
        total,
        average,
        goal_progress_percent,
    }
}

pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

pub fn display_percent(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Rounds halves toward positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

pub fn weighted_score(parts: &[(f64, f64)]) -> i64 {
    let sum: f64 = parts.iter().map(|(value, weight)| value * weight).sum();
    round_half_up(sum * 100.0) as i64
}

pub fn trend_label(series: &[f64]) -> &'static str {
    if series.len() < 2 {
        return "insufficient data";
    }
    let (first, second) = series.split_at(series.len() / 2);
    let difference = mean(second) - mean(first);

    if difference > 0.5 {
        "significantly improving"
    } else if difference > 0.1 {
        "improving"
    } else if difference < -0.5 {
        "declining"
    } else if difference < -0.1 {
        "slightly declining"
    } else {
        "stable"
    }
}

pub fn consistency(series: &[f64]) -> i64 {
    if series.len() < 2 {
        return 100;
    }
    round_half_up((100.0 - std_dev(series) * 20.0).max(0.0)) as i64
}
