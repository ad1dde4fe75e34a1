use super::finance::format_currency;
use super::reading::saturating_total;
use crate::metrics::{consistency, last_n_days, mean, round_to, trend_label};
use crate::models::{Session, TrackerRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

const HIGH_SPEND: f64 = 1000.0;
const LOW_SPEND: f64 = 500.0;
const WATER_DAYS: usize = 7;
const READING_DAYS: u32 = 14;
const MOOD_DAYS: u32 = 30;
const IMPRESSIVE_PAGES_PER_DAY: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSpend {
    pub category: String,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancePanel {
    pub categories: Vec<BudgetSpend>,
    pub total_spent: f64,
    pub average_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterPanel {
    pub days: Vec<(NaiveDate, f64)>,
    pub goal: f64,
    pub daily_average: f64,
    pub goal_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPanel {
    pub pages_by_day: Vec<(NaiveDate, u32)>,
    pub total_pages: u32,
    pub reading_days: usize,
    pub current_streak: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPanel {
    /// Daily average on a five-point scale; `None` on days without entries.
    pub daily: Vec<(NaiveDate, Option<f64>)>,
    pub average: f64,
    pub best_day: f64,
    pub trend: &'static str,
    pub consistency: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Finance,
    Water,
    Reading,
    Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInsight {
    #[serde(rename = "type")]
    pub panel: Panel,
    pub message: String,
    pub confidence: u8,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub finance: Option<FinancePanel>,
    pub water: Option<WaterPanel>,
    pub reading: Option<ReadingPanel>,
    pub mood: Option<MoodPanel>,
    pub insights: Vec<DashboardInsight>,
    pub summary: String,
    pub recommendation: String,
}

pub fn build(record: &TrackerRecord, session: &Session) -> Dashboard {
    let finance = finance_panel(record);
    let water = water_panel(record);
    let reading = reading_panel(record, session.today);
    let mood = mood_panel(record, session.today);

    let mut insights = Vec::new();
    let mut parts = Vec::new();
    let mut missing = Vec::new();

    match &finance {
        Some(panel) => {
            let spent = format_currency(panel.total_spent);
            let message = if panel.total_spent > HIGH_SPEND {
                format!("You've spent {spent} this month. Consider reviewing discretionary expenses.")
            } else if panel.total_spent < LOW_SPEND {
                format!("Great job keeping expenses low at {spent}! You're on track for savings.")
            } else {
                format!("Your spending is moderate at {spent}. Keep tracking to optimize your budget.")
            };
            insights.push(DashboardInsight {
                panel: Panel::Finance,
                message,
                confidence: 85,
                suggestion: "Try categorizing expenses for better insights",
            });
            let verdict = if panel.total_spent > HIGH_SPEND {
                "Review spending"
            } else {
                "Good control"
            };
            parts.push(format!("Financial Health: {verdict}"));
        }
        None => missing.push("start tracking expenses"),
    }

    match &water {
        Some(panel) => {
            let met = panel.daily_average >= panel.goal;
            let message = if met {
                format!(
                    "Excellent! You're averaging {:.0}ml daily, meeting your {:.0}ml goal.",
                    panel.daily_average, panel.goal
                )
            } else {
                format!(
                    "You're averaging {:.0}ml daily. Try increasing by {:.0}ml to reach your goal.",
                    panel.daily_average,
                    panel.goal - panel.daily_average
                )
            };
            insights.push(DashboardInsight {
                panel: Panel::Water,
                message,
                confidence: 92,
                suggestion: "Set reminders to drink water regularly",
            });
            let verdict = if met { "Goal met" } else { "Needs improvement" };
            parts.push(format!("Hydration: {verdict}"));
        }
        None => missing.push("log daily water intake"),
    }

    match &reading {
        Some(panel) => {
            let per_day = if panel.reading_days > 0 {
                f64::from(panel.total_pages) / panel.reading_days as f64
            } else {
                0.0
            };
            let pace = if per_day > IMPRESSIVE_PAGES_PER_DAY {
                "Impressive pace!"
            } else {
                "Try setting daily reading goals."
            };
            insights.push(DashboardInsight {
                panel: Panel::Reading,
                message: format!("You've read {} pages recently. {pace}", panel.total_pages),
                confidence: 78,
                suggestion: "Join a reading challenge to stay motivated",
            });
            let verdict = if panel.reading_days >= 7 {
                "Consistent"
            } else {
                "Irregular"
            };
            parts.push(format!("Reading: {verdict} habit"));
        }
        None => missing.push("set reading goals"),
    }

    match &mood {
        Some(panel) => {
            let headline = if panel.average >= 4.0 {
                "Your mood has been consistently positive!"
            } else if panel.average >= 3.0 {
                "Your mood is stable and balanced."
            } else {
                "Consider activities that boost your mood."
            };
            insights.push(DashboardInsight {
                panel: Panel::Mood,
                message: format!(
                    "{headline} Average: {:.1}/5, Trend: {}.",
                    panel.average, panel.trend
                ),
                confidence: 88,
                suggestion: "Track mood triggers to identify patterns",
            });
            let verdict = if panel.average >= 3.5 {
                "Positive"
            } else {
                "Needs attention"
            };
            parts.push(format!("Mood: {verdict}"));
        }
        None => missing.push("track your mood daily"),
    }

    let summary = if parts.is_empty() {
        "No data available for analysis. Start tracking your activities to get insights.".to_string()
    } else {
        format!("Based on your recent activity: {}.", parts.join(", "))
    };
    let recommendation = if missing.is_empty() {
        "Continue your current habits and consider setting higher goals for continuous improvement."
            .to_string()
    } else {
        format!(
            "Focus on {} to get the most from your dashboard.",
            missing.join(", ")
        )
    };

    Dashboard {
        today: session.today,
        finance,
        water,
        reading,
        mood,
        insights,
        summary,
        recommendation,
    }
}

fn finance_panel(record: &TrackerRecord) -> Option<FinancePanel> {
    let data = &record.finance_tracker;
    if data.budgets.is_empty() {
        return None;
    }
    let categories: Vec<BudgetSpend> = data
        .budgets
        .iter()
        .map(|budget| {
            let spent = data.spent_against(budget);
            BudgetSpend {
                category: budget.category.clone(),
                allocated: budget.limit,
                spent,
                remaining: budget.limit - spent,
            }
        })
        .collect();
    let spent: Vec<f64> = categories.iter().map(|c| c.spent).collect();
    Some(FinancePanel {
        total_spent: spent.iter().sum(),
        average_spent: mean(&spent),
        categories,
    })
}

fn water_panel(record: &TrackerRecord) -> Option<WaterPanel> {
    let data = &record.water_intake;
    let by_day = data.daily_ml();
    if by_day.is_empty() {
        return None;
    }
    let skip = by_day.len().saturating_sub(WATER_DAYS);
    let days: Vec<(NaiveDate, f64)> = by_day.into_iter().skip(skip).collect();
    let totals: Vec<f64> = days.iter().map(|(_, ml)| *ml).collect();
    let daily_average = mean(&totals);
    let goal = data.settings.daily_goal;
    let goal_percent = if goal > 0.0 {
        round_to(daily_average / goal * 100.0, 0).min(100.0)
    } else {
        0.0
    };
    Some(WaterPanel {
        days,
        goal,
        daily_average,
        goal_percent,
    })
}

fn reading_panel(record: &TrackerRecord, today: NaiveDate) -> Option<ReadingPanel> {
    let data = &record.reading_tracker;
    if data.reading_sessions.is_empty() {
        return None;
    }
    let pages = data.daily_pages();
    let pages_by_day: Vec<(NaiveDate, u32)> = last_n_days(today, READING_DAYS)
        .into_iter()
        .map(|date| (date, pages.get(&date).copied().unwrap_or(0)))
        .collect();
    let current_streak = pages_by_day
        .iter()
        .rev()
        .take_while(|(_, pages)| *pages > 0)
        .count();
    Some(ReadingPanel {
        total_pages: saturating_total(pages_by_day.iter().map(|(_, p)| *p)),
        reading_days: pages_by_day.iter().filter(|(_, p)| *p > 0).count(),
        current_streak,
        pages_by_day,
    })
}

fn mood_panel(record: &TrackerRecord, today: NaiveDate) -> Option<MoodPanel> {
    let entries = &record.mood_tracker;
    if entries.is_empty() {
        return None;
    }
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for entry in entries {
        by_day
            .entry(entry.date)
            .or_default()
            .push(f64::from(entry.mood) / 2.0);
    }
    let daily: Vec<(NaiveDate, Option<f64>)> = last_n_days(today, MOOD_DAYS)
        .into_iter()
        .map(|date| (date, by_day.get(&date).map(|moods| mean(moods))))
        .collect();
    let logged: Vec<f64> = daily.iter().filter_map(|(_, mood)| *mood).collect();
    Some(MoodPanel {
        average: mean(&logged),
        best_day: logged.iter().copied().fold(0.0, f64::max),
        trend: trend_label(&logged),
        consistency: consistency(&logged),
        daily,
    })
}
