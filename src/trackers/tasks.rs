use crate::metrics::{
    DistributionBucket, Insight, InsightSet, distribution, percent_of, round_half_up,
};
use crate::models::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

const MAX_OVERDUE_BEFORE_CRITICAL: usize = 5;
const BUSY_PROJECT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "blank_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "blank_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Forms store an unset date as `""`.
fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub completion_rate: f64,
    pub hours_worked: f64,
    pub hours_estimated: f64,
    pub efficiency_rate: f64,
    pub productivity_score: i64,
    pub status_distribution: Vec<DistributionBucket>,
    pub insights: Vec<Insight>,
}

pub fn summarize(projects: &[Project], session: &Session) -> TaskSummary {
    let today = session.today;
    let tasks = || projects.iter().flat_map(|p| p.tasks.iter());

    let total_projects = projects.len();
    let active_projects = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .count();
    let total_tasks = tasks().count();
    let completed_tasks = tasks()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    let overdue_tasks = tasks().filter(|t| t.is_overdue(today)).count();

    let hours_worked: f64 = tasks()
        .filter(|t| t.status == TaskStatus::Completed)
        .map(|t| t.actual_hours)
        .sum();
    let hours_estimated: f64 = tasks().map(|t| t.estimated_hours).sum();

    let completion_rate = percent_of(completed_tasks as f64, total_tasks as f64);
    let efficiency_rate = percent_of(hours_worked, hours_estimated);

    let efficiency_score = (efficiency_rate * 1.2).min(100.0);
    let active_score = active_projects as f64 / total_projects.max(1) as f64 * 100.0;
    let overdue_score = (100.0 - overdue_tasks as f64 * 10.0).max(0.0);
    let productivity_score = round_half_up(
        completion_rate * 0.4 + efficiency_score * 0.3 + active_score * 0.2 + overdue_score * 0.1,
    ) as i64;

    let status_distribution = distribution(tasks().map(|t| t.status.label()));

    let mut summary = TaskSummary {
        total_projects,
        active_projects,
        total_tasks,
        completed_tasks,
        overdue_tasks,
        completion_rate,
        hours_worked,
        hours_estimated,
        efficiency_rate,
        productivity_score,
        status_distribution,
        insights: Vec::new(),
    };
    summary.insights = insights(&summary);
    summary
}

fn insights(summary: &TaskSummary) -> Vec<Insight> {
    let mut insights = InsightSet::new();

    let score = summary.productivity_score;
    if score >= 80 {
        insights.push(Insight::positive(format!(
            "Excellent productivity score: {score}/100! Your team is performing exceptionally well!"
        )));
    } else if score >= 60 {
        insights.push(Insight::positive(format!(
            "Good productivity score: {score}/100. Keep up the momentum!"
        )));
    } else if score > 0 {
        insights.push(Insight::neutral(format!(
            "Productivity score: {score}/100. Consider reviewing task assignments and deadlines."
        )));
    }

    let overdue = summary.overdue_tasks;
    if overdue > MAX_OVERDUE_BEFORE_CRITICAL {
        insights.push(Insight::critical(format!(
            "Critical: {overdue} tasks are overdue! Need immediate attention!"
        )));
    } else if overdue > 0 {
        insights.push(Insight::warning(format!(
            "{overdue} tasks are overdue. Consider adjusting priorities or deadlines."
        )));
    }

    let completion = summary.completion_rate;
    if completion >= 90.0 {
        insights.push(Insight::positive(format!(
            "Outstanding completion rate: {}%! Your team delivers consistently!",
            round_half_up(completion)
        )));
    } else if completion >= 70.0 {
        insights.push(Insight::positive(format!(
            "Solid completion rate: {}%. Well on track!",
            round_half_up(completion)
        )));
    } else if completion > 0.0 {
        insights.push(Insight::neutral(format!(
            "Completion rate: {}%. Focus on completing pending tasks.",
            round_half_up(completion)
        )));
    }

    // Only meaningful once some work has been estimated.
    let efficiency = summary.efficiency_rate;
    if summary.hours_estimated > 0.0 {
        if efficiency <= 80.0 {
            insights.push(Insight::warning(format!(
                "Efficiency rate: {}%. Tasks are taking longer than estimated. Consider better estimation.",
                round_half_up(efficiency)
            )));
        } else if efficiency >= 120.0 {
            insights.push(Insight::positive(format!(
                "Great efficiency! Tasks are completed {}% faster than estimated!",
                round_half_up(efficiency - 100.0)
            )));
        }
    }

    if summary.active_projects >= BUSY_PROJECT_COUNT {
        insights.push(Insight::warning(format!(
            "{} active projects. Ensure resources aren't spread too thin.",
            summary.active_projects
        )));
    }

    insights.finish(Insight::neutral(
        "Start planning your projects and tasks to track progress and boost productivity!",
    ))
}
