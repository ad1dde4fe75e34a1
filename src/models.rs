use crate::errors::StoreError;
use crate::trackers::{
    calendar::CalendarEvent, finance::FinanceData, fitness::PlannerEntry,
    gratitude::GratitudeEntry, habits::HabitEntry, meals::MealEntry, mood::MoodEntry,
    reading::ReadingData, reflection::ReflectionEntry, sleep::SleepEntry, study::StudyEntry,
    tasks::Project, water::WaterData,
};
use chrono::{Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub today: NaiveDate,
    /// Local hour of day, 0-23.
    pub hour: u32,
}

impl Session {
    pub fn now(user_id: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            user_id: user_id.into(),
            today: now.date_naive(),
            hour: now.hour(),
        }
    }

    pub fn at(user_id: impl Into<String>, today: NaiveDate, hour: u32) -> Self {
        Self {
            user_id: user_id.into(),
            today,
            hour,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackerKind {
    HabitTracker,
    SleepTracker,
    StudyPlanner,
    YogaFitnessPlanner,
    TaskProjectPlanner,
    MealPlanner,
    MoodTracker,
    CalendarTracker,
    FinanceTracker,
    GratitudeJournal,
    DailyReflection,
    WaterIntake,
    ReadingTracker,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 13] = [
        TrackerKind::HabitTracker,
        TrackerKind::SleepTracker,
        TrackerKind::StudyPlanner,
        TrackerKind::YogaFitnessPlanner,
        TrackerKind::TaskProjectPlanner,
        TrackerKind::MealPlanner,
        TrackerKind::MoodTracker,
        TrackerKind::CalendarTracker,
        TrackerKind::FinanceTracker,
        TrackerKind::GratitudeJournal,
        TrackerKind::DailyReflection,
        TrackerKind::WaterIntake,
        TrackerKind::ReadingTracker,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            TrackerKind::HabitTracker => "habitTracker",
            TrackerKind::SleepTracker => "sleepTracker",
            TrackerKind::StudyPlanner => "studyPlanner",
            TrackerKind::YogaFitnessPlanner => "yogaFitnessPlanner",
            TrackerKind::TaskProjectPlanner => "taskProjectPlanner",
            TrackerKind::MealPlanner => "mealPlanner",
            TrackerKind::MoodTracker => "moodTracker",
            TrackerKind::CalendarTracker => "calendarTracker",
            TrackerKind::FinanceTracker => "financeTracker",
            TrackerKind::GratitudeJournal => "gratitudeJournal",
            TrackerKind::DailyReflection => "dailyReflection",
            TrackerKind::WaterIntake => "waterIntake",
            TrackerKind::ReadingTracker => "readingTracker",
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for TrackerKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        TrackerKind::ALL
            .into_iter()
            .find(|kind| kind.field_name() == name)
            .ok_or_else(|| StoreError::UnknownTracker(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerRecord {
    pub user_id: String,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub habit_tracker: Vec<HabitEntry>,
    #[serde(default)]
    pub sleep_tracker: Vec<SleepEntry>,
    #[serde(default)]
    pub study_planner: Vec<StudyEntry>,
    #[serde(default)]
    pub yoga_fitness_planner: Vec<PlannerEntry>,
    #[serde(default)]
    pub task_project_planner: Vec<Project>,
    #[serde(default)]
    pub meal_planner: Vec<MealEntry>,
    #[serde(default)]
    pub mood_tracker: Vec<MoodEntry>,
    #[serde(default)]
    pub calendar_tracker: Vec<CalendarEvent>,
    #[serde(default)]
    pub finance_tracker: FinanceData,
    #[serde(default)]
    pub gratitude_journal: Vec<GratitudeEntry>,
    #[serde(default)]
    pub daily_reflection: Vec<ReflectionEntry>,
    #[serde(default)]
    pub water_intake: WaterData,
    #[serde(default)]
    pub reading_tracker: ReadingData,
}

impl TrackerRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            schema_version: SCHEMA_VERSION,
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummaryResponse {
    pub user_id: String,
    pub tracker: TrackerKind,
    pub today: NaiveDate,
    pub summary: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
