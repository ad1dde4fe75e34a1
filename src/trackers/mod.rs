pub mod calendar;
pub mod dashboard;
pub mod finance;
pub mod fitness;
pub mod gratitude;
pub mod habits;
pub mod meals;
pub mod mood;
pub mod reading;
pub mod reflection;
pub mod sleep;
pub mod study;
pub mod tasks;
pub mod water;

use crate::errors::StoreError;
use crate::models::{Session, TrackerKind, TrackerRecord};
use serde_json::Value;

macro_rules! tracker_slices {
    ($($variant:ident($ty:ty) => $kind:ident, $field:ident, $summarize:path;)*) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum TrackerSlice {
            $($variant($ty),)*
        }

        impl TrackerSlice {
            pub fn parse(kind: TrackerKind, value: Value) -> Result<Self, StoreError> {
                let invalid = |err: serde_json::Error| StoreError::InvalidSlice {
                    tracker: kind,
                    message: err.to_string(),
                };
                match kind {
                    $(TrackerKind::$kind => {
                        serde_json::from_value::<$ty>(value).map(TrackerSlice::$variant).map_err(invalid)
                    })*
                }
            }

            pub fn default_for(kind: TrackerKind) -> Self {
                match kind {
                    $(TrackerKind::$kind => TrackerSlice::$variant(<$ty>::default()),)*
                }
            }

            pub fn kind(&self) -> TrackerKind {
                match self {
                    $(TrackerSlice::$variant(_) => TrackerKind::$kind,)*
                }
            }

            pub fn to_value(&self) -> Result<Value, serde_json::Error> {
                match self {
                    $(TrackerSlice::$variant(data) => serde_json::to_value(data),)*
                }
            }

            pub fn summarize(&self, session: &Session) -> Result<Value, serde_json::Error> {
                match self {
                    $(TrackerSlice::$variant(data) => serde_json::to_value($summarize(data, session)),)*
                }
            }
        }

        impl TrackerRecord {
            pub fn slice(&self, kind: TrackerKind) -> TrackerSlice {
                match kind {
                    $(TrackerKind::$kind => TrackerSlice::$variant(self.$field.clone()),)*
                }
            }

            pub fn apply(&mut self, slice: TrackerSlice) {
                match slice {
                    $(TrackerSlice::$variant(data) => self.$field = data,)*
                }
            }

            pub fn reset(&mut self, kind: TrackerKind) {
                self.apply(TrackerSlice::default_for(kind));
            }
        }
    };
}

tracker_slices! {
    Habits(Vec<habits::HabitEntry>) => HabitTracker, habit_tracker, habits::summarize;
    Sleep(Vec<sleep::SleepEntry>) => SleepTracker, sleep_tracker, sleep::summarize;
    Study(Vec<study::StudyEntry>) => StudyPlanner, study_planner, study::summarize;
    Fitness(Vec<fitness::PlannerEntry>) => YogaFitnessPlanner, yoga_fitness_planner, fitness::summarize;
    Tasks(Vec<tasks::Project>) => TaskProjectPlanner, task_project_planner, tasks::summarize;
    Meals(Vec<meals::MealEntry>) => MealPlanner, meal_planner, meals::summarize;
    Mood(Vec<mood::MoodEntry>) => MoodTracker, mood_tracker, mood::summarize;
    Calendar(Vec<calendar::CalendarEvent>) => CalendarTracker, calendar_tracker, calendar::summarize;
    Finance(finance::FinanceData) => FinanceTracker, finance_tracker, finance::summarize;
    Gratitude(Vec<gratitude::GratitudeEntry>) => GratitudeJournal, gratitude_journal, gratitude::summarize;
    Reflection(Vec<reflection::ReflectionEntry>) => DailyReflection, daily_reflection, reflection::summarize;
    Water(water::WaterData) => WaterIntake, water_intake, water::summarize;
    Reading(reading::ReadingData) => ReadingTracker, reading_tracker, reading::summarize;
}

/// At least one insight survives any `limit`.
pub fn summary_value(
    slice: &TrackerSlice,
    session: &Session,
    limit: Option<usize>,
) -> Result<Value, serde_json::Error> {
    let mut summary = slice.summarize(session)?;
    if let (Some(limit), Some(Value::Array(insights))) = (limit, summary.get_mut("insights")) {
        insights.truncate(limit.max(1));
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn session() -> Session {
        Session::at("u1", NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), 10)
    }

    #[test]
    fn every_kind_has_a_matching_default() {
        for kind in TrackerKind::ALL {
            let slice = TrackerSlice::default_for(kind);
            assert_eq!(slice.kind(), kind);
            let value = slice.to_value().unwrap();
            assert_eq!(TrackerSlice::parse(kind, value).unwrap(), slice);
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = TrackerSlice::parse(TrackerKind::SleepTracker, json!({ "not": "a list" }))
            .unwrap_err();
        match err {
            StoreError::InvalidSlice { tracker, .. } => assert_eq!(tracker, TrackerKind::SleepTracker),
            other => panic!("unexpected error: {other}"),
        }

        let err = TrackerSlice::parse(
            TrackerKind::MoodTracker,
            json!([{ "date": "2024-05-15", "mood": "happy" }]),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid moodTracker data"));

        let err = TrackerSlice::parse(
            TrackerKind::MoodTracker,
            json!([{ "date": "2024-05-15", "mood": 11 }]),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSlice { tracker: TrackerKind::MoodTracker, .. }));
    }

    #[test]
    fn apply_and_reset_touch_only_one_slice() {
        let mut record = TrackerRecord::new("u1");
        let slice = TrackerSlice::parse(
            TrackerKind::HabitTracker,
            json!([{ "date": "2024-05-15", "habits": [{ "name": "Stretch", "completed": true }] }]),
        )
        .unwrap();
        record.apply(slice);
        record.water_intake.settings.daily_goal = 2500.0;

        assert_eq!(record.habit_tracker.len(), 1);
        record.reset(TrackerKind::HabitTracker);
        assert!(record.habit_tracker.is_empty());
        assert_eq!(record.water_intake.settings.daily_goal, 2500.0);
    }

    #[test]
    fn every_summary_carries_insights() {
        let record = TrackerRecord::new("u1");
        for kind in TrackerKind::ALL {
            let summary = record.slice(kind).summarize(&session()).unwrap();
            let insights = summary["insights"].as_array().unwrap();
            assert!(!insights.is_empty(), "{kind} produced no insights");
        }
    }

    fn populated_record() -> TrackerRecord {
        let slices = [
            (TrackerKind::HabitTracker, json!([
                { "date": "2024-05-14", "habits": [{ "name": "Walk", "completed": true }] },
                { "date": "2024-05-15", "habits": [{ "name": "Walk", "completed": false }] }
            ])),
            (TrackerKind::SleepTracker, json!([
                { "date": "2024-05-15", "sessions": [{ "duration": 7.5, "quality": 4 }] }
            ])),
            (TrackerKind::StudyPlanner, json!([
                { "date": "2024-05-15", "studies": [{ "subject": "Math", "duration": 50, "completed": true }] }
            ])),
            (TrackerKind::YogaFitnessPlanner, json!([
                { "date": "2024-05-13", "sessions": [{ "activity": "Flow", "type": "Yoga", "duration": 30 }] }
            ])),
            (TrackerKind::TaskProjectPlanner, json!([
                { "name": "Launch", "status": "active", "tasks": [
                    { "name": "Draft", "status": "completed", "estimatedHours": 3, "actualHours": 4 },
                    { "name": "Ship", "dueDate": "2024-05-01" }
                ] }
            ])),
            (TrackerKind::MealPlanner, json!([
                { "date": "2024-05-15", "meals": [{ "name": "Oats", "calories": 450, "completed": true }] }
            ])),
            (TrackerKind::MoodTracker, json!([
                { "date": "2024-05-06", "mood": 4, "emotion": "tired" },
                { "date": "2024-05-14", "mood": 7, "emotion": "calm", "energyLevel": 8 },
                { "date": "2024-05-15", "mood": 8, "emotion": "calm" }
            ])),
            (TrackerKind::CalendarTracker, json!([
                { "title": "Standup", "date": "2024-05-15", "category": "meeting" },
                { "title": "Dentist", "date": "2024-05-20", "category": "health" }
            ])),
            (TrackerKind::FinanceTracker, json!({
                "accounts": [{ "id": "a1", "name": "Main", "type": "checking", "balance": 800,
                    "transactions": [
                        { "date": "2024-05-02", "amount": 2000, "type": "income", "category": "Salary" },
                        { "date": "2024-05-03", "amount": 120, "type": "expense", "category": "Food" }
                    ] }],
                "budgets": [{ "name": "Food", "category": "Food", "limit": 300, "period": "monthly",
                    "startDate": "2024-05-01", "endDate": "2024-05-31" }]
            })),
            (TrackerKind::GratitudeJournal, json!([
                { "date": "2024-05-15", "content": "Sunny walk", "category": "experiences", "mood": "joyful" }
            ])),
            (TrackerKind::DailyReflection, json!([
                { "date": "2024-05-15", "energyLevel": 4, "mood": "good", "focusLevel": 3,
                  "productivityScore": 4, "wins": ["Shipped"], "challenges": ["Meetings"] }
            ])),
            (TrackerKind::WaterIntake, json!({
                "dailyIntakes": [
                    { "date": "2024-05-14", "amount": 2200 },
                    { "date": "2024-05-15", "amount": 2, "unit": "cups", "type": "tea" }
                ]
            })),
            (TrackerKind::ReadingTracker, json!({
                "books": [{ "id": "b1", "title": "Dune", "genre": "Sci-Fi", "totalPages": 400, "status": "reading" }],
                "readingSessions": [{ "date": "2024-05-15", "bookId": "b1", "pagesRead": 35, "duration": 40 }],
                "readingGoals": [{ "type": "weekly", "target": 100, "current": 80 }]
            })),
        ];

        let mut record = TrackerRecord::new("u1");
        for (kind, value) in slices {
            record.apply(TrackerSlice::parse(kind, value).unwrap());
        }
        record
    }

    #[test]
    fn recomputing_summaries_gives_the_same_answer() {
        let record = populated_record();
        let snapshot = record.clone();

        for kind in TrackerKind::ALL {
            let slice = record.slice(kind);
            let first = slice.summarize(&session()).unwrap();
            let second = slice.summarize(&session()).unwrap();
            assert_eq!(first, second, "{kind} summary changed between runs");
            assert!(!first["insights"].as_array().unwrap().is_empty());
        }
        assert_eq!(
            dashboard::build(&record, &session()),
            dashboard::build(&record, &session())
        );
        assert_eq!(record, snapshot);
    }

    #[test]
    fn insight_limit_caps_the_list() {
        let slice = TrackerSlice::default_for(TrackerKind::WaterIntake);
        let at_evening = Session::at("u1", NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), 20);

        let full = summary_value(&slice, &at_evening, None).unwrap();
        assert_eq!(full["insights"].as_array().unwrap().len(), 3);

        let capped = summary_value(&slice, &at_evening, Some(1)).unwrap();
        assert_eq!(capped["insights"].as_array().unwrap().len(), 1);
        assert_eq!(capped["insights"][0]["type"], "warning");
    }
}
