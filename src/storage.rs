use crate::errors::StoreError;
use crate::migrate::migrate;
use crate::models::{TrackerKind, TrackerRecord};
use crate::trackers::TrackerSlice;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    path: PathBuf,
    records: BTreeMap<String, TrackerRecord>,
}

impl DocumentStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let raw = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Value>>(&bytes) {
                Ok(raw) => raw,
                Err(err) => {
                    error!("failed to parse data file {}: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read data file {}: {err}", path.display());
                BTreeMap::new()
            }
        };

        let records: BTreeMap<String, TrackerRecord> = raw
            .into_iter()
            .map(|(user_id, value)| {
                let record = migrate(&user_id, value);
                (user_id, record)
            })
            .collect();
        info!(users = records.len(), "loaded tracker records from {}", path.display());

        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&TrackerRecord> {
        self.records.get(user_id)
    }

    pub async fn create_default(&mut self, user_id: &str) -> Result<TrackerRecord, StoreError> {
        if let Some(existing) = self.records.get(user_id) {
            return Ok(existing.clone());
        }
        let record = TrackerRecord::new(user_id);
        let mut next = self.records.clone();
        next.insert(user_id.to_string(), record.clone());
        self.commit(next).await?;
        info!(user_id, "created tracker record");
        Ok(record)
    }

    pub async fn set(
        &mut self,
        user_id: &str,
        tracker: TrackerKind,
        value: Value,
    ) -> Result<TrackerSlice, StoreError> {
        let slice = TrackerSlice::parse(tracker, value)?;
        let mut next = self.records.clone();
        next.entry(user_id.to_string())
            .or_insert_with(|| TrackerRecord::new(user_id))
            .apply(slice.clone());
        self.commit(next).await?;
        info!(user_id, %tracker, "saved tracker slice");
        Ok(slice)
    }

    pub async fn reset(&mut self, user_id: &str, tracker: TrackerKind) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        next.get_mut(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?
            .reset(tracker);
        self.commit(next).await?;
        info!(user_id, %tracker, "reset tracker slice");
        Ok(())
    }

    pub async fn delete(&mut self, user_id: &str) -> Result<TrackerRecord, StoreError> {
        let mut next = self.records.clone();
        let record = next
            .remove(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        self.commit(next).await?;
        info!(user_id, "deleted tracker record");
        Ok(record)
    }

    // Memory only changes once the file holds the new state.
    async fn commit(&mut self, next: BTreeMap<String, TrackerRecord>) -> Result<(), StoreError> {
        if let Err(err) = persist(&self.path, &next).await {
            error!("failed to write data file {}: {err}", self.path.display());
            return Err(err);
        }
        self.records = next;
        Ok(())
    }
}

async fn persist(path: &Path, records: &BTreeMap<String, TrackerRecord>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(records)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::empty(dir.path().join("nested/trackers.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn create_default_is_idempotent() {
        let (_dir, mut store) = temp_store();
        store
            .set("u1", TrackerKind::MoodTracker, json!([{ "date": "2024-05-01", "mood": 7 }]))
            .await
            .unwrap();

        let record = store.create_default("u1").await.unwrap();
        assert_eq!(record.mood_tracker.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn invalid_slice_leaves_record_untouched() {
        let (_dir, mut store) = temp_store();
        store.create_default("u1").await.unwrap();

        let err = store
            .set("u1", TrackerKind::WaterIntake, json!({ "dailyIntakes": "lots" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSlice { tracker: TrackerKind::WaterIntake, .. }));
        assert_eq!(store.get("u1"), Some(&TrackerRecord::new("u1")));
    }

    #[tokio::test]
    async fn reset_and_delete_need_a_record() {
        let (_dir, mut store) = temp_store();
        assert!(matches!(
            store.reset("ghost", TrackerKind::HabitTracker).await,
            Err(StoreError::UserNotFound(_))
        ));
        assert!(matches!(store.delete("ghost").await, Err(StoreError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn failed_writes_keep_the_previous_state() {
        let (dir, mut store) = temp_store();
        store
            .set("u1", TrackerKind::MoodTracker, json!([{ "date": "2024-05-01", "mood": 7 }]))
            .await
            .unwrap();
        let before = store.get("u1").cloned().unwrap();

        // A regular file where the data file's directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        store.path = blocker.join("trackers.json");

        let err = store
            .set("u1", TrackerKind::MoodTracker, json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.get("u1"), Some(&before));

        assert!(store.set("u2", TrackerKind::SleepTracker, json!([])).await.is_err());
        assert!(store.get("u2").is_none());
        assert!(store.create_default("u3").await.is_err());
        assert!(store.get("u3").is_none());

        assert!(store.reset("u1", TrackerKind::MoodTracker).await.is_err());
        assert_eq!(store.get("u1"), Some(&before));
        assert!(store.delete("u1").await.is_err());
        assert_eq!(store.get("u1"), Some(&before));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn unparseable_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackers.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = DocumentStore::load(&path).await;
        assert!(store.is_empty());
        assert_eq!(store.path(), path.as_path());
    }
}
