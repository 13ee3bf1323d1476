//! Schedule store — line-delimited, append-only persistence.
//!
//! Every mutation is appended as one JSON line; `load` replays the log and
//! applies records in append order, last-write-wins per `schedule_id`
//! (a `Delete` record removes the schedule even if earlier `Upsert` records
//! for it remain in the file).

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use axiom_core::ScheduleId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{SchedulerError, SchedulerResult};
use crate::model::Schedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum StoreRecord {
    Upsert { schedule: Box<Schedule> },
    Delete { schedule_id: ScheduleId },
}

/// The Scheduler's durable store of schedules.
pub struct ScheduleStore {
    path: Option<PathBuf>,
    schedules: RwLock<HashMap<ScheduleId, Schedule>>,
}

impl ScheduleStore {
    /// An in-memory store with no backing file, for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            schedules: RwLock::new(HashMap::new()),
        }
    }

    /// Load from a line-delimited append log at `path`. A missing file is
    /// treated as an empty store. Trailing partial lines (a crash mid-write)
    /// are discarded.
    pub fn load(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut schedules = HashMap::new();
        if path.exists() {
            let file = File::open(&path)
                .map_err(|e| SchedulerError::Store(format!("open {}: {e}", path.display())))?;
            for line in BufReader::new(file).lines() {
                let line = line
                    .map_err(|e| SchedulerError::Store(format!("read {}: {e}", path.display())))?;
                if line.trim().is_empty() {
                    continue;
                }
                let Ok(record) = serde_json::from_str::<StoreRecord>(&line) else {
                    continue;
                };
                match record {
                    StoreRecord::Upsert { schedule } => {
                        schedules.insert(schedule.schedule_id, *schedule);
                    }
                    StoreRecord::Delete { schedule_id } => {
                        schedules.remove(&schedule_id);
                    }
                }
            }
        }
        Ok(Self {
            path: Some(path),
            schedules: RwLock::new(schedules),
        })
    }

    /// Recompute `next_run_at` for any schedule whose value is stale
    /// (unset while active). Called once by the Scheduler on `start()`.
    pub async fn refresh_stale_next_run_at(&self) {
        let mut schedules = self.schedules.write().await;
        for schedule in schedules.values_mut() {
            if schedule.next_run_at.is_none() {
                schedule.refresh_next_run_at();
            }
        }
    }

    pub async fn upsert(&self, schedule: Schedule) -> SchedulerResult<()> {
        let record = StoreRecord::Upsert { schedule: Box::new(schedule.clone()) };
        self.append(&record)?;
        self.schedules.write().await.insert(schedule.schedule_id, schedule);
        Ok(())
    }

    pub async fn delete(&self, schedule_id: ScheduleId) -> SchedulerResult<bool> {
        let existed = self.schedules.write().await.remove(&schedule_id).is_some();
        if existed {
            self.append(&StoreRecord::Delete { schedule_id })?;
        }
        Ok(existed)
    }

    pub async fn get(&self, schedule_id: ScheduleId) -> Option<Schedule> {
        self.schedules.read().await.get(&schedule_id).cloned()
    }

    pub async fn list(&self) -> Vec<Schedule> {
        self.schedules.read().await.values().cloned().collect()
    }

    pub async fn due(&self, now: axiom_core::Timestamp) -> Vec<Schedule> {
        self.schedules
            .read()
            .await
            .values()
            .filter(|s| s.is_due(&now))
            .cloned()
            .collect()
    }

    fn append(&self, record: &StoreRecord) -> SchedulerResult<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SchedulerError::Store(format!("mkdir {}: {e}", parent.display())))?;
        }
        let line = serde_json::to_string(record)
            .map_err(|e| SchedulerError::Store(format!("serialize record: {e}")))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SchedulerError::Store(format!("open {}: {e}", path.display())))?;
        writeln!(file, "{line}")
            .map_err(|e| SchedulerError::Store(format!("write {}: {e}", path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MissedPolicy, ScheduleAction, Trigger};

    fn schedule(name: &str) -> Schedule {
        Schedule::new(
            name,
            Trigger::Every { interval_ms: 1000 },
            ScheduleAction::CreateSession { task_text: "t".into() },
        )
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let store = ScheduleStore::in_memory();
        let s = schedule("a");
        let id = s.schedule_id;
        store.upsert(s).await.unwrap();
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn delete_removes_from_the_store() {
        let store = ScheduleStore::in_memory();
        let s = schedule("a");
        let id = s.schedule_id;
        store.upsert(s).await.unwrap();
        assert!(store.delete(id).await.unwrap());
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn load_replays_the_append_log_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.jsonl");
        let id;
        {
            let store = ScheduleStore::load(&path).unwrap();
            let mut s = schedule("original");
            id = s.schedule_id;
            store.upsert(s.clone()).await.unwrap();
            s.name = "renamed".into();
            store.upsert(s).await.unwrap();
        }
        let reloaded = ScheduleStore::load(&path).unwrap();
        let s = reloaded.get(id).await.unwrap();
        assert_eq!(s.name, "renamed");
    }

    #[tokio::test]
    async fn load_honors_a_delete_record_after_upserts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.jsonl");
        let id;
        {
            let store = ScheduleStore::load(&path).unwrap();
            let s = schedule("to be deleted");
            id = s.schedule_id;
            store.upsert(s).await.unwrap();
            store.delete(id).await.unwrap();
        }
        let reloaded = ScheduleStore::load(&path).unwrap();
        assert!(reloaded.get(id).await.is_none());
    }

    #[tokio::test]
    async fn refresh_stale_next_run_at_computes_for_active_schedules() {
        let store = ScheduleStore::in_memory();
        let mut s = schedule("a");
        s.missed_policy = MissedPolicy::Skip;
        store.upsert(s.clone()).await.unwrap();
        store.refresh_stale_next_run_at().await;
        let refreshed = store.get(s.schedule_id).await.unwrap();
        assert!(refreshed.next_run_at.is_some());
    }
}
