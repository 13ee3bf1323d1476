//! The Scheduler — tick loop over the schedule store, missed-run policy,
//! and bounded concurrent job dispatch.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axiom_audit::Journal;
use axiom_core::event::kind;
use axiom_core::{EventPayload, ScheduleId, SessionId, Timestamp};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::model::{MissedPolicy, Schedule, ScheduleAction, ScheduleStatus, Trigger};
use crate::store::ScheduleStore;

/// Quick summary a session factory hands back without awaiting completion.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub status: String,
}

/// Injected by the caller; the Scheduler never awaits session completion.
#[async_trait::async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create_session(&self, task_text: &str) -> SessionHandle;
}

/// Tuning knobs for the tick loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub tick_interval: Duration,
    pub missed_grace_period_ms: u64,
    pub max_concurrent_jobs: usize,
    pub max_catchup_runs: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            missed_grace_period_ms: 5 * 60 * 1000,
            max_concurrent_jobs: 5,
            max_catchup_runs: 100,
        }
    }
}

/// The durable time-triggered job engine.
pub struct Scheduler {
    store: Arc<ScheduleStore>,
    journal: Arc<Journal>,
    session_factory: Arc<dyn SessionFactory>,
    config: SchedulerConfig,
    in_flight: Mutex<HashSet<ScheduleId>>,
    cancel: CancellationToken,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        store: Arc<ScheduleStore>,
        journal: Arc<Journal>,
        session_factory: Arc<dyn SessionFactory>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            journal,
            session_factory,
            config,
            in_flight: Mutex::new(HashSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Load stale `next_run_at` values and spawn the tick loop.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        self.store.refresh_stale_next_run_at().await;
        info!("scheduler started");
        let this = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = this.cancel.cancelled() => break,
                    () = tokio::time::sleep(this.config.tick_interval) => this.tick().await,
                }
            }
            info!("scheduler stopped");
        })
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub async fn create_schedule(&self, mut schedule: Schedule) -> crate::error::SchedulerResult<ScheduleId> {
        schedule
            .trigger
            .validate()
            .map_err(crate::error::SchedulerError::InvalidTrigger)?;
        schedule.refresh_next_run_at();
        let id = schedule.schedule_id;
        let session_id = schedule.session_id;
        self.store.upsert(schedule).await?;
        self.journal
            .append(
                kind::SCHEDULER_SCHEDULE_CREATED,
                session_id,
                EventPayload::Schedule { schedule_id: id, session_id: None, error: None },
            )
            .await?;
        Ok(id)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        f: impl FnOnce(&mut Schedule),
    ) -> crate::error::SchedulerResult<Schedule> {
        let mut schedule = self
            .store
            .get(schedule_id)
            .await
            .ok_or(crate::error::SchedulerError::NotFound(schedule_id))?;
        f(&mut schedule);
        schedule.refresh_next_run_at();
        let session_id = schedule.session_id;
        self.store.upsert(schedule.clone()).await?;
        self.journal
            .append(
                kind::SCHEDULER_SCHEDULE_UPDATED,
                session_id,
                EventPayload::Schedule { schedule_id, session_id: None, error: None },
            )
            .await?;
        Ok(schedule)
    }

    pub async fn delete_schedule(&self, schedule_id: ScheduleId) -> crate::error::SchedulerResult<bool> {
        let session_id = self.store.get(schedule_id).await.map(|s| s.session_id);
        let removed = self.store.delete(schedule_id).await?;
        if removed {
            if let Some(session_id) = session_id {
                self.journal
                    .append(
                        kind::SCHEDULER_SCHEDULE_DELETED,
                        session_id,
                        EventPayload::Schedule { schedule_id, session_id: None, error: None },
                    )
                    .await?;
            }
        }
        Ok(removed)
    }

    pub async fn pause_schedule(&self, schedule_id: ScheduleId) -> crate::error::SchedulerResult<Schedule> {
        self.update_schedule(schedule_id, |s| s.status = ScheduleStatus::Paused).await
    }

    pub async fn resume_schedule(&self, schedule_id: ScheduleId) -> crate::error::SchedulerResult<Schedule> {
        self.update_schedule(schedule_id, |s| s.status = ScheduleStatus::Active).await
    }

    pub async fn list_schedules(&self) -> Vec<Schedule> {
        self.store.list().await
    }

    pub async fn get_schedule(&self, schedule_id: ScheduleId) -> Option<Schedule> {
        self.store.get(schedule_id).await
    }

    /// Run one tick synchronously; exposed for tests and a CLI `tick` command.
    pub async fn tick(&self) {
        let now = Timestamp::now();
        let due = self.store.due(now).await;
        if due.is_empty() {
            return;
        }
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_jobs));
        let mut handles = Vec::with_capacity(due.len());
        for schedule in due {
            if !self.in_flight.lock().await.insert(schedule.schedule_id) {
                continue;
            }
            let semaphore = Arc::clone(&semaphore);
            let permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            let store = Arc::clone(&self.store);
            let journal = Arc::clone(&self.journal);
            let session_factory = Arc::clone(&self.session_factory);
            let config = self.config.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                run_due_schedule(schedule, &store, &journal, session_factory.as_ref(), &config, now).await
            }));
        }
        for handle in handles {
            if let Ok(schedule_id) = handle.await {
                self.in_flight.lock().await.remove(&schedule_id);
            }
        }
    }
}

/// Count how many occurrences of `trigger` fall strictly between
/// `last_run_at` and `now`, capped at `max_catchup_runs + 1` (the extra
/// probe lets the caller distinguish "more than the cap" from "exactly the
/// cap").
fn missed_occurrences(trigger: &Trigger, last_run_at: Option<Timestamp>, now: Timestamp, max_catchup_runs: u32) -> u32 {
    let Some(anchor) = last_run_at else { return 1 };
    let mut count = 0u32;
    let mut cursor = anchor;
    loop {
        match trigger.next_after(&cursor) {
            Some(next) if next.inner() <= now.inner() => {
                count = count.saturating_add(1);
                cursor = next;
                if count > max_catchup_runs {
                    break;
                }
            }
            _ => break,
        }
    }
    count
}

async fn run_due_schedule(
    mut schedule: Schedule,
    store: &ScheduleStore,
    journal: &Journal,
    session_factory: &dyn SessionFactory,
    config: &SchedulerConfig,
    now: Timestamp,
) -> ScheduleId {
    let schedule_id = schedule.schedule_id;
    let overdue_ms = schedule
        .next_run_at
        .map(|next| (now.inner() - next.inner()).num_milliseconds().max(0))
        .unwrap_or(0);

    let runs = if u64::try_from(overdue_ms).unwrap_or(0) > config.missed_grace_period_ms {
        let missed = missed_occurrences(&schedule.trigger, schedule.last_run_at, now, config.max_catchup_runs);
        match schedule.missed_policy {
            MissedPolicy::Skip => {
                warn!(%schedule_id, missed, "skipping missed schedule windows");
                schedule.next_run_at = schedule.trigger.next_after(&now);
                store.upsert(schedule).await.ok();
                return schedule_id;
            }
            MissedPolicy::CatchupOne => 1,
            MissedPolicy::CatchupAll => missed.min(config.max_catchup_runs).max(1),
        }
    } else {
        1
    };

    for _ in 0..runs {
        let _ = journal
            .append(
                kind::SCHEDULER_JOB_TRIGGERED,
                schedule.session_id,
                EventPayload::Schedule { schedule_id, session_id: None, error: None },
            )
            .await;

        let result = execute_action(&schedule, journal, session_factory).await;
        schedule.last_run_at = Some(now);
        match result {
            Ok(()) => {
                schedule.run_count = schedule.run_count.saturating_add(1);
                schedule.failure_count = 0;
                let _ = journal
                    .append(
                        kind::SCHEDULER_JOB_COMPLETED,
                        schedule.session_id,
                        EventPayload::Schedule { schedule_id, session_id: None, error: None },
                    )
                    .await;
            }
            Err(message) => {
                schedule.failure_count = schedule.failure_count.saturating_add(1);
                schedule.last_error = Some(message.clone());
                let _ = journal
                    .append(
                        kind::SCHEDULER_JOB_FAILED,
                        schedule.session_id,
                        EventPayload::Schedule { schedule_id, session_id: None, error: Some(message) },
                    )
                    .await;
                if schedule.failure_count >= schedule.max_failures {
                    schedule.status = ScheduleStatus::Failed;
                    schedule.next_run_at = None;
                    break;
                }
            }
        }
    }

    if schedule.status == ScheduleStatus::Active {
        if schedule.trigger.is_one_shot() {
            schedule.status = ScheduleStatus::Completed;
            schedule.next_run_at = None;
        } else {
            schedule.next_run_at = schedule.trigger.next_after(&now);
        }
    }

    let should_delete = schedule.delete_after_run
        && (schedule.trigger.is_one_shot() || schedule.status != ScheduleStatus::Active);
    if should_delete {
        store.delete(schedule_id).await.ok();
    } else {
        store.upsert(schedule).await.ok();
    }
    schedule_id
}

async fn execute_action(
    schedule: &Schedule,
    journal: &Journal,
    session_factory: &dyn SessionFactory,
) -> Result<(), String> {
    match &schedule.action {
        ScheduleAction::CreateSession { task_text } => {
            session_factory.create_session(task_text).await;
            Ok(())
        }
        ScheduleAction::EmitEvent { event_type, payload } => journal
            .append(event_type.as_str(), schedule.session_id, EventPayload::Raw(payload.clone()))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missed_occurrences_counts_windows_between_anchor_and_now() {
        let trigger = Trigger::Every { interval_ms: 3_600_000 };
        let now = Timestamp::now();
        let last = Timestamp(now.inner() - chrono::Duration::hours(3));
        let n = missed_occurrences(&trigger, Some(last), now, 10);
        assert_eq!(n, 3);
    }

    #[test]
    fn missed_occurrences_caps_at_max_catchup_runs() {
        let trigger = Trigger::Every { interval_ms: 3_600_000 };
        let now = Timestamp::now();
        let last = Timestamp(now.inner() - chrono::Duration::hours(10));
        let n = missed_occurrences(&trigger, Some(last), now, 5);
        assert!(n > 5);
    }

    #[test]
    fn missed_occurrences_never_run_counts_as_one() {
        let trigger = Trigger::Every { interval_ms: 3_600_000 };
        let n = missed_occurrences(&trigger, None, Timestamp::now(), 10);
        assert_eq!(n, 1);
    }

    struct CountingSessionFactory {
        calls: Arc<std::sync::atomic::AtomicU32>,
    }

    #[async_trait::async_trait]
    impl SessionFactory for CountingSessionFactory {
        async fn create_session(&self, _task_text: &str) -> SessionHandle {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            SessionHandle { session_id: SessionId::new(), status: "running".into() }
        }
    }

    fn test_journal(dir: &tempfile::TempDir) -> Arc<Journal> {
        Arc::new(
            Journal::init(dir.path().join("journal.jsonl"), axiom_audit::JournalOptions::default()).unwrap(),
        )
    }

    #[tokio::test]
    async fn one_shot_schedule_fires_once_then_completes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ScheduleStore::in_memory());
        let journal = test_journal(&dir);
        let calls = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let factory = Arc::new(CountingSessionFactory { calls: Arc::clone(&calls) });

        let mut schedule = Schedule::new(
            "one-shot",
            Trigger::At { at: Timestamp(Timestamp::now().inner() - chrono::Duration::seconds(1)) },
            ScheduleAction::CreateSession { task_text: "run once".into() },
        );
        schedule.next_run_at = Some(Timestamp(Timestamp::now().inner() - chrono::Duration::seconds(1)));
        let schedule_id = schedule.schedule_id;
        store.upsert(schedule).await.unwrap();

        let scheduler = Scheduler::new(Arc::clone(&store), journal, factory, SchedulerConfig::default());
        scheduler.tick().await;

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        let updated = store.get(schedule_id).await.unwrap();
        assert_eq!(updated.status, ScheduleStatus::Completed);
        assert_eq!(updated.run_count, 1);
        assert!(updated.next_run_at.is_none());
    }

    #[tokio::test]
    async fn skip_policy_drops_a_missed_window_without_firing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ScheduleStore::in_memory());
        let journal = test_journal(&dir);
        let calls = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let factory = Arc::new(CountingSessionFactory { calls: Arc::clone(&calls) });

        let mut schedule = Schedule::new(
            "hourly",
            Trigger::Every { interval_ms: 3_600_000 },
            ScheduleAction::CreateSession { task_text: "tick".into() },
        );
        schedule.missed_policy = MissedPolicy::Skip;
        let now = Timestamp::now();
        schedule.last_run_at = Some(Timestamp(now.inner() - chrono::Duration::hours(3)));
        schedule.next_run_at = Some(Timestamp(now.inner() - chrono::Duration::hours(2)));
        let schedule_id = schedule.schedule_id;
        store.upsert(schedule).await.unwrap();

        let mut config = SchedulerConfig::default();
        config.missed_grace_period_ms = 1000;
        let scheduler = Scheduler::new(Arc::clone(&store), journal, factory, config);
        scheduler.tick().await;

        assert_eq!(
            calls.load(std::sync::atomic::Ordering::SeqCst),
            0,
            "skip policy must not fire the missed window"
        );
        let updated = store.get(schedule_id).await.unwrap();
        assert!(updated.next_run_at.unwrap().inner() > now.inner());
    }
}
