//! Mock implementations shared across crate test suites.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::sync::Mutex;

use axiom_core::SessionId;
use axiom_scheduler::{SessionFactory, SessionHandle};

/// A [`SessionFactory`] that records every `task_text` it was asked to
/// start a session for, instead of driving a real Kernel run loop.
#[derive(Debug, Default)]
pub struct RecordingSessionFactory {
    created: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl RecordingSessionFactory {
    /// Create a factory with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions created so far.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Task text passed to every `create_session` call, in order.
    #[must_use]
    pub fn created_tasks(&self) -> Vec<String> {
        self.created.lock().expect("recording session factory lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl SessionFactory for RecordingSessionFactory {
    async fn create_session(&self, task_text: &str) -> SessionHandle {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .expect("recording session factory lock poisoned")
            .push(task_text.to_string());
        SessionHandle { session_id: SessionId::new(), status: "running".into() }
    }
}

/// A [`SessionFactory`] double that never completes, for exercising
/// concurrency limits against the scheduler's bounded semaphore.
pub struct HangingSessionFactory;

#[async_trait::async_trait]
impl SessionFactory for HangingSessionFactory {
    async fn create_session(&self, _task_text: &str) -> SessionHandle {
        std::future::pending::<()>().await;
        unreachable!("hanging session factory never resolves");
    }
}

/// A temporary directory plus the journal file path inside it, so tests
/// can construct a [`axiom_audit::Journal`] without leaking files onto the
/// real filesystem.
pub struct TempJournal {
    _dir: tempfile::TempDir,
    /// Path to the journal file, inside `_dir`.
    pub path: PathBuf,
}

impl TempJournal {
    /// Create a temp dir and open a journal inside it with default options.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir or journal cannot be created — acceptable in
    /// test-only fixture code.
    #[must_use]
    pub fn open() -> (Self, Arc<axiom_audit::Journal>) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("journal.jsonl");
        let journal = axiom_audit::Journal::init(&path, axiom_audit::JournalOptions::default())
            .expect("init journal");
        (Self { _dir: dir, path }, Arc::new(journal))
    }
}

/// A temp dir plus an empty, file-backed [`axiom_scheduler::ScheduleStore`].
pub struct TempScheduleStore {
    _dir: tempfile::TempDir,
    /// Path to the store file, inside `_dir`.
    pub path: PathBuf,
}

impl TempScheduleStore {
    /// Create a temp dir and load an empty store backed by a file inside it.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir or store cannot be created — acceptable in
    /// test-only fixture code.
    #[must_use]
    pub fn open() -> (Self, Arc<axiom_scheduler::ScheduleStore>) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("schedules.jsonl");
        let store = axiom_scheduler::ScheduleStore::load(&path).expect("load schedule store");
        (Self { _dir: dir, path }, Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_session_factory_captures_task_text() {
        let factory = RecordingSessionFactory::new();
        factory.create_session("first task").await;
        factory.create_session("second task").await;

        assert_eq!(factory.call_count(), 2);
        assert_eq!(factory.created_tasks(), vec!["first task", "second task"]);
    }

    #[test]
    fn temp_journal_opens_an_empty_journal() {
        let (_guard, journal) = TempJournal::open();
        assert_eq!(journal.read_all().expect("read journal").len(), 0);
    }

    #[tokio::test]
    async fn temp_schedule_store_opens_empty() {
        let (_guard, store) = TempScheduleStore::open();
        assert!(store.list().await.is_empty());
    }
}
