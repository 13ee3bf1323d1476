//! The hash-chained, append-only event journal.
//!
//! One line per event in a line-delimited canonical JSON file. `seq` is
//! strictly increasing across all sessions interleaved; each event's
//! `hash` covers the previous event's `hash`, so any edit to a historical
//! line breaks every hash after it.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axiom_core::{Event, EventPayload, EventType, SessionId, Timestamp};
use axiom_crypto::{canonical_hash, genesis_hash};
use fs2::FileExt;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use axiom_events::{EventBus, EventReceiver, SubscriberId};

use crate::error::{AuditError, AuditResult};

/// Options controlling journal durability.
#[derive(Debug, Clone)]
pub struct JournalOptions {
    /// Call `fsync` after every append. Slower, but survives a hard power
    /// loss; without it a crash can still lose the last buffered write
    /// (distinct from the partial-line truncation the Journal already
    /// tolerates).
    pub fsync_every_append: bool,
}

impl Default for JournalOptions {
    fn default() -> Self {
        Self {
            fsync_every_append: true,
        }
    }
}

/// Outcome of a chain integrity scan.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntegrityReport {
    /// Whether the full chain hashes verify.
    pub valid: bool,
    /// The `seq` of the first event whose hash does not match, if any.
    pub broken_at: Option<u64>,
}

#[derive(Serialize)]
struct HashInput<'a> {
    seq: u64,
    session_id: &'a SessionId,
    #[serde(rename = "type")]
    event_type: &'a EventType,
    timestamp: &'a Timestamp,
    payload: &'a EventPayload,
    prev_hash: &'a str,
}

fn compute_hash(
    seq: u64,
    session_id: &SessionId,
    event_type: &EventType,
    timestamp: &Timestamp,
    payload: &EventPayload,
    prev_hash: &str,
) -> AuditResult<String> {
    let input = HashInput {
        seq,
        session_id,
        event_type,
        timestamp,
        payload,
        prev_hash,
    };
    Ok(canonical_hash(&input)?)
}

struct JournalState {
    file: File,
    next_seq: u64,
    last_hash: String,
}

/// A durable, hash-chained, append-only event log.
///
/// All mutable state (append position, `prev_hash`) lives behind a single
/// lock; writes are serialized, reads take an independent snapshot by
/// re-reading the file from disk.
pub struct Journal {
    path: PathBuf,
    state: Mutex<JournalState>,
    bus: EventBus,
    options: JournalOptions,
}

/// Flushes the journal's file to disk when dropped. Hold this for the
/// lifetime of the process to get a best-effort flush on teardown.
pub struct ShutdownGuard {
    journal: Arc<Journal>,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Err(err) = self.journal.close() {
            warn!(error = %err, "journal flush on shutdown failed");
        }
    }
}

impl Journal {
    /// Open or create the journal file at `path`.
    ///
    /// On open, the tail line becomes the `prev_hash` source for the next
    /// append. A trailing partial line (the process crashed mid-write) is
    /// silently discarded; it is not replayed and no recovery event is
    /// written. Callers detect this via [`Journal::verify_integrity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, locked, or its
    /// trailing valid line cannot be parsed.
    pub fn init(path: impl AsRef<Path>, options: JournalOptions) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        file.lock_exclusive()?;

        let (valid_len, next_seq, last_hash) = Self::recover(&mut file)?;
        file.set_len(valid_len)?;
        file.seek(SeekFrom::End(0))?;

        debug!(path = %path.display(), next_seq, "journal opened");

        Ok(Self {
            path,
            state: Mutex::new(JournalState {
                file,
                next_seq,
                last_hash,
            }),
            bus: EventBus::new(),
            options,
        })
    }

    /// Scan the file for the last syntactically complete line, discarding
    /// any trailing partial one. Returns `(valid_byte_len, next_seq,
    /// last_hash)`.
    fn recover(file: &mut File) -> AuditResult<(u64, u64, String)> {
        file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(&mut *file);

        let mut valid_len: u64 = 0;
        let mut next_seq: u64 = 0;
        let mut last_hash = genesis_hash();

        loop {
            let mut line = String::new();
            let start = valid_len;
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                break;
            }
            if !line.ends_with('\n') {
                // Partial trailing line from a crash mid-write; discard it.
                warn!(offset = start, "discarding truncated trailing journal line");
                break;
            }
            match serde_json::from_str::<Event>(line.trim_end()) {
                Ok(event) => {
                    valid_len = start + bytes_read as u64;
                    next_seq = event.seq + 1;
                    last_hash = event.hash;
                },
                Err(err) => {
                    warn!(offset = start, error = %err, "discarding malformed journal line");
                    break;
                },
            }
        }

        Ok((valid_len, next_seq, last_hash))
    }

    /// Register a listener. Returns a handle that can be passed to
    /// [`Journal::unsubscribe`]; dropping the receiver has the same effect.
    #[must_use]
    pub fn on(&self) -> (SubscriberId, EventReceiver) {
        self.bus.subscribe()
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    /// Append a new event. Assigns `seq`, computes `prev_hash` and `hash`,
    /// writes the line, and notifies subscribers in order before
    /// returning.
    ///
    /// A slow subscriber backs up this call and therefore every future
    /// append; see the [`axiom_events`] bus documentation for the policy.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::AppendFailed`] if the write (or its `fsync`)
    /// fails; the chain is not advanced in that case.
    pub async fn append(
        &self,
        event_type: impl Into<EventType>,
        session_id: SessionId,
        payload: EventPayload,
    ) -> AuditResult<Arc<Event>> {
        let event_type = event_type.into();
        let mut state = self.state.lock().await;

        let seq = state.next_seq;
        let timestamp = Timestamp::now();
        let prev_hash = state.last_hash.clone();
        let hash = compute_hash(seq, &session_id, &event_type, &timestamp, &payload, &prev_hash)?;

        let event = Event {
            seq,
            session_id,
            event_type,
            timestamp,
            payload,
            prev_hash,
            hash: hash.clone(),
        };

        let line = serde_json::to_string(&event).map_err(AuditError::from)?;

        let write_result = (|| -> std::io::Result<()> {
            writeln!(state.file, "{line}")?;
            if self.options.fsync_every_append {
                state.file.sync_data()?;
            }
            Ok(())
        })();

        if let Err(err) = write_result {
            return Err(AuditError::AppendFailed(err.to_string()));
        }

        state.next_seq = seq + 1;
        state.last_hash = hash;
        drop(state);

        let event = Arc::new(event);
        self.bus.publish(Arc::clone(&event)).await;
        Ok(event)
    }

    fn read_lines(&self) -> AuditResult<Vec<Event>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }

    /// Return every event in the journal, in `seq` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line fails to
    /// parse.
    pub fn read_all(&self) -> AuditResult<Vec<Event>> {
        self.read_lines()
    }

    /// Return the subset of events belonging to `session_id`, in `seq`
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line fails to
    /// parse.
    pub fn read_session(&self, session_id: &SessionId) -> AuditResult<Vec<Event>> {
        Ok(self
            .read_lines()?
            .into_iter()
            .filter(|e| &e.session_id == session_id)
            .collect())
    }

    /// Recompute the hash chain over the whole file and report the first
    /// `seq` at which it diverges, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn verify_integrity(&self) -> AuditResult<IntegrityReport> {
        let events = self.read_lines()?;
        let mut expected_prev = genesis_hash();

        for event in &events {
            if event.prev_hash != expected_prev {
                return Ok(IntegrityReport {
                    valid: false,
                    broken_at: Some(event.seq),
                });
            }
            let recomputed = compute_hash(
                event.seq,
                &event.session_id,
                &event.event_type,
                &event.timestamp,
                &event.payload,
                &event.prev_hash,
            )?;
            if recomputed != event.hash {
                return Ok(IntegrityReport {
                    valid: false,
                    broken_at: Some(event.seq),
                });
            }
            expected_prev = event.hash.clone();
        }

        Ok(IntegrityReport {
            valid: true,
            broken_at: None,
        })
    }

    /// Flush the underlying file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn close(&self) -> AuditResult<()> {
        if let Ok(state) = self.state.try_lock() {
            state.file.sync_all()?;
        }
        Ok(())
    }

    /// Wrap `self` in a guard that flushes on drop, suitable for
    /// installing as a best-effort shutdown hook.
    #[must_use]
    pub fn register_shutdown_handler(self: Arc<Self>) -> ShutdownGuard {
        ShutdownGuard { journal: self }
    }

    /// Rewrite the journal file keeping only events for sessions in
    /// `retained_sessions`. The chain restarts at a genesis boundary —
    /// the first retained event's `prev_hash` becomes the all-zero hash
    /// rather than whatever preceded it in the original file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rewritten.
    pub async fn compact(&self, retained_sessions: &[SessionId]) -> AuditResult<()> {
        let mut state = self.state.lock().await;

        let all_events = self.read_lines()?;
        let mut kept: Vec<Event> = all_events
            .into_iter()
            .filter(|e| retained_sessions.contains(&e.session_id))
            .collect();
        kept.sort_by_key(|e| e.seq);

        let mut prev_hash = genesis_hash();
        for event in &mut kept {
            event.prev_hash = prev_hash.clone();
            event.hash = compute_hash(
                event.seq,
                &event.session_id,
                &event.event_type,
                &event.timestamp,
                &event.payload,
                &event.prev_hash,
            )?;
            prev_hash = event.hash.clone();
        }

        let tmp_path = self.path.with_extension("compact.tmp");
        {
            let mut tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            for event in &kept {
                let line = serde_json::to_string(event)?;
                writeln!(tmp, "{line}")?;
            }
            tmp.sync_all()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        file.lock_exclusive()?;
        file.seek(SeekFrom::End(0))?;

        let next_seq = kept.last().map_or(0, |e| e.seq + 1);
        state.file = file;
        state.next_seq = next_seq;
        state.last_hash = prev_hash;

        Ok(())
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_core::EventPayload;
    use tempfile::tempdir;

    fn payload() -> EventPayload {
        EventPayload::Raw(serde_json::json!({"k": "v"}))
    }

    #[tokio::test]
    async fn append_then_reopen_preserves_order_and_integrity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let session_id = SessionId::new();
        {
            let journal = Journal::init(&path, JournalOptions::default()).unwrap();
            for _ in 0..5 {
                journal
                    .append("session.started", session_id.clone(), payload())
                    .await
                    .unwrap();
            }
        }

        let reopened = Journal::init(&path, JournalOptions::default()).unwrap();
        let events = reopened.read_all().unwrap();
        assert_eq!(events.len(), 5);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.seq, i as u64);
        }
        assert!(reopened.verify_integrity().unwrap().valid);
    }

    #[tokio::test]
    async fn read_session_filters_by_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = Journal::init(&path, JournalOptions::default()).unwrap();

        let session_a = SessionId::new();
        let session_b = SessionId::new();
        journal
            .append("session.started", session_a.clone(), payload())
            .await
            .unwrap();
        journal
            .append("session.started", session_b.clone(), payload())
            .await
            .unwrap();
        journal
            .append("session.completed", session_a.clone(), payload())
            .await
            .unwrap();

        let a_events = journal.read_session(&session_a).unwrap();
        assert_eq!(a_events.len(), 2);
        assert!(a_events.iter().all(|e| e.session_id == session_a));
    }

    #[tokio::test]
    async fn subscriber_receives_events_in_append_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = Journal::init(&path, JournalOptions::default()).unwrap();
        let (_id, mut rx) = journal.on();

        let session_id = SessionId::new();
        journal
            .append("session.started", session_id.clone(), payload())
            .await
            .unwrap();
        journal
            .append("session.completed", session_id, payload())
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().seq, 0);
        assert_eq!(rx.recv().await.unwrap().seq, 1);
    }

    #[tokio::test]
    async fn truncated_trailing_line_is_discarded_on_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let session_id = SessionId::new();
        {
            let journal = Journal::init(&path, JournalOptions::default()).unwrap();
            journal
                .append("session.started", session_id, payload())
                .await
                .unwrap();
        }

        // Simulate a crash mid-write: append a partial line with no newline.
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            write!(file, "{{\"seq\":1,\"trunc").unwrap();
        }

        let reopened = Journal::init(&path, JournalOptions::default()).unwrap();
        let events = reopened.read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert!(reopened.verify_integrity().unwrap().valid);
    }

    #[tokio::test]
    async fn flipped_character_is_detected_by_verify_integrity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let session_id = SessionId::new();
        {
            let journal = Journal::init(&path, JournalOptions::default()).unwrap();
            for _ in 0..10 {
                journal
                    .append("session.started", session_id.clone(), payload())
                    .await
                    .unwrap();
            }
        }

        // Corrupt one event's hash in place without changing line count.
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<String> = contents.lines().map(String::from).collect();
        let mut event: Event = serde_json::from_str(&lines[4]).unwrap();
        event.hash = "0".repeat(64);
        lines[4] = serde_json::to_string(&event).unwrap();
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        let reopened = Journal::init(&path, JournalOptions::default()).unwrap();
        let report = reopened.verify_integrity().unwrap();
        assert!(!report.valid);
        assert_eq!(report.broken_at, Some(5));
    }

    #[tokio::test]
    async fn compact_restarts_chain_for_retained_sessions_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = Journal::init(&path, JournalOptions::default()).unwrap();

        let keep = SessionId::new();
        let drop_session = SessionId::new();
        journal
            .append("session.started", keep.clone(), payload())
            .await
            .unwrap();
        journal
            .append("session.started", drop_session, payload())
            .await
            .unwrap();
        journal
            .append("session.completed", keep.clone(), payload())
            .await
            .unwrap();

        journal.compact(&[keep.clone()]).await.unwrap();

        let remaining = journal.read_all().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|e| e.session_id == keep));
        assert!(journal.verify_integrity().unwrap().valid);

        // Further appends continue the restarted chain correctly.
        journal
            .append("session.completed", keep, payload())
            .await
            .unwrap();
        assert!(journal.verify_integrity().unwrap().valid);
    }
}
