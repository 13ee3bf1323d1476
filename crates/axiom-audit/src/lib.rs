//! Axiom Audit - the hash-chained, append-only event journal.
//!
//! This crate provides:
//! - An ordered, durable event log, one canonical JSON line per event
//! - Hash chain linking (`hash` covers the previous event's `hash`)
//! - Session-scoped and full-log reads
//! - In-process subscription via [`axiom_events::EventBus`]
//! - Chain integrity verification and retained-session compaction
//!
//! # Security Model
//!
//! Every event's `hash` commits to its own fields plus the previous
//! event's `hash`. Editing or removing a historical line breaks the hash
//! of every later line, which [`Journal::verify_integrity`] detects.
//!
//! # Example
//!
//! ```
//! use axiom_audit::{Journal, JournalOptions};
//! use axiom_core::{EventPayload, SessionId};
//!
//! # async fn example(path: std::path::PathBuf) {
//! let journal = Journal::init(path, JournalOptions::default()).unwrap();
//!
//! let session_id = SessionId::new();
//! journal
//!     .append("session.created", session_id.clone(), EventPayload::Raw(serde_json::json!({})))
//!     .await
//!     .unwrap();
//!
//! let report = journal.verify_integrity().unwrap();
//! assert!(report.valid);
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod journal;

pub use error::{AuditError, AuditResult};
pub use journal::{IntegrityReport, Journal, JournalOptions, ShutdownGuard};
