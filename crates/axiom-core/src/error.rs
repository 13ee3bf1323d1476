//! Crate-spanning error kind taxonomy.
//!
//! `ErrorKind` realizes the five error *kinds* from the error handling
//! design: distinct from any one crate's concrete error type, so the
//! Kernel can decide retry/backoff behavior generically.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Schema or contract violation at an interface boundary. Never retried.
    Validation,
    /// Policy or user refusal. Never retried.
    PermissionDenied,
    /// Network resets, 5xx, 429, timeouts during I/O. Retried with
    /// exponential backoff + jitter up to `max_retries`.
    Transient,
    /// Corrupt state detected, unrecoverable. Aborts the session.
    Fatal,
    /// Explicit cancellation. Transitions the session to `aborted`.
    UserAbort,
}

impl ErrorKind {
    /// Whether the Kernel's run loop should retry an attempt that failed
    /// with this kind (subject to `max_retries`).
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transient)
    }
}
