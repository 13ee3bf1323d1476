//! Scheduler error types.

use thiserror::Error;

/// Errors the Scheduler's own plumbing can raise. A failing job action is
/// not one of these — that is recorded on the `Schedule` itself
/// (`failure_count`, `last_error`) rather than propagated as a Rust error.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("schedule not found: {0}")]
    NotFound(axiom_core::ScheduleId),

    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),

    #[error("schedule store error: {0}")]
    Store(String),

    #[error("journal error: {0}")]
    Audit(#[from] axiom_audit::AuditError),
}

/// Result type for Scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
