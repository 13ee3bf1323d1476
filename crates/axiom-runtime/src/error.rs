//! Kernel error types.

use axiom_core::LimitBreach;
use thiserror::Error;

/// Errors the Kernel's run loop can terminate with.
///
/// A step failing under `failure_policy: abort` is not one of these — that
/// is the ordinary `session.failed` outcome, recorded on the returned
/// [`axiom_core::Session`] rather than propagated as a Rust error. These
/// variants cover failures of the Kernel's own plumbing: the planner call,
/// the journal, or a limit breach that aborts the loop outright.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The planner call failed in a way the Kernel could not recover from
    /// (non-transient, or transient but retries exhausted).
    #[error("planner error: {0}")]
    Planner(#[from] axiom_llm::PlannerError),

    /// A journal write failed. Fatal to the current operation, not to the
    /// process — the caller decides whether to retry the whole session.
    #[error("journal error: {0}")]
    Audit(#[from] axiom_audit::AuditError),

    /// A configured limit was breached and the session has no
    /// `failure_policy` path around it.
    #[error("session limit breached: {0}")]
    LimitBreached(LimitBreach),
}

/// Result type for Kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
