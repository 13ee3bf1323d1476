//! Planner-related error types.

use axiom_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur while asking the Planner for a plan.
///
/// The Planner is treated as an external black box (`spec.md` §6, §9):
/// this type only covers the shape of failure the Kernel needs to act
/// on (timeout vs. transient vs. fatal), not any one implementation's
/// internal detail.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The call did not return within `plannerTimeoutMs`.
    #[error("planner call timed out after {timeout_ms}ms")]
    TimedOut {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// A transient failure (network reset, 5xx, 429) — the adapter layer
    /// retries these, not the Kernel.
    #[error("transient planner failure: {0}")]
    Transient(String),

    /// A non-transient failure; fails the session.
    #[error("planner failure: {0}")]
    Failed(String),

    /// The planner returned a plan that failed basic structural
    /// validation (a step referencing an unknown tool is caught later by
    /// the Tool Runtime; a malformed envelope is caught here).
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

impl PlannerError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::TimedOut { .. } | PlannerError::Transient(_) => ErrorKind::Transient,
            PlannerError::Failed(_) | PlannerError::InvalidPlan(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
