//! Permission engine error types.

use thiserror::Error;

/// Errors that can occur while resolving a permission request.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// The interactive prompter returned an error instead of a decision.
    #[error("approval prompt failed: {0}")]
    PromptFailed(String),

    /// The interactive prompter did not respond within the caller-defined
    /// timeout.
    #[error("approval prompt timed out")]
    PromptTimedOut,

    /// The journal rejected the `permission.*` event.
    #[error("failed to record permission event: {0}")]
    AuditFailed(#[from] axiom_audit::AuditError),
}

/// Result type for permission engine operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
