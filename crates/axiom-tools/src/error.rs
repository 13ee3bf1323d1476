//! Tool Runtime error taxonomy.

use axiom_core::ErrorKind;
use thiserror::Error;

/// Errors the Tool Runtime's `run` step can terminate with.
#[derive(Debug, Error)]
pub enum ToolRuntimeError {
    /// The step's tool name has no registered manifest.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// `step.input` failed structural validation against `input_schema`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required permission scope was denied.
    #[error("permission denied for scope {0}")]
    PermissionDenied(String),

    /// The requested dispatch mode isn't in the manifest's `supports` set.
    #[error("mode {mode} unsupported by tool {tool}")]
    ModeUnsupported {
        /// Name of the tool that doesn't support this mode.
        tool: String,
        /// The mode that was requested (`real`, `dry_run`, or `mock`).
        mode: String,
    },

    /// The handler's output failed structural validation against
    /// `output_schema`.
    #[error("output failed schema validation: {0}")]
    OutputInvalid(String),

    /// The real-mode handler did not finish within `step.timeout_ms`.
    #[error("step timed out after {0}ms")]
    TimedOut(u64),

    /// The real-mode handler returned an error.
    #[error("handler execution failed: {0}")]
    HandlerFailed(String),

    /// An underlying filesystem operation failed.
    #[error("tool io error: {0}")]
    Io(#[from] std::io::Error),

    /// The journal rejected a `tool.*` event.
    #[error("journal error: {0}")]
    Audit(#[from] axiom_audit::AuditError),
}

impl ToolRuntimeError {
    /// Classify this error into the crate-spanning kind taxonomy so the
    /// Kernel can decide whether to retry an attempt without matching on
    /// tool-runtime-specific variants.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolRuntimeError::InvalidInput(_) | ToolRuntimeError::OutputInvalid(_) => {
                ErrorKind::Validation
            }
            ToolRuntimeError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            ToolRuntimeError::TimedOut(_) | ToolRuntimeError::Io(_) => ErrorKind::Transient,
            ToolRuntimeError::ToolNotFound(_) | ToolRuntimeError::ModeUnsupported { .. } => {
                ErrorKind::Fatal
            }
            ToolRuntimeError::HandlerFailed(_) => ErrorKind::Transient,
            ToolRuntimeError::Audit(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for Tool Runtime operations.
pub type ToolRuntimeResult<T> = Result<T, ToolRuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_io_and_handler_failures_are_retryable() {
        assert!(ToolRuntimeError::TimedOut(1000).kind().is_retryable());
        assert!(ToolRuntimeError::HandlerFailed("boom".into())
            .kind()
            .is_retryable());
        assert!(!ToolRuntimeError::InvalidInput("bad".into())
            .kind()
            .is_retryable());
        assert!(!ToolRuntimeError::PermissionDenied("scope".into())
            .kind()
            .is_retryable());
        assert!(!ToolRuntimeError::ToolNotFound("x".into()).kind().is_retryable());
    }
}
