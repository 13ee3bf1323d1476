//! Journal error types.

use thiserror::Error;

/// Errors that can occur while operating the journal.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The append could not be durably recorded; the chain was not advanced.
    #[error("append failed: {0}")]
    AppendFailed(String),

    /// Underlying filesystem operation failed.
    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),

    /// An event line could not be encoded or decoded.
    #[error("journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Canonicalization or hashing failed.
    #[error("journal crypto error: {0}")]
    Crypto(#[from] axiom_crypto::CryptoError),

    /// A session named in a compaction's retained set does not exist.
    #[error("session not found: {session_id}")]
    SessionNotFound {
        /// The session ID that was not found.
        session_id: String,
    },
}

/// Result type for journal operations.
pub type AuditResult<T> = Result<T, AuditError>;
