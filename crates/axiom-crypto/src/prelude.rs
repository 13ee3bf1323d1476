//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_crypto::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use axiom_crypto::prelude::*;
//!
//! let hash = ContentHash::hash(b"hello");
//! let digest = canonical_hash(&serde_json::json!({"a": 1})).unwrap();
//! ```

// Errors
pub use crate::{CryptoError, CryptoResult};

// Hashing
pub use crate::ContentHash;

// Canonicalization (Journal hash chain)
pub use crate::{canonical_hash, canonicalize, genesis_hash};
