//! Axiom Crypto - cryptographic primitives for the Axiom agent runtime.
//!
//! This crate provides:
//! - BLAKE3 content hashing for general-purpose integrity checking
//! - Canonical JSON serialization and SHA-256 digesting for the Journal's
//!   hash chain, with the canonicalization rule pinned once and reused by
//!   both producers and verifiers
//!
//! # Example
//!
//! ```
//! use axiom_crypto::{ContentHash, canonical_hash};
//!
//! let hash = ContentHash::hash(b"important data");
//! println!("Hash: {}", hash.to_hex());
//!
//! let digest = canonical_hash(&serde_json::json!({"seq": 1})).unwrap();
//! println!("Digest: {digest}");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod canonical;
mod error;
mod hash;

pub use canonical::{canonical_hash, canonicalize, genesis_hash};
pub use error::{CryptoError, CryptoResult};
pub use hash::ContentHash;
