//! Canonical JSON serialization and the SHA-256 digest used by the
//! Journal's hash chain.
//!
//! `spec.md` leaves the exact canonicalization rule as an open question
//! ("an implementer must pin one ... and document it"). This module pins
//! it: recursively sort object keys, encode as UTF-8 with no trailing
//! whitespace, and let `serde_json` produce the (already
//! shortest-round-trip) number and string encoding. The same function is
//! used by both producers (the Journal's `append`) and verifiers
//! (`verifyIntegrity`), as required.

use crate::error::{CryptoError, CryptoResult};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Recursively re-key a JSON value so objects serialize with sorted keys.
/// Arrays and scalars pass through unchanged; `serde_json::Map` does not
/// sort by default (insertion order, or whatever order the caller built
/// it in), so this rebuild via `BTreeMap` is what actually pins the order.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            let mut out = serde_json::Map::new();
            for (k, v) in sorted {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Serialize `value` to its canonical byte representation: sorted keys,
/// UTF-8, compact (no extraneous whitespace), `serde_json`'s native
/// number formatting.
///
/// # Errors
///
/// Returns an error if `value` does not serialize to JSON (e.g. it
/// contains a map with non-string keys after a custom `Serialize` impl,
/// or a float that is NaN/Infinity).
pub fn canonicalize<T: Serialize>(value: &T) -> CryptoResult<Vec<u8>> {
    let raw = serde_json::to_value(value)
        .map_err(|e| CryptoError::CanonicalizationFailed(e.to_string()))?;
    let sorted = sort_keys(&raw);
    serde_json::to_vec(&sorted).map_err(|e| CryptoError::CanonicalizationFailed(e.to_string()))
}

/// Canonicalize then SHA-256 the result, returning the lowercase hex
/// digest used verbatim as `Event::hash` / `Event::prev_hash`.
///
/// # Errors
///
/// Propagates [`canonicalize`]'s errors.
pub fn canonical_hash<T: Serialize>(value: &T) -> CryptoResult<String> {
    let bytes = canonicalize(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(digest))
}

/// The fixed all-zero genesis `prev_hash`, one hex char per nibble of a
/// 32-byte SHA-256 digest.
#[must_use]
pub fn genesis_hash() -> String {
    "0".repeat(64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonicalization_sorts_keys_regardless_of_insertion_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
    }

    #[test]
    fn canonicalization_is_stable_for_nested_objects_and_arrays() {
        let value = json!({"outer": {"z": 1, "a": [3, 2, {"y": 1, "x": 2}]}});
        let first = canonicalize(&value).unwrap();
        let second = canonicalize(&value).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn canonical_hash_changes_when_any_field_changes() {
        let a = json!({"seq": 1, "payload": {"x": 1}});
        let b = json!({"seq": 1, "payload": {"x": 2}});
        assert_ne!(canonical_hash(&a).unwrap(), canonical_hash(&b).unwrap());
    }

    #[test]
    fn genesis_hash_is_64_zero_hex_chars() {
        let g = genesis_hash();
        assert_eq!(g.len(), 64);
        assert!(g.chars().all(|c| c == '0'));
    }
}
