//! Decision caches keyed by `(tool_name, scope)`.
//!
//! The session cache holds `allow_session` grants and lives for one
//! [`axiom_core::Session`]; the global cache holds `allow_always` grants
//! and is shared across sessions via `Arc`.

use std::collections::HashMap;
use std::sync::Mutex;

use axiom_core::{ApprovalDecision, Scope};

/// The `(tool_name, scope)` key the engine caches decisions under.
pub type CacheKey = (String, Scope);

/// A decision cache, shared or per-session depending on how it is held.
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: Mutex<HashMap<CacheKey, ApprovalDecision>>,
}

impl DecisionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached decision for `(tool_name, scope)`.
    #[must_use]
    pub fn get(&self, tool_name: &str, scope: &Scope) -> Option<ApprovalDecision> {
        self.entries
            .lock()
            .expect("decision cache lock poisoned")
            .get(&(tool_name.to_string(), scope.clone()))
            .cloned()
    }

    /// Cache `decision` for `(tool_name, scope)`, replacing any prior entry.
    pub fn insert(&self, tool_name: &str, scope: &Scope, decision: ApprovalDecision) {
        self.entries
            .lock()
            .expect("decision cache lock poisoned")
            .insert((tool_name.to_string(), scope.clone()), decision);
    }

    /// Number of cached decisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("decision cache lock poisoned").len()
    }

    /// Whether the cache holds no decisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_by_tool_and_scope() {
        let cache = DecisionCache::new();
        let scope = Scope::new("filesystem:read:workspace");
        assert!(cache.get("read_file", &scope).is_none());

        cache.insert("read_file", &scope, ApprovalDecision::AllowSession);
        assert!(matches!(
            cache.get("read_file", &scope),
            Some(ApprovalDecision::AllowSession)
        ));
    }
}
