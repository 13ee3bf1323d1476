//! Working Memory — a bounded ephemeral key/value map scoped per session.
//!
//! Isolated between sessions; bounded by entry count per session to avoid
//! runaway growth. Not persisted — it lives only as long as the
//! [`crate::kernel::Kernel`] process does.

use std::collections::HashMap;
use std::sync::Mutex;

use axiom_core::SessionId;
use serde_json::Value;

/// Default ceiling on entries held per session.
pub const DEFAULT_MAX_ENTRIES_PER_SESSION: usize = 256;

/// A bounded, session-scoped key/value store.
pub struct WorkingMemory {
    max_entries_per_session: usize,
    sessions: Mutex<HashMap<SessionId, HashMap<String, Value>>>,
}

impl WorkingMemory {
    #[must_use]
    pub fn new(max_entries_per_session: usize) -> Self {
        Self {
            max_entries_per_session,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Set `key` to `value` in `session_id`'s map.
    ///
    /// Returns `false` without writing if the session is already at
    /// capacity and `key` is not already present (an update to an
    /// existing key never fails on capacity).
    pub fn set(&self, session_id: SessionId, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        let mut sessions = self.sessions.lock().expect("working memory lock poisoned");
        let map = sessions.entry(session_id).or_default();
        if !map.contains_key(&key) && map.len() >= self.max_entries_per_session {
            return false;
        }
        map.insert(key, value);
        true
    }

    #[must_use]
    pub fn get(&self, session_id: SessionId, key: &str) -> Option<Value> {
        let sessions = self.sessions.lock().expect("working memory lock poisoned");
        sessions.get(&session_id).and_then(|m| m.get(key)).cloned()
    }

    #[must_use]
    pub fn has(&self, session_id: SessionId, key: &str) -> bool {
        let sessions = self.sessions.lock().expect("working memory lock poisoned");
        sessions.get(&session_id).is_some_and(|m| m.contains_key(key))
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&self, session_id: SessionId, key: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("working memory lock poisoned");
        sessions
            .get_mut(&session_id)
            .is_some_and(|m| m.remove(key).is_some())
    }

    #[must_use]
    pub fn list(&self, session_id: SessionId) -> Vec<String> {
        let sessions = self.sessions.lock().expect("working memory lock poisoned");
        sessions
            .get(&session_id)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every entry for `session_id`. Called on terminal transition.
    pub fn clear(&self, session_id: SessionId) {
        let mut sessions = self.sessions.lock().expect("working memory lock poisoned");
        sessions.remove(&session_id);
    }
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES_PER_SESSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trips() {
        let mem = WorkingMemory::default();
        let session = SessionId::new();
        assert!(mem.set(session, "k", json!(42)));
        assert_eq!(mem.get(session, "k"), Some(json!(42)));
    }

    #[test]
    fn sessions_are_isolated() {
        let mem = WorkingMemory::default();
        let a = SessionId::new();
        let b = SessionId::new();
        mem.set(a, "k", json!("a-value"));
        assert!(mem.get(b, "k").is_none());
    }

    #[test]
    fn delete_removes_key() {
        let mem = WorkingMemory::default();
        let session = SessionId::new();
        mem.set(session, "k", json!(1));
        assert!(mem.delete(session, "k"));
        assert!(!mem.has(session, "k"));
        assert!(!mem.delete(session, "k"));
    }

    #[test]
    fn capacity_is_enforced_per_session() {
        let mem = WorkingMemory::new(2);
        let session = SessionId::new();
        assert!(mem.set(session, "a", json!(1)));
        assert!(mem.set(session, "b", json!(2)));
        assert!(!mem.set(session, "c", json!(3)));
        assert_eq!(mem.list(session).len(), 2);
    }

    #[test]
    fn updating_existing_key_never_fails_on_capacity() {
        let mem = WorkingMemory::new(1);
        let session = SessionId::new();
        assert!(mem.set(session, "a", json!(1)));
        assert!(mem.set(session, "a", json!(2)));
        assert_eq!(mem.get(session, "a"), Some(json!(2)));
    }

    #[test]
    fn clear_drops_the_whole_session() {
        let mem = WorkingMemory::default();
        let session = SessionId::new();
        mem.set(session, "a", json!(1));
        mem.clear(session);
        assert!(mem.list(session).is_empty());
    }
}
