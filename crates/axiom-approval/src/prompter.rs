//! The interactive prompter seam.
//!
//! Step 5 of [`crate::engine::PermissionEngine::check`] delegates to an
//! injected, asynchronous prompter so the engine stays agnostic to which
//! frontend (CLI, web, chat) is presenting the request to the user.

use async_trait::async_trait;
use axiom_core::{ApprovalDecision, PermissionRequest};

/// Presents a permission request to a human and returns their decision.
///
/// Implementations decide their own UX; the engine only needs a decision
/// (or an error, which it maps to `deny`) within its configured timeout.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user to approve or deny `request`.
    async fn prompt(&self, request: &PermissionRequest) -> ApprovalDecision;
}

/// A scripted prompter for tests: returns queued decisions in order, then
/// repeats the last one.
pub struct ScriptedPrompter {
    responses: std::sync::Mutex<Vec<ApprovalDecision>>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new(responses: Vec<ApprovalDecision>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
        }
    }

    #[must_use]
    pub fn always(decision: ApprovalDecision) -> Self {
        Self::new(vec![decision])
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, _request: &PermissionRequest) -> ApprovalDecision {
        let mut responses = self.responses.lock().expect("scripted prompter lock poisoned");
        if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses.first().cloned().unwrap_or(ApprovalDecision::Deny)
        }
    }
}

/// A prompter that never responds, used to exercise the timeout path.
pub struct HangingPrompter;

#[async_trait]
impl Prompter for HangingPrompter {
    async fn prompt(&self, _request: &PermissionRequest) -> ApprovalDecision {
        std::future::pending().await
    }
}
