//! Session data model and the session state machine's status enum.

use crate::ids::{PlanId, SessionId, TaskId};
use crate::limits::{Limits, Usage};
use crate::permission::PolicyProfile;
use crate::plan::{Plan, StepOutcome};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Execution mode a session runs under — governs Tool Runtime dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Real,
    DryRun,
    Mock,
}

/// `status ∈ {created, planning, running, completed, failed, aborted}`.
///
/// See the Kernel's state machine (run loop contract) for the transition
/// diagram. `planning`, `running`, and every terminal state are absorbing
/// for external callers; `abort()` is only valid from `planning` or
/// `running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Planning,
    Running,
    Completed,
    Failed,
    Aborted,
}

impl SessionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Failed | SessionStatus::Aborted
        )
    }

    /// Whether `abort()` is callable from this state.
    #[must_use]
    pub fn abortable(self) -> bool {
        matches!(self, SessionStatus::Planning | SessionStatus::Running)
    }
}

/// Mapping from `session_id` to its full state, per the data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub task_id: TaskId,
    pub mode: RunMode,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub limits: Limits,
    pub policy: PolicyProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub plan_iteration: u32,
    pub usage: Usage,
}

/// The stable envelope the Kernel passes to the Planner on every agentic
/// iteration after the first (Open Question resolution: `spec.md` §9
/// leaves the exact shape undefined; this is the chosen one, reused
/// verbatim by every iteration).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccumulatedContext {
    pub previous_plans: Vec<Plan>,
    pub step_outcomes: Vec<StepOutcome>,
    pub findings_digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_planning_and_running_are_abortable() {
        assert!(SessionStatus::Planning.abortable());
        assert!(SessionStatus::Running.abortable());
        assert!(!SessionStatus::Created.abortable());
        assert!(!SessionStatus::Completed.abortable());
    }

    #[test]
    fn terminal_states_are_completed_failed_aborted() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(SessionStatus::Aborted.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
    }
}
