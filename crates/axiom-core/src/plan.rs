//! Task, Plan, Step, and StepResult data model.

use crate::ids::{PlanId, StepId, TaskId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A natural-language task submitted to the Kernel. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub text: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl Task {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            task_id: TaskId::new(),
            text: text.into(),
            created_at: Timestamp::now(),
            submitted_by: None,
        }
    }
}

/// A reference to a registered tool by name and optional version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// What the Kernel does with a step that terminally fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    Abort,
    Continue,
    Replan,
}

/// One unit of work within a [`Plan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_id: StepId,
    pub title: String,
    pub tool_ref: ToolRef,
    pub input: Value,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

/// An ordered sequence of steps produced by the Planner. Immutable; a
/// session may hold a sequence of plans across agentic iterations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: PlanId,
    pub schema_version: u32,
    pub goal: String,
    #[serde(default)]
    pub assumptions: Vec<String>,
    pub steps: Vec<Step>,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Terminal state of a step's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// A machine-readable `{code, message}` error, carried by a failed
/// `StepResult` and by a failed session's terminal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// The result of running one step through the Tool Runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: StepId,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub attempts: u32,
}

/// A condensed summary of one step's outcome, carried in the
/// cross-iteration planner context envelope (see
/// [`crate::session::AccumulatedContext`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_id: StepId,
    pub title: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_has_no_steps() {
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "noop".into(),
            assumptions: vec![],
            steps: vec![],
        };
        assert!(plan.is_empty());
    }
}
