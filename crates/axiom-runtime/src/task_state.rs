//! Task State — the Kernel's per-session view of plan progress.
//!
//! Mutated only by the Kernel's run loop as steps complete; external
//! observers (status queries, the CLI) see only [`TaskStateSnapshot`], a
//! read-only view with precomputed aggregates.

use std::collections::HashMap;

use axiom_core::{Plan, StepId, StepResult, StepStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-session plan progress: the current plan, results recorded so far,
/// and a free-form artifact map steps may populate for later steps or for
/// the final memory lesson.
#[derive(Debug, Clone, Default)]
pub struct TaskState {
    pub plan: Option<Plan>,
    pub step_results: HashMap<StepId, StepResult>,
    pub artifacts: HashMap<String, Value>,
}

impl TaskState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active plan. Called on `plan.accepted` / `plan.replaced`.
    pub fn set_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
    }

    pub fn record_step_result(&mut self, result: StepResult) {
        self.step_results.insert(result.step_id, result);
    }

    pub fn set_artifact(&mut self, key: impl Into<String>, value: Value) {
        self.artifacts.insert(key.into(), value);
    }

    #[must_use]
    pub fn get_artifact(&self, key: &str) -> Option<&Value> {
        self.artifacts.get(key)
    }

    #[must_use]
    pub fn snapshot(&self) -> TaskStateSnapshot {
        let total_steps = self.plan.as_ref().map_or(0, |p| p.steps.len());
        let completed_steps = self
            .step_results
            .values()
            .filter(|r| r.status == StepStatus::Succeeded)
            .count();
        let failed_steps = self
            .step_results
            .values()
            .filter(|r| r.status == StepStatus::Failed)
            .count();
        let step_titles = self
            .plan
            .as_ref()
            .map(|p| p.steps.iter().map(|s| s.title.clone()).collect())
            .unwrap_or_default();

        TaskStateSnapshot {
            total_steps,
            completed_steps,
            failed_steps,
            step_titles,
        }
    }
}

/// A read-only aggregate view of [`TaskState`], safe to hand to callers
/// outside the Kernel's run loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStateSnapshot {
    pub total_steps: usize,
    pub completed_steps: usize,
    pub failed_steps: usize,
    pub step_titles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_core::{ErrorDetail, PlanId, Timestamp};

    fn step_result(id: StepId, status: StepStatus) -> StepResult {
        StepResult {
            step_id: id,
            status,
            output: None,
            error: if status == StepStatus::Failed {
                Some(ErrorDetail {
                    code: "x".into(),
                    message: "x".into(),
                })
            } else {
                None
            },
            started_at: Timestamp::now(),
            finished_at: Timestamp::now(),
            attempts: 1,
        }
    }

    #[test]
    fn snapshot_counts_succeeded_and_failed_separately() {
        let mut state = TaskState::new();
        state.set_plan(Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "g".into(),
            assumptions: vec![],
            steps: vec![],
        });
        let a = StepId::new();
        let b = StepId::new();
        state.record_step_result(step_result(a, StepStatus::Succeeded));
        state.record_step_result(step_result(b, StepStatus::Failed));

        let snap = state.snapshot();
        assert_eq!(snap.completed_steps, 1);
        assert_eq!(snap.failed_steps, 1);
    }

    #[test]
    fn artifacts_are_keyed_and_overwritable() {
        let mut state = TaskState::new();
        state.set_artifact("summary", serde_json::json!("first"));
        state.set_artifact("summary", serde_json::json!("second"));
        assert_eq!(state.get_artifact("summary"), Some(&serde_json::json!("second")));
    }

    #[test]
    fn empty_state_snapshot_has_zero_totals() {
        let state = TaskState::new();
        let snap = state.snapshot();
        assert_eq!(snap.total_steps, 0);
        assert_eq!(snap.completed_steps, 0);
    }
}
