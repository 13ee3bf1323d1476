//! Test fixtures for the core data model.

use axiom_core::{
    FailurePolicy, Plan, PlanId, PolicyProfile, Session, SessionId, SessionStatus, Step, StepId,
    Task, TaskId, Timestamp, ToolRef,
};

/// Create a task with placeholder text.
#[must_use]
pub fn test_task() -> Task {
    Task::new("do the thing")
}

/// Create a single-step plan that calls `tool_name` with `input`.
#[must_use]
pub fn test_plan(tool_name: &str, input: serde_json::Value) -> Plan {
    Plan {
        plan_id: PlanId::new(),
        schema_version: 1,
        goal: "do the thing".into(),
        assumptions: vec![],
        steps: vec![test_step(tool_name, input)],
    }
}

/// Create a plan with no steps, the canonical "nothing left to do" response.
#[must_use]
pub fn test_empty_plan(goal: &str) -> Plan {
    Plan {
        plan_id: PlanId::new(),
        schema_version: 1,
        goal: goal.into(),
        assumptions: vec![],
        steps: vec![],
    }
}

/// Create a single step calling `tool_name` with `input`, defaults tuned
/// for fast tests (short timeout, no retries, abort on failure).
#[must_use]
pub fn test_step(tool_name: &str, input: serde_json::Value) -> Step {
    Step {
        step_id: StepId::new(),
        title: format!("call {tool_name}"),
        tool_ref: ToolRef { name: tool_name.into(), version: None },
        input,
        success_criteria: vec![],
        failure_policy: FailurePolicy::Abort,
        timeout_ms: 5_000,
        max_retries: 0,
    }
}

/// Create a freshly-created session in `Created` status with default
/// limits and an empty policy profile.
#[must_use]
pub fn test_session() -> Session {
    let task = test_task();
    Session {
        session_id: SessionId::new(),
        task_id: task.task_id,
        mode: axiom_core::RunMode::Mock,
        status: SessionStatus::Created,
        created_at: Timestamp::now(),
        limits: axiom_core::Limits::default(),
        policy: PolicyProfile::default(),
        plan: None,
        plan_iteration: 0,
        usage: axiom_core::Usage::default(),
    }
}

/// A policy profile that allows everything, for tests that don't exercise
/// the permission engine's denial paths.
#[must_use]
pub fn permissive_policy() -> PolicyProfile {
    PolicyProfile {
        allowed_paths: vec!["**".into()],
        allowed_endpoints: vec!["**".into()],
        allowed_commands: vec!["**".into()],
        require_approval_for_writes: false,
    }
}

/// A policy profile that allows nothing, for tests that exercise the hard
/// gate's default-deny behavior.
#[must_use]
pub fn restrictive_policy() -> PolicyProfile {
    PolicyProfile::default()
}

/// A dummy task id, for fixtures that only need a distinct identifier.
#[must_use]
pub fn test_task_id() -> TaskId {
    TaskId::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_has_one_step() {
        let plan = test_plan("bash", serde_json::json!({"command": "echo hi"}));
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].tool_ref.name, "bash");
    }

    #[test]
    fn test_empty_plan_is_empty() {
        assert!(test_empty_plan("done").is_empty());
    }

    #[test]
    fn test_session_starts_created() {
        let session = test_session();
        assert_eq!(session.status, SessionStatus::Created);
        assert_eq!(session.plan_iteration, 0);
    }

    #[test]
    fn permissive_policy_allows_every_glob() {
        let policy = permissive_policy();
        assert_eq!(policy.allowed_paths, vec!["**".to_string()]);
    }
}
