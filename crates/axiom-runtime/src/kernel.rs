//! The Kernel — session state machine and step-execution driver.
//!
//! [`Kernel::run_task`] drives one session end to end: ask the Planner for
//! a plan, delegate each step to the Tool Runtime with retry/backoff,
//! enforce session-level limits, optionally loop back into the Planner in
//! agentic mode, and extract a post-mortem memory lesson on every
//! terminal transition.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axiom_audit::Journal;
use axiom_core::{
    event::kind, AccumulatedContext, ErrorKind, EventPayload, FailurePolicy, Limits, PolicyProfile,
    RunMode, Session, SessionStatus, StepOutcome, StepResult, StepStatus, Task, Timestamp, Usage,
};
use axiom_llm::{Planner, PlannerOptions};
use axiom_tools::{RunContext, ToolRuntime};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{KernelError, KernelResult};
use crate::memory::{ActiveMemory, Lesson, LessonOutcome};
use crate::retry::RetryPolicy;
use crate::task_state::{TaskState, TaskStateSnapshot};
use crate::working_memory::WorkingMemory;

/// Bound on the number of lesson hits folded into a planner call's
/// accumulated context.
const MEMORY_HITS_LIMIT: usize = 5;

/// Drives one session through the Kernel's state machine.
pub struct Kernel {
    journal: Arc<Journal>,
    planner: Arc<dyn Planner>,
    tool_runtime: Arc<ToolRuntime>,
    active_memory: Arc<ActiveMemory>,
    working_memory: Arc<WorkingMemory>,
    retry_policy: RetryPolicy,
    planner_options: PlannerOptions,
}

impl Kernel {
    #[must_use]
    pub fn new(
        journal: Arc<Journal>,
        planner: Arc<dyn Planner>,
        tool_runtime: Arc<ToolRuntime>,
        active_memory: Arc<ActiveMemory>,
        working_memory: Arc<WorkingMemory>,
    ) -> Self {
        Self {
            journal,
            planner,
            tool_runtime,
            active_memory,
            working_memory,
            retry_policy: RetryPolicy::default(),
            planner_options: PlannerOptions::default(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    #[must_use]
    pub fn with_planner_options(mut self, options: PlannerOptions) -> Self {
        self.planner_options = options;
        self
    }

    #[must_use]
    pub fn working_memory(&self) -> &Arc<WorkingMemory> {
        &self.working_memory
    }

    /// Run `task` to a terminal session state, executing plans agentically
    /// (re-entering the Planner between plan executions) when `agentic` is
    /// set. Returns the terminal [`Session`] and a read-only snapshot of
    /// its final [`TaskState`].
    #[allow(clippy::too_many_arguments)]
    pub async fn run_task(
        &self,
        task: Task,
        mode: RunMode,
        policy: PolicyProfile,
        limits: Limits,
        agentic: bool,
        workspace_root: PathBuf,
        cancel: CancellationToken,
    ) -> KernelResult<(Session, TaskStateSnapshot)> {
        let mut session = Session {
            session_id: axiom_core::SessionId::new(),
            task_id: task.task_id,
            mode,
            status: SessionStatus::Created,
            created_at: Timestamp::now(),
            limits,
            policy,
            plan: None,
            plan_iteration: 0,
            usage: Usage::default(),
        };

        self.journal
            .append(
                kind::SESSION_CREATED,
                session.session_id,
                EventPayload::Session {
                    task_id: session.task_id,
                    reason: None,
                    code: None,
                },
            )
            .await?;
        self.journal
            .append(
                kind::SESSION_STARTED,
                session.session_id,
                EventPayload::Session {
                    task_id: session.task_id,
                    reason: None,
                    code: None,
                },
            )
            .await?;

        let mut task_state = TaskState::new();
        let tool_catalog = self.tool_runtime.registry().schemas_for_planner();
        let tool_names: Vec<String> = tool_catalog.iter().map(|t| t.name.clone()).collect();

        let memory_hits = self.active_memory.retrieve(&task.text, &tool_names, MEMORY_HITS_LIMIT);
        let mut accumulated_context = AccumulatedContext {
            previous_plans: Vec::new(),
            step_outcomes: Vec::new(),
            findings_digest: digest_memory_hits(&memory_hits),
        };

        let run_ctx = RunContext::new(session.session_id, workspace_root);

        let outcome = 'session: loop {
            if cancel.is_cancelled() {
                break 'session self
                    .terminate_aborted(&mut session, &task_state, "cancelled before planner call")
                    .await?;
            }

            session.status = SessionStatus::Planning;
            let iteration = session.plan_iteration;
            self.journal
                .append(
                    kind::PLANNER_REQUESTED,
                    session.session_id,
                    EventPayload::Raw(serde_json::json!({ "iteration": iteration })),
                )
                .await?;

            let timeout = Duration::from_millis(self.planner_options.planner_timeout_ms);
            let call = self.planner.generate_plan(
                &task,
                &tool_catalog,
                Some(&accumulated_context),
                &self.planner_options,
            );
            let response = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => {
                    let reason = err.to_string();
                    break 'session self
                        .terminate_failed(&mut session, &task_state, &reason, "planner_error")
                        .await?;
                }
                Err(_) => {
                    let reason = format!("planner call timed out after {}ms", timeout.as_millis());
                    break 'session self
                        .terminate_failed(&mut session, &task_state, &reason, "planner_timeout")
                        .await?;
                }
            };

            session.usage.record_planner_call(
                response.usage.input_tokens,
                response.usage.output_tokens,
                response.usage.cost_usd,
            );
            self.journal
                .append(
                    kind::PLANNER_PLAN_RECEIVED,
                    session.session_id,
                    EventPayload::Plan {
                        plan_id: response.plan.plan_id,
                        iteration: Some(iteration),
                        step_count: Some(response.plan.steps.len()),
                    },
                )
                .await?;

            if response.plan.is_empty() {
                break 'session self.terminate_completed(&mut session, &task_state).await?;
            }

            let plan = response.plan;
            task_state.set_plan(plan.clone());
            session.plan = Some(plan.clone());
            self.journal
                .append(
                    if iteration == 0 { kind::PLAN_ACCEPTED } else { kind::PLAN_REPLACED },
                    session.session_id,
                    EventPayload::Plan {
                        plan_id: plan.plan_id,
                        iteration: Some(iteration),
                        step_count: Some(plan.steps.len()),
                    },
                )
                .await?;

            session.status = SessionStatus::Running;

            for step in &plan.steps {
                if cancel.is_cancelled() {
                    break 'session self
                        .terminate_aborted(&mut session, &task_state, "cancelled during step execution")
                        .await?;
                }

                self.journal
                    .append(
                        kind::STEP_STARTED,
                        session.session_id,
                        EventPayload::Step {
                            step_id: step.step_id,
                            tool_name: Some(step.tool_ref.name.clone()),
                            error: None,
                            attempts: None,
                        },
                    )
                    .await?;

                let result = self.run_step_with_retry(step, &run_ctx, mode, &cancel).await;
                session.usage.steps_executed = session.usage.steps_executed.saturating_add(1);
                task_state.record_step_result(result.clone());
                accumulated_context.step_outcomes.push(StepOutcome {
                    step_id: step.step_id,
                    title: step.title.clone(),
                    status: result.status,
                    summary: result.error.as_ref().map(|e| e.message.clone()),
                });

                if result.status == StepStatus::Succeeded {
                    self.journal
                        .append(
                            kind::STEP_SUCCEEDED,
                            session.session_id,
                            EventPayload::Step {
                                step_id: step.step_id,
                                tool_name: Some(step.tool_ref.name.clone()),
                                error: None,
                                attempts: Some(result.attempts),
                            },
                        )
                        .await?;
                    continue;
                }

                self.journal
                    .append(
                        kind::STEP_FAILED,
                        session.session_id,
                        EventPayload::Step {
                            step_id: step.step_id,
                            tool_name: Some(step.tool_ref.name.clone()),
                            error: result.error.as_ref().map(|e| e.message.clone()),
                            attempts: Some(result.attempts),
                        },
                    )
                    .await?;

                match step.failure_policy {
                    FailurePolicy::Abort => {
                        let reason = result
                            .error
                            .as_ref()
                            .map_or_else(|| "step failed".to_string(), |e| e.message.clone());
                        break 'session self
                            .terminate_failed(&mut session, &task_state, &reason, "step_failed")
                            .await?;
                    }
                    FailurePolicy::Continue => {}
                    FailurePolicy::Replan => {
                        if agentic {
                            // Stop this plan's remaining steps; the outer
                            // loop re-enters the planner unconditionally.
                            break;
                        }
                        let reason = "replan requested outside agentic mode".to_string();
                        break 'session self
                            .terminate_failed(&mut session, &task_state, &reason, "replan_unsupported")
                            .await?;
                    }
                }
            }

            if let Some(breach) = session.usage.check(&session.limits, session.plan_iteration) {
                break 'session self
                    .terminate_failed(&mut session, &task_state, &breach.to_string(), "limit_breached")
                    .await?;
            }

            if !agentic {
                break 'session self.terminate_completed(&mut session, &task_state).await?;
            }

            accumulated_context.previous_plans.push(plan);
            session.plan_iteration = session.plan_iteration.saturating_add(1);
            self.journal
                .append(
                    kind::SESSION_CHECKPOINT,
                    session.session_id,
                    EventPayload::Session {
                        task_id: session.task_id,
                        reason: Some(format!("iteration {iteration} complete")),
                        code: None,
                    },
                )
                .await?;
        };

        let (session, snapshot) = outcome;
        self.extract_lesson(&task, &session, &snapshot);
        self.working_memory.clear(session.session_id);
        Ok((session, snapshot))
    }

    /// Attempt a step up to `max_retries + 1` times. Only a `Transient`
    /// error kind is retried; backoff between attempts is jittered.
    async fn run_step_with_retry(
        &self,
        step: &axiom_core::Step,
        run_ctx: &RunContext,
        mode: RunMode,
        cancel: &CancellationToken,
    ) -> StepResult {
        let mut attempt = 0;
        loop {
            let mut result = self.tool_runtime.run(step, run_ctx, mode).await;
            result.attempts = attempt + 1;

            if result.status == StepStatus::Succeeded || cancel.is_cancelled() {
                return result;
            }

            let kind = result
                .error
                .as_ref()
                .map_or(ErrorKind::Fatal, |e| error_kind_from_code(&e.code));

            if !kind.is_retryable() || attempt >= step.max_retries {
                return result;
            }

            attempt += 1;
            let delay = self.retry_policy.jittered_delay_for_attempt(attempt);
            tokio::time::sleep(delay).await;
        }
    }

    async fn terminate_completed(
        &self,
        session: &mut Session,
        task_state: &TaskState,
    ) -> KernelResult<(Session, TaskStateSnapshot)> {
        session.status = SessionStatus::Completed;
        self.journal
            .append(
                kind::SESSION_COMPLETED,
                session.session_id,
                EventPayload::Session {
                    task_id: session.task_id,
                    reason: None,
                    code: None,
                },
            )
            .await?;
        info!(session_id = %session.session_id, "session completed");
        Ok((session.clone(), task_state.snapshot()))
    }

    async fn terminate_failed(
        &self,
        session: &mut Session,
        task_state: &TaskState,
        reason: &str,
        code: &str,
    ) -> KernelResult<(Session, TaskStateSnapshot)> {
        session.status = SessionStatus::Failed;
        self.journal
            .append(
                kind::SESSION_FAILED,
                session.session_id,
                EventPayload::Session {
                    task_id: session.task_id,
                    reason: Some(reason.to_string()),
                    code: Some(code.to_string()),
                },
            )
            .await?;
        warn!(session_id = %session.session_id, reason, "session failed");
        Ok((session.clone(), task_state.snapshot()))
    }

    async fn terminate_aborted(
        &self,
        session: &mut Session,
        task_state: &TaskState,
        reason: &str,
    ) -> KernelResult<(Session, TaskStateSnapshot)> {
        session.status = SessionStatus::Aborted;
        self.journal
            .append(
                kind::SESSION_ABORTED,
                session.session_id,
                EventPayload::Session {
                    task_id: session.task_id,
                    reason: Some(reason.to_string()),
                    code: None,
                },
            )
            .await?;
        warn!(session_id = %session.session_id, reason, "session aborted");
        Ok((session.clone(), task_state.snapshot()))
    }

    fn extract_lesson(&self, task: &Task, session: &Session, snapshot: &TaskStateSnapshot) {
        let outcome = match session.status {
            SessionStatus::Completed => LessonOutcome::Succeeded,
            SessionStatus::Aborted => LessonOutcome::Aborted,
            _ => LessonOutcome::Failed,
        };
        let tool_names: Vec<String> = session
            .plan
            .as_ref()
            .map(|p| p.steps.iter().map(|s| s.tool_ref.name.clone()).collect())
            .unwrap_or_default();
        let lesson_text = format!(
            "{} of {} steps completed ({} failed)",
            snapshot.completed_steps, snapshot.total_steps, snapshot.failed_steps
        );
        let lesson = Lesson::new(task.text.clone(), outcome, lesson_text, tool_names, session.session_id);
        if let Err(err) = self.active_memory.append(lesson) {
            warn!(session_id = %session.session_id, error = %err, "failed to persist memory lesson");
        }
    }
}

fn digest_memory_hits(hits: &[Lesson]) -> String {
    if hits.is_empty() {
        return String::new();
    }
    hits.iter()
        .map(|l| format!("- {}: {}", l.task_summary, l.lesson))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map a [`axiom_tools::ToolRuntimeError`] code string (as attached to a
/// failed [`StepResult`]'s `error.code`) back to the crate-spanning error
/// kind taxonomy. Kept in lockstep with `axiom_tools::runtime::error_code`.
fn error_kind_from_code(code: &str) -> ErrorKind {
    match code {
        "invalid_input" | "output_invalid" => ErrorKind::Validation,
        "permission_denied" => ErrorKind::PermissionDenied,
        "timed_out" | "handler_failed" | "io_error" => ErrorKind::Transient,
        _ => ErrorKind::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_approval::{DecisionCache, PermissionEngine, ScriptedPrompter};
    use axiom_audit::JournalOptions;
    use axiom_core::{FailurePolicy, Plan, PlanId, Step, StepId, ToolRef};
    use axiom_llm::MockPlanner;
    use axiom_tools::{manifest::ToolManifest, manifest::ToolSupports, ToolRegistry, ToolRuntime};
    use std::collections::HashSet;

    fn echo_manifest() -> ToolManifest {
        ToolManifest {
            name: "echo".into(),
            version: "1.0.0".into(),
            description: "echo".into(),
            input_schema: serde_json::json!({}),
            output_schema: serde_json::json!({}),
            permissions: vec![],
            supports: ToolSupports {
                real: false,
                dry_run: false,
                mock: true,
            },
            mock_responses: vec![serde_json::json!({"ok": true})],
        }
    }

    fn step(policy: FailurePolicy) -> Step {
        Step {
            step_id: StepId::new(),
            title: "do a thing".into(),
            tool_ref: ToolRef {
                name: "echo".into(),
                version: None,
            },
            input: serde_json::json!({}),
            success_criteria: vec![],
            failure_policy: policy,
            timeout_ms: 1000,
            max_retries: 0,
        }
    }

    async fn make_kernel(dir: &std::path::Path, plan: Plan) -> Kernel {
        let journal = Arc::new(
            Journal::init(dir.join("journal.jsonl"), JournalOptions::default()).unwrap(),
        );
        let mut registry = ToolRegistry::new();
        registry.register(echo_manifest());
        let engine = Arc::new(PermissionEngine::new(
            PolicyProfile {
                allowed_paths: vec![],
                allowed_endpoints: vec![],
                allowed_commands: vec![],
                require_approval_for_writes: false,
            },
            HashSet::new(),
            Arc::new(DecisionCache::new()),
            Arc::new(ScriptedPrompter::new(vec![])),
            Arc::clone(&journal),
        ));
        let tool_runtime = Arc::new(ToolRuntime::new(registry, engine, Arc::clone(&journal)));
        let planner = Arc::new(MockPlanner::once(plan));
        let active_memory = Arc::new(ActiveMemory::in_memory(crate::memory::RetentionPolicy::default()));
        let working_memory = Arc::new(WorkingMemory::default());
        Kernel::new(journal, planner, tool_runtime, active_memory, working_memory)
    }

    #[tokio::test]
    async fn empty_plan_completes_the_session_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "noop".into(),
            assumptions: vec![],
            steps: vec![],
        };
        let kernel = make_kernel(dir.path(), plan).await;
        let (session, _) = kernel
            .run_task(
                Task::new("do nothing"),
                RunMode::Mock,
                PolicyProfile {
                    allowed_paths: vec![],
                    allowed_endpoints: vec![],
                    allowed_commands: vec![],
                    require_approval_for_writes: false,
                },
                Limits::default(),
                false,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn one_step_plan_completes_after_mock_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "do one thing".into(),
            assumptions: vec![],
            steps: vec![step(FailurePolicy::Abort)],
        };
        let kernel = make_kernel(dir.path(), plan).await;
        let (session, snapshot) = kernel
            .run_task(
                Task::new("do one thing"),
                RunMode::Mock,
                PolicyProfile {
                    allowed_paths: vec![],
                    allowed_endpoints: vec![],
                    allowed_commands: vec![],
                    require_approval_for_writes: false,
                },
                Limits::default(),
                false,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(snapshot.completed_steps, 1);
        assert_eq!(snapshot.total_steps, 1);
    }

    #[tokio::test]
    async fn max_steps_limit_fails_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "two steps".into(),
            assumptions: vec![],
            steps: vec![step(FailurePolicy::Continue), step(FailurePolicy::Continue)],
        };
        let kernel = make_kernel(dir.path(), plan).await;
        let limits = Limits {
            max_steps: Some(1),
            ..Limits::default()
        };
        let (session, _) = kernel
            .run_task(
                Task::new("two steps"),
                RunMode::Mock,
                PolicyProfile {
                    allowed_paths: vec![],
                    allowed_endpoints: vec![],
                    allowed_commands: vec![],
                    require_approval_for_writes: false,
                },
                limits,
                false,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn replan_outside_agentic_mode_fails_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut failing_step = step(FailurePolicy::Replan);
        failing_step.tool_ref.name = "missing_tool".into();
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "replan test".into(),
            assumptions: vec![],
            steps: vec![failing_step],
        };
        let kernel = make_kernel(dir.path(), plan).await;
        let (session, _) = kernel
            .run_task(
                Task::new("replan test"),
                RunMode::Mock,
                PolicyProfile {
                    allowed_paths: vec![],
                    allowed_endpoints: vec![],
                    allowed_commands: vec![],
                    require_approval_for_writes: false,
                },
                Limits::default(),
                false,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn permission_denied_step_is_never_retried() {
        let dir = tempfile::tempdir().unwrap();
        let mut guarded_step = step(FailurePolicy::Abort);
        guarded_step.max_retries = 5;
        let mut guarded_manifest = echo_manifest();
        guarded_manifest.permissions = vec!["filesystem:write:workspace".to_string()];
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "guarded".into(),
            assumptions: vec![],
            steps: vec![guarded_step],
        };

        let journal = Arc::new(
            Journal::init(dir.path().join("journal.jsonl"), JournalOptions::default()).unwrap(),
        );
        let mut registry = ToolRegistry::new();
        registry.register(guarded_manifest);
        let engine = Arc::new(PermissionEngine::new(
            PolicyProfile::default(),
            HashSet::new(),
            Arc::new(DecisionCache::new()),
            Arc::new(ScriptedPrompter::new(vec![])),
            Arc::clone(&journal),
        ));
        let tool_runtime = Arc::new(ToolRuntime::new(registry, engine, Arc::clone(&journal)));
        let planner = Arc::new(MockPlanner::once(plan));
        let active_memory = Arc::new(ActiveMemory::in_memory(crate::memory::RetentionPolicy::default()));
        let kernel = Kernel::new(
            journal,
            planner,
            tool_runtime,
            active_memory,
            Arc::new(WorkingMemory::default()),
        );

        let (session, snapshot) = kernel
            .run_task(
                Task::new("guarded task"),
                RunMode::Mock,
                PolicyProfile::default(),
                Limits::default(),
                false,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::Failed);
        assert_eq!(snapshot.failed_steps, 1);
    }

    #[tokio::test]
    async fn agentic_mode_loops_until_planner_returns_an_empty_plan() {
        let dir = tempfile::tempdir().unwrap();
        let first_plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "first iteration".into(),
            assumptions: vec![],
            steps: vec![step(FailurePolicy::Continue)],
        };
        let done_plan = axiom_llm::mock_empty_plan("nothing left to do");

        let journal = Arc::new(
            Journal::init(dir.path().join("journal.jsonl"), JournalOptions::default()).unwrap(),
        );
        let mut registry = ToolRegistry::new();
        registry.register(echo_manifest());
        let engine = Arc::new(PermissionEngine::new(
            PolicyProfile::default(),
            HashSet::new(),
            Arc::new(DecisionCache::new()),
            Arc::new(ScriptedPrompter::new(vec![])),
            Arc::clone(&journal),
        ));
        let tool_runtime = Arc::new(ToolRuntime::new(registry, engine, Arc::clone(&journal)));
        let planner = Arc::new(MockPlanner::new(vec![first_plan, done_plan]));
        let active_memory = Arc::new(ActiveMemory::in_memory(crate::memory::RetentionPolicy::default()));
        let kernel = Kernel::new(
            journal,
            planner,
            tool_runtime,
            active_memory,
            Arc::new(WorkingMemory::default()),
        );

        let (session, snapshot) = kernel
            .run_task(
                Task::new("agentic task"),
                RunMode::Mock,
                PolicyProfile::default(),
                Limits::default(),
                true,
                dir.path().to_path_buf(),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.plan_iteration, 1);
        assert_eq!(snapshot.completed_steps, 1);
    }

    #[tokio::test]
    async fn cancellation_before_the_first_planner_call_aborts_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let plan = Plan {
            plan_id: PlanId::new(),
            schema_version: 1,
            goal: "never runs".into(),
            assumptions: vec![],
            steps: vec![step(FailurePolicy::Abort)],
        };
        let kernel = make_kernel(dir.path(), plan).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (session, _) = kernel
            .run_task(
                Task::new("cancel me"),
                RunMode::Mock,
                PolicyProfile::default(),
                Limits::default(),
                false,
                dir.path().to_path_buf(),
                cancel,
            )
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::Aborted);
    }

    #[test]
    fn error_kind_mapping_matches_tool_runtime_codes() {
        assert!(error_kind_from_code("timed_out").is_retryable());
        assert!(error_kind_from_code("handler_failed").is_retryable());
        assert!(!error_kind_from_code("invalid_input").is_retryable());
        assert!(!error_kind_from_code("permission_denied").is_retryable());
        assert!(!error_kind_from_code("tool_not_found").is_retryable());
    }
}
