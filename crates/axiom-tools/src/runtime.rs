//! The Tool Runtime — mode-aware dispatch of plan steps (§4.D).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axiom_approval::PermissionEngine;
use axiom_audit::Journal;
use axiom_core::{
    ApprovalDecision, ErrorDetail, EventPayload, GrantConstraints, PermissionRequest, RequestId,
    RunMode, Scope, SessionId, Step, StepResult, StepStatus, Timestamp,
};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};
use crate::manifest::{ToolManifest, ToolRegistry};
use crate::validate::validate_structural;

/// The per-session context the Kernel hands the runtime for each step: the
/// session a step belongs to, its workspace root, and its persistent `cwd`.
pub struct RunContext {
    /// Session the step is running under.
    pub session_id: SessionId,
    /// Workspace root for file-tool handlers.
    pub workspace_root: PathBuf,
    /// Working directory, shared and mutated across steps in the session.
    pub cwd: Arc<RwLock<PathBuf>>,
}

impl RunContext {
    /// Build a run context with a fresh `cwd` seeded at `workspace_root`.
    #[must_use]
    pub fn new(session_id: SessionId, workspace_root: PathBuf) -> Self {
        let cwd = Arc::new(RwLock::new(workspace_root.clone()));
        Self {
            session_id,
            workspace_root,
            cwd,
        }
    }
}

/// Binds tool manifests to real-mode executables and dispatches plan steps
/// through the seven-step `run` contract.
pub struct ToolRuntime {
    registry: ToolRegistry,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    permission_engine: Arc<PermissionEngine>,
    journal: Arc<Journal>,
    mock_cursors: Mutex<HashMap<SessionId, usize>>,
}

impl ToolRuntime {
    /// Construct a runtime over `registry`, gating through `permission_engine`
    /// and recording `tool.*` events to `journal`.
    #[must_use]
    pub fn new(
        registry: ToolRegistry,
        permission_engine: Arc<PermissionEngine>,
        journal: Arc<Journal>,
    ) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
            permission_engine,
            journal,
            mock_cursors: Mutex::new(HashMap::new()),
        }
    }

    /// Bind `name` to a real-mode executable.
    pub fn register_handler(&mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// The underlying tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute one plan step under `mode`.
    ///
    /// 1. resolve the manifest (`ToolNotFound` if missing)
    /// 2. validate `step.input` against `input_schema` (`InvalidInput`)
    /// 3. gate every required permission scope (`PermissionDenied`)
    /// 4. check `mode` is supported (`ModeUnsupported`)
    /// 5. dispatch by mode: mock / dry_run / real
    /// 6. validate the output against `output_schema` (`OutputInvalid`)
    /// 7. emit `tool.started`, then `tool.succeeded` / `tool.failed`
    pub async fn run(&self, step: &Step, ctx: &RunContext, mode: RunMode) -> StepResult {
        let started_at = Timestamp::now();
        let start_instant = Instant::now();
        self.emit_tool_started(step, ctx).await;

        let outcome = self.run_inner(step, ctx, mode).await;
        let finished_at = Timestamp::now();
        let duration = start_instant.elapsed();

        match outcome {
            Ok(output) => {
                self.emit_tool_succeeded(step, ctx, duration).await;
                StepResult {
                    step_id: step.step_id,
                    status: StepStatus::Succeeded,
                    output: Some(output),
                    error: None,
                    started_at,
                    finished_at,
                    attempts: 1,
                }
            },
            Err(err) => {
                self.emit_tool_failed(step, ctx, &err, duration).await;
                StepResult {
                    step_id: step.step_id,
                    status: StepStatus::Failed,
                    output: None,
                    error: Some(ErrorDetail {
                        code: error_code(&err).to_string(),
                        message: err.to_string(),
                    }),
                    started_at,
                    finished_at,
                    attempts: 1,
                }
            },
        }
    }

    async fn run_inner(
        &self,
        step: &Step,
        ctx: &RunContext,
        mode: RunMode,
    ) -> Result<Value, ToolRuntimeError> {
        let manifest = self
            .registry
            .get(&step.tool_ref.name)
            .ok_or_else(|| ToolRuntimeError::ToolNotFound(step.tool_ref.name.clone()))?
            .clone();

        validate_structural(&manifest.input_schema, &step.input)
            .map_err(ToolRuntimeError::InvalidInput)?;

        let constraints = self.check_permissions(&manifest, step, ctx).await?;

        let mode_supported = match mode {
            RunMode::Real => manifest.supports.real,
            RunMode::DryRun => manifest.supports.dry_run,
            RunMode::Mock => manifest.supports.mock,
        };
        if !mode_supported {
            return Err(ToolRuntimeError::ModeUnsupported {
                tool: manifest.name.clone(),
                mode: mode_label(mode).to_string(),
            });
        }

        let output = match mode {
            RunMode::Mock => self.dispatch_mock(&manifest, ctx).await?,
            RunMode::DryRun => json!({
                "dry_run": true,
                "would": format!("invoke {} with {}", manifest.name, step.input),
            }),
            RunMode::Real => self.dispatch_real(&manifest, step, ctx, constraints).await?,
        };

        validate_structural(&manifest.output_schema, &output)
            .map_err(ToolRuntimeError::OutputInvalid)?;

        Ok(output)
    }

    async fn check_permissions(
        &self,
        manifest: &ToolManifest,
        step: &Step,
        ctx: &RunContext,
    ) -> Result<GrantConstraints, ToolRuntimeError> {
        let mut constraints = GrantConstraints::default();
        for scope_str in &manifest.permissions {
            let request = PermissionRequest {
                request_id: RequestId::new(),
                session_id: ctx.session_id,
                step_id: step.step_id,
                tool_name: manifest.name.clone(),
                scope: Scope::new(scope_str.clone()),
            };
            match self.permission_engine.check(request).await {
                ApprovalDecision::Deny => {
                    return Err(ToolRuntimeError::PermissionDenied(scope_str.clone()));
                },
                ApprovalDecision::AllowConstrained { constraints: c, .. } => {
                    constraints = c;
                },
                _ => {},
            }
        }
        Ok(constraints)
    }

    async fn dispatch_mock(
        &self,
        manifest: &ToolManifest,
        ctx: &RunContext,
    ) -> Result<Value, ToolRuntimeError> {
        if manifest.mock_responses.is_empty() {
            return Err(ToolRuntimeError::ModeUnsupported {
                tool: manifest.name.clone(),
                mode: "mock".to_string(),
            });
        }
        let mut cursors = self.mock_cursors.lock().await;
        let cursor = cursors.entry(ctx.session_id).or_insert(0);
        let index = *cursor % manifest.mock_responses.len();
        *cursor += 1;
        Ok(manifest.mock_responses[index].clone())
    }

    async fn dispatch_real(
        &self,
        manifest: &ToolManifest,
        step: &Step,
        ctx: &RunContext,
        constraints: GrantConstraints,
    ) -> Result<Value, ToolRuntimeError> {
        let handler = self.handlers.get(&manifest.name).ok_or_else(|| {
            ToolRuntimeError::ModeUnsupported {
                tool: manifest.name.clone(),
                mode: "real".to_string(),
            }
        })?;

        let handler_ctx = HandlerContext {
            workspace_root: ctx.workspace_root.clone(),
            cwd: Arc::clone(&ctx.cwd),
            constraints,
        };

        match tokio::time::timeout(
            Duration::from_millis(step.timeout_ms),
            handler.execute(step.input.clone(), &handler_ctx),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ToolRuntimeError::TimedOut(step.timeout_ms)),
        }
    }

    async fn emit_tool_started(&self, step: &Step, ctx: &RunContext) {
        let payload = EventPayload::Step {
            step_id: step.step_id,
            tool_name: Some(step.tool_ref.name.clone()),
            error: None,
            attempts: None,
        };
        if let Err(err) = self
            .journal
            .append("tool.started", ctx.session_id, payload)
            .await
        {
            warn!(error = %err, "failed to record tool.started");
        }
    }

    async fn emit_tool_succeeded(&self, step: &Step, ctx: &RunContext, duration: Duration) {
        info!(tool = %step.tool_ref.name, duration_ms = duration.as_millis(), "tool succeeded");
        let payload = EventPayload::Step {
            step_id: step.step_id,
            tool_name: Some(step.tool_ref.name.clone()),
            error: None,
            attempts: None,
        };
        if let Err(err) = self
            .journal
            .append("tool.succeeded", ctx.session_id, payload)
            .await
        {
            warn!(error = %err, "failed to record tool.succeeded");
        }
    }

    async fn emit_tool_failed(
        &self,
        step: &Step,
        ctx: &RunContext,
        error: &ToolRuntimeError,
        duration: Duration,
    ) {
        warn!(tool = %step.tool_ref.name, duration_ms = duration.as_millis(), error = %error, "tool failed");
        let payload = EventPayload::Step {
            step_id: step.step_id,
            tool_name: Some(step.tool_ref.name.clone()),
            error: Some(error.to_string()),
            attempts: None,
        };
        if let Err(err) = self
            .journal
            .append("tool.failed", ctx.session_id, payload)
            .await
        {
            warn!(error = %err, "failed to record tool.failed");
        }
    }
}

fn mode_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Real => "real",
        RunMode::DryRun => "dry_run",
        RunMode::Mock => "mock",
    }
}

fn error_code(err: &ToolRuntimeError) -> &'static str {
    match err {
        ToolRuntimeError::ToolNotFound(_) => "tool_not_found",
        ToolRuntimeError::InvalidInput(_) => "invalid_input",
        ToolRuntimeError::PermissionDenied(_) => "permission_denied",
        ToolRuntimeError::ModeUnsupported { .. } => "mode_unsupported",
        ToolRuntimeError::OutputInvalid(_) => "output_invalid",
        ToolRuntimeError::TimedOut(_) => "timed_out",
        ToolRuntimeError::HandlerFailed(_) => "handler_failed",
        ToolRuntimeError::Io(_) => "io_error",
        ToolRuntimeError::Audit(_) => "audit_error",
    }
}
