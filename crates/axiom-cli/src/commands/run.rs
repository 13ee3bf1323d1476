//! `axiom run` — drive one task through the Kernel to completion.
//!
//! There is no live LLM adapter wired into this binary (that integration is
//! an external collaborator's responsibility). A plan is instead supplied
//! up front, either as a JSON file or inline, and replayed through
//! [`axiom_llm::MockPlanner`] — the same seam the Kernel's `mode: mock`
//! sessions use.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axiom_core::{Plan, PolicyProfile, RunMode, Task};
use axiom_runtime::{ActiveMemory, Kernel, RetentionPolicy, WorkingMemory};
use clap::Args;

use crate::workspace;

/// Arguments for `axiom run`.
#[derive(Args)]
pub struct RunArgs {
    /// The task text to hand to the planner.
    #[arg(long)]
    task: String,

    /// Dispatch mode steps are executed under.
    #[arg(long, value_enum, default_value = "mock")]
    mode: RunModeArg,

    /// Path to a JSON-encoded [`Plan`] the mock planner replays.
    ///
    /// Without this, the task runs against an empty plan — useful for
    /// smoke-testing session bookkeeping without exercising any tools.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Let the Kernel loop back into the planner after the plan completes,
    /// up to the session's `max_iterations` limit.
    #[arg(long)]
    agentic: bool,

    /// Auto-approve every permission request instead of prompting.
    #[arg(long)]
    yes: bool,
}

/// Dispatch-mode argument, mirrors [`RunMode`].
#[derive(Clone, Copy, clap::ValueEnum)]
enum RunModeArg {
    Real,
    DryRun,
    Mock,
}

impl From<RunModeArg> for RunMode {
    fn from(value: RunModeArg) -> Self {
        match value {
            RunModeArg::Real => RunMode::Real,
            RunModeArg::DryRun => RunMode::DryRun,
            RunModeArg::Mock => RunMode::Mock,
        }
    }
}

/// Run `args.task` to completion and print the terminal session and task
/// state.
///
/// # Errors
///
/// Returns an error if the journal, plan file, or Kernel run itself fails.
pub async fn run(workspace_root: &std::path::Path, config: &axiom_config::AxiomConfig, args: RunArgs) -> Result<()> {
    std::fs::create_dir_all(workspace::axiom_dir(workspace_root))
        .context("creating .axiom directory")?;

    let journal = Arc::new(
        axiom_audit::Journal::init(
            workspace::journal_path(workspace_root),
            axiom_audit::JournalOptions { fsync_every_append: config.journal.fsync_every_append },
        )
        .context("opening journal")?,
    );

    let plan = match &args.plan {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading plan file {}", path.display()))?;
            serde_json::from_str::<Plan>(&raw).context("parsing plan file")?
        },
        None => axiom_llm::mock_empty_plan(&args.task),
    };
    let planner: Arc<dyn axiom_llm::Planner> = Arc::new(axiom_llm::MockPlanner::once(plan));

    let mut registry = axiom_tools::ToolRegistry::new();
    for manifest in axiom_tools::default_manifests() {
        registry.register(manifest);
    }

    let prompter: Arc<dyn axiom_approval::Prompter> = if args.yes {
        Arc::new(crate::prompter::AutoPrompter::allow())
    } else {
        Arc::new(crate::prompter::TerminalPrompter)
    };
    let permission_engine = Arc::new(axiom_approval::PermissionEngine::new(
        config.policy.clone(),
        std::collections::HashSet::new(),
        Arc::new(axiom_approval::DecisionCache::new()),
        prompter,
        journal.clone(),
    ));

    let mut tool_runtime = axiom_tools::ToolRuntime::new(registry, permission_engine, journal.clone());
    axiom_tools::register_builtin_handlers(&mut tool_runtime);
    let tool_runtime = Arc::new(tool_runtime);

    let active_memory = Arc::new(ActiveMemory::in_memory(RetentionPolicy::default()));
    let working_memory = Arc::new(WorkingMemory::default());

    let kernel = Kernel::new(journal, planner, tool_runtime, active_memory, working_memory);

    let policy = if args.yes {
        PolicyProfile {
            allowed_paths: vec!["**".into()],
            allowed_endpoints: vec!["**".into()],
            allowed_commands: vec!["**".into()],
            require_approval_for_writes: false,
        }
    } else {
        config.policy.clone()
    };

    let (session, snapshot) = kernel
        .run_task(
            Task::new(args.task.clone()),
            args.mode.into(),
            policy,
            config.limits.clone(),
            args.agentic,
            workspace_root.to_path_buf(),
            tokio_util::sync::CancellationToken::new(),
        )
        .await
        .context("running task")?;

    println!("session {} finished as {:?}", session.session_id, session.status);
    println!(
        "steps: {}/{} completed, {} failed",
        snapshot.completed_steps, snapshot.total_steps, snapshot.failed_steps
    );
    for title in &snapshot.step_titles {
        println!("  - {title}");
    }

    Ok(())
}
