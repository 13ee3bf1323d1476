//! `axiom schedule` — CRUD against the durable schedule store, plus
//! one-shot `tick` and a foreground `start` loop.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axiom_core::{PolicyProfile, RunMode, ScheduleId, Task};
use axiom_runtime::{ActiveMemory, Kernel, RetentionPolicy, WorkingMemory};
use axiom_scheduler::{
    Schedule, ScheduleAction, Scheduler, SchedulerConfig, SessionFactory, SessionHandle, Trigger,
};
use clap::Subcommand;

use crate::workspace;

/// Schedule subcommands.
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Create a new schedule that fires every `interval` (e.g. `30s`, `5m`, `1h`).
    Every {
        /// Schedule name.
        name: String,
        /// Interval literal (`<N><s|m|h|d>`).
        interval: String,
        /// Task text to hand to the session factory when the schedule fires.
        #[arg(long)]
        task: String,
    },
    /// List all schedules.
    List,
    /// Pause a schedule.
    Pause {
        /// Schedule id.
        id: String,
    },
    /// Resume a paused schedule.
    Resume {
        /// Schedule id.
        id: String,
    },
    /// Delete a schedule.
    Delete {
        /// Schedule id.
        id: String,
    },
    /// Evaluate due schedules once and exit.
    Tick,
    /// Run the tick loop in the foreground until interrupted.
    Start,
}

/// A [`SessionFactory`] that drives a mock-mode Kernel run per fired
/// schedule. There is no live planner adapter wired into this binary, so
/// every scheduled session runs against an empty plan — enough to exercise
/// session bookkeeping and journal events on a timer.
struct KernelSessionFactory {
    journal: Arc<axiom_audit::Journal>,
    tool_runtime: Arc<axiom_tools::ToolRuntime>,
    active_memory: Arc<ActiveMemory>,
    workspace_root: std::path::PathBuf,
}

#[async_trait::async_trait]
impl SessionFactory for KernelSessionFactory {
    async fn create_session(&self, task_text: &str) -> SessionHandle {
        let planner: Arc<dyn axiom_llm::Planner> =
            Arc::new(axiom_llm::MockPlanner::once(axiom_llm::mock_empty_plan(task_text)));
        let kernel = Kernel::new(
            self.journal.clone(),
            planner,
            self.tool_runtime.clone(),
            self.active_memory.clone(),
            Arc::new(WorkingMemory::default()),
        );

        match kernel
            .run_task(
                Task::new(task_text),
                RunMode::Mock,
                PolicyProfile::default(),
                axiom_core::Limits::default(),
                false,
                self.workspace_root.clone(),
                tokio_util::sync::CancellationToken::new(),
            )
            .await
        {
            Ok((session, _snapshot)) => {
                SessionHandle { session_id: session.session_id, status: format!("{:?}", session.status) }
            },
            Err(e) => {
                tracing::warn!(error = %e, "scheduled session failed");
                SessionHandle { session_id: axiom_core::SessionId::new(), status: "failed".into() }
            },
        }
    }
}

async fn scheduler_for(
    workspace_root: &std::path::Path,
    config: &axiom_config::AxiomConfig,
) -> Result<(Arc<axiom_scheduler::ScheduleStore>, Arc<Scheduler>)> {
    std::fs::create_dir_all(workspace::axiom_dir(workspace_root)).context("creating .axiom directory")?;

    let store = Arc::new(
        axiom_scheduler::ScheduleStore::load(workspace::schedule_store_path(workspace_root))
            .context("loading schedule store")?,
    );

    let journal = Arc::new(
        axiom_audit::Journal::init(
            workspace::journal_path(workspace_root),
            axiom_audit::JournalOptions { fsync_every_append: config.journal.fsync_every_append },
        )
        .context("opening journal")?,
    );

    let mut registry = axiom_tools::ToolRegistry::new();
    for manifest in axiom_tools::default_manifests() {
        registry.register(manifest);
    }
    let permission_engine = Arc::new(axiom_approval::PermissionEngine::new(
        PolicyProfile::default(),
        std::collections::HashSet::new(),
        Arc::new(axiom_approval::DecisionCache::new()),
        Arc::new(crate::prompter::AutoPrompter::deny()),
        journal.clone(),
    ));
    let mut tool_runtime = axiom_tools::ToolRuntime::new(registry, permission_engine, journal.clone());
    axiom_tools::register_builtin_handlers(&mut tool_runtime);
    let tool_runtime = Arc::new(tool_runtime);

    let active_memory = Arc::new(ActiveMemory::in_memory(RetentionPolicy::default()));

    let session_factory = Arc::new(KernelSessionFactory {
        journal: journal.clone(),
        tool_runtime,
        active_memory,
        workspace_root: workspace_root.to_path_buf(),
    });

    let scheduler_config = SchedulerConfig {
        tick_interval: std::time::Duration::from_millis(config.scheduler.tick_interval_ms),
        missed_grace_period_ms: config.scheduler.missed_grace_period_ms,
        max_concurrent_jobs: config.scheduler.max_concurrent_jobs,
        max_catchup_runs: config.scheduler.max_catchup_runs,
    };

    let scheduler = Arc::new(Scheduler::new(store.clone(), journal, session_factory, scheduler_config));
    Ok((store, scheduler))
}

/// Dispatch a schedule subcommand.
///
/// # Errors
///
/// Returns an error if the store, journal, or scheduler cannot be opened,
/// or the requested schedule id doesn't parse or doesn't exist.
pub async fn dispatch(
    workspace_root: &std::path::Path,
    config: &axiom_config::AxiomConfig,
    command: ScheduleCommands,
) -> Result<()> {
    let (_store, scheduler) = scheduler_for(workspace_root, config).await?;

    match command {
        ScheduleCommands::Every { name, interval, task } => {
            let interval_ms = axiom_scheduler::model::parse_every(&interval)
                .map_err(|e| anyhow::anyhow!(e))
                .context("parsing interval")?;
            let schedule = Schedule::new(
                name,
                Trigger::Every { interval_ms },
                ScheduleAction::CreateSession { task_text: task },
            );
            let id = scheduler.create_schedule(schedule).await.context("creating schedule")?;
            println!("created schedule {id}");
        },
        ScheduleCommands::List => {
            for schedule in scheduler.list_schedules().await {
                println!(
                    "{}  {:<20}  {:?}  next_run_at={:?}",
                    schedule.schedule_id, schedule.name, schedule.status, schedule.next_run_at
                );
            }
        },
        ScheduleCommands::Pause { id } => {
            let id = parse_schedule_id(&id)?;
            scheduler.pause_schedule(id).await.context("pausing schedule")?;
            println!("paused {id}");
        },
        ScheduleCommands::Resume { id } => {
            let id = parse_schedule_id(&id)?;
            scheduler.resume_schedule(id).await.context("resuming schedule")?;
            println!("resumed {id}");
        },
        ScheduleCommands::Delete { id } => {
            let id = parse_schedule_id(&id)?;
            let deleted = scheduler.delete_schedule(id).await.context("deleting schedule")?;
            println!("{}", if deleted { "deleted" } else { "not found" });
        },
        ScheduleCommands::Tick => {
            scheduler.tick().await;
            println!("tick complete");
        },
        ScheduleCommands::Start => {
            println!("scheduler running, press ctrl-c to stop");
            let handle = scheduler.start().await;
            tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
            scheduler.stop();
            let _ = handle.await;
        },
    }

    Ok(())
}

fn parse_schedule_id(raw: &str) -> Result<ScheduleId> {
    ScheduleId::from_str(raw).map_err(|_| anyhow::anyhow!("invalid schedule id: {raw}"))
}
