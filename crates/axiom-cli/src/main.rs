//! Axiom CLI — thin process wiring for the agent runtime.
//!
//! The CLI loads the layered static configuration, sets up logging, and
//! dispatches into one of a handful of commands: run a task through the
//! Kernel, manage durable schedules, inspect the journal, and show the
//! resolved configuration. Terminal rendering is intentionally plain —
//! this binary is wiring, not a dashboard.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod commands;
mod prompter;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Axiom — deterministic agent runtime.
#[derive(Parser)]
#[command(name = "axiom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace root. Defaults to the current directory.
    #[arg(short, long, global = true)]
    workspace: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task to completion and print the terminal session state.
    Run(commands::run::RunArgs),

    /// Manage durable time-triggered schedules.
    Schedule {
        #[command(subcommand)]
        command: commands::schedule::ScheduleCommands,
    },

    /// Inspect the journal.
    Audit {
        #[command(subcommand)]
        command: commands::audit::AuditCommands,
    },

    /// Inspect static configuration.
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Scaffold a workspace's `.axiom` directory.
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let workspace_root = cli
        .workspace
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let resolved = axiom_config::AxiomConfig::load(Some(&workspace_root)).ok();
    let level = if cli.verbose {
        "debug"
    } else {
        resolved.as_ref().map_or("info", |r| r.logging.level.as_str())
    };
    let log_config = axiom_telemetry::LogConfig::new(level);
    if let Err(e) = axiom_telemetry::setup_logging(&log_config) {
        eprintln!("failed to initialize logging: {e}");
    }

    let config = resolved.map(|r| r.config).unwrap_or_default();

    match cli.command {
        Commands::Run(args) => commands::run::run(&workspace_root, &config, args).await,
        Commands::Schedule { command } => {
            commands::schedule::dispatch(&workspace_root, &config, command).await
        },
        Commands::Audit { command } => commands::audit::dispatch(&workspace_root, &config, command),
        Commands::Config { command } => commands::config::dispatch(&workspace_root, command),
        Commands::Init => commands::init::run(&workspace_root),
    }
}
