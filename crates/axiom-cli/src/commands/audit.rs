//! `axiom audit` — inspect and verify the journal.

use std::str::FromStr;

use anyhow::{Context, Result};
use axiom_core::SessionId;
use clap::Subcommand;

use crate::workspace;

/// Audit subcommands.
#[derive(Subcommand)]
pub enum AuditCommands {
    /// Recompute the hash chain and report whether it's intact.
    Verify,
    /// Print every event in the journal, in order.
    Show,
    /// Print events belonging to one session.
    Session {
        /// Session id.
        id: String,
    },
}

/// Dispatch an audit subcommand.
///
/// # Errors
///
/// Returns an error if the journal cannot be opened or read.
pub fn dispatch(
    workspace_root: &std::path::Path,
    config: &axiom_config::AxiomConfig,
    command: AuditCommands,
) -> Result<()> {
    let journal = axiom_audit::Journal::init(
        workspace::journal_path(workspace_root),
        axiom_audit::JournalOptions { fsync_every_append: config.journal.fsync_every_append },
    )
    .context("opening journal")?;

    match command {
        AuditCommands::Verify => {
            let report = journal.verify_integrity().context("verifying journal")?;
            if report.valid {
                println!("journal intact");
            } else {
                println!("journal CORRUPT at seq {:?}", report.broken_at);
                std::process::exit(1);
            }
        },
        AuditCommands::Show => {
            for event in journal.read_all().context("reading journal")? {
                print_event(&event);
            }
        },
        AuditCommands::Session { id } => {
            let session_id = SessionId::from_str(&id)
                .map_err(|_| anyhow::anyhow!("invalid session id: {id}"))?;
            for event in journal.read_session(&session_id).context("reading session")? {
                print_event(&event);
            }
        },
    }

    Ok(())
}

fn print_event(event: &axiom_core::Event) {
    println!(
        "{:>6}  {}  {}  {}",
        event.seq,
        event.session_id,
        event.event_type.as_str(),
        serde_json::to_string(&event.payload).unwrap_or_default()
    );
}
