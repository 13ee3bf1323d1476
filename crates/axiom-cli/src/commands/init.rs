//! `axiom init` — scaffold a workspace's `.axiom` directory.

use anyhow::{Context, Result};

use crate::workspace;

const TEMPLATE: &str = "# Axiom workspace configuration\n\
    # See the documentation for the full set of fields.\n\
    \n\
    # [policy]\n\
    # allowed_paths = [\"**\"]\n\
    # allowed_commands = []\n\
    \n\
    # [limits]\n\
    # max_steps = 50\n\
    # max_cost_usd = 5.0\n\
    \n\
    # [scheduler]\n\
    # tick_interval_ms = 60000\n";

/// Initialize `workspace_root` as an Axiom workspace.
///
/// # Errors
///
/// Returns an error if the `.axiom` directory or its config template
/// cannot be created.
pub fn run(workspace_root: &std::path::Path) -> Result<()> {
    let dir = workspace::axiom_dir(workspace_root);
    if dir.exists() {
        println!("workspace already initialized at {}", dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(&dir).context("creating .axiom directory")?;

    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, TEMPLATE).context("writing config template")?;

    println!("initialized workspace at {}", dir.display());
    println!("  config:  {}", config_path.display());

    Ok(())
}
