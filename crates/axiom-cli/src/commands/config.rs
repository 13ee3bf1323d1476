//! `axiom config` — inspect resolved static configuration.

use anyhow::{Context, Result};
use axiom_config::{AxiomConfig, ShowFormat};
use clap::Subcommand;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration, one field per line with its source.
    Show {
        /// Render as JSON instead of the default annotated-TOML listing.
        #[arg(long)]
        json: bool,
    },
    /// Load and validate configuration without printing it.
    Validate,
}

/// Dispatch a config subcommand.
///
/// # Errors
///
/// Returns an error if configuration fails to load or validate.
pub fn dispatch(workspace_root: &std::path::Path, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let resolved = AxiomConfig::load(Some(workspace_root)).context("loading configuration")?;
            let format = if json { ShowFormat::Json } else { ShowFormat::Toml };
            println!("{}", resolved.render(format).context("rendering configuration")?);
        },
        ConfigCommands::Validate => {
            AxiomConfig::load(Some(workspace_root)).context("loading configuration")?;
            println!("configuration valid");
        },
    }

    Ok(())
}
