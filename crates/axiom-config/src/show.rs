//! Rendering the fully-resolved configuration for display.

use std::fmt;

use crate::merge::FieldSources;
use crate::types::AxiomConfig;

/// A fully merged, validated configuration plus provenance metadata, as
/// returned by [`crate::Config::load`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged configuration.
    pub config: AxiomConfig,
    /// Which layer set each leaf field.
    pub field_sources: FieldSources,
    /// Config files that were actually found and merged, in load order.
    pub loaded_files: Vec<String>,
}

impl std::ops::Deref for ResolvedConfig {
    type Target = AxiomConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

/// Output format for rendering a [`ResolvedConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// One `field = value  (source)` line per leaf field.
    Toml,
    /// `serde_json`-pretty rendering of the merged config, without provenance.
    Json,
}

impl ResolvedConfig {
    /// Render this configuration in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: ShowFormat) -> Result<String, serde_json::Error> {
        match format {
            ShowFormat::Json => serde_json::to_string_pretty(&self.config),
            ShowFormat::Toml => {
                let mut sorted: Vec<_> = self.field_sources.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(b.0));
                let mut out = String::new();
                for (field, layer) in sorted {
                    use fmt::Write as _;
                    let _ = writeln!(out, "{field}  # from {layer}");
                }
                Ok(out)
            },
        }
    }
}
