#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Static configuration loading for the Axiom agent runtime.
//!
//! This is config for the core subsystems' own knobs — default
//! [`axiom_core::PolicyProfile`], default session [`axiom_core::Limits`],
//! journal path and fsync policy, scheduler tick tuning, and Active Memory
//! retention — not a generic config-parsing framework.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axiom_config::AxiomConfig;
//!
//! let resolved = AxiomConfig::load(Some(std::path::Path::new("."))).unwrap();
//! let config = resolved.config;
//! println!("scheduler tick: {}ms", config.scheduler.tick_interval_ms);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Workspace** (`{workspace}/.axiom/config.toml`)
//! 2. **User** (`~/.axiom/config.toml`)
//! 3. **System** (`/etc/axiom/config.toml`)
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)

/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with precedence.
pub mod merge;
/// Prelude module - commonly used types for convenient import.
pub mod prelude;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::{AxiomConfig, JournalSection, LoggingSection, MemorySection, SchedulerSection};

impl AxiomConfig {
    /// Load configuration with full precedence chain.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(workspace_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(workspace_root, None)
    }

    /// Load configuration with an explicit home directory override.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        workspace_root: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(workspace_root, Some(home_dir))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
