//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_config::prelude::*;` to import all essential types.

pub use crate::{
    AxiomConfig, ConfigError, ConfigResult, JournalSection, LoggingSection, MemorySection,
    ResolvedConfig, SchedulerSection, ShowFormat,
};
