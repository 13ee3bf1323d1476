//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_audit::prelude::*;` to import all essential types.

pub use crate::{AuditError, AuditResult, IntegrityReport, Journal, JournalOptions, ShutdownGuard};
