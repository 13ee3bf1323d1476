//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_approval::prelude::*;` to import all essential types.

pub use crate::{
    ApprovalError, ApprovalResult, CacheKey, DecisionCache, HangingPrompter, PermissionEngine,
    Prompter, ScriptedPrompter, DEFAULT_PROMPT_TIMEOUT,
};
