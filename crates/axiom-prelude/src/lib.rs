//! Unified prelude for the Axiom agent runtime.
//!
//! This crate provides a single import to bring in all commonly used types
//! from across Axiom. Use this when you need types from multiple
//! crates without managing individual imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use axiom_prelude::*;
//!
//! // Now you have access to types from:
//! // - axiom-core (ids, Timestamp, PolicyProfile, Limits)
//! // - axiom-crypto (hashing primitives)
//! // - axiom-events (event bus)
//! // - axiom-audit (the Journal)
//! // - axiom-approval (the Permission Engine)
//! // - axiom-tools (the Tool Registry and Tool Runtime)
//! // - axiom-llm (the Planner interface)
//! // - axiom-runtime (the Kernel, Task State, Working/Active Memory)
//! // - axiom-scheduler (the Scheduler)
//! // - axiom-workspace (filesystem boundaries)
//! // - axiom-config (static configuration loading)
//! // - axiom-telemetry (logging, tracing)
//! ```
//!
//! # Per-Crate Preludes
//!
//! If you only need types from specific crates, use their individual preludes:
//!
//! ```rust,ignore
//! use axiom_core::prelude::*;
//! use axiom_runtime::prelude::*;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Re-export all crate preludes
pub use axiom_approval::prelude::*;
pub use axiom_audit::prelude::*;
pub use axiom_config::prelude::*;
pub use axiom_core::prelude::*;
pub use axiom_crypto::prelude::*;
pub use axiom_events::prelude::*;
pub use axiom_llm::prelude::*;
pub use axiom_runtime::prelude::*;
pub use axiom_scheduler::prelude::*;
pub use axiom_telemetry::prelude::*;
pub use axiom_tools::prelude::*;
pub use axiom_workspace::prelude::*;
