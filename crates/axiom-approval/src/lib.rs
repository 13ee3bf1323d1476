//! Axiom Approval - the permission engine.
//!
//! Gates every tool invocation's required scopes behind a five-step
//! resolution order: a hard policy gate, a pre-grant set, a session
//! cache, a global cache, and finally an interactive prompt. Every
//! resolution emits `permission.requested` and `permission.granted` /
//! `permission.denied` journal events via [`axiom_audit::Journal`].
//!
//! # Example
//!
//! ```
//! use axiom_approval::{DecisionCache, PermissionEngine, ScriptedPrompter};
//! use axiom_audit::{Journal, JournalOptions};
//! use axiom_core::{ApprovalDecision, PolicyProfile, PermissionRequest, RequestId, Scope, SessionId, StepId};
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! # async fn example(path: std::path::PathBuf) {
//! let journal = Arc::new(Journal::init(path, JournalOptions::default()).unwrap());
//! let prompter = Arc::new(ScriptedPrompter::always(ApprovalDecision::AllowOnce));
//! let engine = PermissionEngine::new(
//!     PolicyProfile::default(),
//!     HashSet::new(),
//!     Arc::new(DecisionCache::new()),
//!     prompter,
//!     journal,
//! );
//!
//! let request = PermissionRequest {
//!     request_id: RequestId::new(),
//!     session_id: SessionId::new(),
//!     step_id: StepId::new(),
//!     tool_name: "read_file".to_string(),
//!     scope: Scope::new("filesystem:read:workspace"),
//! };
//! let decision = engine.check(request).await;
//! assert!(decision.is_allowed());
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod cache;
mod engine;
mod error;
mod prompter;

pub use cache::{CacheKey, DecisionCache};
pub use engine::{PermissionEngine, DEFAULT_PROMPT_TIMEOUT};
pub use error::{ApprovalError, ApprovalResult};
pub use prompter::{HangingPrompter, Prompter, ScriptedPrompter};
