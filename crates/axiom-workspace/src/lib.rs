//! Filesystem boundary and path-scope checking for the Axiom agent runtime.
//!
//! A [`WorkspaceBoundary`] classifies a candidate path as allowed, auto-allowed,
//! blocked, or requiring approval. The Permission Engine's hard policy gate
//! consults it before a `bash` or file-editing tool call is allowed to touch a
//! path outside the session's declared workspace root; a path that comes back
//! [`PathCheck::RequiresApproval`] is turned into an [`EscapeRequest`] and
//! routed through the normal approval flow.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod boundaries;
pub mod config;
pub mod escape;
pub mod prelude;

pub use boundaries::{PathCheck, WorkspaceBoundary};
pub use config::{AutoAllow, EscapePolicy, WorkspaceConfig, WorkspaceMode};
pub use escape::{
    EscapeDecision, EscapeFlow, EscapeHandler, EscapeOperation, EscapeRequest, EscapeState,
};
