//! The executable side of a tool: the async function bound to a manifest
//! name via [`crate::runtime::ToolRuntime::register_handler`].

use std::path::PathBuf;
use std::sync::Arc;

use axiom_core::GrantConstraints;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::ToolRuntimeResult;

/// Context passed to a handler's real-mode execution.
pub struct HandlerContext {
    /// Workspace root directory.
    pub workspace_root: PathBuf,
    /// Current working directory, persisted across invocations within a
    /// session (e.g. `bash`'s `cd`).
    pub cwd: Arc<RwLock<PathBuf>>,
    /// Constraints carried by an `allow_constrained` permission grant.
    pub constraints: GrantConstraints,
}

impl HandlerContext {
    /// Build a context with its own fresh `cwd`, seeded at `workspace_root`.
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        let cwd = Arc::new(RwLock::new(workspace_root.clone()));
        Self {
            workspace_root,
            cwd,
            constraints: GrantConstraints::default(),
        }
    }

    /// Build a context that shares `cwd` with other steps in the same
    /// session.
    #[must_use]
    pub fn with_shared_cwd(workspace_root: PathBuf, cwd: Arc<RwLock<PathBuf>>) -> Self {
        Self {
            workspace_root,
            cwd,
            constraints: GrantConstraints::default(),
        }
    }
}

/// A real-mode tool executable, bound to a [`crate::manifest::ToolManifest`]
/// by name.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool against `input`, returning a JSON value that will be
    /// checked against the manifest's `output_schema`.
    async fn execute(&self, input: Value, ctx: &HandlerContext) -> ToolRuntimeResult<Value>;
}
