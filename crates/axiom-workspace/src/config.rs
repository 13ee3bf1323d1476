//! Workspace boundary configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How permissive the workspace boundary is about paths outside its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Only the workspace root and explicitly auto-allowed paths are reachable;
    /// everything else falls back to the configured escape policy.
    Safe,
    /// Same boundary as `Safe`, kept distinct so a profile can be tightened or
    /// loosened without changing the escape policy itself.
    Guided,
    /// Any path not explicitly blocked is allowed.
    Autonomous,
}

/// What happens when a path falls outside the workspace and isn't auto-allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    /// Treat the path as auto-allowed.
    Allow,
    /// Treat the path as never-allowed.
    Deny,
    /// Surface the path to the Permission Engine as an approval request.
    Ask,
}

/// Paths and patterns that bypass the workspace root check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoAllow {
    /// Paths readable regardless of workspace membership.
    pub read: Vec<PathBuf>,
    /// Paths writable regardless of workspace membership.
    pub write: Vec<PathBuf>,
    /// Glob patterns matched against the canonicalized path.
    pub patterns: Vec<String>,
}

/// Configuration for a [`crate::WorkspaceBoundary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// The workspace root; paths under it are always allowed.
    pub root: PathBuf,
    /// Paths that are never allowed, regardless of mode or auto-allow rules.
    pub never_allow: Vec<PathBuf>,
    /// Paths and patterns auto-allowed outside the root.
    pub auto_allow: AutoAllow,
    /// Boundary mode.
    pub mode: WorkspaceMode,
    /// Policy applied to out-of-workspace paths in `Safe`/`Guided` mode.
    pub escape_policy: EscapePolicy,
}

impl WorkspaceConfig {
    /// Create a default configuration rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            never_allow: Vec::new(),
            auto_allow: AutoAllow::default(),
            mode: WorkspaceMode::Safe,
            escape_policy: EscapePolicy::Ask,
        }
    }

    /// Set the boundary mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WorkspaceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the escape policy.
    #[must_use]
    pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    /// Add a path that is never allowed, regardless of mode.
    #[must_use]
    pub fn never_allow(mut self, path: impl Into<PathBuf>) -> Self {
        self.never_allow.push(path.into());
        self
    }

    /// Add a path that is always readable outside the workspace.
    #[must_use]
    pub fn allow_read(mut self, path: impl Into<PathBuf>) -> Self {
        self.auto_allow.read.push(path.into());
        self
    }

    /// Add a path that is always writable outside the workspace.
    #[must_use]
    pub fn allow_write(mut self, path: impl Into<PathBuf>) -> Self {
        self.auto_allow.write.push(path.into());
        self
    }

    /// Add a glob pattern auto-allowed outside the workspace.
    #[must_use]
    pub fn allow_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.auto_allow.patterns.push(pattern.into());
        self
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
