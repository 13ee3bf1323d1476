//! Permission data model shared by the Permission Engine and Tool Runtime.

use crate::ids::{RequestId, SessionId, StepId};
use serde::{Deserialize, Serialize};

/// A canonical capability string a tool requires before it may act, e.g.
/// `filesystem:write:workspace`, `system:exec:shell`, `network:http:api`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(pub String);

impl Scope {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `:`-delimited segments of the scope, e.g. `["filesystem",
    /// "write", "workspace"]`.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.0.split(':').collect()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request from the Tool Runtime to the Permission Engine for one scope
/// required by one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub request_id: RequestId,
    pub session_id: SessionId,
    pub step_id: StepId,
    pub tool_name: String,
    pub scope: Scope,
}

/// Telemetry verbosity attached to an `allow_observed` grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryLevel {
    Summary,
    Full,
}

/// Extra constraints carried by `allow_constrained` / `allow_observed`
/// decisions into the runtime so tool handlers can enforce them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantConstraints {
    /// Free-form constraint map (e.g. `{"max_bytes": 1024}`), tool-specific.
    #[serde(default)]
    pub fields: std::collections::BTreeMap<String, serde_json::Value>,
}

/// The outcome of a permission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ApprovalDecision {
    AllowOnce,
    AllowSession,
    AllowAlways,
    Deny,
    AllowConstrained {
        scope: Scope,
        constraints: GrantConstraints,
    },
    AllowObserved {
        scope: Scope,
        telemetry_level: TelemetryLevel,
    },
}

impl ApprovalDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, ApprovalDecision::Deny)
    }

    #[must_use]
    pub fn as_event_str(&self) -> &'static str {
        match self {
            ApprovalDecision::AllowOnce => "allow_once",
            ApprovalDecision::AllowSession => "allow_session",
            ApprovalDecision::AllowAlways => "allow_always",
            ApprovalDecision::Deny => "deny",
            ApprovalDecision::AllowConstrained { .. } => "allow_constrained",
            ApprovalDecision::AllowObserved { .. } => "allow_observed",
        }
    }
}

/// Per-session policy attached at Kernel session construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyProfile {
    pub allowed_paths: Vec<String>,
    pub allowed_endpoints: Vec<String>,
    pub allowed_commands: Vec<String>,
    #[serde(default)]
    pub require_approval_for_writes: bool,
}
