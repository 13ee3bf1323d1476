//! Terminal prompter — asks the operator at the keyboard to approve or deny
//! a permission request.

use std::io::{self, Write};

use async_trait::async_trait;
use axiom_core::{ApprovalDecision, PermissionRequest};

/// Prompts on stdin/stdout. A blank line or unrecognized input denies.
pub struct TerminalPrompter;

#[async_trait]
impl axiom_approval::Prompter for TerminalPrompter {
    async fn prompt(&self, request: &PermissionRequest) -> ApprovalDecision {
        let tool_name = request.tool_name.clone();
        let scope = request.scope.to_string();
        tokio::task::spawn_blocking(move || prompt_blocking(&tool_name, &scope))
            .await
            .unwrap_or(ApprovalDecision::Deny)
    }
}

fn prompt_blocking(tool_name: &str, scope: &str) -> ApprovalDecision {
    print!(
        "\n{tool_name} wants scope '{scope}'. Allow [o]nce / [s]ession / [a]lways / [d]eny? "
    );
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return ApprovalDecision::Deny;
    }

    match line.trim().to_lowercase().as_str() {
        "o" | "once" => ApprovalDecision::AllowOnce,
        "s" | "session" => ApprovalDecision::AllowSession,
        "a" | "always" => ApprovalDecision::AllowAlways,
        _ => ApprovalDecision::Deny,
    }
}

/// A prompter that never asks: every request resolves immediately, either
/// always allowing or always denying. Used for `--yes`/non-interactive runs.
pub struct AutoPrompter {
    decision: ApprovalDecision,
}

impl AutoPrompter {
    /// Auto-allow every request for the lifetime of the session.
    #[must_use]
    pub fn allow() -> Self {
        Self { decision: ApprovalDecision::AllowSession }
    }

    /// Auto-deny every request.
    #[must_use]
    pub fn deny() -> Self {
        Self { decision: ApprovalDecision::Deny }
    }
}

#[async_trait]
impl axiom_approval::Prompter for AutoPrompter {
    async fn prompt(&self, _request: &PermissionRequest) -> ApprovalDecision {
        self.decision.clone()
    }
}
