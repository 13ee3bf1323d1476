//! Bash handler — executes shell commands with a persistent working
//! directory across invocations in the same session.

use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::process::Command;

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};

/// Sentinel used to extract the post-command working directory.
const CWD_SENTINEL: &str = "__AXIOM_CWD__";

/// Real-mode handler for the `bash` tool.
pub struct BashHandler;

#[async_trait::async_trait]
impl ToolHandler for BashHandler {
    async fn execute(&self, input: Value, ctx: &HandlerContext) -> Result<Value, ToolRuntimeError> {
        let command = input
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("command is required".into()))?;

        let cwd = ctx.cwd.read().await.clone();

        let wrapped =
            format!("{command}\n__AXIOM_EXIT__=$?\necho \"{CWD_SENTINEL}\"\npwd\nexit $__AXIOM_EXIT__");

        let (stdout, stderr, exit_code) = run_bash(&wrapped, &cwd).await?;
        let (output, new_cwd) = parse_sentinel_output(&stdout);

        if let Some(new_cwd) = new_cwd {
            let mut cwd_lock = ctx.cwd.write().await;
            *cwd_lock = new_cwd;
        }

        Ok(json!({
            "stdout": output,
            "stderr": stderr,
            "exit_code": exit_code,
        }))
    }
}

async fn run_bash(command: &str, cwd: &std::path::Path) -> std::io::Result<(String, String, i32)> {
    let output = Command::new("bash")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    Ok((stdout, stderr, exit_code))
}

fn parse_sentinel_output(stdout: &str) -> (String, Option<PathBuf>) {
    if let Some(sentinel_pos) = stdout.find(CWD_SENTINEL) {
        let output = stdout[..sentinel_pos].trim_end().to_string();
        // Safety: sentinel_pos comes from find() and CWD_SENTINEL.len() is within bounds
        #[allow(clippy::arithmetic_side_effects)]
        let after_sentinel = &stdout[sentinel_pos + CWD_SENTINEL.len()..];
        let new_cwd = after_sentinel
            .lines()
            .find(|l| !l.is_empty())
            .map(|l| PathBuf::from(l.trim()));
        (output, new_cwd)
    } else {
        (stdout.to_string(), None)
    }
}
