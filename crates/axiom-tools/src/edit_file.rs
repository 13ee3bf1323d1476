//! Edit-file handler — performs exact string replacements in files.

use serde_json::{json, Value};

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};

/// Real-mode handler for the `edit_file` tool.
pub struct EditFileHandler;

#[async_trait::async_trait]
impl ToolHandler for EditFileHandler {
    async fn execute(&self, input: Value, _ctx: &HandlerContext) -> Result<Value, ToolRuntimeError> {
        let file_path = input
            .get("file_path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("file_path is required".into()))?;

        let old_string = input
            .get("old_string")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("old_string is required".into()))?;

        let new_string = input
            .get("new_string")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("new_string is required".into()))?;

        let replace_all = input.get("replace_all").and_then(Value::as_bool).unwrap_or(false);

        let path = std::path::Path::new(file_path);
        if !path.exists() {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "path not found: {file_path}"
            )));
        }

        let content = tokio::fs::read_to_string(path).await?;
        let count = content.matches(old_string).count();

        if count == 0 {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "old_string not found in {file_path}"
            )));
        }

        if count > 1 && !replace_all {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "old_string found {count} times in {file_path} — use replace_all or provide more context to make it unique"
            )));
        }

        let new_content = if replace_all {
            content.replace(old_string, new_string)
        } else {
            content.replacen(old_string, new_string, 1)
        };

        tokio::fs::write(path, &new_content).await?;

        Ok(json!({"replacements": count}))
    }
}
