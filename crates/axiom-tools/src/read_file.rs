//! Read-file handler — reads a file with line numbers (cat -n style).

use std::fmt::Write;

use serde_json::{json, Value};

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};

/// Default maximum lines to read.
const DEFAULT_LINE_LIMIT: usize = 2000;
/// Maximum line length before truncation.
const MAX_LINE_LENGTH: usize = 2000;

/// Real-mode handler for the `read_file` tool.
pub struct ReadFileHandler;

#[async_trait::async_trait]
impl ToolHandler for ReadFileHandler {
    async fn execute(&self, input: Value, _ctx: &HandlerContext) -> Result<Value, ToolRuntimeError> {
        let file_path = input
            .get("file_path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("file_path is required".into()))?;

        let offset = input
            .get("offset")
            .and_then(Value::as_u64)
            .map(|v| usize::try_from(v).unwrap_or(usize::MAX));

        let limit = input
            .get("limit")
            .and_then(Value::as_u64)
            .map_or(DEFAULT_LINE_LIMIT, |v| usize::try_from(v).unwrap_or(usize::MAX));

        let path = std::path::Path::new(file_path);
        if !path.exists() {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "path not found: {file_path}"
            )));
        }

        let raw = tokio::fs::read(path).await?;
        let check_len = raw.len().min(8192);
        if raw[..check_len].contains(&0) {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "{file_path} appears to be a binary file"
            )));
        }

        let content = String::from_utf8(raw)
            .map_err(|_| ToolRuntimeError::HandlerFailed(format!("{file_path} is not valid UTF-8")))?;

        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        let start = offset.map_or(0, |o| o.saturating_sub(1));
        let end = start.saturating_add(limit).min(total_lines);

        if start >= total_lines {
            return Ok(json!({
                "output": format!("(file has {total_lines} lines, offset {start} is past end)"),
                "truncated": false,
            }));
        }

        let mut output = String::new();
        for (idx, &line) in lines[start..end].iter().enumerate() {
            // Safety: start and idx are bounded by total_lines, +1 for 1-based display
            #[allow(clippy::arithmetic_side_effects)]
            let line_num = start + idx + 1;
            let display_line = if line.len() > MAX_LINE_LENGTH {
                &line[..MAX_LINE_LENGTH]
            } else {
                line
            };
            let _ = writeln!(output, "{line_num:>6}\t{display_line}");
        }

        let truncated = end < total_lines;
        if truncated {
            let _ = write!(
                output,
                "\n(showing lines {}-{} of {total_lines}; use offset/limit for more)",
                start.saturating_add(1),
                end
            );
        }

        Ok(json!({"output": crate::truncate::truncate_output(output), "truncated": truncated}))
    }
}
