//! Write-file handler — writes content to a file, creating parent
//! directories as needed.

use serde_json::{json, Value};

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};

/// Real-mode handler for the `write_file` tool.
pub struct WriteFileHandler;

#[async_trait::async_trait]
impl ToolHandler for WriteFileHandler {
    async fn execute(&self, input: Value, _ctx: &HandlerContext) -> Result<Value, ToolRuntimeError> {
        let file_path = input
            .get("file_path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("file_path is required".into()))?;

        let content = input
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("content is required".into()))?;

        let path = std::path::Path::new(file_path);
        if !path.is_absolute() {
            return Err(ToolRuntimeError::InvalidInput(
                "file_path must be an absolute path".into(),
            ));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, content).await?;

        Ok(json!({"bytes_written": content.len()}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx() -> HandlerContext {
        HandlerContext::new(std::env::temp_dir())
    }

    #[tokio::test]
    async fn writes_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");

        let result = WriteFileHandler
            .execute(
                json!({"file_path": path.to_str().unwrap(), "content": "hello world"}),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(result["bytes_written"], 11);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("c").join("test.txt");

        WriteFileHandler
            .execute(json!({"file_path": path.to_str().unwrap(), "content": "nested"}), &ctx())
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "nested");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "old content").unwrap();

        WriteFileHandler
            .execute(json!({"file_path": path.to_str().unwrap(), "content": "new content"}), &ctx())
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new content");
    }

    #[tokio::test]
    async fn missing_args_are_rejected() {
        let result = WriteFileHandler
            .execute(json!({"file_path": "/tmp/test.txt"}), &ctx())
            .await;
        assert!(result.is_err());

        let result = WriteFileHandler.execute(json!({"content": "hello"}), &ctx()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn relative_path_is_rejected() {
        let result = WriteFileHandler
            .execute(json!({"file_path": "relative.txt", "content": "x"}), &ctx())
            .await;
        assert!(result.is_err());
    }
}
