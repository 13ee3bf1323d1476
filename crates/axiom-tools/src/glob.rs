//! Glob handler — finds files matching a glob pattern.

use std::path::PathBuf;
use std::time::SystemTime;

use serde_json::{json, Value};
use walkdir::WalkDir;

use crate::error::ToolRuntimeError;
use crate::handler::{HandlerContext, ToolHandler};

/// Real-mode handler for the `glob` tool.
pub struct GlobHandler;

#[async_trait::async_trait]
impl ToolHandler for GlobHandler {
    async fn execute(&self, input: Value, ctx: &HandlerContext) -> Result<Value, ToolRuntimeError> {
        let pattern = input
            .get("pattern")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolRuntimeError::InvalidInput("pattern is required".into()))?;

        let search_dir = input
            .get("path")
            .and_then(Value::as_str)
            .map_or_else(|| ctx.workspace_root.clone(), PathBuf::from);

        if !search_dir.exists() {
            return Err(ToolRuntimeError::HandlerFailed(format!(
                "path not found: {}",
                search_dir.display()
            )));
        }

        let search_dir = search_dir.canonicalize()?;

        let glob = globset::GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| ToolRuntimeError::InvalidInput(format!("invalid glob pattern: {e}")))?
            .compile_matcher();

        let mut matches: Vec<(PathBuf, SystemTime)> = Vec::new();

        for entry in WalkDir::new(&search_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                e.file_name().to_str().is_none_or(|s| !s.starts_with('.'))
            })
        {
            let Ok(entry) = entry else { continue };
            if entry.file_type().is_dir() {
                continue;
            }

            let rel_path = entry.path().strip_prefix(&search_dir).unwrap_or(entry.path());
            if glob.is_match(rel_path) {
                let mtime = entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                matches.push((entry.path().to_path_buf(), mtime));
            }
        }

        matches.sort_by(|a, b| b.1.cmp(&a.1));

        let paths: Vec<String> = matches
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect();

        Ok(json!({"matches": paths, "count": paths.len()}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx_with_root(root: &std::path::Path) -> HandlerContext {
        HandlerContext::new(root.to_path_buf())
    }

    #[tokio::test]
    async fn matches_simple_pattern() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn main(){}").unwrap();
        std::fs::write(dir.path().join("b.rs"), "fn test(){}").unwrap();
        std::fs::write(dir.path().join("c.txt"), "hello").unwrap();

        let result = GlobHandler
            .execute(json!({"pattern": "*.rs"}), &ctx_with_root(dir.path()))
            .await
            .unwrap();

        assert_eq!(result["count"], 2);
        let matches = result["matches"].as_array().unwrap();
        assert!(matches.iter().any(|m| m.as_str().unwrap().ends_with("a.rs")));
    }

    #[tokio::test]
    async fn matches_recursively() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src").join("sub")).unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/sub/lib.rs"), "").unwrap();

        let result = GlobHandler
            .execute(json!({"pattern": "**/*.rs"}), &ctx_with_root(dir.path()))
            .await
            .unwrap();

        assert_eq!(result["count"], 2);
    }

    #[tokio::test]
    async fn no_matches_returns_empty_list() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let result = GlobHandler
            .execute(json!({"pattern": "*.rs"}), &ctx_with_root(dir.path()))
            .await
            .unwrap();

        assert_eq!(result["count"], 0);
    }

    #[tokio::test]
    async fn invalid_pattern_is_rejected() {
        let result = GlobHandler
            .execute(json!({"pattern": "[invalid"}), &ctx_with_root(&std::env::temp_dir()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn hidden_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/config"), "").unwrap();
        std::fs::write(dir.path().join("visible.rs"), "").unwrap();

        let result = GlobHandler
            .execute(json!({"pattern": "**/*"}), &ctx_with_root(dir.path()))
            .await
            .unwrap();

        let matches = result["matches"].as_array().unwrap();
        assert!(matches.iter().any(|m| m.as_str().unwrap().ends_with("visible.rs")));
        assert!(!matches.iter().any(|m| m.as_str().unwrap().contains(".git")));
    }
}
