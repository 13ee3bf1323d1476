//! Tool manifests and the Tool Registry (§4.B).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ToolRuntimeError, ToolRuntimeResult};

/// Which dispatch modes a tool implements.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ToolSupports {
    /// Whether a real-mode handler is registered for this tool.
    #[serde(default)]
    pub real: bool,
    /// Whether `dry_run` mode returns a side-effect-free envelope.
    #[serde(default)]
    pub dry_run: bool,
    /// Whether `mock_responses` can stand in for this tool.
    #[serde(default)]
    pub mock: bool,
}

/// A tool's declared shape: schemas, required permission scopes, and which
/// dispatch modes it implements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolManifest {
    /// Unique tool name.
    pub name: String,
    /// Manifest version, surfaced to the planner.
    pub version: String,
    /// Human-readable description for the planner's tool catalog.
    pub description: String,
    /// JSON schema `step.input` is validated against.
    pub input_schema: Value,
    /// JSON schema the handler's output is validated against.
    pub output_schema: Value,
    /// Closed set of scope strings this tool requires before it may act,
    /// e.g. `filesystem:write:workspace`, `system:exec:shell`.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Which dispatch modes this tool implements.
    pub supports: ToolSupports,
    /// Deterministic responses for `mock` mode, consumed round-robin.
    #[serde(default)]
    pub mock_responses: Vec<Value>,
}

impl ToolManifest {
    /// `supports.mock` implies at least one deterministic response exists.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.supports.mock || !self.mock_responses.is_empty()
    }
}

/// Registry of tool manifests, keyed by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    manifests: BTreeMap<String, ToolManifest>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every `*.json` manifest file in `dir`, in lexicographic
    /// file-name order, and register each. Returns the number loaded.
    pub fn load_from_directory(&mut self, dir: &Path) -> ToolRuntimeResult<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(std::ffi::OsStr::to_str) == Some("json"))
            .collect();
        paths.sort();

        let mut loaded = 0usize;
        for path in paths {
            let raw = std::fs::read_to_string(&path)?;
            let manifest: ToolManifest = serde_json::from_str(&raw).map_err(|e| {
                ToolRuntimeError::InvalidInput(format!("parsing {}: {e}", path.display()))
            })?;
            if !manifest.is_well_formed() {
                return Err(ToolRuntimeError::InvalidInput(format!(
                    "{}: supports.mock requires at least one mock_responses entry",
                    manifest.name
                )));
            }
            self.register(manifest);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Register `manifest`, replacing any existing entry with the same name.
    pub fn register(&mut self, manifest: ToolManifest) {
        self.manifests.insert(manifest.name.clone(), manifest);
    }

    /// Look up a manifest by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolManifest> {
        self.manifests.get(name)
    }

    /// All registered manifests.
    #[must_use]
    pub fn list(&self) -> Vec<&ToolManifest> {
        self.manifests.values().collect()
    }

    /// A compact catalog for prompting the planner.
    #[must_use]
    pub fn schemas_for_planner(&self) -> Vec<axiom_llm::ToolCatalogEntry> {
        self.manifests
            .values()
            .map(|m| axiom_llm::ToolCatalogEntry {
                name: m.name.clone(),
                version: m.version.clone(),
                description: m.description.clone(),
                input_schema: m.input_schema.clone(),
                output_schema: m.output_schema.clone(),
            })
            .collect()
    }
}

/// Manifests for the five built-in handlers registered by
/// [`crate::register_builtin_handlers`]. No JSON manifest assets ship with
/// this crate — callers that want the built-ins available to the planner
/// register these directly, e.g. via [`ToolRegistry::register`].
#[must_use]
pub fn default_manifests() -> Vec<ToolManifest> {
    vec![
        ToolManifest {
            name: "read_file".to_string(),
            version: "1.0.0".to_string(),
            description: "Read a file from the local filesystem, with line numbers.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {"type": "string"},
                    "offset": {"type": "integer"},
                    "limit": {"type": "integer"}
                },
                "required": ["file_path"]
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "output": {"type": "string"},
                    "truncated": {"type": "boolean"}
                },
                "required": ["output"]
            }),
            permissions: vec!["filesystem:read:workspace".to_string()],
            supports: ToolSupports { real: true, dry_run: true, mock: true },
            mock_responses: vec![serde_json::json!({"output": "", "truncated": false})],
        },
        ToolManifest {
            name: "write_file".to_string(),
            version: "1.0.0".to_string(),
            description: "Write content to a file, creating parent directories as needed."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["file_path", "content"]
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {"bytes_written": {"type": "integer"}},
                "required": ["bytes_written"]
            }),
            permissions: vec!["filesystem:write:workspace".to_string()],
            supports: ToolSupports { real: true, dry_run: true, mock: true },
            mock_responses: vec![serde_json::json!({"bytes_written": 0})],
        },
        ToolManifest {
            name: "edit_file".to_string(),
            version: "1.0.0".to_string(),
            description: "Replace an exact string occurrence within a file.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": {"type": "string"},
                    "old_string": {"type": "string"},
                    "new_string": {"type": "string"},
                    "replace_all": {"type": "boolean"}
                },
                "required": ["file_path", "old_string", "new_string"]
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {"replacements": {"type": "integer"}},
                "required": ["replacements"]
            }),
            permissions: vec!["filesystem:write:workspace".to_string()],
            supports: ToolSupports { real: true, dry_run: true, mock: true },
            mock_responses: vec![serde_json::json!({"replacements": 0})],
        },
        ToolManifest {
            name: "glob".to_string(),
            version: "1.0.0".to_string(),
            description: "Find files matching a glob pattern, sorted by modification time."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "pattern": {"type": "string"},
                    "path": {"type": "string"}
                },
                "required": ["pattern"]
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {"matches": {"type": "array", "items": {"type": "string"}}},
                "required": ["matches"]
            }),
            permissions: vec!["filesystem:read:workspace".to_string()],
            supports: ToolSupports { real: true, dry_run: true, mock: true },
            mock_responses: vec![serde_json::json!({"matches": []})],
        },
        ToolManifest {
            name: "bash".to_string(),
            version: "1.0.0".to_string(),
            description: "Execute a shell command with a working directory persisted across \
                calls in the same session."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"command": {"type": "string"}},
                "required": ["command"]
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "stdout": {"type": "string"},
                    "stderr": {"type": "string"},
                    "exit_code": {"type": "integer"}
                },
                "required": ["stdout", "stderr", "exit_code"]
            }),
            permissions: vec!["system:exec:shell".to_string()],
            supports: ToolSupports { real: true, dry_run: false, mock: true },
            mock_responses: vec![serde_json::json!({"stdout": "", "stderr": "", "exit_code": 0})],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(name: &str) -> ToolManifest {
        ToolManifest {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: "a tool".to_string(),
            input_schema: serde_json::json!({"type": "object"}),
            output_schema: serde_json::json!({"type": "object"}),
            permissions: vec![],
            supports: ToolSupports { real: true, dry_run: true, mock: false },
            mock_responses: vec![],
        }
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(manifest("read_file"));
        let mut second = manifest("read_file");
        second.version = "2.0.0".to_string();
        registry.register(second);

        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get("read_file").unwrap().version, "2.0.0");
    }

    #[test]
    fn mock_support_without_responses_is_malformed() {
        let mut m = manifest("read_file");
        m.supports.mock = true;
        assert!(!m.is_well_formed());
        m.mock_responses.push(serde_json::json!({"ok": true}));
        assert!(m.is_well_formed());
    }

    #[test]
    fn load_from_directory_is_lexicographic_and_skips_non_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b_tool.json"),
            serde_json::to_string(&manifest("b_tool")).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a_tool.json"),
            serde_json::to_string(&manifest("a_tool")).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a manifest").unwrap();

        let mut registry = ToolRegistry::new();
        let loaded = registry.load_from_directory(dir.path()).unwrap();
        assert_eq!(loaded, 2);
        assert!(registry.get("a_tool").is_some());
        assert!(registry.get("b_tool").is_some());
    }

    #[test]
    fn schemas_for_planner_is_compact() {
        let mut registry = ToolRegistry::new();
        registry.register(manifest("read_file"));
        let catalog = registry.schemas_for_planner();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "read_file");
    }

    #[test]
    fn default_manifests_are_well_formed_and_cover_the_builtins() {
        let manifests = default_manifests();
        assert_eq!(manifests.len(), 5);
        for m in &manifests {
            assert!(m.is_well_formed(), "{} is malformed", m.name);
            assert!(m.supports.real, "{} should support real mode", m.name);
        }
        let names: Vec<&str> = manifests.iter().map(|m| m.name.as_str()).collect();
        for expected in ["read_file", "write_file", "edit_file", "glob", "bash"] {
            assert!(names.contains(&expected), "missing manifest for {expected}");
        }
    }
}
