//! Workspace-root path helpers for the CLI's `.axiom/` layout.

use std::path::{Path, PathBuf};

/// The `.axiom` directory under a workspace root.
#[must_use]
pub fn axiom_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".axiom")
}

/// Path to the journal file inside `.axiom/`.
#[must_use]
pub fn journal_path(workspace_root: &Path) -> PathBuf {
    axiom_dir(workspace_root).join("journal.jsonl")
}

/// Path to the schedule store file inside `.axiom/`.
#[must_use]
pub fn schedule_store_path(workspace_root: &Path) -> PathBuf {
    axiom_dir(workspace_root).join("schedules.jsonl")
}

/// Path to the lesson (Active Memory) store file inside `.axiom/`.
#[must_use]
pub fn lessons_path(workspace_root: &Path) -> PathBuf {
    axiom_dir(workspace_root).join("lessons.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_nest_under_axiom_dir() {
        let root = Path::new("/workspace");
        assert_eq!(journal_path(root), Path::new("/workspace/.axiom/journal.jsonl"));
        assert_eq!(schedule_store_path(root), Path::new("/workspace/.axiom/schedules.jsonl"));
        assert_eq!(lessons_path(root), Path::new("/workspace/.axiom/lessons.jsonl"));
    }
}
