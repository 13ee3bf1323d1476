//! Active Memory — cross-session lesson store.
//!
//! At session start the Kernel queries Active Memory with
//! `(task.text, tools-in-catalog)` and passes the top hits to the planner;
//! at session end it synthesizes a [`Lesson`] from the final plan, step
//! outcomes, and terminal status, and appends it. Persisted as
//! line-delimited JSON, one lesson per line, in the same line-delimited
//! style as the Journal.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use axiom_core::{LessonId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::KernelResult;

/// Terminal outcome a lesson was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonOutcome {
    Succeeded,
    Failed,
    Aborted,
}

/// A post-mortem summary extracted at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: LessonId,
    pub task_summary: String,
    pub outcome: LessonOutcome,
    pub lesson: String,
    pub tool_names: Vec<String>,
    pub session_id: SessionId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub relevance_count: u64,
    #[serde(default)]
    pub last_retrieved_at: Option<Timestamp>,
}

impl Lesson {
    #[must_use]
    pub fn new(
        task_summary: impl Into<String>,
        outcome: LessonOutcome,
        lesson: impl Into<String>,
        tool_names: Vec<String>,
        session_id: SessionId,
    ) -> Self {
        Self {
            lesson_id: LessonId::new(),
            task_summary: task_summary.into(),
            outcome,
            lesson: lesson.into(),
            tool_names,
            session_id,
            created_at: Timestamp::now(),
            relevance_count: 0,
            last_retrieved_at: None,
        }
    }
}

/// How aggressively eviction prunes Active Memory on load.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Maximum surviving lessons after a prune.
    pub max_lessons: usize,
    /// Lessons older than this with zero retrievals are dropped outright,
    /// regardless of `max_lessons`.
    pub retention_horizon: chrono::Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_lessons: 500,
            retention_horizon: chrono::Duration::days(90),
        }
    }
}

/// The cross-session lesson store.
pub struct ActiveMemory {
    path: Option<PathBuf>,
    policy: RetentionPolicy,
    lessons: Mutex<Vec<Lesson>>,
}

impl ActiveMemory {
    /// An in-memory store with no backing file, for tests and `mode: mock`.
    #[must_use]
    pub fn in_memory(policy: RetentionPolicy) -> Self {
        Self {
            path: None,
            policy,
            lessons: Mutex::new(Vec::new()),
        }
    }

    /// Load from a line-delimited JSON file at `path`, pruning on load.
    /// A missing file is treated as an empty store.
    pub fn load(path: impl AsRef<Path>, policy: RetentionPolicy) -> KernelResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut lessons = Vec::new();
        if path.exists() {
            let file = File::open(&path).map_err(|e| {
                axiom_audit::AuditError::AppendFailed(format!("active memory open: {e}"))
            })?;
            for line in BufReader::new(file).lines() {
                let line = line.map_err(|e| {
                    axiom_audit::AuditError::AppendFailed(format!("active memory read: {e}"))
                })?;
                if line.trim().is_empty() {
                    continue;
                }
                if let Ok(lesson) = serde_json::from_str::<Lesson>(&line) {
                    lessons.push(lesson);
                }
            }
        }
        let store = Self {
            path: Some(path),
            policy,
            lessons: Mutex::new(lessons),
        };
        store.prune_and_save()?;
        Ok(store)
    }

    /// Append a new lesson, persisting immediately if backed by a file.
    pub fn append(&self, lesson: Lesson) -> KernelResult<()> {
        {
            let mut lessons = self.lessons.lock().expect("active memory lock poisoned");
            lessons.push(lesson);
        }
        self.prune_and_save()
    }

    /// Query by keyword overlap with `task_text` plus tool-name overlap
    /// with `tool_names`, returning the top `limit` hits. Bumps
    /// `relevance_count` and `last_retrieved_at` on every returned lesson.
    pub fn retrieve(&self, task_text: &str, tool_names: &[String], limit: usize) -> Vec<Lesson> {
        let keywords = keywords_of(task_text);
        let mut lessons = self.lessons.lock().expect("active memory lock poisoned");

        let mut scored: Vec<(usize, usize)> = lessons
            .iter()
            .enumerate()
            .map(|(i, l)| (i, score(l, &keywords, tool_names)))
            .filter(|(_, score)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        let now = Timestamp::now();
        let mut hits = Vec::with_capacity(scored.len());
        for (idx, _) in scored {
            let lesson = &mut lessons[idx];
            lesson.relevance_count = lesson.relevance_count.saturating_add(1);
            lesson.last_retrieved_at = Some(now);
            hits.push(lesson.clone());
        }
        hits
    }

    /// Drop lessons past the retention horizon with zero retrievals, then
    /// cap total count at `max_lessons`, evicting lowest `relevance_count`
    /// first (oldest `created_at` breaks ties).
    fn prune(&self) {
        let mut lessons = self.lessons.lock().expect("active memory lock poisoned");
        let now = chrono::Utc::now();
        lessons.retain(|l| {
            l.relevance_count > 0
                || now.signed_duration_since(l.created_at.inner()) < self.policy.retention_horizon
        });

        if lessons.len() > self.policy.max_lessons {
            lessons.sort_by(|a, b| {
                b.relevance_count
                    .cmp(&a.relevance_count)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });
            lessons.truncate(self.policy.max_lessons);
        }
    }

    fn prune_and_save(&self) -> KernelResult<()> {
        self.prune();
        self.save()
    }

    fn save(&self) -> KernelResult<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                axiom_audit::AuditError::AppendFailed(format!("active memory mkdir: {e}"))
            })?;
        }
        let lessons = self.lessons.lock().expect("active memory lock poisoned");
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| axiom_audit::AuditError::AppendFailed(format!("active memory write: {e}")))?;
        for lesson in lessons.iter() {
            let line = serde_json::to_string(lesson).map_err(|e| {
                axiom_audit::AuditError::AppendFailed(format!("active memory serialize: {e}"))
            })?;
            writeln!(file, "{line}").map_err(|e| {
                axiom_audit::AuditError::AppendFailed(format!("active memory write: {e}"))
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.lock().expect("active memory lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn keywords_of(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| w.len() > 2)
        .collect()
}

fn score(lesson: &Lesson, keywords: &[String], tool_names: &[String]) -> usize {
    let summary_lower = lesson.task_summary.to_lowercase();
    let keyword_score = keywords.iter().filter(|k| summary_lower.contains(k.as_str())).count();
    let tool_score = lesson
        .tool_names
        .iter()
        .filter(|t| tool_names.contains(t))
        .count();
    keyword_score + tool_score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(summary: &str, tools: Vec<&str>) -> Lesson {
        Lesson::new(
            summary,
            LessonOutcome::Succeeded,
            "lesson text",
            tools.into_iter().map(String::from).collect(),
            SessionId::new(),
        )
    }

    #[test]
    fn retrieve_scores_keyword_and_tool_overlap() {
        let store = ActiveMemory::in_memory(RetentionPolicy::default());
        store.append(lesson("refactor the parser module", vec!["edit_file"])).unwrap();
        store.append(lesson("unrelated lesson about networking", vec!["bash"])).unwrap();

        let hits = store.retrieve("refactor parser", &["edit_file".to_string()], 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task_summary, "refactor the parser module");
    }

    #[test]
    fn retrieval_bumps_relevance_count() {
        let store = ActiveMemory::in_memory(RetentionPolicy::default());
        store.append(lesson("write unit tests", vec!["write_file"])).unwrap();
        let hits = store.retrieve("write tests", &[], 5);
        assert_eq!(hits[0].relevance_count, 1);
        assert!(hits[0].last_retrieved_at.is_some());
    }

    #[test]
    fn eviction_prefers_highest_relevance_then_recency() {
        let policy = RetentionPolicy {
            max_lessons: 1,
            retention_horizon: chrono::Duration::days(90),
        };
        let store = ActiveMemory::in_memory(policy);
        let mut old = lesson("old lesson about caching", vec![]);
        old.relevance_count = 1;
        let mut new = lesson("new lesson about caching", vec![]);
        new.relevance_count = 1;
        store.append(old).unwrap();
        store.append(new).unwrap();

        assert_eq!(store.len(), 1);
        let hits = store.retrieve("caching", &[], 5);
        assert_eq!(hits[0].task_summary, "new lesson about caching");
    }

    #[test]
    fn load_and_save_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessons.jsonl");
        {
            let store = ActiveMemory::load(&path, RetentionPolicy::default()).unwrap();
            store.append(lesson("persisted lesson", vec!["bash"])).unwrap();
        }
        let reloaded = ActiveMemory::load(&path, RetentionPolicy::default()).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn zero_relevance_lessons_past_horizon_are_pruned_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessons.jsonl");
        let mut stale = lesson("stale lesson", vec![]);
        stale.created_at = Timestamp(chrono::Utc::now() - chrono::Duration::days(200));
        let line = serde_json::to_string(&stale).unwrap();
        fs::write(&path, format!("{line}\n")).unwrap();
        let reloaded = ActiveMemory::load(
            &path,
            RetentionPolicy {
                max_lessons: 500,
                retention_horizon: chrono::Duration::days(90),
            },
        )
        .unwrap();
        assert!(reloaded.is_empty());
    }
}
