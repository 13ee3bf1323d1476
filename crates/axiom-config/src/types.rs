//! Configuration types for the Axiom runtime.
//!
//! Every struct implements [`Default`] with sensible production defaults so
//! that a bare `[section]` header in TOML produces a working configuration.

use std::path::PathBuf;

use axiom_core::{Limits, PolicyProfile};
use serde::{Deserialize, Serialize};

/// Root configuration for the Axiom runtime: the static knobs the core
/// subsystems need at startup. Loaded from layered TOML files (system, user,
/// workspace) with environment variable fallbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxiomConfig {
    /// Default policy profile attached to a session when the caller doesn't
    /// supply one.
    pub policy: PolicyProfile,
    /// Default session limits.
    pub limits: Limits,
    /// Journal storage settings.
    pub journal: JournalSection,
    /// Scheduler tuning.
    pub scheduler: SchedulerSection,
    /// Active Memory storage and retention settings.
    pub memory: MemorySection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// JournalSection
// ---------------------------------------------------------------------------

/// Journal storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSection {
    /// Path to the append-only journal file.
    pub path: PathBuf,
    /// Call `fsync` after every append.
    pub fsync_every_append: bool,
}

impl Default for JournalSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".axiom/journal.jsonl"),
            fsync_every_append: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SchedulerSection
// ---------------------------------------------------------------------------

/// Scheduler tick loop and missed-run policy tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    /// Interval between tick scans, in milliseconds.
    pub tick_interval_ms: u64,
    /// How far past `next_run_at` a schedule can drift before it's
    /// considered missed and the `missed_policy` applies.
    pub missed_grace_period_ms: u64,
    /// Maximum number of due jobs executed concurrently.
    pub max_concurrent_jobs: usize,
    /// Safety cap on how many occurrences `catchup_all` will fire for a
    /// single missed window.
    pub max_catchup_runs: u32,
    /// Path to the line-delimited schedule store.
    pub store_path: PathBuf,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 60_000,
            missed_grace_period_ms: 5 * 60 * 1000,
            max_concurrent_jobs: 5,
            max_catchup_runs: 100,
            store_path: PathBuf::from(".axiom/schedules.jsonl"),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySection
// ---------------------------------------------------------------------------

/// Active Memory storage and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    /// Path to the lesson store. `None` keeps lessons in memory only.
    pub path: Option<PathBuf>,
    /// Maximum surviving lessons after a prune.
    pub max_lessons: usize,
    /// Lessons older than this many days with zero retrievals are dropped
    /// outright, regardless of `max_lessons`.
    pub retention_horizon_days: i64,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            path: None,
            max_lessons: 500,
            retention_horizon_days: 180,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"` (human-friendly), `"compact"` (one-line),
    /// or `"json"` (structured).
    pub format: String,
    /// Per-crate tracing directives (e.g. `["axiom_tools=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
