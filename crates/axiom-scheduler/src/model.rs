//! Schedule data model: trigger kinds, missed-run policy, and the action a
//! due schedule performs.

use axiom_core::{ScheduleId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cron;

/// When a schedule fires, relative to wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Fire every `interval_ms`, anchored to the last run (or `start_at`,
    /// or schedule-creation time if neither is set).
    Every { interval_ms: u64 },
    /// Fire exactly once at `at`. After firing, the schedule completes.
    At { at: Timestamp },
    /// Fire on every instant matching a 5-field cron expression, evaluated
    /// in `timezone` (IANA name; invalid names fall back to UTC).
    Cron { expression: String, timezone: String },
}

impl Trigger {
    /// Validate trigger-specific constraints (cron syntax, interval bounds).
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Trigger::Every { interval_ms } => {
                if *interval_ms == 0 {
                    return Err("interval_ms must be positive".into());
                }
                Ok(())
            }
            Trigger::At { .. } => Ok(()),
            Trigger::Cron { expression, .. } => cron::validate(expression),
        }
    }

    /// Compute the next fire time strictly after `base`.
    ///
    /// `every` anchors to `base` directly (the caller passes
    /// `last_run_at ?? start_at ?? now`, per contract). `at` fires once,
    /// returning `None` on any call after the first (the schedule's status
    /// is what actually prevents re-firing; this is a defensive fallback).
    /// `cron` delegates to [`cron::next_after`].
    #[must_use]
    pub fn next_after(&self, base: &Timestamp) -> Option<Timestamp> {
        match self {
            Trigger::Every { interval_ms } => {
                let millis = i64::try_from(*interval_ms).ok()?;
                let duration = chrono::Duration::milliseconds(millis);
                Some(Timestamp(base.inner() + duration))
            }
            Trigger::At { at } => {
                if at.inner() > base.inner() {
                    Some(*at)
                } else {
                    None
                }
            }
            Trigger::Cron { expression, timezone } => {
                let tz = cron::parse_tz(timezone);
                cron::next_after(expression, &base.inner(), tz).map(Timestamp)
            }
        }
    }

    #[must_use]
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Trigger::At { .. })
    }
}

/// Parse a `<N><s|m|h|d>` duration literal into milliseconds, rejecting
/// overflow past `i64::MAX`.
pub fn parse_every(literal: &str) -> Result<u64, String> {
    let literal = literal.trim();
    let (digits, unit) = literal.split_at(literal.len().saturating_sub(1));
    let n: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration literal '{literal}'"))?;
    let multiplier: u64 = match unit {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        other => return Err(format!("unknown duration unit '{other}'")),
    };
    n.checked_mul(multiplier)
        .ok_or_else(|| format!("duration literal '{literal}' overflows"))
}

/// What to do when a schedule is discovered past its `next_run_at` by more
/// than `missed_grace_period_ms`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissedPolicy {
    /// Advance `next_run_at` past `now` without firing.
    Skip,
    /// Fire exactly once, then advance `next_run_at` past `now`.
    CatchupOne,
    /// Fire once per missed occurrence, bounded by a safety cap.
    CatchupAll,
}

impl Default for MissedPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

/// What a due schedule does when it fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleAction {
    /// Invoke the injected session factory with a task description; the
    /// scheduler does not await session completion.
    CreateSession { task_text: String },
    /// Append a caller-described event to the journal under this
    /// schedule's synthetic session id.
    EmitEvent { event_type: String, payload: Value },
}

/// Lifecycle status of a schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Active,
    Paused,
    Completed,
    Failed,
}

/// A persisted schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: ScheduleId,
    pub name: String,
    pub trigger: Trigger,
    pub missed_policy: MissedPolicy,
    pub action: ScheduleAction,
    pub status: ScheduleStatus,
    pub max_failures: u32,
    pub delete_after_run: bool,
    pub created_at: Timestamp,
    pub start_at: Option<Timestamp>,
    pub last_run_at: Option<Timestamp>,
    pub next_run_at: Option<Timestamp>,
    pub run_count: u64,
    pub failure_count: u32,
    pub last_error: Option<String>,
    /// Synthetic session id used to attribute `emitEvent` actions and
    /// scheduler-originated journal entries to this schedule.
    pub session_id: SessionId,
}

impl Schedule {
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: Trigger, action: ScheduleAction) -> Self {
        Self {
            schedule_id: ScheduleId::new(),
            name: name.into(),
            trigger,
            missed_policy: MissedPolicy::default(),
            action,
            status: ScheduleStatus::Active,
            max_failures: 5,
            delete_after_run: false,
            created_at: Timestamp::now(),
            start_at: None,
            last_run_at: None,
            next_run_at: None,
            run_count: 0,
            failure_count: 0,
            last_error: None,
            session_id: SessionId::new(),
        }
    }

    /// Recompute `next_run_at` if it is unset or the schedule has never
    /// had it computed — called on `start()` for stale values.
    pub fn refresh_next_run_at(&mut self) {
        if self.status != ScheduleStatus::Active {
            return;
        }
        let base = self
            .last_run_at
            .or(self.start_at)
            .unwrap_or_else(Timestamp::now);
        self.next_run_at = self.trigger.next_after(&base);
    }

    #[must_use]
    pub fn is_due(&self, now: &Timestamp) -> bool {
        self.status == ScheduleStatus::Active
            && self.next_run_at.is_some_and(|next| next.inner() <= now.inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_converts_units_to_milliseconds() {
        assert_eq!(parse_every("30s").unwrap(), 30_000);
        assert_eq!(parse_every("5m").unwrap(), 300_000);
        assert_eq!(parse_every("2h").unwrap(), 7_200_000);
        assert_eq!(parse_every("1d").unwrap(), 86_400_000);
    }

    #[test]
    fn parse_every_rejects_unknown_units() {
        assert!(parse_every("10x").is_err());
    }

    #[test]
    fn parse_every_rejects_overflow() {
        assert!(parse_every("99999999999999999d").is_err());
    }

    #[test]
    fn at_trigger_fires_once_then_returns_none() {
        let at = Timestamp::now();
        let trigger = Trigger::At { at };
        let past = Timestamp(at.inner() - chrono::Duration::seconds(1));
        assert_eq!(trigger.next_after(&past), Some(at));
        assert_eq!(trigger.next_after(&at), None);
    }

    #[test]
    fn every_trigger_anchors_to_base() {
        let base = Timestamp::now();
        let trigger = Trigger::Every { interval_ms: 60_000 };
        let next = trigger.next_after(&base).unwrap();
        assert_eq!(next.inner(), base.inner() + chrono::Duration::milliseconds(60_000));
    }

    #[test]
    fn is_due_false_when_paused() {
        let mut schedule = Schedule::new(
            "test",
            Trigger::Every { interval_ms: 1000 },
            ScheduleAction::CreateSession { task_text: "t".into() },
        );
        schedule.status = ScheduleStatus::Paused;
        schedule.next_run_at = Some(Timestamp(Timestamp::now().inner() - chrono::Duration::seconds(1)));
        assert!(!schedule.is_due(&Timestamp::now()));
    }
}
