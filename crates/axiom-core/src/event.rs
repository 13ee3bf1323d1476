//! The journal event envelope and event-type taxonomy.
//!
//! An [`Event`] is the immutable unit the Journal appends. `payload` is
//! modeled as a tagged sum keyed by `event.type`, with a permissive `Raw`
//! variant retained for forward-compatible payloads the core doesn't know
//! the shape of yet.

use crate::ids::{LessonId, PlanId, ScheduleId, SessionId, StepId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable, hash-chained journal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub session_id: SessionId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
    pub prev_hash: String,
    pub hash: String,
}

/// Namespaced event type strings, e.g. `session.started`, `step.succeeded`.
///
/// Kept as a string newtype (not a closed enum) because the taxonomy in
/// the external interface is explicitly "partial, implementer must cover
/// all" — new namespaces can be added without changing the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(pub String);

impl EventType {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Well-known event type names from the external interface's taxonomy.
/// Grouped by namespace for discoverability; any of these can be built
/// with [`EventType::new`] as well.
pub mod kind {
    macro_rules! event_kinds {
        ($($name:ident => $value:literal),+ $(,)?) => {
            $(pub const $name: &str = $value;)+
        };
    }

    event_kinds! {
        SESSION_CREATED => "session.created",
        SESSION_STARTED => "session.started",
        SESSION_COMPLETED => "session.completed",
        SESSION_FAILED => "session.failed",
        SESSION_ABORTED => "session.aborted",
        SESSION_CHECKPOINT => "session.checkpoint",

        PLANNER_REQUESTED => "planner.requested",
        PLANNER_PLAN_RECEIVED => "planner.plan_received",

        PLAN_ACCEPTED => "plan.accepted",
        PLAN_REPLACED => "plan.replaced",

        STEP_STARTED => "step.started",
        STEP_SUCCEEDED => "step.succeeded",
        STEP_FAILED => "step.failed",

        TOOL_STARTED => "tool.started",
        TOOL_SUCCEEDED => "tool.succeeded",
        TOOL_FAILED => "tool.failed",

        PERMISSION_REQUESTED => "permission.requested",
        PERMISSION_GRANTED => "permission.granted",
        PERMISSION_DENIED => "permission.denied",

        USAGE_RECORDED => "usage.recorded",

        MEMORY_LESSON_EXTRACTED => "memory.lesson_extracted",

        SCHEDULER_STARTED => "scheduler.started",
        SCHEDULER_STOPPED => "scheduler.stopped",
        SCHEDULER_SCHEDULE_CREATED => "scheduler.schedule_created",
        SCHEDULER_SCHEDULE_UPDATED => "scheduler.schedule_updated",
        SCHEDULER_SCHEDULE_DELETED => "scheduler.schedule_deleted",
        SCHEDULER_JOB_TRIGGERED => "scheduler.job_triggered",
        SCHEDULER_JOB_COMPLETED => "scheduler.job_completed",
        SCHEDULER_JOB_FAILED => "scheduler.job_failed",

        CONTEXT_BUDGET_ASSESSED => "context.budget_assessed",
        CONTEXT_CHECKPOINT_TRIGGERED => "context.checkpoint_triggered",
        CONTEXT_SUMMARIZE_TRIGGERED => "context.summarize_triggered",
        CONTEXT_CHECKPOINT_SAVED => "context.checkpoint_saved",
        CONTEXT_DELEGATION_STARTED => "context.delegation_started",
        CONTEXT_DELEGATION_COMPLETED => "context.delegation_completed",
    }
}

/// Tagged payload shapes for the most common event types, with a `Raw`
/// fallback for everything else (schedule + misc events, and anything a
/// future event type introduces).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Session {
        task_id: TaskId,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    Step {
        step_id: StepId,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        attempts: Option<u32>,
    },
    Plan {
        plan_id: PlanId,
        #[serde(skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        step_count: Option<usize>,
    },
    Permission {
        request_id: crate::ids::RequestId,
        tool_name: String,
        scope: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        decision: Option<String>,
    },
    Schedule {
        schedule_id: ScheduleId,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<SessionId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Lesson {
        lesson_id: LessonId,
    },
    Raw(Value),
}

use crate::ids::TaskId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_as_a_plain_string() {
        let et = EventType::new(kind::SESSION_CREATED);
        let json = serde_json::to_string(&et).unwrap();
        assert_eq!(json, "\"session.created\"");
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, et);
    }

    #[test]
    fn raw_payload_accepts_arbitrary_shapes() {
        let payload: EventPayload =
            serde_json::from_value(serde_json::json!({"anything": [1, 2, 3]})).unwrap();
        assert!(matches!(payload, EventPayload::Raw(_)));
    }
}
