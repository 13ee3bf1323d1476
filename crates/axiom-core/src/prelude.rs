//! Convenience re-exports for downstream crates.

pub use crate::error::ErrorKind;
pub use crate::event::{kind, Event, EventPayload, EventType};
pub use crate::ids::{LessonId, PlanId, RequestId, ScheduleId, SessionId, StepId, TaskId};
pub use crate::limits::{LimitBreach, Limits, Usage};
pub use crate::permission::{
    ApprovalDecision, GrantConstraints, PermissionRequest, PolicyProfile, Scope, TelemetryLevel,
};
pub use crate::plan::{
    ErrorDetail, FailurePolicy, Plan, Step, StepOutcome, StepResult, StepStatus, Task, ToolRef,
};
pub use crate::session::{AccumulatedContext, RunMode, Session, SessionStatus};
pub use crate::time::Timestamp;
