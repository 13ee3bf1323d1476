//! Axiom Core - shared data model and error taxonomy for the Axiom agent runtime.
//!
//! This crate has no behavior of its own: it is the vocabulary every other
//! crate in the workspace builds on. It provides:
//! - Newtype identifiers (`SessionId`, `TaskId`, `PlanId`, ...)
//! - The session/task/plan/step data model shared by the Kernel, Tool
//!   Runtime, and Tool Registry
//! - The permission data model shared by the Permission Engine and Tool
//!   Runtime
//! - The journal event envelope and event-type taxonomy
//! - A crate-spanning `ErrorKind` so error handling can be generic over
//!   which crate produced the error

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::arithmetic_side_effects)]

pub mod error;
pub mod event;
pub mod ids;
pub mod limits;
pub mod permission;
pub mod plan;
pub mod prelude;
pub mod session;
pub mod time;

pub use error::ErrorKind;
pub use event::{Event, EventPayload, EventType};
pub use ids::{LessonId, PlanId, RequestId, ScheduleId, SessionId, StepId, TaskId};
pub use limits::{LimitBreach, Limits, Usage};
pub use permission::{ApprovalDecision, GrantConstraints, PermissionRequest, PolicyProfile, Scope};
pub use plan::{FailurePolicy, Plan, Step, StepOutcome, StepResult, StepStatus, Task, ToolRef};
pub use session::{AccumulatedContext, RunMode, Session, SessionStatus};
pub use time::Timestamp;
