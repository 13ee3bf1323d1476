//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_scheduler::prelude::*;` to import all essential types.

pub use crate::{
    MissedPolicy, Schedule, ScheduleAction, ScheduleStatus, Scheduler, SchedulerConfig,
    SchedulerError, SchedulerResult, SessionFactory, SessionHandle, Trigger,
};
