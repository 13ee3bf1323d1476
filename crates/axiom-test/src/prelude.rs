//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_test::prelude::*;` to import all essential fixtures and
//! mocks.

pub use crate::fixtures::{
    permissive_policy, restrictive_policy, test_empty_plan, test_plan, test_session, test_step,
    test_task, test_task_id,
};
pub use crate::mocks::{
    HangingSessionFactory, RecordingSessionFactory, TempJournal, TempScheduleStore,
};
