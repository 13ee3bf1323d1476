//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_runtime::prelude::*;` to import all essential types.

pub use crate::{
    ActiveMemory, Kernel, KernelError, KernelResult, Lesson, LessonOutcome, RetentionPolicy,
    RetryPolicy, TaskState, TaskStateSnapshot, WorkingMemory, DEFAULT_MAX_ENTRIES_PER_SESSION,
};
