//! Axiom Runtime - the Kernel, Task State, Working Memory, and Active
//! Memory for the Axiom agent runtime.
//!
//! This crate provides:
//! - The Kernel: a session state machine that asks a [`axiom_llm::Planner`]
//!   for a plan, dispatches each step through [`axiom_tools::ToolRuntime`],
//!   enforces session limits, and loops back into the planner in agentic
//!   mode
//! - Task State: a per-session view of plan progress and artifacts
//! - Working Memory: a bounded, ephemeral, per-session scratch space
//! - Active Memory: a cross-session lesson store the Kernel consults
//!   before planning and appends to on every terminal transition
//!
//! # Example
//!
//! ```rust,no_run
//! use axiom_runtime::Kernel;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     journal: Arc<axiom_audit::Journal>,
//! #     planner: Arc<dyn axiom_llm::Planner>,
//! #     tool_runtime: Arc<axiom_tools::ToolRuntime>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let active_memory = Arc::new(axiom_runtime::ActiveMemory::in_memory(
//!     axiom_runtime::RetentionPolicy::default(),
//! ));
//! let working_memory = Arc::new(axiom_runtime::WorkingMemory::default());
//! let kernel = Kernel::new(journal, planner, tool_runtime, active_memory, working_memory);
//! let (session, _snapshot) = kernel
//!     .run_task(
//!         axiom_core::Task::new("summarize the open issues"),
//!         axiom_core::RunMode::Mock,
//!         axiom_core::PolicyProfile::default(),
//!         axiom_core::Limits::default(),
//!         false,
//!         std::env::temp_dir(),
//!         tokio_util::sync::CancellationToken::new(),
//!     )
//!     .await?;
//! # let _ = session;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod kernel;
pub mod memory;
pub mod prelude;
pub mod retry;
pub mod task_state;
pub mod working_memory;

pub use error::{KernelError, KernelResult};
pub use kernel::Kernel;
pub use memory::{ActiveMemory, Lesson, LessonOutcome, RetentionPolicy};
pub use retry::RetryPolicy;
pub use task_state::{TaskState, TaskStateSnapshot};
pub use working_memory::{WorkingMemory, DEFAULT_MAX_ENTRIES_PER_SESSION};
