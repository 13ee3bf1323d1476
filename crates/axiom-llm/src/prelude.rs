//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_llm::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use axiom_llm::prelude::*;
//! use axiom_core::Task;
//!
//! # async fn example() -> PlannerResult<()> {
//! let planner = MockPlanner::once(mock_empty_plan("done"));
//! let task = Task::new("echo hello");
//! let response = planner
//!     .generate_plan(&task, &[], None, &PlannerOptions::default())
//!     .await?;
//! println!("plan: {:?}", response.plan);
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{PlannerError, PlannerResult};

// Planner trait and supporting types
pub use crate::{PlanResponse, Planner, PlannerOptions, ToolCatalogEntry};

// Mock planner
pub use crate::MockPlanner;
pub use crate::mock_empty_plan;
