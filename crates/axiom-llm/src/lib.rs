//! Axiom LLM - the Planner capability interface.
//!
//! The planning oracle is an external collaborator ("the LLM adapter
//! library" is explicitly out of scope). This crate defines only the
//! contract the Kernel calls against ([`Planner`]) and a deterministic
//! [`MockPlanner`] for tests and `mode: mock` sessions.

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod prelude;

mod error;
mod mock;
mod planner;

pub use error::{PlannerError, PlannerResult};
pub use mock::{mock_empty_plan, MockPlanner};
pub use planner::{PlanResponse, Planner, PlannerOptions, ToolCatalogEntry};
