//! Axiom Test - shared test doubles and fixtures for the Axiom runtime.
//!
//! This crate provides the mocks and fixtures that would otherwise be
//! duplicated across `axiom-runtime`, `axiom-scheduler`, and `axiom-cli`
//! test suites: deterministic data-model fixtures, a recording
//! [`SessionFactory`][sf] double, and `tempfile`-backed journal/schedule-store
//! fixtures. The deterministic `MockPlanner` and scripted `ScriptedPrompter`
//! already live in `axiom-llm` and `axiom-approval` respectively; import
//! them directly from their home crates.
//!
//! [sf]: axiom_scheduler::SessionFactory
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! axiom-test.workspace = true
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
