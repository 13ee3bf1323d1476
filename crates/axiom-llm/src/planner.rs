//! The Planner capability interface.
//!
//! Per the Design Notes, the Planner is a behavior hole plugged in at
//! Kernel construction — a small, one-method capability interface, not a
//! singleton. A concrete remote-LLM-backed implementation is explicitly
//! out of scope here ("the LLM adapter library"); this crate defines the
//! contract the Kernel calls against and a deterministic [`MockPlanner`]
//! used by tests and by `mode: mock` sessions.

use crate::error::PlannerResult;
use async_trait::async_trait;
use axiom_core::{AccumulatedContext, Plan, Task, Usage};
use serde::{Deserialize, Serialize};

/// A compact description of one registered tool, enough for the Planner
/// to reference it by name/version and understand its input/output
/// shape. Built from the Tool Registry's `getSchemasForPlanner()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    pub name: String,
    pub version: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
}

/// Options bounding one planner call.
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub planner_timeout_ms: u64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            planner_timeout_ms: 30_000,
        }
    }
}

/// `generatePlan(task, toolCatalog, accumulatedContext, options) ->
/// {plan, usage}` from the external interface.
#[derive(Debug, Clone)]
pub struct PlanResponse {
    pub plan: Plan,
    pub usage: Usage,
}

/// The Planner capability. One method; implementations are external.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Ask the planner for a plan. The Kernel wraps this call in its own
    /// `plannerTimeoutMs` deadline (§4.E step 2) regardless of whether
    /// the implementation also self-times; `options.planner_timeout_ms`
    /// is advisory context passed to cooperative implementations.
    async fn generate_plan(
        &self,
        task: &Task,
        tool_catalog: &[ToolCatalogEntry],
        accumulated_context: Option<&AccumulatedContext>,
        options: &PlannerOptions,
    ) -> PlannerResult<PlanResponse>;
}
