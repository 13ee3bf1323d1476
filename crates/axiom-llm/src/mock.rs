//! A deterministic, scripted [`Planner`] for tests and `mode: mock`
//! sessions.

use crate::error::PlannerResult;
use crate::planner::{PlanResponse, Planner, PlannerOptions, ToolCatalogEntry};
use async_trait::async_trait;
use axiom_core::{AccumulatedContext, Plan, Task, Usage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns a fixed sequence of plans, one per call, then repeats the
/// last (typically an empty plan, signaling "done" per the Agentic mode
/// glossary entry).
pub struct MockPlanner {
    responses: Mutex<Vec<Plan>>,
    call_index: AtomicUsize,
}

impl MockPlanner {
    #[must_use]
    pub fn new(responses: Vec<Plan>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_index: AtomicUsize::new(0),
        }
    }

    /// A planner that returns a single plan then an empty plan on every
    /// subsequent call — the common "one iteration, then done" shape.
    #[must_use]
    pub fn once(plan: Plan) -> Self {
        Self::new(vec![plan])
    }

    #[must_use]
    pub fn calls_made(&self) -> usize {
        self.call_index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Planner for MockPlanner {
    async fn generate_plan(
        &self,
        task: &Task,
        _tool_catalog: &[ToolCatalogEntry],
        _accumulated_context: Option<&AccumulatedContext>,
        _options: &PlannerOptions,
    ) -> PlannerResult<PlanResponse> {
        let idx = self.call_index.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().expect("mock planner lock poisoned");
        let plan = responses.get(idx).cloned().unwrap_or_else(|| Plan {
            plan_id: axiom_core::PlanId::new(),
            schema_version: 1,
            goal: task.text.clone(),
            assumptions: vec![],
            steps: vec![],
        });
        Ok(PlanResponse {
            plan,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 10,
                cost_usd: 0.0,
                steps_executed: 0,
                elapsed_ms: 0,
            },
        })
    }
}

/// Build an empty plan with the given goal — the canonical "nothing left
/// to do" response a planner returns to end an agentic loop.
#[must_use]
pub fn mock_empty_plan(goal: impl Into<String>) -> Plan {
    Plan {
        plan_id: axiom_core::PlanId::new(),
        schema_version: 1,
        goal: goal.into(),
        assumptions: vec![],
        steps: vec![],
    }
}
