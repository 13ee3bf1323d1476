//! Session-level budgets and accumulated usage.

use serde::{Deserialize, Serialize};

/// Limits enforced by the Kernel after each run-loop iteration (§4.E step 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_steps: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub max_cost_usd: Option<f64>,
    pub max_tokens: Option<u64>,
    pub max_iterations: Option<u32>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: Some(50),
            max_duration_ms: Some(10 * 60 * 1000),
            max_cost_usd: Some(5.0),
            max_tokens: Some(200_000),
            max_iterations: Some(10),
        }
    }
}

/// Which limit was breached, and by how much, used to build the
/// `session.failed` reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LimitBreach {
    MaxSteps { limit: u64, actual: u64 },
    MaxDurationMs { limit: u64, actual: u64 },
    MaxCostUsd { limit: f64, actual: f64 },
    MaxTokens { limit: u64, actual: u64 },
    MaxIterations { limit: u32, actual: u32 },
}

impl std::fmt::Display for LimitBreach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitBreach::MaxSteps { limit, actual } => {
                write!(f, "max_steps breached: {actual} > {limit}")
            }
            LimitBreach::MaxDurationMs { limit, actual } => {
                write!(f, "max_duration_ms breached: {actual} > {limit}")
            }
            LimitBreach::MaxCostUsd { limit, actual } => {
                write!(f, "max_cost_usd breached: {actual} > {limit}")
            }
            LimitBreach::MaxTokens { limit, actual } => {
                write!(f, "max_tokens breached: {actual} > {limit}")
            }
            LimitBreach::MaxIterations { limit, actual } => {
                write!(f, "max_iterations breached: {actual} > {limit}")
            }
        }
    }
}

/// Aggregated usage across every planner call made within a session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
    pub steps_executed: u64,
    pub elapsed_ms: u64,
}

impl Usage {
    pub fn record_planner_call(&mut self, input_tokens: u64, output_tokens: u64, cost_usd: f64) {
        self.input_tokens = self.input_tokens.saturating_add(input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(output_tokens);
        self.cost_usd += cost_usd;
    }

    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    /// Check every configured limit, returning the first breach found.
    /// Order matches the listing in the contract: steps, duration, cost,
    /// tokens, iterations.
    #[must_use]
    pub fn check(&self, limits: &Limits, iteration: u32) -> Option<LimitBreach> {
        if let Some(max) = limits.max_steps
            && self.steps_executed > max
        {
            return Some(LimitBreach::MaxSteps {
                limit: max,
                actual: self.steps_executed,
            });
        }
        if let Some(max) = limits.max_duration_ms
            && self.elapsed_ms > max
        {
            return Some(LimitBreach::MaxDurationMs {
                limit: max,
                actual: self.elapsed_ms,
            });
        }
        if let Some(max) = limits.max_cost_usd
            && self.cost_usd > max
        {
            return Some(LimitBreach::MaxCostUsd {
                limit: max,
                actual: self.cost_usd,
            });
        }
        if let Some(max) = limits.max_tokens
            && self.total_tokens() > max
        {
            return Some(LimitBreach::MaxTokens {
                limit: max,
                actual: self.total_tokens(),
            });
        }
        if let Some(max) = limits.max_iterations
            && iteration > max
        {
            return Some(LimitBreach::MaxIterations {
                limit: max,
                actual: iteration,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_steps_breach_is_detected_first() {
        let mut usage = Usage::default();
        usage.steps_executed = 2;
        let limits = Limits {
            max_steps: Some(1),
            ..Limits::default()
        };
        let breach = usage.check(&limits, 0);
        assert!(matches!(breach, Some(LimitBreach::MaxSteps { .. })));
    }

    #[test]
    fn no_breach_when_within_every_limit() {
        let usage = Usage::default();
        let limits = Limits::default();
        assert!(usage.check(&limits, 0).is_none());
    }
}
