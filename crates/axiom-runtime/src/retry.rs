//! Exponential backoff with jitter for the Kernel's step-retry loop.
//!
//! Only a fixed **transient** error taxonomy is retried (network resets,
//! 5xx, 429, timeouts — see [`axiom_core::ErrorKind::Transient`]);
//! validation and permission errors never retry regardless of
//! `max_retries`.

use std::time::Duration;

use rand::Rng;

/// Backoff schedule applied between retry attempts of a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry (attempt 1).
    pub initial_delay: Duration,
    /// Ceiling the exponential growth is capped at.
    pub max_delay: Duration,
    /// Growth factor applied per additional attempt.
    pub exponential_base: f64,
    /// Jitter fraction in `[0.0, 1.0]`; 0 disables jitter.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry attempt `attempt` (1-indexed; `attempt == 0` is
    /// the initial try and always returns zero).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let base_delay_ms = self.initial_delay.as_millis() as f64 * self.exponential_base.powi(exponent);
        let capped_ms = base_delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms.max(0.0) as u64)
    }

    /// Delay for `attempt`, jittered by a random draw from `rand::thread_rng`.
    ///
    /// Range is `[delay * (1 - jitter_factor), delay * (1 + jitter_factor)]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn jittered_delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.delay_for_attempt(attempt);
        if self.jitter_factor <= 0.0 || base.is_zero() {
            return base;
        }
        let random_factor: f64 = rand::thread_rng().gen_range(0.0..=1.0);
        let multiplier = 1.0 - self.jitter_factor + (2.0 * self.jitter_factor * random_factor);
        let jittered_ms = base.as_millis() as f64 * multiplier;
        Duration::from_millis(jittered_ms.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attempt_has_no_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
    }

    #[test]
    fn delay_grows_exponentially_then_caps() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            exponential_base: 2.0,
            jitter_factor: 0.0,
        };
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_configured_band() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
            jitter_factor: 0.25,
        };
        let base = policy.delay_for_attempt(1).as_millis();
        for _ in 0..50 {
            let jittered = policy.jittered_delay_for_attempt(1).as_millis();
            assert!(jittered >= (base * 3 / 4) && jittered <= (base * 5 / 4));
        }
    }

    #[test]
    fn zero_jitter_factor_is_deterministic() {
        let policy = RetryPolicy {
            jitter_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(
            policy.jittered_delay_for_attempt(2),
            policy.delay_for_attempt(2)
        );
    }
}
