//! Post-merge configuration validation.
//!
//! Validates that a deserialized [`AxiomConfig`] is within acceptable ranges
//! and that cross-field invariants hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::AxiomConfig;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &AxiomConfig) -> ConfigResult<()> {
    validate_limits(config)?;
    validate_scheduler(config)?;
    validate_memory(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_limits(config: &AxiomConfig) -> ConfigResult<()> {
    if let Some(cost) = config.limits.max_cost_usd
        && (!cost.is_finite() || cost <= 0.0)
    {
        return Err(ConfigError::ValidationError {
            field: "limits.max_cost_usd".to_owned(),
            message: "max_cost_usd must be a finite positive number".to_owned(),
        });
    }

    if config.limits.max_steps == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "limits.max_steps".to_owned(),
            message: "max_steps must be greater than 0".to_owned(),
        });
    }

    Ok(())
}

fn validate_scheduler(config: &AxiomConfig) -> ConfigResult<()> {
    let s = &config.scheduler;

    if s.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "scheduler.tick_interval_ms".to_owned(),
            message: "tick_interval_ms must be greater than 0".to_owned(),
        });
    }

    if s.max_concurrent_jobs == 0 {
        return Err(ConfigError::ValidationError {
            field: "scheduler.max_concurrent_jobs".to_owned(),
            message: "max_concurrent_jobs must be greater than 0".to_owned(),
        });
    }

    if s.max_catchup_runs == 0 {
        return Err(ConfigError::ValidationError {
            field: "scheduler.max_catchup_runs".to_owned(),
            message: "max_catchup_runs must be greater than 0".to_owned(),
        });
    }

    Ok(())
}

fn validate_memory(config: &AxiomConfig) -> ConfigResult<()> {
    if config.memory.max_lessons == 0 {
        return Err(ConfigError::ValidationError {
            field: "memory.max_lessons".to_owned(),
            message: "max_lessons must be greater than 0".to_owned(),
        });
    }

    if config.memory.retention_horizon_days <= 0 {
        return Err(ConfigError::ValidationError {
            field: "memory.retention_horizon_days".to_owned(),
            message: "retention_horizon_days must be greater than 0".to_owned(),
        });
    }

    Ok(())
}

fn validate_logging(config: &AxiomConfig) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AxiomConfig::default()).is_ok());
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let mut config = AxiomConfig::default();
        config.scheduler.tick_interval_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_max_concurrent_jobs_rejected() {
        let mut config = AxiomConfig::default();
        config.scheduler.max_concurrent_jobs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn negative_cost_limit_rejected() {
        let mut config = AxiomConfig::default();
        config.limits.max_cost_usd = Some(-1.0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn nan_cost_limit_rejected() {
        let mut config = AxiomConfig::default();
        config.limits.max_cost_usd = Some(f64::NAN);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_retention_horizon_rejected() {
        let mut config = AxiomConfig::default();
        config.memory.retention_horizon_days = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn invalid_log_level_rejected() {
        let mut config = AxiomConfig::default();
        config.logging.level = "verbose".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn invalid_log_format_rejected() {
        let mut config = AxiomConfig::default();
        config.logging.format = "yaml".to_owned();
        assert!(validate(&config).is_err());
    }
}
