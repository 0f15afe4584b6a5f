// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: threshold ranges, positive intervals, and intent names in the
//! per-intent threshold table.

use std::str::FromStr;

use recado_core::Intent;

use crate::diagnostic::ConfigError;
use crate::model::RecadoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RecadoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.ollama.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "ollama.base_url must not be empty".to_string(),
        });
    }

    if config.ollama.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "ollama.model must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.ollama.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "ollama.temperature must be in [0, 2], got {}",
                config.ollama.temperature
            ),
        });
    }

    if config.ollama.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "ollama.max_tokens must be at least 1".to_string(),
        });
    }

    if config.ollama.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "ollama.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if !(0.0..=1.0).contains(&config.router.default_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "router.default_threshold must be in [0, 1], got {}",
                config.router.default_threshold
            ),
        });
    }

    for (name, threshold) in &config.router.thresholds {
        if Intent::from_str(name).is_err() {
            errors.push(ConfigError::Validation {
                message: format!("router.thresholds key `{name}` is not a known intent"),
            });
        }
        if !(0.0..=1.0).contains(threshold) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "router.thresholds.{name} must be in [0, 1], got {threshold}"
                ),
            });
        }
    }

    if config.router.availability_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "router.availability_ttl_secs must be at least 1".to_string(),
        });
    }

    if config.router.health_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "router.health_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.router.registry_refresh_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "router.registry_refresh_secs must be at least 1".to_string(),
        });
    }

    if config.learning.enabled && config.learning.queue_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "learning.queue_capacity must be at least 1 when learning is enabled"
                .to_string(),
        });
    }

    if !(0.0..=1.0).contains(&config.learning.min_confidence) {
        errors.push(ConfigError::Validation {
            message: format!(
                "learning.min_confidence must be in [0, 1], got {}",
                config.learning.min_confidence
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
