// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Recado routing engine.

use thiserror::Error;

/// The primary error type used across Recado adapter traits and core operations.
#[derive(Debug, Error)]
pub enum RecadoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Inference backend errors (connection failure, bad response, model missing).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Backend health check failed.
    #[error("health check failed for {name}: {reason}")]
    HealthCheckFailed { name: String, reason: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
