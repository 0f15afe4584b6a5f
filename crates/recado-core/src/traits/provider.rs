// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait for local inference backends (Ollama and friends).

use async_trait::async_trait;

use crate::error::RecadoError;
use crate::types::{GenerateOptions, HealthReport};

/// Adapter for a local inference backend.
///
/// The router only needs single-shot bounded-length generation plus a health
/// probe; streaming and tool use stay with the full agent.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Short adapter name used in logs and error messages.
    fn name(&self) -> &str;

    /// Generates raw text for the given prompt.
    ///
    /// Implementations must not retry internally: a failed call escalates the
    /// request and recovery is left to the availability guard's next probe.
    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, RecadoError>;

    /// Probes the backend and reports whether the expected model is loaded.
    async fn health_check(&self) -> Result<HealthReport, RecadoError>;
}
