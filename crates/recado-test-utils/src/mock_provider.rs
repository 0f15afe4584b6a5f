// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference provider for deterministic testing.
//!
//! `MockProvider` implements `InferenceProvider` with pre-configured
//! responses, enabling fast, CI-runnable tests without a live backend.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use recado_core::{GenerateOptions, HealthReport, InferenceProvider, RecadoError};

enum QueuedResponse {
    Text(String),
    Failure(String),
}

/// A mock inference provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue; when the queue is empty a default
/// "mock response" text is returned. Health defaults to available with a
/// model loaded and can be overridden per test. An optional delay is applied
/// to every generate call for timeout testing.
pub struct MockProvider {
    responses: Mutex<VecDeque<QueuedResponse>>,
    health: Mutex<Result<HealthReport, String>>,
    delay: Option<Duration>,
    health_delay: Option<Duration>,
    generate_calls: AtomicUsize,
    health_calls: AtomicUsize,
}

impl MockProvider {
    /// A healthy provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            health: Mutex::new(Ok(healthy_report())),
            delay: None,
            health_delay: None,
            generate_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
        }
    }

    /// A healthy provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        let provider = Self::new();
        for text in responses {
            provider.push_response(text);
        }
        provider
    }

    /// Apply `delay` to every generate call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Apply `delay` to every health probe.
    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    /// Queue a successful response.
    pub fn push_response(&self, text: &str) {
        self.lock_responses()
            .push_back(QueuedResponse::Text(text.to_string()));
    }

    /// Queue a generate failure.
    pub fn push_failure(&self, message: &str) {
        self.lock_responses()
            .push_back(QueuedResponse::Failure(message.to_string()));
    }

    /// Replace the health report returned by future probes.
    pub fn set_health(&self, report: HealthReport) {
        *self.lock_health() = Ok(report);
    }

    /// Make future probes fail with the given reason.
    pub fn set_health_failure(&self, reason: &str) {
        *self.lock_health() = Err(reason.to_string());
    }

    /// Restore the default healthy report.
    pub fn clear_health_failure(&self) {
        *self.lock_health() = Ok(healthy_report());
    }

    /// Number of generate calls made against this provider.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Number of health probes made against this provider.
    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<QueuedResponse>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_health(&self) -> std::sync::MutexGuard<'_, Result<HealthReport, String>> {
        self.health.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn healthy_report() -> HealthReport {
    HealthReport {
        available: true,
        model_loaded: Some("mock-model".to_string()),
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _options: GenerateOptions,
    ) -> Result<String, RecadoError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.lock_responses().pop_front() {
            Some(QueuedResponse::Text(text)) => Ok(text),
            Some(QueuedResponse::Failure(message)) => Err(RecadoError::Provider {
                message,
                source: None,
            }),
            None => Ok("mock response".to_string()),
        }
    }

    async fn health_check(&self) -> Result<HealthReport, RecadoError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.health_delay {
            tokio::time::sleep(delay).await;
        }
        match &*self.lock_health() {
            Ok(report) => Ok(report.clone()),
            Err(reason) => Err(RecadoError::HealthCheckFailed {
                name: "mock-provider".to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GenerateOptions {
        GenerateOptions {
            temperature: 0.1,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn responses_pop_in_fifo_order() {
        let provider = MockProvider::with_responses(vec!["uno", "dos"]);
        assert_eq!(provider.generate("x", options()).await.unwrap(), "uno");
        assert_eq!(provider.generate("x", options()).await.unwrap(), "dos");
        assert_eq!(provider.generate("x", options()).await.unwrap(), "mock response");
        assert_eq!(provider.generate_calls(), 3);
    }

    #[tokio::test]
    async fn queued_failure_surfaces_as_provider_error() {
        let provider = MockProvider::new();
        provider.push_failure("boom");
        let err = provider.generate("x", options()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn health_is_controllable() {
        let provider = MockProvider::new();
        assert!(provider.health_check().await.unwrap().available);

        provider.set_health_failure("down");
        assert!(provider.health_check().await.is_err());

        provider.clear_health_failure();
        assert!(provider.health_check().await.unwrap().available);
        assert_eq!(provider.health_calls(), 3);
    }
}
