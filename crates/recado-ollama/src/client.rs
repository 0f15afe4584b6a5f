// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama server.
//!
//! Implements [`InferenceProvider`] over `POST /api/generate` (non-streaming)
//! and `GET /api/tags` (health). Failures are never retried here: a failed
//! classification escalates immediately, and the availability guard's next
//! scheduled probe is the only retry path.

use std::time::Duration;

use async_trait::async_trait;
use recado_config::OllamaConfig;
use recado_core::{GenerateOptions, HealthReport, InferenceProvider, RecadoError};
use tracing::debug;

use crate::types::{GenerateRequest, GenerateResponse, ModelOptions, TagsResponse};

/// HTTP client for Ollama.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Build a client from configuration. The HTTP timeout mirrors the
    /// configured request timeout so a hung server cannot outlive the
    /// caller's own deadline.
    pub fn new(config: &OllamaConfig) -> Result<Self, RecadoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RecadoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, RecadoError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: ModelOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| RecadoError::Provider {
                message: format!("generate request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generate response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecadoError::Provider {
                message: format!("Ollama returned {status}: {body}"),
                source: None,
            });
        }

        let body: GenerateResponse =
            response.json().await.map_err(|e| RecadoError::Provider {
                message: format!("failed to parse generate response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(body.response)
    }

    async fn health_check(&self) -> Result<HealthReport, RecadoError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| RecadoError::HealthCheckFailed {
                name: "ollama".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecadoError::HealthCheckFailed {
                name: "ollama".to_string(),
                reason: format!("tags endpoint returned {status}"),
            });
        }

        let tags: TagsResponse =
            response
                .json()
                .await
                .map_err(|e| RecadoError::HealthCheckFailed {
                    name: "ollama".to_string(),
                    reason: format!("failed to parse tags response: {e}"),
                })?;

        // The configured model may omit the tag ("llama3.2" vs "llama3.2:3b").
        let model_loaded = tags
            .models
            .iter()
            .find(|m| m.name == self.model || m.name.split(':').next() == Some(self.model.as_str()))
            .map(|m| m.name.clone());

        debug!(
            installed = tags.models.len(),
            model_loaded = model_loaded.as_deref(),
            "health check complete"
        );
        Ok(HealthReport {
            available: true,
            model_loaded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OllamaClient {
        let config = OllamaConfig {
            model: "llama3.2:3b".into(),
            ..OllamaConfig::default()
        };
        OllamaClient::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_options() -> GenerateOptions {
        GenerateOptions {
            temperature: 0.1,
            max_tokens: 200,
        }
    }

    #[tokio::test]
    async fn generate_success_returns_response_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.2:3b",
                "stream": false,
                "options": {"temperature": 0.1, "num_predict": 200}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "{\"intent\": \"time\", \"confidence\": 0.9}",
                "done": true
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.generate("¿qué hora es?", test_options()).await.unwrap();
        assert!(text.contains("\"intent\""));
    }

    #[tokio::test]
    async fn generate_http_error_is_a_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("model runner has unexpectedly stopped"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate("hola", test_options()).await.unwrap_err();
        assert!(err.to_string().contains("500"), "got: {err}");
    }

    #[tokio::test]
    async fn health_check_reports_loaded_model() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3.2:3b"}, {"name": "qwen2.5:3b"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let report = client.health_check().await.unwrap();
        assert!(report.available);
        assert_eq!(report.model_loaded.as_deref(), Some("llama3.2:3b"));
    }

    #[tokio::test]
    async fn health_check_matches_untagged_model_name() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3.2:latest"}]
            })))
            .mount(&server)
            .await;

        let config = OllamaConfig {
            model: "llama3.2".into(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config)
            .unwrap()
            .with_base_url(server.uri());
        let report = client.health_check().await.unwrap();
        assert_eq!(report.model_loaded.as_deref(), Some("llama3.2:latest"));
    }

    #[tokio::test]
    async fn health_check_without_expected_model_reports_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "qwen2.5:3b"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let report = client.health_check().await.unwrap();
        assert!(report.available);
        assert!(report.model_loaded.is_none());
    }

    #[tokio::test]
    async fn unreachable_server_fails_health_check() {
        // Port 1 is never listening.
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, RecadoError::HealthCheckFailed { .. }));
    }
}
