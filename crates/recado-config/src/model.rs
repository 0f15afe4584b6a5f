// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Recado intent router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Recado configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecadoConfig {
    /// Assistant identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Local Ollama inference backend settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Intent routing settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Keyword learning queue settings.
    #[serde(default)]
    pub learning: LearningConfig,
}

/// Assistant identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "recado".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ollama inference backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier expected to be loaded for classification.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for classification calls. Low by design: the
    /// classifier must commit to one intent, not explore.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per classification response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for a single generate call, in seconds. On expiry the request
    /// is treated as a transport error and escalates.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    200
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Intent routing configuration.
///
/// Controls confidence thresholds and cache intervals. The fast-path scoring
/// weights are compile-time constants in the matcher and deliberately not
/// configurable: they were hand-tuned against classifier behavior and silent
/// drift would shift which messages reach the agentic tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Minimum confidence for intents without a per-intent threshold entry.
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Per-intent confidence threshold overrides, keyed by intent name
    /// (e.g. `cancel_reminder = 0.9`). Read-only during request processing.
    #[serde(default)]
    pub thresholds: BTreeMap<String, f32>,

    /// Seconds the availability guard caches its backend verdict.
    #[serde(default = "default_availability_ttl_secs")]
    pub availability_ttl_secs: u64,

    /// Timeout for a single health probe, in seconds.
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,

    /// Seconds between signature registry soft refreshes.
    #[serde(default = "default_registry_refresh_secs")]
    pub registry_refresh_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            thresholds: BTreeMap::new(),
            availability_ttl_secs: default_availability_ttl_secs(),
            health_timeout_secs: default_health_timeout_secs(),
            registry_refresh_secs: default_registry_refresh_secs(),
        }
    }
}

fn default_threshold() -> f32 {
    0.8
}

fn default_availability_ttl_secs() -> u64 {
    30
}

fn default_health_timeout_secs() -> u64 {
    2
}

fn default_registry_refresh_secs() -> u64 {
    45
}

/// Keyword learning queue configuration.
///
/// The learning process itself is external; this section only sizes the
/// fire-and-forget event queue feeding the registry merge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LearningConfig {
    /// Enable the learning queue and background merge worker.
    #[serde(default = "default_learning_enabled")]
    pub enabled: bool,

    /// Bounded queue capacity. When full, new events are dropped with a
    /// warning rather than blocking the hot path.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Minimum event confidence accepted by the merge worker.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            enabled: default_learning_enabled(),
            queue_capacity: default_queue_capacity(),
            min_confidence: default_min_confidence(),
        }
    }
}

fn default_learning_enabled() -> bool {
    false
}

fn default_queue_capacity() -> usize {
    64
}

fn default_min_confidence() -> f32 {
    0.8
}
