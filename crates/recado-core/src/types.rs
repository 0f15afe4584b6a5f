// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the routing pipeline and its adapters.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Extracted parameters attached to a classification or routing decision.
///
/// A `BTreeMap` so iteration order is deterministic in test fixtures and
/// JSON output.
pub type Params = BTreeMap<String, String>;

/// The semantic category assigned to a user message.
///
/// Closed set with an explicit [`Intent::Unknown`] extension variant: model
/// output naming an unrecognized intent parses to `Unknown` instead of
/// propagating a stringly-typed value through the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Time,
    Weather,
    Reminder,
    ListReminders,
    CancelReminder,
    Translate,
    Grammar,
    Summarize,
    Conversation,
    Question,
    FactMemory,
    Search,
    Task,
    MultiIntent,
    Ambiguous,
    Unknown,
}

impl Intent {
    /// The execution tier this intent may bypass full agent reasoning for,
    /// or `None` if the intent must always escalate to the agentic tier.
    ///
    /// Only this closed set of intents is ever tool-executable; everything
    /// else resolves to [`Tier::Api`] regardless of confidence.
    pub fn executable_tier(self) -> Option<Tier> {
        match self {
            Intent::Time
            | Intent::Weather
            | Intent::Reminder
            | Intent::ListReminders
            | Intent::CancelReminder => Some(Tier::Deterministic),
            Intent::Translate
            | Intent::Grammar
            | Intent::Summarize
            | Intent::Conversation => Some(Tier::Local),
            _ => None,
        }
    }
}

/// The execution path chosen for a classified message.
///
/// Not a fallback chain: a request resolves to exactly one tier, and each
/// tier is a distinct execution path in the orchestrator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Direct deterministic tool call, sub-10ms expected.
    Deterministic,
    /// Bounded-capability local model, seconds-scale.
    Local,
    /// Full agentic escalation.
    Api,
}

/// Result of one classification attempt by the model-backed classifier.
///
/// Immutable after creation; the validation rule engine produces a new
/// decision rather than mutating this in place.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub intent: Intent,
    /// Classification confidence in [0, 1].
    pub confidence: f32,
    pub params: Params,
    /// Raw backend response text (or error text on failure), for diagnostics.
    pub raw_response: String,
    /// End-to-end latency around the backend call, populated even on failure.
    pub latency_ms: u64,
}

/// Terminal output of the routing pipeline, created fresh per message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub tier: Tier,
    pub intent: Intent,
    pub confidence: f32,
    pub params: Params,
    /// Human-readable reason for the decision.
    pub reason: String,
}

/// Health check result from an inference backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// Whether the backend answered the probe at all.
    pub available: bool,
    /// The expected model's identifier if the backend reports it loaded.
    pub model_loaded: Option<String>,
}

/// Generation parameters for a single backend call.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// An append-only keyword learning event.
///
/// Produced by a validated external source (e.g. an operator command) and
/// consumed by the registry's background merge; never applied synchronously
/// inside a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedKeyword {
    pub intent: Intent,
    pub keyword: String,
    pub confidence: f32,
    pub validated_by: String,
    pub learned_at: DateTime<Utc>,
}
