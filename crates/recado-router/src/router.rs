// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing pipeline.
//!
//! Per message: fast-path match, and on a miss, availability check, model
//! classification, validation overrides, tier resolution. The stages are
//! strictly sequential within one message; across messages the router is
//! stateless and safe to share.

use std::sync::Arc;
use std::time::Duration;

use recado_config::RecadoConfig;
use recado_core::{GenerateOptions, InferenceProvider, Intent, Params, RoutingDecision, Tier};
use tracing::{debug, info};

use crate::availability::AvailabilityGuard;
use crate::classifier::Classifier;
use crate::fastpath::try_fast_path;
use crate::registry::SignatureRegistry;
use crate::resolver::TierResolver;
use crate::rules::apply_overrides;

/// Routes messages to execution tiers.
///
/// Holds no per-conversation state; concurrent messages never contend beyond
/// the registry and availability caches.
pub struct IntentRouter {
    registry: Arc<SignatureRegistry>,
    guard: AvailabilityGuard,
    classifier: Classifier,
    resolver: TierResolver,
}

impl IntentRouter {
    pub fn new(
        config: &RecadoConfig,
        provider: Arc<dyn InferenceProvider>,
        registry: Arc<SignatureRegistry>,
    ) -> Self {
        let guard = AvailabilityGuard::new(
            provider.clone(),
            Duration::from_secs(config.router.availability_ttl_secs),
            Duration::from_secs(config.router.health_timeout_secs),
        );
        let classifier = Classifier::new(
            provider,
            GenerateOptions {
                temperature: config.ollama.temperature,
                max_tokens: config.ollama.max_tokens,
            },
            Duration::from_secs(config.ollama.request_timeout_secs),
        );
        Self {
            registry,
            guard,
            classifier,
            resolver: TierResolver::new(&config.router),
        }
    }

    /// Route one message. Infallible: every failure mode degrades toward the
    /// agentic tier rather than an incorrect deterministic action.
    pub async fn route(&self, message: &str) -> RoutingDecision {
        if message.trim().is_empty() {
            return RoutingDecision {
                tier: Tier::Api,
                intent: Intent::Ambiguous,
                confidence: 0.0,
                params: Params::new(),
                reason: "empty message".to_string(),
            };
        }

        self.registry.refresh_if_stale().await;
        let snapshot = self.registry.snapshot();
        if let Some(decision) = try_fast_path(&snapshot, message) {
            info!(
                intent = %decision.intent,
                tier = %decision.tier,
                confidence = decision.confidence,
                "routed via fast path"
            );
            return decision;
        }

        if !self.guard.is_available().await {
            let reason = match self.guard.last_failure().await {
                Some(failure) => format!("backend unavailable: {failure}"),
                None => "backend unavailable".to_string(),
            };
            info!(%reason, "routed to api tier without classification");
            return RoutingDecision {
                tier: Tier::Api,
                intent: Intent::Unknown,
                confidence: 0.0,
                params: Params::new(),
                reason,
            };
        }

        let classified = self.classifier.classify(message).await;
        debug!(
            intent = %classified.intent,
            confidence = classified.confidence,
            latency_ms = classified.latency_ms,
            "classifier result"
        );

        let decision = match apply_overrides(message, classified.intent, &classified.params) {
            Some(rule) => RoutingDecision {
                tier: Tier::Api,
                intent: rule.intent.unwrap_or(classified.intent),
                confidence: classified.confidence,
                params: classified.params,
                reason: format!("validation override: {}", rule.reason),
            },
            None => self.resolver.resolve(
                classified.intent,
                classified.confidence,
                classified.params,
            ),
        };

        info!(
            intent = %decision.intent,
            tier = %decision.tier,
            confidence = decision.confidence,
            reason = %decision.reason,
            "routed via classifier"
        );
        decision
    }
}
