// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence-threshold tier resolution.
//!
//! Maps a classified intent and its confidence to an execution tier. Every
//! intent has a threshold; anything below it, and anything with no
//! executable tier, goes to the API tier.

use std::collections::BTreeMap;

use recado_core::{Intent, Params, RoutingDecision, Tier};
use recado_config::RouterConfig;
use tracing::debug;

/// Built-in per-intent thresholds, tuned so that read-only intents clear
/// easily while destructive ones demand near-certainty. Config
/// `[router.thresholds]` entries override these per intent.
const BUILTIN_THRESHOLDS: &[(Intent, f32)] = &[
    (Intent::Time, 0.70),
    (Intent::Weather, 0.70),
    (Intent::Reminder, 0.85),
    (Intent::ListReminders, 0.75),
    (Intent::CancelReminder, 0.90),
    (Intent::Translate, 0.75),
    (Intent::Grammar, 0.75),
    (Intent::Summarize, 0.75),
    (Intent::Conversation, 0.70),
];

/// Resolves classified intents to execution tiers.
pub struct TierResolver {
    thresholds: BTreeMap<Intent, f32>,
    default_threshold: f32,
}

impl TierResolver {
    /// Build the resolver from router configuration. Config overrides are
    /// keyed by the intent's wire name and have already been validated to
    /// parse as intents and sit in [0, 1].
    pub fn new(config: &RouterConfig) -> Self {
        let mut thresholds: BTreeMap<Intent, f32> = BUILTIN_THRESHOLDS.iter().copied().collect();
        for (name, value) in &config.thresholds {
            if let Ok(intent) = name.parse::<Intent>() {
                thresholds.insert(intent, *value);
            }
        }
        Self {
            thresholds,
            default_threshold: config.default_threshold,
        }
    }

    /// Threshold applied to the given intent.
    pub fn threshold_for(&self, intent: Intent) -> f32 {
        self.thresholds
            .get(&intent)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Resolve a classified intent to a routing decision.
    ///
    /// The comparison is inclusive: confidence exactly at the threshold
    /// passes. Intents with no executable tier route to the API tier
    /// regardless of confidence.
    pub fn resolve(&self, intent: Intent, confidence: f32, params: Params) -> RoutingDecision {
        let threshold = self.threshold_for(intent);

        let (tier, reason) = match intent.executable_tier() {
            Some(tier) if confidence >= threshold => (
                tier,
                format!("classified at {confidence:.2} (threshold {threshold:.2})"),
            ),
            Some(_) => (
                Tier::Api,
                format!("confidence {confidence:.2} below threshold {threshold:.2}"),
            ),
            None => (Tier::Api, format!("{intent} has no local execution path")),
        };

        debug!(%intent, confidence, threshold, %tier, "tier resolved");
        RoutingDecision {
            tier,
            intent,
            confidence,
            params,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TierResolver {
        TierResolver::new(&RouterConfig::default())
    }

    #[test]
    fn confident_tool_intent_goes_deterministic() {
        let decision = resolver().resolve(Intent::Time, 0.92, Params::new());
        assert_eq!(decision.tier, Tier::Deterministic);
        assert_eq!(decision.intent, Intent::Time);
    }

    #[test]
    fn confident_text_intent_goes_local() {
        let decision = resolver().resolve(Intent::Translate, 0.9, Params::new());
        assert_eq!(decision.tier, Tier::Local);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let r = resolver();
        assert_eq!(r.resolve(Intent::Time, 0.70, Params::new()).tier, Tier::Deterministic);
        assert_eq!(r.resolve(Intent::Time, 0.6999, Params::new()).tier, Tier::Api);
    }

    #[test]
    fn destructive_intent_demands_higher_confidence() {
        let r = resolver();
        assert_eq!(
            r.resolve(Intent::CancelReminder, 0.85, Params::new()).tier,
            Tier::Api
        );
        assert_eq!(
            r.resolve(Intent::CancelReminder, 0.90, Params::new()).tier,
            Tier::Deterministic
        );
    }

    #[test]
    fn unknown_and_ambiguous_always_hit_api() {
        let r = resolver();
        assert_eq!(r.resolve(Intent::Unknown, 0.99, Params::new()).tier, Tier::Api);
        assert_eq!(r.resolve(Intent::Ambiguous, 0.99, Params::new()).tier, Tier::Api);
    }

    #[test]
    fn config_override_replaces_builtin_threshold() {
        let mut config = RouterConfig::default();
        config.thresholds.insert("time".to_string(), 0.95);
        let r = TierResolver::new(&config);
        assert_eq!(r.resolve(Intent::Time, 0.92, Params::new()).tier, Tier::Api);
        assert_eq!(r.resolve(Intent::Time, 0.95, Params::new()).tier, Tier::Deterministic);
    }

    #[test]
    fn default_threshold_covers_unlisted_intents() {
        let r = resolver();
        assert_eq!(r.threshold_for(Intent::Search), 0.8);
    }
}
