// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-latency keyword-scoring fast path.
//!
//! Scores every registered signature against the token set and returns the
//! best survivor, or `None` as the "escalate to classifier" signal. No
//! network, no model, single-digit microseconds.

use recado_core::{Params, RoutingDecision};
use tracing::debug;

use crate::normalize::tokenize;
use crate::signature::Signature;

/// Weight of the primary keyword component. Hand-tuned together with the
/// secondary weight against classifier behavior; changing either silently
/// shifts which messages reach the agentic tier.
const PRIMARY_WEIGHT: f32 = 0.7;
/// Weight of the secondary keyword component.
const SECONDARY_WEIGHT: f32 = 0.3;

/// Minimum length of the shorter side for a prefix match to count.
/// Keeps two-letter function words from prefix-matching longer tokens.
const PREFIX_MIN_LEN: usize = 3;

/// Try to match the message against the signature snapshot.
///
/// Tokenization is unstemmed to keep matching conservative; simple
/// inflection is handled by allowing either side of a match to be a prefix
/// of the other. Ties are broken by registration order (first registered
/// wins), which keeps repeated calls deterministic.
///
/// `None` is not an error: it is the expected signal to consult the
/// model-backed classifier.
pub fn try_fast_path(signatures: &[Signature], raw_message: &str) -> Option<RoutingDecision> {
    let tokens = tokenize(raw_message, false);
    if tokens.is_empty() {
        return None;
    }

    let mut best: Option<(f32, &Signature, Params)> = None;

    for signature in signatures {
        let Some(score) = score_signature(signature, &tokens) else {
            continue;
        };

        let params = match signature.extractor {
            Some(extract) => extract(raw_message),
            None => Params::new(),
        };
        if signature
            .required_params
            .iter()
            .any(|key| !params.contains_key(key))
        {
            debug!(
                intent = %signature.intent,
                "fast-path match missing required params, falling through"
            );
            continue;
        }

        // Strictly-greater keeps the earliest registered signature on ties.
        if best.as_ref().is_none_or(|(best_score, _, _)| score > *best_score) {
            best = Some((score, signature, params));
        }
    }

    let (score, signature, params) = best?;
    debug!(
        intent = %signature.intent,
        score,
        tier = %signature.tier,
        "fast-path hit"
    );

    Some(RoutingDecision {
        tier: signature.tier,
        intent: signature.intent,
        confidence: score,
        params,
        reason: "fast-path keyword match".to_string(),
    })
}

/// Score one signature against the token set, or `None` if it is vetoed,
/// under-matched, or below its own minimum score.
fn score_signature(signature: &Signature, tokens: &[String]) -> Option<f32> {
    // Vetoes use the same prefix rule as keywords so inflected forms
    // ("eliminar") disqualify just like the base form.
    if count_matches(&signature.veto_keywords, tokens) > 0 {
        return None;
    }

    let primary_matches = count_matches(&signature.primary_keywords, tokens);
    if primary_matches < signature.min_primary_matches {
        return None;
    }

    let primary_part = (primary_matches as f32 / signature.min_primary_matches as f32).min(1.0);
    let secondary_part = if signature.secondary_keywords.is_empty() {
        0.0
    } else {
        let secondary_matches = count_matches(&signature.secondary_keywords, tokens);
        (secondary_matches as f32 / signature.secondary_keywords.len() as f32).min(1.0)
    };

    let score = PRIMARY_WEIGHT * primary_part + SECONDARY_WEIGHT * secondary_part;
    (score >= signature.min_score).then_some(score)
}

fn count_matches(keywords: &[String], tokens: &[String]) -> usize {
    keywords
        .iter()
        .filter(|kw| tokens.iter().any(|t| keyword_matches(kw, t)))
        .count()
}

/// Exact match, or a prefix match in either direction when the shorter side
/// is long enough to be meaningful ("elimina" matches "eliminar").
fn keyword_matches(keyword: &str, token: &str) -> bool {
    if keyword == token {
        return true;
    }
    let shorter = keyword.chars().count().min(token.chars().count());
    shorter >= PREFIX_MIN_LEN && (token.starts_with(keyword) || keyword.starts_with(token))
}
