// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-classification validation overrides.
//!
//! A small ordered set of deterministic linguistic rules applied after the
//! model-backed classifier. Rules only ever redirect toward
//! `conversation`/`ambiguous` or force escalation; they never upgrade a
//! low-confidence result into an actionable one. The priority order below is
//! load-bearing for correctness, not an optimization.

use recado_core::{Intent, Params};
use tracing::debug;

use crate::normalize::{normalize, tokenize};
use crate::signature::{extract_reminder_params, find_time_expression};

/// Outcome of a fired validation rule. `intent` replaces the classified
/// intent when set; the tier is always forced to the agentic tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOverride {
    pub intent: Option<Intent>,
    pub reason: &'static str,
}

impl RuleOverride {
    fn replace(intent: Intent, reason: &'static str) -> Self {
        Self {
            intent: Some(intent),
            reason,
        }
    }

    fn escalate(reason: &'static str) -> Self {
        Self {
            intent: None,
            reason,
        }
    }
}

/// Opening frames that negate the apparent request.
const NEGATION_FRAMES: &[&str] = &[
    "no me",
    "no quiero",
    "no necesito",
    "no hace falta",
    "no es necesario",
    "nunca",
    "jamas",
    "ya no",
];

/// Universal quantifiers that mark a bulk operation.
const MASS_QUANTIFIERS: &[&str] = &["todos", "todas", "todo"];

/// Stems of delete/cancel verbs, matched as token prefixes to cover
/// inflected forms (elimina, eliminar, elimines).
const DELETE_VERB_STEMS: &[&str] = &["cancel", "elimin", "borr", "quit"];

/// Opening frames that make the message a suggestion, not a command.
const SUGGESTION_FRAMES: &[&str] = &[
    "deberias",
    "podrias",
    "quizas",
    "quiza",
    "tal vez",
    "a lo mejor",
    "y si",
    "que tal si",
    "seria bueno",
];

/// First words of an enduring personal fact after "recuérdame que ...".
const FACT_OPENERS: &[&str] = &[
    "soy", "tengo", "vivo", "trabajo", "estudio", "prefiero", "odio", "mi", "me",
];

/// Single words that are unambiguous on their own and exempt from the
/// bare-single-word rule.
const SINGLE_WORD_ALLOWLIST: &[&str] = &[
    "hora",
    "clima",
    "temperatura",
    "recordatorios",
    "hola",
    "gracias",
    "adios",
];

/// Apply the validation rules to a classified message, in fixed priority
/// order, first match wins. `None` means the classification stands.
pub fn apply_overrides(message: &str, intent: Intent, params: &Params) -> Option<RuleOverride> {
    let normalized = normalize(message);
    let opening = normalized.trim_start_matches(|c: char| !c.is_alphanumeric());
    let tokens = tokenize(message, false);

    let fired = negation(opening)
        .or_else(|| mass_action(&tokens))
        .or_else(|| incomplete_reminder(message, intent, params, &normalized))
        .or_else(|| fact_not_reminder(message, &normalized))
        .or_else(|| suggestion(opening))
        .or_else(|| bare_single_word(message, &tokens));

    if let Some(rule) = &fired {
        debug!(%intent, reason = rule.reason, "validation override fired");
    }
    fired
}

/// Rule 1: a message opening with a negating frame is talk about the action,
/// not a request for it.
fn negation(opening: &str) -> Option<RuleOverride> {
    NEGATION_FRAMES
        .iter()
        .any(|frame| opening.starts_with(frame))
        .then(|| RuleOverride::replace(Intent::Conversation, "negation frame"))
}

/// Rule 2: bulk destructive operations must be confirmed by the full agent,
/// never auto-executed. The intent is kept; only the tier is forced.
fn mass_action(tokens: &[String]) -> Option<RuleOverride> {
    let quantified = tokens
        .iter()
        .any(|t| MASS_QUANTIFIERS.contains(&t.as_str()));
    let destructive = tokens
        .iter()
        .any(|t| DELETE_VERB_STEMS.iter().any(|stem| t.starts_with(stem)));
    (quantified && destructive)
        .then(|| RuleOverride::escalate("mass action on plural quantifier"))
}

/// Rule 3: a reminder without both a time expression and a message body is
/// not actionable. Parameters missing from the classification are
/// re-extracted from the original message before judging.
///
/// Fact-shaped phrasings are left for rule 4, which gives them a more
/// precise intent than `ambiguous`.
fn incomplete_reminder(
    message: &str,
    intent: Intent,
    params: &Params,
    normalized: &str,
) -> Option<RuleOverride> {
    if intent != Intent::Reminder || is_fact_statement(message, normalized) {
        return None;
    }
    let extracted;
    let effective = if params.contains_key("time") && params.contains_key("message") {
        params
    } else {
        extracted = extract_reminder_params(message);
        &extracted
    };
    let complete = effective.contains_key("time") && effective.contains_key("message");
    (!complete).then(|| RuleOverride::replace(Intent::Ambiguous, "incomplete reminder"))
}

/// Rule 4: "recuérdame que soy..." states an enduring personal fact, not a
/// timed event; it belongs to memory, not the reminder tool.
fn fact_not_reminder(message: &str, normalized: &str) -> Option<RuleOverride> {
    is_fact_statement(message, normalized)
        .then(|| RuleOverride::replace(Intent::FactMemory, "personal fact, not a timed reminder"))
}

fn is_fact_statement(message: &str, normalized: &str) -> bool {
    if find_time_expression(message).is_some() {
        return false;
    }
    let Some(pos) = ["recuerdame que ", "recuerda que ", "recordar que "]
        .iter()
        .find_map(|frame| normalized.find(frame).map(|p| p + frame.len()))
    else {
        return false;
    };
    normalized[pos..]
        .split_whitespace()
        .next()
        .is_some_and(|first| FACT_OPENERS.contains(&first))
}

/// Rule 5: hedged phrasings are conversation about a possible action.
fn suggestion(opening: &str) -> Option<RuleOverride> {
    SUGGESTION_FRAMES
        .iter()
        .any(|frame| opening.starts_with(frame))
        .then(|| RuleOverride::replace(Intent::Conversation, "suggestion frame"))
}

/// Rule 6: a bare single word carries too little signal to act on, unless it
/// is on the small unambiguous allow-list.
fn bare_single_word(message: &str, tokens: &[String]) -> Option<RuleOverride> {
    if message.split_whitespace().count() != 1 {
        return None;
    }
    let allowed = tokens
        .first()
        .is_some_and(|t| SINGLE_WORD_ALLOWLIST.contains(&t.as_str()));
    (!allowed).then(|| RuleOverride::replace(Intent::Ambiguous, "bare single word"))
}
