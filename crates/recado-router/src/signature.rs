// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent signatures: keyword sets, match requirements, and parameter
//! extractors for the fast-path matcher.
//!
//! The base table below is registration-ordered; the matcher breaks score
//! ties by taking the earliest registered signature, so the order here is
//! part of the contract and test fixtures depend on it.

use std::sync::LazyLock;

use recado_core::{Intent, Params, Tier};
use regex::Regex;

use crate::normalize::normalize;

/// Extracts structured parameters from the raw (non-normalized) message,
/// preserving the original casing of extracted values.
pub type ParamExtractor = fn(&str) -> Params;

/// Fast-path recognition configuration for one intent.
#[derive(Clone)]
pub struct Signature {
    pub intent: Intent,
    /// Keywords that carry the intent. At least `min_primary_matches` must hit.
    pub primary_keywords: Vec<String>,
    /// Supporting keywords that raise the score but cannot trigger alone.
    pub secondary_keywords: Vec<String>,
    /// Minimum primary hits required. Invariant: at least 1.
    pub min_primary_matches: usize,
    /// Minimum score in [0, 1] for the signature to survive.
    pub min_score: f32,
    /// Tier pre-assigned to fast-path hits on this signature.
    pub tier: Tier,
    /// Tokens that disqualify the signature outright. Used to keep bulk
    /// destructive phrasings ("todos/todas" + delete verb) off the fast path
    /// so the validation rule engine always sees them.
    pub veto_keywords: Vec<String>,
    /// Parameter keys the extractor must produce for a hit to stand. A match
    /// missing any of these falls through to the classifier instead.
    pub required_params: Vec<String>,
    pub extractor: Option<ParamExtractor>,
}

impl Signature {
    fn new(intent: Intent, tier: Tier, primary: &[&str], secondary: &[&str]) -> Self {
        debug_assert!(!primary.is_empty());
        Self {
            intent,
            primary_keywords: primary.iter().map(|s| s.to_string()).collect(),
            secondary_keywords: secondary.iter().map(|s| s.to_string()).collect(),
            min_primary_matches: 1,
            min_score: 0.7,
            tier,
            veto_keywords: Vec::new(),
            required_params: Vec::new(),
            extractor: None,
        }
    }

    fn min_score(mut self, score: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&score));
        self.min_score = score;
        self
    }

    fn veto(mut self, keywords: &[&str]) -> Self {
        self.veto_keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    fn requires(mut self, params: &[&str]) -> Self {
        self.required_params = params.iter().map(|s| s.to_string()).collect();
        self
    }

    fn extract_with(mut self, extractor: ParamExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }
}

/// The static base signature table, in registration (tie-break) order.
///
/// Keywords are stored accent-free; the tokenizer folds input the same way.
/// Dynamically learned keywords are merged on top of this table by the
/// registry, never into it.
pub fn base_signatures() -> Vec<Signature> {
    vec![
        Signature::new(
            Intent::Time,
            Tier::Deterministic,
            &["hora"],
            &["que", "es", "son", "dime", "tienes"],
        ),
        Signature::new(
            Intent::Weather,
            Tier::Deterministic,
            &["clima", "tiempo", "temperatura"],
            &["que", "hace", "hay", "como", "esta", "hoy", "pronostico", "frio", "calor"],
        )
        .extract_with(extract_weather_params),
        Signature::new(
            Intent::Reminder,
            Tier::Deterministic,
            &["recuerdame", "recordarme", "avisame", "recordatorio"],
            &["pon", "ponme", "crea", "nuevo", "que", "tengo"],
        )
        .requires(&["time", "message"])
        .extract_with(extract_reminder_params),
        Signature::new(
            Intent::ListReminders,
            Tier::Deterministic,
            &["recordatorios"],
            &["lista", "listar", "muestra", "muestrame", "cuales", "mis", "ver", "tengo", "pendientes"],
        )
        .min_score(0.72)
        .veto(&["cancela", "elimina", "borra", "quita"]),
        Signature::new(
            Intent::CancelReminder,
            Tier::Deterministic,
            &["cancela", "elimina", "borra", "quita"],
            &["recordatorio", "recordatorios", "alarma", "mis"],
        )
        .min_score(0.75)
        .veto(&["todos", "todas", "todo"]),
        Signature::new(
            Intent::Translate,
            Tier::Local,
            &["traduce", "traducir", "traduceme", "traduccion"],
            &["esto", "ingles", "espanol", "frances", "aleman", "como", "dice"],
        )
        .extract_with(extract_translate_params),
        Signature::new(
            Intent::Grammar,
            Tier::Local,
            &["corrige", "corregir", "gramatica", "ortografia"],
            &["frase", "texto", "error", "errores", "bien", "escrito"],
        ),
        Signature::new(
            Intent::Summarize,
            Tier::Local,
            &["resume", "resumir", "resumen"],
            &["texto", "esto", "articulo", "parrafo", "breve"],
        ),
        Signature::new(
            Intent::Conversation,
            Tier::Local,
            &["hola", "buenas", "buenos", "gracias", "adios", "saludos"],
            &["dias", "tardes", "noches", "tal", "estas"],
        ),
    ]
}

static TIME_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)\b(
            a\ la\ una ( \ de\ la\ (mañana|manana|tarde|noche) )?
          | a\ las\ \d{1,2} ([:.]\d{2})? ( \ de\ la\ (mañana|manana|tarde|noche) )?
          | en\ \d+\ (segundos?|minutos?|horas?|d[ií]as?|semanas?)
          | pasado\ ma[ñn]ana
          | ma[ñn]ana ( \ por\ la\ (mañana|manana|tarde|noche) )?
          | hoy
          | esta\ (tarde|noche|semana)
          | al\ mediod[ií]a
          | a\ medianoche
          | el\ (lunes|martes|mi[eé]rcoles|jueves|viernes|s[aá]bado|domingo)
          | (lunes|martes|mi[eé]rcoles|jueves|viernes|s[aá]bado|domingo)
        )\b",
    )
    .expect("time expression regex is valid")
});

/// Find the first time expression in the message, returning the matched
/// slice of the original text.
pub fn find_time_expression(text: &str) -> Option<&str> {
    TIME_EXPRESSION.find(text).map(|m| m.as_str())
}

/// Trailing tokens that are temporal qualifiers, not part of a location.
const LOCATION_STOP_WORDS: &[&str] = &["hoy", "manana", "ahora", "ya"];

/// Extract the location from a weather query, preserving its casing.
///
/// Looks for the last " en " and takes the remainder, trimming punctuation
/// and trailing temporal qualifiers ("¿qué tiempo hace en Buenos Aires hoy?"
/// -> "Buenos Aires").
fn extract_weather_params(raw: &str) -> Params {
    let mut params = Params::new();
    let Some(pos) = rfind_en_separator(raw) else {
        return params;
    };

    let tail = &raw[pos + 4..];
    let mut words: Vec<&str> = tail
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    while let Some(last) = words.last() {
        if LOCATION_STOP_WORDS.contains(&normalize(last).as_str()) {
            words.pop();
        } else {
            break;
        }
    }

    if !words.is_empty() {
        params.insert("location".to_string(), words.join(" "));
    }
    params
}

/// Byte offset of the last " en " separator, matched ASCII-case-insensitively
/// against the raw text. The separator is located on the raw bytes directly:
/// `to_lowercase` can change byte length (e.g. 'İ'), so an offset computed on
/// a lowercased copy can land mid-character in the original.
fn rfind_en_separator(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    (0..bytes.len().saturating_sub(3)).rev().find(|&i| {
        bytes[i] == b' '
            && bytes[i + 1].eq_ignore_ascii_case(&b'e')
            && bytes[i + 2].eq_ignore_ascii_case(&b'n')
            && bytes[i + 3] == b' '
    })
}

/// Target language phrases mapped to ISO 639-1 codes.
const TARGET_LANGS: &[(&str, &str)] = &[
    ("ingles", "en"),
    ("espanol", "es"),
    ("castellano", "es"),
    ("frances", "fr"),
    ("aleman", "de"),
    ("italiano", "it"),
    ("portugues", "pt"),
];

/// Extract the target language and inline text from a translation request.
fn extract_translate_params(raw: &str) -> Params {
    let mut params = Params::new();
    let normalized = normalize(raw);

    for (lang, code) in TARGET_LANGS {
        if normalized.contains(&format!("al {lang}"))
            || normalized.contains(&format!("en {lang}"))
            || normalized.contains(&format!("a {lang}"))
        {
            params.insert("target_lang".to_string(), (*code).to_string());
            break;
        }
    }

    // Inline payload after a colon, casing preserved: "traduce esto: Hola".
    if let Some(pos) = raw.find(':') {
        let text = raw[pos + 1..].trim();
        if !text.is_empty() {
            params.insert("text".to_string(), text.to_string());
        }
    }

    params
}

/// Leading trigger words stripped from a reminder body.
const REMINDER_TRIGGERS: &[&str] = &[
    "recuerdame", "recordarme", "avisame", "ponme", "pon", "crea", "que", "de",
];

/// Split a reminder request into a time expression and a message body.
///
/// Both parts preserve original casing. Either key is absent when the
/// corresponding part is missing, which the incomplete-reminder validation
/// rule relies on.
pub(crate) fn extract_reminder_params(raw: &str) -> Params {
    let mut params = Params::new();

    let (time, rest) = match find_time_expression(raw) {
        Some(m) => {
            let start = raw.find(m).unwrap_or(0);
            let mut rest = String::with_capacity(raw.len());
            rest.push_str(&raw[..start]);
            rest.push_str(&raw[start + m.len()..]);
            (Some(m.to_string()), rest)
        }
        None => (None, raw.to_string()),
    };

    if let Some(t) = time {
        params.insert("time".to_string(), t);
    }

    let mut words: Vec<&str> = rest
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| {
            !c.is_alphanumeric() && c != ':' && c != '\'' // keep clock-like tokens intact
        }))
        .filter(|w| !w.is_empty())
        .collect();
    while let Some(first) = words.first() {
        if REMINDER_TRIGGERS.contains(&normalize(first).as_str()) {
            words.remove(0);
        } else {
            break;
        }
    }

    if !words.is_empty() {
        params.insert("message".to_string(), words.join(" "));
    }
    params
}
