// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed intent classification.
//!
//! Sends a fixed instruction prompt plus the user message to the inference
//! backend and parses one JSON object out of whatever text comes back.
//! Classification never errors outward: every failure mode (transport error,
//! timeout, malformed output) degrades to `unknown` with zero confidence,
//! which the tier resolver turns into full escalation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use recado_core::{ClassificationResult, GenerateOptions, InferenceProvider, Intent, Params};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fixed instruction header for the classification call.
///
/// The intent vocabulary and the six disambiguation rules are a tuned
/// contract with the model; do not reword them without re-validating against
/// a labeled set.
const CLASSIFY_PROMPT: &str = r#"Eres un clasificador de intenciones para un asistente personal en español. Clasifica el mensaje del usuario en UNA de estas intenciones:

- time: preguntar la hora o la fecha actual. Ej: "¿qué hora es?"
- weather: preguntar por el clima o la temperatura. Ej: "¿qué tiempo hace en Madrid?"
- reminder: crear un recordatorio con hora Y tarea. Ej: "recuérdame llamar a Ana mañana"
- list_reminders: ver los recordatorios existentes. Ej: "¿qué recordatorios tengo?"
- cancel_reminder: cancelar o borrar UN recordatorio concreto. Ej: "cancela el recordatorio del dentista"
- translate: traducir texto. Ej: "traduce esto al inglés: buenos días"
- grammar: corregir gramática u ortografía. Ej: "corrige esta frase"
- summarize: resumir un texto. Ej: "resume este párrafo"
- conversation: saludo, charla, opinión, o hablar SOBRE una acción sin pedirla. Ej: "hola, ¿qué tal?"
- question: pregunta de conocimiento general. Ej: "¿cuál es la capital de Francia?"
- fact_memory: el usuario comparte un dato personal duradero. Ej: "recuerda que soy alérgico al maní"
- search: buscar información actual en la web. Ej: "busca noticias de hoy"
- task: petición de trabajo compleja de varios pasos.
- multi_intent: el mensaje contiene varias peticiones distintas.
- ambiguous: el mensaje es demasiado vago o incompleto para actuar.
- unknown: nada de lo anterior encaja.

Reglas críticas:
1. Si el mensaje empieza negando ("no me...", "no quiero...", "no necesito...") es conversation, NO la acción negada.
2. Si pide borrar o cancelar TODOS/TODAS los elementos, mantén la intención pero la confianza debe ser baja: las operaciones masivas requieren confirmación.
3. Un recordatorio sin hora o sin tarea es ambiguous, no reminder.
4. "Recuérdame que soy/tengo/vivo..." sin hora es fact_memory (un dato personal), no reminder.
5. Frases de sugerencia ("deberías...", "podrías...", "quizás...") son conversation, no una orden.
6. Una sola palabra suelta sin contexto es ambiguous.

Responde EXACTAMENTE con un objeto JSON y nada más, sin prosa:
{"intent": "<intención>", "confidence": <número entre 0 y 1>, "params": {}}

Mensaje del usuario:
"#;

/// Confidence assumed when the model supplies the field in a non-numeric
/// form, or omits it entirely.
const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Classifies messages through an [`InferenceProvider`].
///
/// Callers must consult the availability guard first; if the backend is down
/// this component must not be invoked at all.
pub struct Classifier {
    provider: Arc<dyn InferenceProvider>,
    options: GenerateOptions,
    request_timeout: Duration,
}

impl Classifier {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        options: GenerateOptions,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            options,
            request_timeout,
        }
    }

    /// Classify one message. Infallible by contract: any failure returns
    /// `unknown` at zero confidence with the error text in `raw_response`.
    pub async fn classify(&self, message: &str) -> ClassificationResult {
        let prompt = format!("{CLASSIFY_PROMPT}{message}");
        let started = Instant::now();
        let outcome = timeout(
            self.request_timeout,
            self.provider.generate(&prompt, self.options),
        )
        .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(raw)) => {
                let result = parse_response(&raw, latency_ms);
                debug!(
                    intent = %result.intent,
                    confidence = result.confidence,
                    latency_ms,
                    "classification complete"
                );
                result
            }
            Ok(Err(err)) => {
                warn!(error = %err, latency_ms, "classification backend error");
                failure_result(err.to_string(), latency_ms)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "classification timed out"
                );
                failure_result(
                    format!(
                        "classification timed out after {}ms",
                        self.request_timeout.as_millis()
                    ),
                    latency_ms,
                )
            }
        }
    }
}

fn failure_result(raw_response: String, latency_ms: u64) -> ClassificationResult {
    ClassificationResult {
        intent: Intent::Unknown,
        confidence: 0.0,
        params: Params::new(),
        raw_response,
        latency_ms,
    }
}

/// Parse the first well-formed JSON object out of the raw response text.
fn parse_response(raw: &str, latency_ms: u64) -> ClassificationResult {
    let Some(object) = extract_json_object(raw) else {
        return failure_result(raw.to_string(), latency_ms);
    };

    let Some(intent) = object
        .get("intent")
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<Intent>().ok())
    else {
        return failure_result(raw.to_string(), latency_ms);
    };

    let confidence = match object.get("confidence") {
        Some(value) => value
            .as_f64()
            .map(|c| (c as f32).clamp(0.0, 1.0))
            .unwrap_or(FALLBACK_CONFIDENCE),
        None => FALLBACK_CONFIDENCE,
    };

    let mut params = Params::new();
    if let Some(map) = object.get("params").and_then(Value::as_object) {
        for (key, value) in map {
            if let Some(text) = value.as_str() {
                params.insert(key.clone(), text.to_string());
            }
        }
    }

    ClassificationResult {
        intent,
        confidence,
        params,
        raw_response: raw.to_string(),
        latency_ms,
    }
}

/// Find the first balanced JSON object in free-form text.
///
/// Models wrap their answer in prose or code fences often enough that plain
/// `from_str` on the whole response is not viable. Scans for a brace-balanced
/// candidate (string-literal aware) and tries each one until one parses.
fn extract_json_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..=start + i];
                        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                            return Some(value);
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
        search_from = start + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use recado_test_utils::MockProvider;

    use super::*;

    fn options() -> GenerateOptions {
        GenerateOptions {
            temperature: 0.1,
            max_tokens: 200,
        }
    }

    #[test]
    fn clean_json_parses() {
        let result = parse_response(r#"{"intent": "time", "confidence": 0.93}"#, 5);
        assert_eq!(result.intent, Intent::Time);
        assert!((result.confidence - 0.93).abs() < 1e-6);
        assert_eq!(result.latency_ms, 5);
    }

    #[test]
    fn json_wrapped_in_prose_parses() {
        let raw = "Claro, aquí está:\n```json\n{\"intent\": \"weather\", \"confidence\": 0.8, \"params\": {\"location\": \"Madrid\"}}\n```\nEspero que ayude.";
        let result = parse_response(raw, 12);
        assert_eq!(result.intent, Intent::Weather);
        assert_eq!(result.params.get("location").map(String::as_str), Some("Madrid"));
    }

    #[test]
    fn unrecognized_intent_degrades_to_unknown() {
        let result = parse_response(r#"{"intent": "make_coffee", "confidence": 0.9}"#, 3);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn missing_intent_degrades_to_unknown() {
        let result = parse_response(r#"{"confidence": 0.9}"#, 3);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn non_numeric_confidence_falls_back() {
        let result = parse_response(r#"{"intent": "time", "confidence": "high"}"#, 3);
        assert_eq!(result.intent, Intent::Time);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn absent_confidence_falls_back() {
        let result = parse_response(r#"{"intent": "time"}"#, 3);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let result = parse_response(r#"{"intent": "time", "confidence": 1.7}"#, 3);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn no_json_at_all_degrades_to_unknown() {
        let result = parse_response("lo siento, no puedo ayudarte con eso", 3);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.raw_response.contains("lo siento"));
    }

    #[test]
    fn nested_and_broken_objects_are_skipped() {
        let raw = r#"{oops} {"intent": "reminder", "confidence": 0.7, "params": {"time": "mañana", "message": "llamar"}}"#;
        let value = extract_json_object(raw).expect("second candidate parses");
        assert_eq!(value["intent"], "reminder");
    }

    #[test]
    fn non_string_params_are_dropped() {
        let result =
            parse_response(r#"{"intent": "time", "confidence": 0.9, "params": {"n": 4}}"#, 1);
        assert!(result.params.is_empty());
    }

    #[tokio::test]
    async fn classify_round_trip_through_provider() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"intent": "translate", "confidence": 0.88}"#,
        ]));
        let classifier = Classifier::new(provider, options(), Duration::from_secs(1));
        let result = classifier.classify("traduce esto").await;
        assert_eq!(result.intent, Intent::Translate);
        assert!((result.confidence - 0.88).abs() < 1e-6);
    }

    #[tokio::test]
    async fn backend_error_never_propagates() {
        let provider = Arc::new(MockProvider::new());
        provider.push_failure("connection refused");
        let classifier = Classifier::new(provider, options(), Duration::from_secs(1));
        let result = classifier.classify("hola").await;
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.raw_response.contains("connection refused"));
    }

    #[tokio::test]
    async fn slow_backend_times_out_to_unknown() {
        let provider = Arc::new(
            MockProvider::with_responses(vec![r#"{"intent": "time", "confidence": 0.9}"#])
                .with_delay(Duration::from_millis(200)),
        );
        let classifier = Classifier::new(provider, options(), Duration::from_millis(20));
        let result = classifier.classify("¿qué hora es?").await;
        assert_eq!(result.intent, Intent::Unknown);
        assert!(result.raw_response.contains("timed out"));
    }

    #[test]
    fn prompt_keeps_the_full_taxonomy() {
        for name in [
            "time",
            "weather",
            "reminder",
            "list_reminders",
            "cancel_reminder",
            "translate",
            "grammar",
            "summarize",
            "conversation",
            "question",
            "fact_memory",
            "search",
            "task",
            "multi_intent",
            "ambiguous",
            "unknown",
        ] {
            assert!(CLASSIFY_PROMPT.contains(name), "prompt lost intent {name}");
        }
    }
}
