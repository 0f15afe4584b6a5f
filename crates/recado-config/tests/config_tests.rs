// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Recado configuration system.

use recado_config::{ConfigError, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_recado_config() {
    let toml = r#"
[agent]
name = "test-assistant"
log_level = "debug"

[ollama]
base_url = "http://localhost:11434"
model = "qwen2.5:3b"
temperature = 0.2
max_tokens = 150
request_timeout_secs = 10

[router]
default_threshold = 0.75
availability_ttl_secs = 20
health_timeout_secs = 3
registry_refresh_secs = 60

[router.thresholds]
cancel_reminder = 0.95
time = 0.6

[learning]
enabled = true
queue_capacity = 32
min_confidence = 0.85
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-assistant");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.ollama.base_url, "http://localhost:11434");
    assert_eq!(config.ollama.model, "qwen2.5:3b");
    assert_eq!(config.ollama.max_tokens, 150);
    assert_eq!(config.router.default_threshold, 0.75);
    assert_eq!(config.router.thresholds.get("cancel_reminder"), Some(&0.95));
    assert_eq!(config.router.thresholds.get("time"), Some(&0.6));
    assert!(config.learning.enabled);
    assert_eq!(config.learning.queue_capacity, 32);
}

/// Unknown field in [ollama] section is rejected.
#[test]
fn unknown_field_in_ollama_produces_error() {
    let toml = r#"
[ollama]
modle = "qwen2.5:3b"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("modle"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "recado");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.ollama.base_url, "http://127.0.0.1:11434");
    assert_eq!(config.ollama.temperature, 0.1);
    assert_eq!(config.router.default_threshold, 0.8);
    assert!(config.router.thresholds.is_empty());
    assert_eq!(config.router.availability_ttl_secs, 30);
    assert!(!config.learning.enabled);
}

/// load_and_validate_str surfaces typo suggestions through the diagnostic bridge.
#[test]
fn typo_in_key_yields_unknown_key_diagnostic() {
    let toml = r#"
[router]
default_treshold = 0.7
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, .. } if key == "default_treshold"
    )));
}

/// Semantic validation runs after successful deserialization.
#[test]
fn out_of_range_threshold_is_a_validation_error() {
    let toml = r#"
[router]
default_threshold = 1.5
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("default_threshold")
    )));
}

/// Wrong value type is reported as an invalid type diagnostic.
#[test]
fn wrong_type_yields_invalid_type_diagnostic() {
    let toml = r#"
[ollama]
max_tokens = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected an InvalidType diagnostic, got: {errors:?}"
    );
}
