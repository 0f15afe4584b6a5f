// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./recado.toml` > `~/.config/recado/recado.toml` > `/etc/recado/recado.toml`
//! with environment variable overrides via `RECADO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RecadoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/recado/recado.toml` (system-wide)
/// 3. `~/.config/recado/recado.toml` (user XDG config)
/// 4. `./recado.toml` (local directory)
/// 5. `RECADO_*` environment variables
pub fn load_config() -> Result<RecadoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for callers that supply config inline.
pub fn load_config_from_str(toml_content: &str) -> Result<RecadoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RecadoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RecadoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RecadoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RecadoConfig::default()))
        .merge(Toml::file("/etc/recado/recado.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("recado/recado.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("recado.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `RECADO_OLLAMA_BASE_URL` must map to
/// `ollama.base_url`, not `ollama.base.url`.
fn env_provider() -> Env {
    Env::prefixed("RECADO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("ollama_", "ollama.", 1)
            .replacen("router_", "router.", 1)
            .replacen("learning_", "learning.", 1);
        mapped.into()
    })
}
