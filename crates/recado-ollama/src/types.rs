// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Ollama HTTP API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Always `false`: classification wants one complete response, not a
    /// token stream.
    pub stream: bool,
    pub options: ModelOptions,
}

/// Generation options nested in a generate request.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOptions {
    pub temperature: f32,
    /// Ollama's name for the max-tokens bound.
    pub num_predict: u32,
}

/// Response body for a non-streaming `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Response body for `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// One installed model in a tags listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
}
