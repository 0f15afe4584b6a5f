// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama inference backend adapter.
//!
//! Implements [`recado_core::InferenceProvider`] against a local Ollama
//! server: non-streaming generation via `/api/generate` and health probing
//! via `/api/tags`.

pub mod client;
pub mod types;

pub use client::OllamaClient;
