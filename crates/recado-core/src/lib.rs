// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Recado tiered intent router.
//!
//! This crate provides the foundational trait definitions, error types, and
//! routing types used throughout the Recado workspace. The routing engine,
//! inference backends, and CLI all build on the seams defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RecadoError;
pub use traits::{InferenceProvider, SignatureSource};
pub use types::{
    ClassificationResult, GenerateOptions, HealthReport, Intent, LearnedKeyword, Params,
    RoutingDecision, Tier,
};
