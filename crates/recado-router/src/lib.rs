// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered intent routing engine.
//!
//! Classifies Spanish-language assistant messages into intents and resolves
//! each to one of three execution tiers: `deterministic` (direct tool call),
//! `local` (bounded local model), or `api` (full agentic escalation).
//!
//! Pipeline per message: fast-path keyword match; on a miss, availability
//! check, model-backed classification, validation rule overrides, and
//! confidence-threshold tier resolution. Every failure mode degrades toward
//! the `api` tier, never toward an incorrect deterministic action.

pub mod availability;
pub mod classifier;
pub mod fastpath;
pub mod learning;
pub mod normalize;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod rules;
pub mod signature;

pub use availability::AvailabilityGuard;
pub use classifier::Classifier;
pub use fastpath::try_fast_path;
pub use learning::{InMemoryLearnedStore, LearningQueue, spawn_learning_worker};
pub use registry::SignatureRegistry;
pub use resolver::TierResolver;
pub use router::IntentRouter;
pub use rules::{RuleOverride, apply_overrides};
pub use signature::{Signature, base_signatures};
