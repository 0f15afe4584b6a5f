// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Recado integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without a live inference backend.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock inference provider with queued responses,
//!   controllable health, and failure/delay injection
//! - [`StaticSignatureSource`] - In-memory learned-keyword source with
//!   read counting and failure injection

pub mod mock_provider;
pub mod signature_source;

pub use mock_provider::MockProvider;
pub use signature_source::StaticSignatureSource;
