// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.

pub mod provider;
pub mod signatures;

pub use provider::InferenceProvider;
pub use signatures::SignatureSource;
