// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read path for dynamically learned signature keywords.

use async_trait::async_trait;

use crate::error::RecadoError;
use crate::types::LearnedKeyword;

/// Source of validated learned keywords merged into the signature registry.
///
/// The registry reads the full event log on each soft refresh; sources are
/// append-only and never observe in-flight requests.
#[async_trait]
pub trait SignatureSource: Send + Sync {
    /// Returns all validated learning events recorded so far.
    async fn learned_keywords(&self) -> Result<Vec<LearnedKeyword>, RecadoError>;
}
