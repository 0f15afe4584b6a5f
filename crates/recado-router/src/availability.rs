// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL-cached backend availability.
//!
//! Exists purely to avoid paying a health-check round trip on every message.
//! The verdict is cached for a configurable TTL and may be up to one TTL
//! stale; that staleness is an accepted tradeoff. Failed probes are never
//! retried inline, only by whichever caller next notices the cache expired.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use recado_core::InferenceProvider;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

struct GuardState {
    checked_at: Option<Instant>,
    last_failure: Option<String>,
}

/// Caches the inference backend's health verdict.
///
/// The state lock is try-acquired: whoever gets it on an expired cache runs
/// the single probe, and every other caller serves the cached verdict
/// without waiting, so a slow probe never serializes message processing.
pub struct AvailabilityGuard {
    provider: Arc<dyn InferenceProvider>,
    ttl: Duration,
    probe_timeout: Duration,
    verdict: AtomicBool,
    state: Mutex<GuardState>,
}

impl AvailabilityGuard {
    pub fn new(provider: Arc<dyn InferenceProvider>, ttl: Duration, probe_timeout: Duration) -> Self {
        Self {
            provider,
            ttl,
            probe_timeout,
            verdict: AtomicBool::new(false),
            state: Mutex::new(GuardState {
                checked_at: None,
                last_failure: None,
            }),
        }
    }

    /// Cached backend verdict, re-probed at most once per TTL.
    ///
    /// Never blocks behind another caller: a probe already in flight means
    /// the previous verdict is served as-is.
    pub async fn is_available(&self) -> bool {
        let Ok(mut state) = self.state.try_lock() else {
            return self.verdict.load(Ordering::Acquire);
        };
        let fresh = state
            .checked_at
            .is_some_and(|at| at.elapsed() < self.ttl);
        if !fresh {
            let (available, failure) = self.probe().await;
            self.verdict.store(available, Ordering::Release);
            state.checked_at = Some(Instant::now());
            state.last_failure = failure;
        }
        self.verdict.load(Ordering::Acquire)
    }

    /// The most recent probe failure reason, for diagnostics. Cleared by the
    /// next successful probe.
    pub async fn last_failure(&self) -> Option<String> {
        self.state.lock().await.last_failure.clone()
    }

    /// Drop the cached verdict so the next call probes immediately.
    pub async fn invalidate(&self) {
        self.state.lock().await.checked_at = None;
    }

    async fn probe(&self) -> (bool, Option<String>) {
        let outcome = tokio::time::timeout(self.probe_timeout, self.provider.health_check()).await;
        match outcome {
            Ok(Ok(report)) if report.available && report.model_loaded.is_some() => {
                debug!(
                    backend = self.provider.name(),
                    model = report.model_loaded.as_deref(),
                    "backend healthy"
                );
                (true, None)
            }
            Ok(Ok(report)) => {
                let reason = if report.available {
                    "expected model not loaded".to_string()
                } else {
                    "backend reported unavailable".to_string()
                };
                warn!(backend = self.provider.name(), %reason, "backend unusable");
                (false, Some(reason))
            }
            Ok(Err(err)) => {
                warn!(backend = self.provider.name(), error = %err, "health probe failed");
                (false, Some(err.to_string()))
            }
            Err(_) => {
                let reason = format!(
                    "health probe timed out after {}ms",
                    self.probe_timeout.as_millis()
                );
                warn!(backend = self.provider.name(), %reason, "health probe failed");
                (false, Some(reason))
            }
        }
    }
}
