// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot-based signature registry.
//!
//! The fast path always reads an immutable snapshot taken at the start of
//! matching, never a structure that can change mid-scan. Learned keywords
//! arrive through a [`SignatureSource`] and are merged into a fresh snapshot
//! on a soft refresh interval, or immediately after [`SignatureRegistry::invalidate`].

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use recado_core::SignatureSource;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::normalize::normalize;
use crate::signature::Signature;

/// Holds the current signature snapshot and refreshes it from an optional
/// learned-keyword source.
///
/// Constructed once at startup and shared by handle; multiple registries
/// (e.g. in tests) never share state.
pub struct SignatureRegistry {
    base: Vec<Signature>,
    source: Option<Arc<dyn SignatureSource>>,
    refresh_interval: Duration,
    snapshot: ArcSwap<Vec<Signature>>,
    refreshed_at: Mutex<Option<Instant>>,
}

impl SignatureRegistry {
    /// Registry over a static table, no learning source.
    pub fn new(base: Vec<Signature>) -> Self {
        let snapshot = ArcSwap::from_pointee(base.clone());
        Self {
            base,
            source: None,
            refresh_interval: Duration::MAX,
            snapshot,
            refreshed_at: Mutex::new(None),
        }
    }

    /// Registry that merges learned keywords from `source` at most once per
    /// `refresh_interval`.
    pub fn with_source(
        base: Vec<Signature>,
        source: Arc<dyn SignatureSource>,
        refresh_interval: Duration,
    ) -> Self {
        let snapshot = ArcSwap::from_pointee(base.clone());
        Self {
            base,
            source: Some(source),
            refresh_interval,
            snapshot,
            refreshed_at: Mutex::new(None),
        }
    }

    /// The current signature snapshot. Cheap; safe to hold across a scan.
    pub fn snapshot(&self) -> Arc<Vec<Signature>> {
        self.snapshot.load_full()
    }

    /// Refresh the snapshot from the source if the interval has elapsed.
    ///
    /// At most one refresh runs at a time; a caller finding one already in
    /// flight returns immediately and the current snapshot stays in service
    /// until the refresh lands. On source failure the previous snapshot
    /// stays in service as well.
    pub async fn refresh_if_stale(&self) {
        let Some(source) = &self.source else {
            return;
        };
        let Ok(mut refreshed_at) = self.refreshed_at.try_lock() else {
            return;
        };
        let fresh = refreshed_at.is_some_and(|at| at.elapsed() < self.refresh_interval);
        if fresh {
            return;
        }

        match source.learned_keywords().await {
            Ok(learned) => {
                let mut table = self.base.clone();
                let mut merged = 0usize;
                for entry in &learned {
                    let keyword = normalize(&entry.keyword);
                    if keyword.is_empty() {
                        continue;
                    }
                    if let Some(sig) = table.iter_mut().find(|s| s.intent == entry.intent) {
                        if !sig.primary_keywords.contains(&keyword)
                            && !sig.secondary_keywords.contains(&keyword)
                        {
                            sig.secondary_keywords.push(keyword);
                            merged += 1;
                        }
                    }
                }
                debug!(learned = learned.len(), merged, "signature registry refreshed");
                self.snapshot.store(Arc::new(table));
                *refreshed_at = Some(Instant::now());
            }
            Err(err) => {
                warn!(error = %err, "signature source read failed, serving previous snapshot");
                // Stamp anyway so a broken source is re-read once per
                // interval, not once per message.
                *refreshed_at = Some(Instant::now());
            }
        }
    }

    /// Drop the refresh stamp so the next [`Self::refresh_if_stale`] call
    /// re-reads the source immediately. Called after a learning event.
    pub async fn invalidate(&self) {
        *self.refreshed_at.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use recado_core::{Intent, LearnedKeyword};
    use recado_test_utils::StaticSignatureSource;

    use super::*;
    use crate::signature::base_signatures;

    fn learned(intent: Intent, keyword: &str) -> LearnedKeyword {
        LearnedKeyword {
            intent,
            keyword: keyword.to_string(),
            confidence: 0.9,
            validated_by: "operator".to_string(),
            learned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn snapshot_without_source_is_the_base_table() {
        let registry = SignatureRegistry::new(base_signatures());
        registry.refresh_if_stale().await;
        assert_eq!(registry.snapshot().len(), base_signatures().len());
    }

    #[tokio::test]
    async fn learned_keywords_merge_as_secondaries() {
        let source = Arc::new(StaticSignatureSource::new(vec![learned(
            Intent::Weather,
            "lluvia",
        )]));
        let registry =
            SignatureRegistry::with_source(base_signatures(), source, Duration::from_secs(45));
        registry.refresh_if_stale().await;

        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        assert!(weather.secondary_keywords.contains(&"lluvia".to_string()));
        assert!(!weather.primary_keywords.contains(&"lluvia".to_string()));
    }

    #[tokio::test]
    async fn learned_keywords_are_normalized_and_deduplicated() {
        let source = Arc::new(StaticSignatureSource::new(vec![
            learned(Intent::Weather, "Lluvia"),
            learned(Intent::Weather, "lluvia"),
            // Already a base primary; must not duplicate.
            learned(Intent::Weather, "clima"),
        ]));
        let registry =
            SignatureRegistry::with_source(base_signatures(), source, Duration::from_secs(45));
        registry.refresh_if_stale().await;

        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        let count = weather
            .secondary_keywords
            .iter()
            .filter(|k| *k == "lluvia")
            .count();
        assert_eq!(count, 1);
        assert!(!weather.secondary_keywords.contains(&"clima".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_respects_the_interval() {
        let source = Arc::new(StaticSignatureSource::new(vec![]));
        let registry =
            SignatureRegistry::with_source(base_signatures(), source.clone(), Duration::from_secs(45));

        registry.refresh_if_stale().await;
        registry.refresh_if_stale().await;
        assert_eq!(source.reads(), 1, "second call within interval is a no-op");

        tokio::time::advance(Duration::from_secs(46)).await;
        registry.refresh_if_stale().await;
        assert_eq!(source.reads(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_immediate_refresh() {
        let source = Arc::new(StaticSignatureSource::new(vec![]));
        let registry =
            SignatureRegistry::with_source(base_signatures(), source.clone(), Duration::from_secs(45));

        registry.refresh_if_stale().await;
        registry.invalidate().await;
        registry.refresh_if_stale().await;
        assert_eq!(source.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_refresh_does_not_block_other_callers() {
        let source = Arc::new(
            StaticSignatureSource::new(vec![learned(Intent::Weather, "lluvia")])
                .with_read_delay(Duration::from_secs(3)),
        );
        let registry = Arc::new(SignatureRegistry::with_source(
            base_signatures(),
            source.clone(),
            Duration::from_secs(45),
        ));

        let refreshing = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.refresh_if_stale().await })
        };
        tokio::task::yield_now().await;

        // The spawned refresh holds the stamp; this call returns at once
        // with the un-merged snapshot instead of waiting the read out.
        registry.refresh_if_stale().await;
        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        assert!(!weather.secondary_keywords.contains(&"lluvia".to_string()));
        assert_eq!(source.reads(), 1, "one read in flight, not two");

        refreshing.await.expect("refresh task completes");
        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        assert!(weather.secondary_keywords.contains(&"lluvia".to_string()));
    }

    #[tokio::test]
    async fn source_failure_keeps_previous_snapshot() {
        let source = Arc::new(StaticSignatureSource::new(vec![learned(
            Intent::Weather,
            "lluvia",
        )]));
        let registry =
            SignatureRegistry::with_source(base_signatures(), source.clone(), Duration::from_secs(45));
        registry.refresh_if_stale().await;

        source.fail_next_read("store offline");
        registry.invalidate().await;
        registry.refresh_if_stale().await;

        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        assert!(
            weather.secondary_keywords.contains(&"lluvia".to_string()),
            "previous merged snapshot stays in service"
        );
    }
}
