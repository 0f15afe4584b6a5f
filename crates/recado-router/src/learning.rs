// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-learning plumbing.
//!
//! Learned keywords flow through a bounded fire-and-forget queue into a
//! background worker, which validates them and appends to a
//! [`SignatureSource`] the registry reads on its next refresh. The hot
//! routing path never blocks on learning: when the queue is full the event
//! is dropped with a warning.

use std::sync::Arc;

use async_trait::async_trait;
use recado_core::{LearnedKeyword, RecadoError, SignatureSource};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::registry::SignatureRegistry;

/// Append-only in-memory store of validated learned keywords.
#[derive(Default)]
pub struct InMemoryLearnedStore {
    entries: RwLock<Vec<LearnedKeyword>>,
}

impl InMemoryLearnedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, entry: LearnedKeyword) {
        self.entries.write().await.push(entry);
    }
}

#[async_trait]
impl SignatureSource for InMemoryLearnedStore {
    async fn learned_keywords(&self) -> Result<Vec<LearnedKeyword>, RecadoError> {
        Ok(self.entries.read().await.clone())
    }
}

/// Sender half of the learning queue. Cloneable; dropping every handle shuts
/// the worker down after it drains the queue.
#[derive(Clone)]
pub struct LearningQueue {
    tx: mpsc::Sender<LearnedKeyword>,
}

impl LearningQueue {
    /// Fire-and-forget submission. A full queue drops the event rather than
    /// blocking the caller.
    pub fn submit(&self, event: LearnedKeyword) {
        if let Err(err) = self.tx.try_send(event) {
            match err {
                mpsc::error::TrySendError::Full(event) => {
                    warn!(
                        intent = %event.intent,
                        keyword = %event.keyword,
                        "learning queue full, dropping event"
                    );
                }
                mpsc::error::TrySendError::Closed(_) => {
                    warn!("learning worker gone, dropping event");
                }
            }
        }
    }
}

/// Spawn the background merge worker.
///
/// Events below `min_confidence` are discarded; accepted events are appended
/// to `store` and the registry's refresh stamp is invalidated so the next
/// message sees the new keyword.
pub fn spawn_learning_worker(
    queue_capacity: usize,
    min_confidence: f32,
    store: Arc<InMemoryLearnedStore>,
    registry: Arc<SignatureRegistry>,
) -> (LearningQueue, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let handle = tokio::spawn(run_worker(rx, min_confidence, store, registry));
    (LearningQueue { tx }, handle)
}

async fn run_worker(
    mut rx: mpsc::Receiver<LearnedKeyword>,
    min_confidence: f32,
    store: Arc<InMemoryLearnedStore>,
    registry: Arc<SignatureRegistry>,
) {
    while let Some(event) = rx.recv().await {
        if event.confidence < min_confidence {
            debug!(
                intent = %event.intent,
                keyword = %event.keyword,
                confidence = event.confidence,
                "learning event below confidence floor, discarded"
            );
            continue;
        }
        info!(
            intent = %event.intent,
            keyword = %event.keyword,
            validated_by = %event.validated_by,
            "learned keyword accepted"
        );
        store.append(event).await;
        registry.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use recado_core::Intent;

    use super::*;
    use crate::signature::base_signatures;

    fn event(keyword: &str, confidence: f32) -> LearnedKeyword {
        LearnedKeyword {
            intent: Intent::Weather,
            keyword: keyword.to_string(),
            confidence,
            validated_by: "operator".to_string(),
            learned_at: Utc::now(),
        }
    }

    fn registry_with(store: Arc<InMemoryLearnedStore>) -> Arc<SignatureRegistry> {
        Arc::new(SignatureRegistry::with_source(
            base_signatures(),
            store,
            std::time::Duration::from_secs(45),
        ))
    }

    #[tokio::test]
    async fn accepted_events_reach_the_store() {
        let store = Arc::new(InMemoryLearnedStore::new());
        let registry = registry_with(store.clone());
        let (queue, handle) = spawn_learning_worker(8, 0.8, store.clone(), registry);

        queue.submit(event("lluvia", 0.9));
        drop(queue);
        handle.await.expect("worker exits cleanly");

        let entries = store.learned_keywords().await.expect("store readable");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].keyword, "lluvia");
    }

    #[tokio::test]
    async fn low_confidence_events_are_discarded() {
        let store = Arc::new(InMemoryLearnedStore::new());
        let registry = registry_with(store.clone());
        let (queue, handle) = spawn_learning_worker(8, 0.8, store.clone(), registry);

        queue.submit(event("granizo", 0.5));
        queue.submit(event("lluvia", 0.95));
        drop(queue);
        handle.await.expect("worker exits cleanly");

        let entries = store.learned_keywords().await.expect("store readable");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].keyword, "lluvia");
    }

    #[tokio::test]
    async fn accepted_event_triggers_registry_refresh() {
        let store = Arc::new(InMemoryLearnedStore::new());
        let registry = registry_with(store.clone());
        registry.refresh_if_stale().await;

        let (queue, handle) = spawn_learning_worker(8, 0.8, store.clone(), registry.clone());
        queue.submit(event("lluvia", 0.9));
        drop(queue);
        handle.await.expect("worker exits cleanly");

        // Invalidation makes the next refresh merge immediately, not after
        // the soft interval.
        registry.refresh_if_stale().await;
        let snapshot = registry.snapshot();
        let weather = snapshot
            .iter()
            .find(|s| s.intent == Intent::Weather)
            .expect("weather signature present");
        assert!(weather.secondary_keywords.contains(&"lluvia".to_string()));
    }

    #[tokio::test]
    async fn full_queue_drops_newest_without_blocking() {
        // No worker draining: fill the channel directly.
        let (tx, mut rx) = mpsc::channel(2);
        let queue = LearningQueue { tx };
        queue.submit(event("uno", 0.9));
        queue.submit(event("dos", 0.9));
        queue.submit(event("tres", 0.9)); // dropped

        assert_eq!(rx.recv().await.map(|e| e.keyword).as_deref(), Some("uno"));
        assert_eq!(rx.recv().await.map(|e| e.keyword).as_deref(), Some("dos"));
        rx.close();
        assert!(rx.recv().await.is_none());
    }
}
