// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory learned-keyword source for registry tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use recado_core::{LearnedKeyword, RecadoError, SignatureSource};

/// A `SignatureSource` backed by a fixed list, with read counting, one-shot
/// failure injection, and an optional per-read delay.
pub struct StaticSignatureSource {
    entries: Mutex<Vec<LearnedKeyword>>,
    fail_next: Mutex<Option<String>>,
    read_delay: Option<Duration>,
    reads: AtomicUsize,
}

impl StaticSignatureSource {
    pub fn new(entries: Vec<LearnedKeyword>) -> Self {
        Self {
            entries: Mutex::new(entries),
            fail_next: Mutex::new(None),
            read_delay: None,
            reads: AtomicUsize::new(0),
        }
    }

    /// Apply `delay` to every read.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Replace the entries returned by future reads.
    pub fn set_entries(&self, entries: Vec<LearnedKeyword>) {
        *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = entries;
    }

    /// Make the next read fail with the given reason.
    pub fn fail_next_read(&self, reason: &str) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }

    /// Number of reads made against this source, failures included.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignatureSource for StaticSignatureSource {
    async fn learned_keywords(&self) -> Result<Vec<LearnedKeyword>, RecadoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self
            .fail_next
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(RecadoError::Internal(reason));
        }
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
