// ABOUTME: In-memory progression store for tests and offline runs
// ABOUTME: RwLock-guarded maps keyed by (muscle group, exercise) and user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ProgressionKey, ProgressionStore};
use crate::models::{BpmSample, ProgressionEntry};

/// In-memory store backend.
///
/// Cheap to clone; clones share the same underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    progression: HashMap<ProgressionKey, Vec<ProgressionEntry>>,
    selected: HashMap<String, String>,
    bpm: Vec<BpmSample>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored progression entries, across all keys and users.
    pub async fn entry_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.progression.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ProgressionStore for MemoryStore {
    async fn append_entry(&self, key: &ProgressionKey, entry: &ProgressionEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .progression
            .entry(key.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn history(&self, key: &ProgressionKey, user_id: &str) -> Result<Vec<ProgressionEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<ProgressionEntry> = inner
            .progression
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }

    async fn last_entry(&self, key: &ProgressionKey) -> Result<Option<ProgressionEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .progression
            .get(key)
            .and_then(|entries| entries.iter().max_by_key(|e| e.date).cloned()))
    }

    async fn set_selected_exercise(&self, user_id: &str, exercise: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.selected.insert(user_id.to_owned(), exercise.to_owned());
        Ok(())
    }

    async fn selected_exercise(&self, user_id: &str) -> Result<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner.selected.get(user_id).cloned())
    }

    async fn append_bpm(&self, sample: &BpmSample) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.bpm.push(sample.clone());
        Ok(())
    }

    async fn bpm_history(&self, user_id: &str) -> Result<Vec<BpmSample>> {
        let inner = self.inner.read().await;
        let mut samples: Vec<BpmSample> = inner
            .bpm
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        samples.sort_by_key(|s| s.date);
        Ok(samples)
    }
}
