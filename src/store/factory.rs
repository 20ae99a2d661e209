// ABOUTME: Store factory selecting a backend from the database URL
// ABOUTME: Unified wrapper delegating to SQLite or in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Store factory with URL-based backend detection.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::info;

use super::memory::MemoryStore;
use super::sqlite::SqliteStore;
use super::{ProgressionKey, ProgressionStore};
use crate::models::{BpmSample, ProgressionEntry};

/// Store instance wrapper that delegates to the selected backend.
#[derive(Clone)]
pub enum Database {
    /// File-backed (or `:memory:`) SQLite store
    Sqlite(SqliteStore),
    /// Process-local in-memory store
    Memory(MemoryStore),
}

impl Database {
    /// Create a store from a database URL.
    ///
    /// `memory` selects the in-process store; `sqlite:` URLs (and bare file
    /// paths) select SQLite.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQLite database cannot be opened.
    pub async fn new(database_url: &str) -> Result<Self> {
        if database_url == "memory" {
            info!("using in-memory progression store");
            return Ok(Self::Memory(MemoryStore::new()));
        }
        if database_url.starts_with("sqlite:") || !database_url.contains(':') {
            let store = SqliteStore::new(database_url).await?;
            info!(url = %database_url, "using sqlite progression store");
            return Ok(Self::Sqlite(store));
        }
        Err(anyhow!("unsupported database url: {database_url}"))
    }

    /// Descriptive string for the active backend.
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLite (local persistence)",
            Self::Memory(_) => "Memory (ephemeral)",
        }
    }
}

#[async_trait]
impl ProgressionStore for Database {
    async fn append_entry(&self, key: &ProgressionKey, entry: &ProgressionEntry) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.append_entry(key, entry).await,
            Self::Memory(store) => store.append_entry(key, entry).await,
        }
    }

    async fn history(&self, key: &ProgressionKey, user_id: &str) -> Result<Vec<ProgressionEntry>> {
        match self {
            Self::Sqlite(store) => store.history(key, user_id).await,
            Self::Memory(store) => store.history(key, user_id).await,
        }
    }

    async fn last_entry(&self, key: &ProgressionKey) -> Result<Option<ProgressionEntry>> {
        match self {
            Self::Sqlite(store) => store.last_entry(key).await,
            Self::Memory(store) => store.last_entry(key).await,
        }
    }

    async fn set_selected_exercise(&self, user_id: &str, exercise: &str) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.set_selected_exercise(user_id, exercise).await,
            Self::Memory(store) => store.set_selected_exercise(user_id, exercise).await,
        }
    }

    async fn selected_exercise(&self, user_id: &str) -> Result<Option<String>> {
        match self {
            Self::Sqlite(store) => store.selected_exercise(user_id).await,
            Self::Memory(store) => store.selected_exercise(user_id).await,
        }
    }

    async fn append_bpm(&self, sample: &BpmSample) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.append_bpm(sample).await,
            Self::Memory(store) => store.append_bpm(sample).await,
        }
    }

    async fn bpm_history(&self, user_id: &str) -> Result<Vec<BpmSample>> {
        match self {
            Self::Sqlite(store) => store.bpm_history(user_id).await,
            Self::Memory(store) => store.bpm_history(user_id).await,
        }
    }
}
