// ABOUTME: Storage abstraction for progression history and related user records
// ABOUTME: Plugin architecture with in-memory and SQLite backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Progression store abstraction.
//!
//! The original deployment keeps progression history in a managed document
//! store addressed by a `muscleGroups/{group}/exercises/{exercise}/
//! progressionHistory` path. That addressing is abstracted here into a
//! compound [`ProgressionKey`] plus a user-id filter so the backend is
//! swappable; entries are append-only and never mutated after creation.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{BpmSample, ProgressionEntry};

pub mod factory;
pub mod memory;
pub mod sqlite;

pub use factory::Database;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Address of one progression collection: (muscle group, exercise).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressionKey {
    /// Muscle group id (e.g. `shoulders`)
    pub muscle_group: String,
    /// Exercise id (e.g. `overhead-press`)
    pub exercise: String,
}

impl ProgressionKey {
    /// Build a key from group and exercise ids.
    #[must_use]
    pub fn new(muscle_group: impl Into<String>, exercise: impl Into<String>) -> Self {
        Self {
            muscle_group: muscle_group.into(),
            exercise: exercise.into(),
        }
    }
}

/// Core progression store trait.
///
/// All backends implement this trait to provide a consistent interface to the
/// pipeline. Write operations are append-only.
#[async_trait]
pub trait ProgressionStore: Send + Sync {
    /// Append one progression entry to the collection addressed by `key`.
    async fn append_entry(&self, key: &ProgressionKey, entry: &ProgressionEntry) -> Result<()>;

    /// Progression history for one user under `key`, oldest first.
    async fn history(&self, key: &ProgressionKey, user_id: &str) -> Result<Vec<ProgressionEntry>>;

    /// Most recent entry under `key` across all users, if any.
    async fn last_entry(&self, key: &ProgressionKey) -> Result<Option<ProgressionEntry>>;

    /// Record the exercise a user currently has selected for analysis.
    async fn set_selected_exercise(&self, user_id: &str, exercise: &str) -> Result<()>;

    /// The user's currently selected exercise, if any.
    async fn selected_exercise(&self, user_id: &str) -> Result<Option<String>>;

    /// Append one heart-rate sample.
    async fn append_bpm(&self, sample: &BpmSample) -> Result<()>;

    /// Heart-rate history for one user, oldest first.
    async fn bpm_history(&self, user_id: &str) -> Result<Vec<BpmSample>>;
}
