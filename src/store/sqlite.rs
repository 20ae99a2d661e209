// ABOUTME: SQLite progression store backend over sqlx
// ABOUTME: Schema setup and append/query operations for local persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! SQLite store implementation.
//!
//! Used when the client runs against a local database instead of the managed
//! document store. Dates are stored as ISO-8601 text so lexicographic and
//! chronological order coincide.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::{ProgressionKey, ProgressionStore};
use crate::models::{BpmSample, ProgressionEntry};

/// SQLite store backend.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and run
    /// schema setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened, or if the
    /// schema statements fail.
    pub async fn new(database_url: &str) -> Result<Self> {
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating data directory {}", parent.display()))?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);

        // An in-memory database exists per connection; keep the pool at one.
        let max_connections = if path == ":memory:" { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("connecting to sqlite database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create tables and indexes if they do not exist.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS progression_history (
                id TEXT PRIMARY KEY,
                muscle_group TEXT NOT NULL,
                exercise TEXT NOT NULL,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                weight REAL NOT NULL,
                reps INTEGER,
                sets INTEGER,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_progression_path
            ON progression_history (muscle_group, exercise, user_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS selected_exercise (
                user_id TEXT PRIMARY KEY,
                exercise TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bpm_history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                bpm INTEGER NOT NULL,
                date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        debug!("sqlite schema ready");
        Ok(())
    }
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressionEntry> {
    let date: String = row.try_get("date")?;
    Ok(ProgressionEntry {
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("malformed date {date:?} in progression_history"))?,
        weight: row.try_get("weight")?,
        reps: row.try_get("reps")?,
        sets: row.try_get("sets")?,
        notes: row.try_get("notes")?,
        user_id: row.try_get("user_id")?,
        exercise: row.try_get("exercise")?,
    })
}

#[async_trait]
impl ProgressionStore for SqliteStore {
    async fn append_entry(&self, key: &ProgressionKey, entry: &ProgressionEntry) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO progression_history
                (id, muscle_group, exercise, user_id, date, weight, reps, sets, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&key.muscle_group)
        .bind(&key.exercise)
        .bind(&entry.user_id)
        .bind(entry.date.format("%Y-%m-%d").to_string())
        .bind(entry.weight)
        .bind(entry.reps)
        .bind(entry.sets)
        .bind(&entry.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn history(&self, key: &ProgressionKey, user_id: &str) -> Result<Vec<ProgressionEntry>> {
        let rows = sqlx::query(
            r"
            SELECT exercise, user_id, date, weight, reps, sets, notes
            FROM progression_history
            WHERE muscle_group = ? AND exercise = ? AND user_id = ?
            ORDER BY date ASC
            ",
        )
        .bind(&key.muscle_group)
        .bind(&key.exercise)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn last_entry(&self, key: &ProgressionKey) -> Result<Option<ProgressionEntry>> {
        let row = sqlx::query(
            r"
            SELECT exercise, user_id, date, weight, reps, sets, notes
            FROM progression_history
            WHERE muscle_group = ? AND exercise = ?
            ORDER BY date DESC
            LIMIT 1
            ",
        )
        .bind(&key.muscle_group)
        .bind(&key.exercise)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn set_selected_exercise(&self, user_id: &str, exercise: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO selected_exercise (user_id, exercise)
            VALUES (?, ?)
            ON CONFLICT (user_id) DO UPDATE SET exercise = excluded.exercise
            ",
        )
        .bind(user_id)
        .bind(exercise)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn selected_exercise(&self, user_id: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            r"
            SELECT exercise FROM selected_exercise WHERE user_id = ?
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.try_get("exercise")).transpose()?)
    }

    async fn append_bpm(&self, sample: &BpmSample) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO bpm_history (id, user_id, bpm, date)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&sample.user_id)
        .bind(sample.bpm)
        .bind(sample.date.format("%Y-%m-%d").to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn bpm_history(&self, user_id: &str) -> Result<Vec<BpmSample>> {
        let rows = sqlx::query(
            r"
            SELECT user_id, bpm, date FROM bpm_history
            WHERE user_id = ?
            ORDER BY date ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let date: String = row.try_get("date")?;
                Ok(BpmSample {
                    user_id: row.try_get("user_id")?,
                    bpm: row.try_get("bpm")?,
                    date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                        .with_context(|| format!("malformed date {date:?} in bpm_history"))?,
                })
            })
            .collect()
    }
}
