// ABOUTME: Environment-only configuration for the Overload Progress client
// ABOUTME: Analysis API endpoint, HTTP timeouts, and progression store location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Client configuration loaded from environment variables.
//!
//! All settings have working defaults so the CLI runs against a local
//! analysis service with zero setup.

use std::env;
use std::path::PathBuf;

use crate::errors::{AppResult, ClientError};

/// Default base URL for the exercise-form analysis service.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5050";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analysis service (`OVERLOAD_API_URL`)
    pub api_base_url: String,
    /// Request timeout in seconds (`HTTP_TIMEOUT_SECS`)
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds (`HTTP_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout_secs: u64,
    /// Progression store URL (`OVERLOAD_DATABASE_URL`), `sqlite:` path or
    /// `memory` for the in-process store
    pub database_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            database_url: default_database_url(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a numeric variable is set but does
    /// not parse.
    pub fn from_env() -> AppResult<Self> {
        let api_base_url = env_or("OVERLOAD_API_URL", DEFAULT_API_BASE_URL);
        let database_url =
            env::var("OVERLOAD_DATABASE_URL").unwrap_or_else(|_| default_database_url());

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
            request_timeout_secs: parse_env_u64("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            connect_timeout_secs: parse_env_u64(
                "HTTP_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            database_url,
        })
    }
}

/// Default SQLite location under the platform data directory.
fn default_database_url() -> String {
    let dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    format!(
        "sqlite:{}",
        dir.join("overload-progress").join("progress.db").display()
    )
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env_u64(key: &str, default: u64) -> AppResult<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ClientError::Config(format!("{key} must be an integer, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}
