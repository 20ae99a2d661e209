// ABOUTME: Logging configuration and structured logging setup for the client
// ABOUTME: Configures log level and output format from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Structured logging configuration built on `tracing`.

use std::env;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
}

/// Log output format options
#[derive(Debug, Clone)]
pub enum LogFormat {
    /// `JSON` format for machine-consumed logs
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let include_location = env::var("LOG_INCLUDE_LOCATION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            level,
            format,
            include_location,
        }
    }

    /// Initialize the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if a subscriber is already installed.
    pub fn init(&self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_new(&self.level)
            .or_else(|_| EnvFilter::try_new("info"))
            .map_err(|e| anyhow::anyhow!("invalid log filter: {e}"))?;

        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            LogFormat::Json => {
                registry
                    .with(
                        fmt::layer()
                            .json()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location),
                    )
                    .try_init()?;
            }
            LogFormat::Pretty => {
                registry
                    .with(
                        fmt::layer()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location),
                    )
                    .try_init()?;
            }
            LogFormat::Compact => {
                registry
                    .with(
                        fmt::layer()
                            .compact()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location),
                    )
                    .try_init()?;
            }
        }

        info!(level = %self.level, format = ?self.format, "logging initialized");
        Ok(())
    }
}

/// Initialize logging from the environment, ignoring double-init in tests.
pub fn init_from_env() {
    let _ = LoggingConfig::from_env().init();
}
