// ABOUTME: Library entry point for the Overload Progress client pipeline
// ABOUTME: Capture, upload, and progression reconciliation for workout videos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

#![deny(unsafe_code)]

//! # Overload Progress Client
//!
//! Client pipeline for video-based exercise form analysis and progressive
//! overload tracking: record a workout video, upload it to the analysis
//! service in a two-phase exchange, and reconcile the result into a
//! persisted progression entry.
//!
//! ## Architecture
//!
//! A single linear pipeline with replaceable stages:
//! - **`capture`**: recorder state machine over a platform camera seam
//! - **`upload`**: upload coordinator and analysis-service REST client
//! - **`progression`**: reconciler from analysis results to stored entries
//! - **`store`**: pluggable progression store (SQLite or in-memory)
//! - **`catalog`** / **`stats`**: static exercise catalog and chart series
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use overload_progress::capture::{Recorder, SyntheticCamera};
//! use overload_progress::config::ClientConfig;
//!
//! let config = ClientConfig::from_env().expect("config");
//! let mut recorder = Recorder::new(Arc::new(SyntheticCamera::new()));
//! recorder.start().expect("camera");
//! println!("analysis service at {}", config.api_base_url);
//! ```

/// Media capture controller and recorder state machine
pub mod capture;

/// Static exercise catalog grouped by muscle
pub mod catalog;

/// Environment-based client configuration
pub mod config;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Core domain models
pub mod models;

/// End-to-end pipeline orchestration
pub mod pipeline;

/// Progression reconciler
pub mod progression;

/// Statistics and chart series assembly
pub mod stats;

/// Pluggable progression store backends
pub mod store;

/// Upload coordinator and analysis-service client
pub mod upload;
