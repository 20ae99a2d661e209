// ABOUTME: Unified error types for the Overload Progress client pipeline
// ABOUTME: Covers capture, upload/processing, and reconciliation failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Central error handling for the client pipeline.
//!
//! Capture errors surface immediately to the caller; upload and processing
//! errors are caught at the [`crate::upload::UploadCoordinator`] boundary and
//! folded into the analysis result's `error` field instead of propagating.
//! Reconciliation errors are raised before any network or storage call, so a
//! rejected save never leaves a partial entry behind.

use thiserror::Error;

/// Result type used across the crate.
pub type AppResult<T> = Result<T, ClientError>;

/// Errors produced by the capture, upload, and reconciliation stages.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform denied or lacks a camera/microphone.
    #[error("capture device unavailable: {reason}")]
    CaptureUnavailable {
        /// Platform-provided denial reason
        reason: String,
    },

    /// `start()` was called while a recording session is already active.
    #[error("a recording session is already active")]
    AlreadyRecording,

    /// Stage 1 of the upload exchange failed (non-2xx or network failure).
    #[error("upload failed: {message}")]
    UploadFailed {
        /// Server-provided message, or the generic fallback
        message: String,
    },

    /// Stage 2 of the upload exchange failed (non-2xx, network failure, or
    /// a malformed response body).
    #[error("processing failed: {message}")]
    ProcessingFailed {
        /// Server-provided message or decode failure description
        message: String,
    },

    /// No authenticated user context was supplied.
    #[error("no authenticated user")]
    NotAuthenticated,

    /// No weight input was supplied.
    #[error("no weight supplied")]
    MissingWeight,

    /// The weight input did not parse to a finite non-negative number.
    #[error("invalid weight input: {input:?}")]
    InvalidWeight {
        /// The rejected raw input
        input: String,
    },

    /// Neither the analysis result nor the selected-exercise hint named an
    /// exercise to record against.
    #[error("no exercise selected and none reported by the analysis service")]
    MissingExercise,

    /// Progression store failure.
    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Message suitable for the result-as-data error channel the UI renders.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
