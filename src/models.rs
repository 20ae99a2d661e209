// ABOUTME: Core domain models for progression tracking and exercise analysis
// ABOUTME: Progression entries, analysis results, BPM samples, and user context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Common data structures shared across the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated user context, passed explicitly into the pipeline instead of
/// being read from ambient state so the stages stay testable without a live
/// identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Identity-service user id
    pub user_id: String,
    /// Display email, when known
    pub email: Option<String>,
}

impl UserContext {
    /// Create a context from a bare user id.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// One recorded (date, weight, reps) observation for a user's exercise.
///
/// Entries are append-only: they are created on explicit user confirmation and
/// never mutated afterwards. `sets` and `notes` only appear on seeded or
/// manually logged entries; the analysis pipeline leaves them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    /// Calendar day the observation was recorded (client-local)
    pub date: NaiveDate,
    /// Weight lifted, non-negative
    pub weight: f64,
    /// Repetition count reported by the analysis service, when available
    pub reps: Option<i64>,
    /// Set count, when logged manually
    pub sets: Option<i64>,
    /// Free-form note, when logged manually
    pub notes: Option<String>,
    /// Owning user id
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Catalog exercise identifier (e.g. `bicep-curl`)
    pub exercise: String,
}

/// One heart-rate observation for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmSample {
    /// Owning user id
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Beats per minute
    pub bpm: i64,
    /// Calendar day the sample was taken
    pub date: NaiveDate,
}

/// Structured output from the remote exercise-form-analysis service.
///
/// Field names follow the service's wire format verbatim (the service speaks
/// Spanish); unknown fields are preserved so the UI can display the response
/// exactly as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Human-readable status message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    /// Analysis-service exercise code (e.g. `tiron_pecho`, `bicep`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ejercicio: Option<String>,
    /// Server-side filename of the processed video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_archivo: Option<String>,
    /// Counted repetitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeticiones: Option<i64>,
    /// Service status flag (`success` / `error`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Error message; the only error channel the UI renders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Any additional service-defined fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Build a result carrying only an error message, the shape the upload
    /// coordinator returns for every failure mode.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether the service (or the coordinator) reported a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_result_preserves_unknown_fields() {
        let raw = r#"{"mensaje":"ok","ejercicio":"bicep","repeticiones":8,"confianza":0.92}"#;
        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.ejercicio.as_deref(), Some("bicep"));
        assert_eq!(result.repeticiones, Some(8));
        assert!(result.extra.contains_key("confianza"));
        assert!(!result.is_error());
    }

    #[test]
    fn from_error_sets_only_the_error_field() {
        let result = AnalysisResult::from_error("Upload failed");
        assert!(result.is_error());
        assert!(result.ejercicio.is_none());
        assert!(result.repeticiones.is_none());
    }
}
