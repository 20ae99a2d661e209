// ABOUTME: End-to-end workout pipeline wiring capture, upload, and reconciliation
// ABOUTME: One linear flow from finished blob to persisted progression entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Pipeline orchestration: blob → analysis → progression entry.
//!
//! The stages stay independent; this module only sequences them. User
//! context and weight are validated before any network call, an analysis
//! result carrying an `error` field short-circuits without persisting, and a
//! reconciliation failure after a successful analysis surfaces as an error
//! (with nothing written).

use std::sync::Arc;

use tracing::instrument;

use crate::capture::MediaBlob;
use crate::errors::{AppResult, ClientError};
use crate::models::{AnalysisResult, ProgressionEntry, UserContext};
use crate::progression::ProgressionReconciler;
use crate::store::ProgressionStore;
use crate::upload::{AnalysisApi, ExerciseKind, UploadCoordinator};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Analysis-service response, verbatim (possibly an error result)
    pub analysis: AnalysisResult,
    /// Persisted entry, present only when the analysis succeeded and the
    /// save validated
    pub entry: Option<ProgressionEntry>,
}

/// Wires the upload coordinator and reconciler into one flow.
pub struct WorkoutPipeline {
    coordinator: UploadCoordinator,
    reconciler: ProgressionReconciler,
}

impl WorkoutPipeline {
    /// Build a pipeline over an analysis API and a progression store.
    #[must_use]
    pub fn new(api: Arc<dyn AnalysisApi>, store: Arc<dyn ProgressionStore>) -> Self {
        Self {
            coordinator: UploadCoordinator::new(api),
            reconciler: ProgressionReconciler::new(store),
        }
    }

    /// The upload coordinator, for flows that analyze without persisting.
    #[must_use]
    pub const fn coordinator(&self) -> &UploadCoordinator {
        &self.coordinator
    }

    /// Upload a finished recording, run the analysis, and persist the
    /// progression entry.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] or [`ClientError::MissingWeight`]
    /// before any network call; reconciliation errors after a successful
    /// analysis. Upload/processing failures are not errors here; they come
    /// back inside [`PipelineOutcome::analysis`] with no entry persisted.
    #[instrument(skip_all, fields(kind = ?kind.code()))]
    pub async fn analyze_and_record(
        &self,
        blob: &MediaBlob,
        kind: &ExerciseKind,
        selected_exercise_hint: Option<&str>,
        weight_input: &str,
        user: Option<&UserContext>,
    ) -> AppResult<PipelineOutcome> {
        // Cheap rejections happen before the upload is even attempted.
        if user.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        if weight_input.trim().is_empty() {
            return Err(ClientError::MissingWeight);
        }

        let analysis = self.coordinator.upload(blob, kind).await;
        if analysis.is_error() {
            return Ok(PipelineOutcome {
                analysis,
                entry: None,
            });
        }

        let entry = self
            .reconciler
            .save(&analysis, selected_exercise_hint, weight_input, user)
            .await?;

        Ok(PipelineOutcome {
            analysis,
            entry: Some(entry),
        })
    }
}
