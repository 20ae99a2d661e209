// ABOUTME: Progression reconciler mapping analysis results to persisted entries
// ABOUTME: Validates auth and weight before any store access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Reconciliation of an analysis result into a persisted progression entry.
//!
//! Nothing is persisted until every input validates: the user context and
//! weight are checked first, the exercise id is resolved (service code
//! preferred, selected-exercise hint as fallback) and normalized to a catalog
//! id, and the owning muscle group is derived from the catalog. A rejected
//! save never writes a partial entry.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, instrument};

use crate::catalog::{muscle_group_for, normalize_exercise_code};
use crate::errors::{AppResult, ClientError};
use crate::models::{AnalysisResult, ProgressionEntry, UserContext};
use crate::store::{ProgressionKey, ProgressionStore};

/// Maps analysis output plus user input into the progression store.
pub struct ProgressionReconciler {
    store: Arc<dyn ProgressionStore>,
}

impl ProgressionReconciler {
    /// Create a reconciler over a progression store.
    #[must_use]
    pub fn new(store: Arc<dyn ProgressionStore>) -> Self {
        Self { store }
    }

    /// Persist one progression entry derived from `analysis` and the
    /// user-entered weight.
    ///
    /// The entry is stamped with the current client-local calendar day and
    /// appended under the (muscle group, exercise) path owning the resolved
    /// exercise.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a user context,
    /// [`ClientError::MissingWeight`] for empty weight input,
    /// [`ClientError::MissingExercise`] when neither the analysis result nor
    /// the hint names an exercise, and [`ClientError::InvalidWeight`] when
    /// the weight does not parse to a finite non-negative number. All are
    /// raised before the store is touched.
    #[instrument(skip(self, analysis, user), fields(hint = ?selected_exercise_hint))]
    pub async fn save(
        &self,
        analysis: &AnalysisResult,
        selected_exercise_hint: Option<&str>,
        weight_input: &str,
        user: Option<&UserContext>,
    ) -> AppResult<ProgressionEntry> {
        let user = user.ok_or(ClientError::NotAuthenticated)?;

        let weight_raw = weight_input.trim();
        if weight_raw.is_empty() {
            return Err(ClientError::MissingWeight);
        }

        let code = analysis
            .ejercicio
            .as_deref()
            .filter(|code| !code.is_empty())
            .or(selected_exercise_hint)
            .ok_or(ClientError::MissingExercise)?;
        let exercise = normalize_exercise_code(code);
        let muscle_group = muscle_group_for(exercise);

        let weight = parse_weight(weight_raw)?;

        let entry = ProgressionEntry {
            date: Local::now().date_naive(),
            weight,
            reps: analysis.repeticiones,
            sets: None,
            notes: None,
            user_id: user.user_id.clone(),
            exercise: exercise.to_owned(),
        };

        let key = ProgressionKey::new(muscle_group, exercise);
        self.store
            .append_entry(&key, &entry)
            .await
            .map_err(ClientError::Storage)?;

        info!(
            muscle_group,
            exercise,
            weight,
            reps = ?entry.reps,
            "progression entry recorded"
        );
        Ok(entry)
    }
}

fn parse_weight(raw: &str) -> AppResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| ClientError::InvalidWeight {
            input: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_parsing_accepts_decimals() {
        assert!((parse_weight("12.5").unwrap() - 12.5).abs() < f64::EPSILON);
        assert!((parse_weight("0").unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn weight_parsing_rejects_negative_and_garbage() {
        assert!(matches!(
            parse_weight("-1"),
            Err(ClientError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_weight("abc"),
            Err(ClientError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_weight("NaN"),
            Err(ClientError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_weight("inf"),
            Err(ClientError::InvalidWeight { .. })
        ));
    }
}
