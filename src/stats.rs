// ABOUTME: Progressive-overload summaries and chart series assembly
// ABOUTME: Date-sorted weight and heart-rate series for the statistics views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Statistics over progression history.
//!
//! Chart rendering happens elsewhere; this module only assembles the
//! date-ordered series and the overload summary shown next to them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{BpmSample, ProgressionEntry};
use crate::store::{ProgressionKey, ProgressionStore};

/// Chart definition: one exercise's weight progression.
#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    /// Display label
    pub label: &'static str,
    /// Muscle group id
    pub muscle_group: &'static str,
    /// Exercise id
    pub exercise: &'static str,
}

/// The progression charts shown by default.
pub const DEFAULT_CHARTS: [ChartConfig; 3] = [
    ChartConfig {
        label: "Bench Press Progression",
        muscle_group: "chest",
        exercise: "bench-press",
    },
    ChartConfig {
        label: "Bicep Curl Progression",
        muscle_group: "arms",
        exercise: "bicep-curl",
    },
    ChartConfig {
        label: "Overhead Press Progression",
        muscle_group: "shoulders",
        exercise: "overhead-press",
    },
];

/// Summary of progressive overload across a history, first session to last.
#[derive(Debug, Clone, Serialize)]
pub struct OverloadSummary {
    /// Date of the earliest session
    pub start_date: NaiveDate,
    /// Date of the latest session
    pub end_date: NaiveDate,
    /// Weight change from first to last session
    pub weight_delta: f64,
    /// Weight change as a percentage of the first session, when defined
    pub weight_delta_pct: Option<f64>,
    /// Number of recorded sessions
    pub total_sessions: usize,
}

/// Compute the overload summary for a history. Needs at least two entries.
#[must_use]
pub fn overload_summary(entries: &[ProgressionEntry]) -> Option<OverloadSummary> {
    if entries.len() < 2 {
        return None;
    }

    let mut sorted: Vec<&ProgressionEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let first = sorted.first()?;
    let last = sorted.last()?;
    let weight_delta = last.weight - first.weight;
    let weight_delta_pct = if first.weight > 0.0 {
        Some(weight_delta / first.weight * 100.0)
    } else {
        None
    };

    Some(OverloadSummary {
        start_date: first.date,
        end_date: last.date,
        weight_delta,
        weight_delta_pct,
        total_sessions: sorted.len(),
    })
}

/// One user's date-ordered weight series for a chart.
///
/// # Errors
///
/// Returns an error if the history read fails.
pub async fn progression_series(
    store: &dyn ProgressionStore,
    config: &ChartConfig,
    user_id: &str,
) -> anyhow::Result<Vec<ProgressionEntry>> {
    let key = ProgressionKey::new(config.muscle_group, config.exercise);
    store.history(&key, user_id).await
}

/// One user's date-ordered heart-rate series.
///
/// # Errors
///
/// Returns an error if the history read fails.
pub async fn bpm_series(
    store: &dyn ProgressionStore,
    user_id: &str,
) -> anyhow::Result<Vec<BpmSample>> {
    store.bpm_history(user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, weight: f64) -> ProgressionEntry {
        ProgressionEntry {
            date: date.parse().unwrap(),
            weight,
            reps: Some(8),
            sets: None,
            notes: None,
            user_id: "u1".into(),
            exercise: "bench-press".into(),
        }
    }

    #[test]
    fn summary_spans_first_to_last_by_date() {
        let entries = vec![
            entry("2025-03-10", 70.0),
            entry("2025-01-01", 60.0),
            entry("2025-02-01", 65.0),
        ];
        let summary = overload_summary(&entries).unwrap();
        assert_eq!(summary.start_date, "2025-01-01".parse().unwrap());
        assert_eq!(summary.end_date, "2025-03-10".parse().unwrap());
        assert!((summary.weight_delta - 10.0).abs() < f64::EPSILON);
        let pct = summary.weight_delta_pct.unwrap();
        assert!((pct - 16.666).abs() < 0.01);
        assert_eq!(summary.total_sessions, 3);
    }

    #[test]
    fn summary_needs_two_sessions() {
        assert!(overload_summary(&[]).is_none());
        assert!(overload_summary(&[entry("2025-01-01", 60.0)]).is_none());
    }

    #[test]
    fn zero_starting_weight_has_no_percentage() {
        let entries = vec![entry("2025-01-01", 0.0), entry("2025-02-01", 5.0)];
        let summary = overload_summary(&entries).unwrap();
        assert!(summary.weight_delta_pct.is_none());
    }
}
