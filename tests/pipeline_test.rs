// ABOUTME: End-to-end tests for the workout pipeline
// ABOUTME: Drives capture through upload and reconciliation against fakes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use bytes::Bytes;

use common::{analysis_ok, test_user, FakeAnalysisApi};
use overload_progress::capture::{Recorder, SyntheticCamera};
use overload_progress::errors::ClientError;
use overload_progress::pipeline::WorkoutPipeline;
use overload_progress::store::{MemoryStore, ProgressionKey, ProgressionStore};
use overload_progress::upload::ExerciseKind;

#[tokio::test]
async fn recorded_session_flows_through_to_a_persisted_entry() {
    common::init_test_logging();

    // Record two fragments and finalize.
    let camera = Arc::new(SyntheticCamera::new());
    let mut recorder = Recorder::new(camera.clone());
    recorder.start().unwrap();
    recorder.push_fragment(Bytes::from_static(b"frag-1"));
    recorder.push_fragment(Bytes::from_static(b"frag-2"));
    let blob = recorder.stop().unwrap();
    assert_eq!(camera.live_stream_count(), 0);
    assert_eq!(&blob.data[..], b"frag-1frag-2");

    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("tiron_pecho", 8)));
    let store = MemoryStore::new();
    let pipeline = WorkoutPipeline::new(api.clone(), Arc::new(store.clone()));
    let user = test_user();

    let outcome = pipeline
        .analyze_and_record(
            &blob,
            &ExerciseKind::generic("tiron_pecho"),
            None,
            "20",
            Some(&user),
        )
        .await
        .unwrap();

    assert!(!outcome.analysis.is_error());
    let entry = outcome.entry.unwrap();
    assert_eq!(entry.exercise, "overhead-press");
    assert!((entry.weight - 20.0).abs() < f64::EPSILON);
    assert_eq!(entry.reps, Some(8));

    let history = store
        .history(
            &ProgressionKey::new("shoulders", "overhead-press"),
            &user.user_id,
        )
        .await
        .unwrap();
    assert_eq!(history, vec![entry]);
}

#[tokio::test]
async fn analysis_error_short_circuits_without_persisting() {
    let api = Arc::new(FakeAnalysisApi::failing_process("Archivo no encontrado"));
    let store = MemoryStore::new();
    let pipeline = WorkoutPipeline::new(api, Arc::new(store.clone()));
    let user = test_user();

    let outcome = pipeline
        .analyze_and_record(
            &common::test_blob(),
            &ExerciseKind::generic("bicep"),
            None,
            "12.5",
            Some(&user),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.analysis.error.as_deref(),
        Some("Archivo no encontrado")
    );
    assert!(outcome.entry.is_none());
    assert_eq!(store.entry_count().await, 0);
}

#[tokio::test]
async fn missing_user_is_rejected_before_any_upload() {
    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("bicep", 10)));
    let store = MemoryStore::new();
    let pipeline = WorkoutPipeline::new(api.clone(), Arc::new(store));

    let err = pipeline
        .analyze_and_record(
            &common::test_blob(),
            &ExerciseKind::generic("bicep"),
            None,
            "12.5",
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotAuthenticated));
    assert_eq!(api.upload_call_count(), 0);
}

#[tokio::test]
async fn blank_weight_is_rejected_before_any_upload() {
    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("bicep", 10)));
    let store = MemoryStore::new();
    let pipeline = WorkoutPipeline::new(api.clone(), Arc::new(store));
    let user = test_user();

    let err = pipeline
        .analyze_and_record(
            &common::test_blob(),
            &ExerciseKind::generic("bicep"),
            None,
            "",
            Some(&user),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::MissingWeight));
    assert_eq!(api.upload_call_count(), 0);
}

#[tokio::test]
async fn selected_exercise_hint_reaches_the_entry() {
    // Service reports no exercise code; the stored selection fills the gap.
    let analysis = analysis_ok("bench-press", 6);
    let silent = overload_progress::models::AnalysisResult {
        ejercicio: None,
        ..analysis
    };
    let api = Arc::new(FakeAnalysisApi::succeeding(silent));
    let store = MemoryStore::new();
    let pipeline = WorkoutPipeline::new(api, Arc::new(store.clone()));
    let user = test_user();

    let outcome = pipeline
        .analyze_and_record(
            &common::test_blob(),
            &ExerciseKind::generic("bench-press"),
            Some("bench-press"),
            "60",
            Some(&user),
        )
        .await
        .unwrap();

    let entry = outcome.entry.unwrap();
    assert_eq!(entry.exercise, "bench-press");
    let history = store
        .history(&ProgressionKey::new("chest", "bench-press"), &user.user_id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}
