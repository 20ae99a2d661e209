// ABOUTME: Tests for the two-phase upload coordinator
// ABOUTME: Validates stage sequencing, error-as-data folding, and the busy gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use tokio::sync::Notify;

use common::{analysis_ok, test_blob, FakeAnalysisApi};
use overload_progress::upload::{ExerciseKind, TestEndpoint, UploadCoordinator};

#[tokio::test]
async fn successful_upload_returns_analysis_verbatim() {
    common::init_test_logging();
    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("tiron_pecho", 8)));
    let coordinator = UploadCoordinator::new(api.clone());

    let result = coordinator
        .upload(&test_blob(), &ExerciseKind::generic("tiron_pecho"))
        .await;

    assert!(!result.is_error());
    assert_eq!(result.ejercicio.as_deref(), Some("tiron_pecho"));
    assert_eq!(result.repeticiones, Some(8));
    assert_eq!(api.upload_call_count(), 1);
    assert_eq!(api.process_call_count(), 1);
    let processed = api.last_processed.lock().unwrap().clone();
    assert_eq!(
        processed,
        Some(("tiron_pecho".to_owned(), "video.webm".to_owned()))
    );
    assert!(!coordinator.is_busy());
}

#[tokio::test]
async fn stage_one_failure_skips_stage_two() {
    let api = Arc::new(FakeAnalysisApi::failing_upload("No video file provided"));
    let coordinator = UploadCoordinator::new(api.clone());

    let result = coordinator
        .upload(&test_blob(), &ExerciseKind::generic("bicep"))
        .await;

    assert_eq!(result.error.as_deref(), Some("No video file provided"));
    assert_eq!(api.upload_call_count(), 1);
    assert_eq!(api.process_call_count(), 0);
    assert!(!coordinator.is_busy());
}

#[tokio::test]
async fn stage_two_failure_folds_into_error_result() {
    let api = Arc::new(FakeAnalysisApi::failing_process(
        "analysis service returned 500: boom",
    ));
    let coordinator = UploadCoordinator::new(api.clone());

    let result = coordinator
        .upload(&test_blob(), &ExerciseKind::generic("bicep"))
        .await;

    assert_eq!(
        result.error.as_deref(),
        Some("analysis service returned 500: boom")
    );
    assert!(!coordinator.is_busy());
}

#[tokio::test]
async fn named_test_upload_uses_endpoint_file_naming() {
    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("bicep", 10)));
    let coordinator = UploadCoordinator::new(api.clone());

    let kind = ExerciseKind::named_test(TestEndpoint::BicepCurl, "bicep");
    let result = coordinator.upload(&test_blob(), &kind).await;

    assert!(!result.is_error());
    assert_eq!(
        api.last_uploaded_name.lock().unwrap().as_deref(),
        Some("bicep-curl.mp4")
    );
}

#[tokio::test]
async fn concurrent_upload_is_rejected_while_one_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(FakeAnalysisApi::gated(
        analysis_ok("tiron_pecho", 8),
        gate.clone(),
    ));
    let coordinator = Arc::new(UploadCoordinator::new(api.clone()));

    let first = tokio::spawn({
        let coordinator = coordinator.clone();
        async move {
            coordinator
                .upload(&test_blob(), &ExerciseKind::generic("tiron_pecho"))
                .await
        }
    });

    // Wait for the first upload to enter stage 1 and park on the gate.
    while api.upload_call_count() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(coordinator.is_busy());

    let second = coordinator
        .upload(&test_blob(), &ExerciseKind::generic("tiron_pecho"))
        .await;
    assert_eq!(second.error.as_deref(), Some("Upload already in progress"));

    gate.notify_one();
    let first = first.await.unwrap();
    assert!(!first.is_error());
    assert!(!coordinator.is_busy());
    // The rejected attempt never reached the service.
    assert_eq!(api.upload_call_count(), 1);
}

#[tokio::test]
async fn stored_sample_test_shares_the_busy_gate() {
    let api = Arc::new(FakeAnalysisApi::succeeding(analysis_ok("bicep", 12)));
    let coordinator = UploadCoordinator::new(api.clone());

    let result = coordinator.stored_sample_test().await;
    assert!(!result.is_error());
    assert_eq!(api.process_call_count(), 1);
    assert!(!coordinator.is_busy());
}
