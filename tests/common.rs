// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides a scriptable fake analysis API plus blob and user helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared test utilities for `overload_progress`
//!
//! This module provides common setup helpers to reduce duplication across
//! integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use overload_progress::capture::{MediaBlob, WEBM_MIME};
use overload_progress::errors::{AppResult, ClientError};
use overload_progress::models::{AnalysisResult, UserContext};
use overload_progress::upload::{AnalysisApi, TestEndpoint, UploadRequest, UploadResponse};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// A finished recording with a recognizable payload.
pub fn test_blob() -> MediaBlob {
    MediaBlob {
        data: Bytes::from_static(b"webm-bytes"),
        mime: WEBM_MIME.to_owned(),
    }
}

/// An authenticated test user.
pub fn test_user() -> UserContext {
    UserContext {
        user_id: "uid-test".to_owned(),
        email: Some("athlete@example.com".to_owned()),
    }
}

/// A successful generic analysis response.
pub fn analysis_ok(code: &str, reps: i64) -> AnalysisResult {
    let raw = format!(
        r#"{{"mensaje":"Video procesado","ejercicio":"{code}","nombre_archivo":"video.webm","repeticiones":{reps},"estado":"success"}}"#
    );
    serde_json::from_str(&raw).unwrap()
}

/// Scriptable analysis API covering both upload stages.
///
/// Counters record how often each stage ran; the optional `gate` holds stage 1
/// open until notified, which lets tests observe the in-flight busy state.
pub struct FakeAnalysisApi {
    pub upload_response: Mutex<AppResult<UploadResponse>>,
    pub process_response: Mutex<AppResult<AnalysisResult>>,
    pub upload_calls: AtomicUsize,
    pub process_calls: AtomicUsize,
    pub last_uploaded_name: Mutex<Option<String>>,
    pub last_processed: Mutex<Option<(String, String)>>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeAnalysisApi {
    /// Both stages succeed; stage 2 replies with `analysis`.
    pub fn succeeding(analysis: AnalysisResult) -> Self {
        Self {
            upload_response: Mutex::new(Ok(UploadResponse {
                mensaje: Some("Video subido exitosamente".to_owned()),
                filename: "video.webm".to_owned(),
            })),
            process_response: Mutex::new(Ok(analysis)),
            upload_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
            last_uploaded_name: Mutex::new(None),
            last_processed: Mutex::new(None),
            gate: None,
        }
    }

    /// Stage 1 fails with the given server message.
    pub fn failing_upload(message: &str) -> Self {
        let api = Self::succeeding(AnalysisResult::default());
        *api.upload_response.lock().unwrap() = Err(ClientError::UploadFailed {
            message: message.to_owned(),
        });
        api
    }

    /// Stage 1 succeeds, stage 2 fails with the given message.
    pub fn failing_process(message: &str) -> Self {
        let api = Self::succeeding(AnalysisResult::default());
        *api.process_response.lock().unwrap() = Err(ClientError::ProcessingFailed {
            message: message.to_owned(),
        });
        api
    }

    /// Hold stage 1 open until `gate` is notified.
    pub fn gated(analysis: AnalysisResult, gate: Arc<Notify>) -> Self {
        let mut api = Self::succeeding(analysis);
        api.gate = Some(gate);
        api
    }

    pub fn upload_call_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn process_call_count(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }
}

fn clone_result<T: Clone>(result: &AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => Ok(value.clone()),
        Err(ClientError::UploadFailed { message }) => Err(ClientError::UploadFailed {
            message: message.clone(),
        }),
        Err(ClientError::ProcessingFailed { message }) => Err(ClientError::ProcessingFailed {
            message: message.clone(),
        }),
        Err(other) => panic!("unsupported scripted error: {other}"),
    }
}

#[async_trait]
impl AnalysisApi for FakeAnalysisApi {
    async fn upload_video(&self, request: &UploadRequest) -> AppResult<UploadResponse> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_uploaded_name.lock().unwrap() = Some(request.file_name.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        clone_result(&self.upload_response.lock().unwrap())
    }

    async fn process_exercise(&self, code: &str, filename: &str) -> AppResult<AnalysisResult> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_processed.lock().unwrap() = Some((code.to_owned(), filename.to_owned()));
        clone_result(&self.process_response.lock().unwrap())
    }

    async fn run_named_test(
        &self,
        _endpoint: TestEndpoint,
        code: &str,
        filename: &str,
    ) -> AppResult<AnalysisResult> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_processed.lock().unwrap() = Some((code.to_owned(), filename.to_owned()));
        clone_result(&self.process_response.lock().unwrap())
    }

    async fn stored_sample_test(&self) -> AppResult<AnalysisResult> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        clone_result(&self.process_response.lock().unwrap())
    }
}
