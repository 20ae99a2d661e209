// ABOUTME: Upload coordinator driving the two-phase transfer/process exchange
// ABOUTME: Folds every failure into the analysis result's error field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Upload coordination for recorded workout videos.
//!
//! A finished [`MediaBlob`] is wrapped as a named file and pushed through a
//! strictly sequential two-phase exchange: stage 1 transfers the file to the
//! analysis service's upload endpoint, stage 2 invokes a processing endpoint
//! with the filename stage 1 returned. Stage 2 is never issued unless stage 1
//! succeeded.
//!
//! The coordinator never lets a rejected network call escape: the UI has no
//! other error channel, so every failure comes back as an
//! [`AnalysisResult`] carrying an `error` field. One upload may be in flight
//! per coordinator; the busy flag is advisory and is cleared on every exit
//! path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capture::{MediaBlob, WEBM_MIME};
use crate::errors::{AppResult, ClientError};
use crate::models::AnalysisResult;

pub mod api_client;

pub use api_client::{AnalysisApiClient, AnalysisApiConfig};

/// MIME type used for named-test uploads.
pub const MP4_MIME: &str = "video/mp4";

/// Filename used for generic analysis uploads.
pub const GENERIC_UPLOAD_NAME: &str = "video.webm";

/// Named processing endpoints exposed by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestEndpoint {
    /// `POST /test_video`
    TestVideo,
    /// `POST /overhead-press`
    OverheadPress,
    /// `POST /bicep-curl`
    BicepCurl,
}

impl TestEndpoint {
    /// URL path of the endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::TestVideo => "/test_video",
            Self::OverheadPress => "/overhead-press",
            Self::BicepCurl => "/bicep-curl",
        }
    }

    const fn file_stem(self) -> &'static str {
        match self {
            Self::TestVideo | Self::OverheadPress => "overhead-press",
            Self::BicepCurl => "bicep-curl",
        }
    }
}

/// Which analysis flow an upload feeds, and under which service-side code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseKind {
    /// Generic analysis via the form-encoded `/ejercicio` endpoint
    Generic {
        /// Analysis-service exercise code (e.g. `tiron_pecho`)
        code: String,
    },
    /// One of the JSON-encoded named test endpoints
    NamedTest {
        /// Endpoint to invoke after upload
        endpoint: TestEndpoint,
        /// Analysis-service exercise code
        code: String,
    },
}

impl ExerciseKind {
    /// Generic analysis for a service exercise code.
    #[must_use]
    pub fn generic(code: impl Into<String>) -> Self {
        Self::Generic { code: code.into() }
    }

    /// Named-test flow for a service exercise code.
    #[must_use]
    pub fn named_test(endpoint: TestEndpoint, code: impl Into<String>) -> Self {
        Self::NamedTest {
            endpoint,
            code: code.into(),
        }
    }

    /// The service exercise code this upload is tagged with.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Generic { code } | Self::NamedTest { code, .. } => code,
        }
    }

    fn file_name(&self) -> String {
        match self {
            Self::Generic { .. } => GENERIC_UPLOAD_NAME.to_owned(),
            Self::NamedTest { endpoint, .. } => format!("{}.mp4", endpoint.file_stem()),
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            Self::Generic { .. } => WEBM_MIME,
            Self::NamedTest { .. } => MP4_MIME,
        }
    }
}

/// File-like artifact sent to the upload endpoint. Immutable once built.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Filename presented in the multipart payload
    pub file_name: String,
    /// Declared MIME type
    pub mime: String,
    /// Media payload
    pub data: Bytes,
}

impl UploadRequest {
    /// Wrap a finished blob as a named file for the given flow.
    #[must_use]
    pub fn from_blob(blob: &MediaBlob, kind: &ExerciseKind) -> Self {
        Self {
            file_name: kind.file_name(),
            mime: kind.mime().to_owned(),
            data: blob.data.clone(),
        }
    }
}

/// Successful response from the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status message
    pub mensaje: Option<String>,
    /// Server-side filename to feed into stage 2
    pub filename: String,
}

/// Analysis-service API surface, kept behind a trait so the coordinator can
/// be exercised without a live service.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Stage 1: transfer the artifact as a multipart payload.
    async fn upload_video(&self, request: &UploadRequest) -> AppResult<UploadResponse>;

    /// Stage 2 (generic): form-encoded analysis of an uploaded file.
    async fn process_exercise(&self, code: &str, filename: &str) -> AppResult<AnalysisResult>;

    /// Stage 2 (named test): JSON-encoded analysis of an uploaded file.
    async fn run_named_test(
        &self,
        endpoint: TestEndpoint,
        code: &str,
        filename: &str,
    ) -> AppResult<AnalysisResult>;

    /// Run the service's stored bicep-curl sample, no upload involved.
    async fn stored_sample_test(&self) -> AppResult<AnalysisResult>;
}

/// Coordinates uploads against the analysis service, one at a time.
pub struct UploadCoordinator {
    api: Arc<dyn AnalysisApi>,
    busy: AtomicBool,
}

impl UploadCoordinator {
    /// Create a coordinator over an analysis API implementation.
    #[must_use]
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self {
            api,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether an upload is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run the two-phase upload-then-process exchange.
    ///
    /// Always returns an [`AnalysisResult`]; failures of either stage (and a
    /// busy coordinator) come back with the `error` field set.
    pub async fn upload(&self, blob: &MediaBlob, kind: &ExerciseKind) -> AnalysisResult {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            warn!("upload rejected: another upload is in flight");
            return AnalysisResult::from_error("Upload already in progress");
        };

        let request = UploadRequest::from_blob(blob, kind);
        debug!(file = %request.file_name, bytes = request.data.len(), "stage 1: transfer");

        let uploaded = match self.api.upload_video(&request).await {
            Ok(response) => response,
            Err(err) => return AnalysisResult::from_error(stage_message(err)),
        };

        debug!(filename = %uploaded.filename, "stage 2: processing");
        let outcome = match kind {
            ExerciseKind::Generic { code } => {
                self.api.process_exercise(code, &uploaded.filename).await
            }
            ExerciseKind::NamedTest { endpoint, code } => {
                self.api
                    .run_named_test(*endpoint, code, &uploaded.filename)
                    .await
            }
        };

        match outcome {
            Ok(result) => result,
            Err(err) => AnalysisResult::from_error(stage_message(err)),
        }
    }

    /// Run the stored bicep-curl sample test (`GET /test_bicep_curl`).
    ///
    /// Shares the busy gate with [`upload`](Self::upload).
    pub async fn stored_sample_test(&self) -> AnalysisResult {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return AnalysisResult::from_error("Upload already in progress");
        };

        match self.api.stored_sample_test().await {
            Ok(result) => result,
            Err(err) => AnalysisResult::from_error(stage_message(err)),
        }
    }
}

/// Message carried into the result-as-data error channel; stage errors keep
/// the raw server message (the UI renders it directly).
fn stage_message(err: ClientError) -> String {
    match err {
        ClientError::UploadFailed { message } | ClientError::ProcessingFailed { message } => {
            message
        }
        other => other.user_message(),
    }
}

/// Clears the busy flag on drop so it is released on every exit path.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_uploads_are_named_video_webm() {
        let kind = ExerciseKind::generic("tiron_pecho");
        let blob = MediaBlob {
            data: Bytes::from_static(b"v"),
            mime: WEBM_MIME.to_owned(),
        };
        let request = UploadRequest::from_blob(&blob, &kind);
        assert_eq!(request.file_name, "video.webm");
        assert_eq!(request.mime, WEBM_MIME);
    }

    #[test]
    fn named_test_uploads_use_mp4_naming() {
        let kind = ExerciseKind::named_test(TestEndpoint::BicepCurl, "bicep");
        let blob = MediaBlob {
            data: Bytes::from_static(b"v"),
            mime: WEBM_MIME.to_owned(),
        };
        let request = UploadRequest::from_blob(&blob, &kind);
        assert_eq!(request.file_name, "bicep-curl.mp4");
        assert_eq!(request.mime, MP4_MIME);
    }

    #[test]
    fn busy_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let guard = BusyGuard::acquire(&flag);
            assert!(guard.is_some());
            assert!(BusyGuard::acquire(&flag).is_none());
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
