// ABOUTME: REST client for the exercise-form analysis service
// ABOUTME: Multipart upload plus form-encoded, JSON, and GET processing calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Analysis service REST client.
//!
//! Endpoint contract (see the service's API):
//! - `POST /upload`: multipart/form-data, field `video`; `{filename}` on 2xx
//!   or `{error}` on failure.
//! - `POST /ejercicio`: form-urlencoded `ejercicio` + `filename`.
//! - `POST /test_video`, `/overhead-press`, `/bicep-curl`: JSON
//!   `{filename, ejercicio}`.
//! - `GET /test_bicep_curl`: no body.
//!
//! Processing responses are returned verbatim as [`AnalysisResult`]; the
//! service reports its own failures inside the JSON body, so a parseable
//! body is passed through even on a non-2xx status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::instrument;

use super::{AnalysisApi, TestEndpoint, UploadRequest, UploadResponse};
use crate::config::ClientConfig;
use crate::errors::{AppResult, ClientError};
use crate::models::AnalysisResult;

/// Fallback stage-1 error message when the server gives none.
const UPLOAD_FAILED_FALLBACK: &str = "Upload failed";

/// Analysis API configuration.
#[derive(Debug, Clone)]
pub struct AnalysisApiConfig {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for AnalysisApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(crate::config::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl From<&ClientConfig> for AnalysisApiConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }
}

/// reqwest-backed analysis service client.
pub struct AnalysisApiClient {
    config: AnalysisApiConfig,
    client: Client,
}

impl AnalysisApiClient {
    /// Create a client with configured timeouts and connection pooling.
    #[must_use]
    pub fn new(config: AnalysisApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Read a processing response: a parseable JSON body is returned
    /// verbatim (the service reports failures inside the body); anything
    /// else becomes `ProcessingFailed`.
    async fn read_analysis_response(response: Response) -> AppResult<AnalysisResult> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<AnalysisResult>(&text) {
            Ok(result) => Ok(result),
            Err(_) => Err(ClientError::ProcessingFailed {
                message: format!("analysis service returned {status}: {text}"),
            }),
        }
    }
}

#[async_trait]
impl AnalysisApi for AnalysisApiClient {
    #[instrument(skip(self, request), fields(api_call = "upload_video", file = %request.file_name))]
    async fn upload_video(&self, request: &UploadRequest) -> AppResult<UploadResponse> {
        let part = Part::bytes(request.data.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime)
            .map_err(|e| ClientError::UploadFailed {
                message: format!("invalid media type {}: {e}", request.mime),
            })?;
        let form = Form::new().part("video", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::UploadFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(|e| e.as_str())
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| UPLOAD_FAILED_FALLBACK.to_owned());
            return Err(ClientError::UploadFailed { message });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::UploadFailed {
            message: format!("malformed upload response: {e}"),
        })
    }

    #[instrument(skip(self), fields(api_call = "process_exercise", ejercicio = %code))]
    async fn process_exercise(&self, code: &str, filename: &str) -> AppResult<AnalysisResult> {
        let response = self
            .client
            .post(self.url("/ejercicio"))
            .form(&[("ejercicio", code), ("filename", filename)])
            .send()
            .await
            .map_err(|e| ClientError::ProcessingFailed {
                message: e.to_string(),
            })?;

        Self::read_analysis_response(response).await
    }

    #[instrument(skip(self), fields(api_call = "run_named_test", endpoint = endpoint.path()))]
    async fn run_named_test(
        &self,
        endpoint: TestEndpoint,
        code: &str,
        filename: &str,
    ) -> AppResult<AnalysisResult> {
        let response = self
            .client
            .post(self.url(endpoint.path()))
            .json(&serde_json::json!({
                "filename": filename,
                "ejercicio": code,
            }))
            .send()
            .await
            .map_err(|e| ClientError::ProcessingFailed {
                message: e.to_string(),
            })?;

        Self::read_analysis_response(response).await
    }

    #[instrument(skip(self), fields(api_call = "stored_sample_test"))]
    async fn stored_sample_test(&self) -> AppResult<AnalysisResult> {
        let response = self
            .client
            .get(self.url("/test_bicep_curl"))
            .send()
            .await
            .map_err(|e| ClientError::ProcessingFailed {
                message: e.to_string(),
            })?;

        Self::read_analysis_response(response).await
    }
}
