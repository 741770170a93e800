//! REST client for the toolhub backend.
//!
//! [`ToolhubApi`] owns the [`reqwest`] client and the request/response
//! conventions shared by every tool: how a start endpoint hands out a job
//! id, how rejections carry their message, and how the synchronous tools
//! report success. The per-tool operations live in [`crate::tools`] as
//! further `impl ToolhubApi` blocks.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use toolhub_core::error::CoreError;
use toolhub_core::types::JobId;

use crate::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::schemas::{Ack, ErrorBody, Flagged, StartJobResponse, StatusResponse};

/// HTTP client for one toolhub backend.
#[derive(Debug, Clone)]
pub struct ToolhubApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the HTTP layer and the client-side checks that precede it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input was rejected before any request was built.
    #[error("{}", core_message(.0))]
    Invalid(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, body
    /// decoding).
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{}", rejection_text(.status, .error, .body))]
    Rejected {
        status: u16,
        /// The body's `error` (or `message`) field, when it had one.
        error: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// A start endpoint answered 2xx without a job id.
    #[error("{0}")]
    MissingJobId(String),

    /// A synchronous endpoint answered with `success: false`.
    #[error("{0}")]
    Unsuccessful(String),

    /// An inline image in a reply was not valid base64.
    #[error("Invalid image data: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A local upload source or download target could not be accessed.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn core_message(err: &CoreError) -> String {
    err.user_message()
}

fn rejection_text(status: &u16, error: &Option<String>, body: &str) -> String {
    match error {
        Some(e) => e.clone(),
        None => format!("Server error ({status}): {body}"),
    }
}

impl ApiError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ToolhubApi {
    /// Create a client for `base_url`, e.g. `http://127.0.0.1:5000`, with
    /// the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create a client honouring the configured base URL and request
    /// timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path such as `/download/abc`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- job protocol ----

    /// Fetch the current state of a job.
    pub async fn job_status(&self, job_id: &JobId) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/status/{job_id}")))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ask the backend to cancel a running download.
    ///
    /// Advisory only: the job keeps reporting status until the backend
    /// marks it `cancelled`, so a live poll should be left running.
    pub async fn cancel_job(&self, job_id: &JobId) -> Result<Ack, ApiError> {
        let ack: Ack = self.post_bare(&format!("/cancel/{job_id}")).await?;
        tracing::info!(job_id = %job_id, "Cancellation requested");
        Ok(ack)
    }

    /// Stream a completed job's artifact from `/download/{job_id}` into
    /// `dest`. Returns the number of bytes written.
    pub async fn download_artifact(&self, job_id: &JobId, dest: &Path) -> Result<u64, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/download/{job_id}")))
            .send()
            .await?;
        let mut response = Self::ensure_success(response).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ApiError::io(dest, e))?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ApiError::io(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| ApiError::io(dest, e))?;

        tracing::info!(job_id = %job_id, bytes = written, dest = %dest.display(), "Artifact downloaded");
        Ok(written)
    }

    // ---- request helpers used by the tools ----

    /// POST a JSON body to a start endpoint and return the new job id.
    pub(crate) async fn start_json_job<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        default_error: &str,
    ) -> Result<JobId, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_start(response, path, default_error).await
    }

    /// POST a multipart form to a start endpoint and return the new job id.
    pub(crate) async fn start_multipart_job(
        &self,
        path: &str,
        form: Form,
        default_error: &str,
    ) -> Result<JobId, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse_start(response, path, default_error).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST JSON to an endpoint replying `{success, error, ...}`.
    pub(crate) async fn post_flagged<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        default_error: &str,
    ) -> Result<T, ApiError> {
        let reply: Flagged<T> = self.post_json(path, body).await?;
        Self::unwrap_flagged(reply, default_error)
    }

    /// POST without a body.
    pub(crate) async fn post_bare<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn get_flagged<T: DeserializeOwned>(
        &self,
        path: &str,
        default_error: &str,
    ) -> Result<T, ApiError> {
        let reply: Flagged<T> = self.get_json(path).await?;
        Self::unwrap_flagged(reply, default_error)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::check_status(response).await
    }

    /// POST an empty JSON object and discard the reply body.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure the body
    /// is read and its `error` field, if any, becomes the message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .filter(|e| !e.is_empty());
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                error,
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn parse_start(
        response: reqwest::Response,
        path: &str,
        default_error: &str,
    ) -> Result<JobId, ApiError> {
        let reply: StartJobResponse = Self::parse_response(response).await?;
        match reply.job_id {
            Some(job_id) if reply.success != Some(false) => {
                tracing::info!(job_id = %job_id, endpoint = path, "Job started");
                Ok(job_id)
            }
            _ => {
                let message = reply
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| default_error.to_string());
                tracing::warn!(endpoint = path, error = %message, "Start accepted without a job id");
                Err(ApiError::MissingJobId(message))
            }
        }
    }

    fn unwrap_flagged<T>(reply: Flagged<T>, default_error: &str) -> Result<T, ApiError> {
        if reply.success {
            Ok(reply.data)
        } else {
            Err(ApiError::Unsuccessful(
                reply
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| default_error.to_string()),
            ))
        }
    }
}

/// Read a local file into a multipart part named after the file.
pub async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

/// Size of a local upload source, for client-side limit checks.
pub async fn file_size(path: &Path) -> Result<u64, ApiError> {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.len())
        .map_err(|e| ApiError::io(path, e))
}

/// `"true"` / `"false"` as multipart text fields carry booleans.
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
