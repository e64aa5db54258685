//! REST client for the fal.ai queue endpoints.
//!
//! Wraps `POST /submit/`, `GET /requests/{id}/status/` and
//! `GET /requests/{id}/response/` using [`reqwest`]. The [`JobQueue`]
//! trait is the seam the poller and presenter depend on, so they can be
//! driven by a scripted queue in tests.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::status::{classify_status, ErrorDetail, JobHandle, JobStatus};

/// The three operations of the remote job-queue protocol.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Submit a job payload and return its handle.
    async fn submit(&self, payload: &serde_json::Value) -> Result<JobHandle, QueueError>;

    /// Fetch the current status of a job once.
    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, QueueError>;

    /// Fetch the final payload of a completed job.
    async fn result(&self, handle: &JobHandle) -> Result<serde_json::Value, QueueError>;
}

/// HTTP client for a single application's queue.
#[derive(Debug, Clone)]
pub struct QueueClient {
    client: reqwest::Client,
    base_url: String,
}

impl QueueClient {
    /// Build a client that authenticates every request with the
    /// configured secret and enforces the configured timeout.
    pub fn new(config: &QueueConfig) -> Result<Self, QueueError> {
        let mut auth = HeaderValue::from_str(&format!("Key {}", config.secret)).map_err(|_| {
            QueueError::InvalidCredential("secret contains characters not allowed in a header".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    fn submit_url(&self) -> String {
        format!("{}/submit/", self.base_url)
    }

    fn status_url(&self, handle: &JobHandle) -> String {
        format!("{}/requests/{}/status/", self.base_url, handle.request_id)
    }

    fn response_url(&self, handle: &JobHandle) -> String {
        format!("{}/requests/{}/response/", self.base_url, handle.request_id)
    }

    // ---- private helpers ----

    /// Read the status code and full body text of a response.
    async fn read_body(response: reqwest::Response) -> Result<(u16, String), QueueError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl JobQueue for QueueClient {
    async fn submit(&self, payload: &serde_json::Value) -> Result<JobHandle, QueueError> {
        let response = self.client.post(self.submit_url()).json(payload).send().await?;
        let (status, body) = Self::read_body(response).await?;

        if !is_success(status) {
            tracing::warn!(status, "Queue rejected submission");
            return Err(QueueError::Submission {
                status,
                detail: ErrorDetail::from_body(&body),
            });
        }

        let handle: JobHandle = serde_json::from_str(&body)?;
        tracing::info!(request_id = %handle.request_id, "Job submitted to queue");
        Ok(handle)
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, QueueError> {
        let response = self.client.get(self.status_url(handle)).send().await?;
        let (status, body) = Self::read_body(response).await?;

        let job_status = classify_status(status, &body)?;
        tracing::trace!(request_id = %handle.request_id, status, ?job_status, "Polled job status");
        Ok(job_status)
    }

    async fn result(&self, handle: &JobHandle) -> Result<serde_json::Value, QueueError> {
        let response = self.client.get(self.response_url(handle)).send().await?;
        let (status, body) = Self::read_body(response).await?;

        if !is_success(status) {
            tracing::warn!(request_id = %handle.request_id, status, "Failed to fetch job result");
            return Err(QueueError::ResultFetch {
                status,
                detail: ErrorDetail::from_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
