//! Job handles, status observations and their classification.
//!
//! The status endpoint answers with an HTTP status code and an optional
//! JSON body `{"status": "<TAG>", ...}`. [`classify_status`] reduces that
//! pair to a [`JobStatus`], the four-state machine the rest of the bot
//! works with.

use std::fmt;

use falbot_core::logs::LogEntry;
use serde::{Deserialize, Serialize};

use crate::error::{QueueError, TransportError};

/// Tag reported while a job waits for a runner.
pub const STATUS_IN_QUEUE: &str = "IN_QUEUE";
/// Tag reported while a job runs.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
/// Tag reported once the result can be fetched.
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Opaque reference to one submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct JobHandle {
    pub request_id: String,
}

impl JobHandle {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_id)
    }
}

/// One observation of a job's state.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Waiting for a runner; `position` is the 0-based queue depth.
    Queued { position: u32 },
    /// Running; `logs` is everything the job has logged so far.
    InProgress { logs: Vec<LogEntry> },
    /// Finished; the result can be fetched.
    Completed,
    /// Gone (expired or unknown to the queue); no result will follow.
    Failed { cause: ErrorDetail },
}

impl JobStatus {
    /// `true` for the states after which no further polling happens.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// A non-terminal [`JobStatus`], as yielded by the poller.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Queued { position: u32 },
    InProgress { logs: Vec<LogEntry> },
}

/// Error payload reported by the queue.
///
/// Holds the response body as JSON when it parses, or
/// `{"error": "<raw text>"}` when it does not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorDetail(serde_json::Value);

impl ErrorDetail {
    /// Build from a raw response body, falling back to wrapping the text.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => Self(value),
            Err(_) => Self::message(body),
        }
    }

    /// Wrap a plain message as `{"error": message}`.
    pub fn message(message: impl Into<String>) -> Self {
        Self(serde_json::json!({ "error": message.into() }))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Pretty-print with four-space indentation for display.
    pub fn to_pretty_string(&self) -> String {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        if self.0.serialize(&mut serializer).is_err() {
            return self.0.to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<serde_json::Value> for ErrorDetail {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body fields of a status response. All optional: a completed job may
/// answer with no body at all.
#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    queue_position: Option<u32>,
    #[serde(default)]
    logs: Option<Vec<LogEntry>>,
}

/// Classify one status response.
///
/// * `404` -> [`JobStatus::Failed`] (the job expired or never existed).
/// * any other non-2xx -> [`QueueError::StatusRejected`].
/// * 2xx without a body or without a `status` field -> [`JobStatus::Completed`].
/// * 2xx with a recognised tag -> the matching state.
/// * 2xx with any other tag -> [`QueueError::UnknownStatus`].
pub fn classify_status(http_status: u16, body: &str) -> Result<JobStatus, QueueError> {
    if http_status == 404 {
        return Ok(JobStatus::Failed {
            cause: ErrorDetail::from_body(body),
        });
    }
    if !(200..300).contains(&http_status) {
        return Err(QueueError::StatusRejected {
            status: http_status,
            detail: ErrorDetail::from_body(body),
        });
    }
    if body.trim().is_empty() {
        return Ok(JobStatus::Completed);
    }

    let parsed: StatusBody = serde_json::from_str(body).map_err(TransportError::Decode)?;
    match parsed.status.as_deref() {
        None | Some(STATUS_COMPLETED) => Ok(JobStatus::Completed),
        Some(STATUS_IN_QUEUE) => {
            let position = parsed.queue_position.ok_or_else(|| {
                TransportError::Decode(serde::de::Error::missing_field("queue_position"))
            })?;
            Ok(JobStatus::Queued { position })
        }
        Some(STATUS_IN_PROGRESS) => Ok(JobStatus::InProgress {
            logs: parsed.logs.unwrap_or_default(),
        }),
        Some(other) => Err(QueueError::UnknownStatus(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
