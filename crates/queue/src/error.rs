//! Errors from the queue client and poller.

use crate::status::ErrorDetail;

/// Failure to talk to the queue at all, as opposed to the queue
/// answering with an error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by [`JobQueue`](crate::client::JobQueue) operations and
/// the status poller.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The queue refused the submission.
    #[error("Submission rejected ({status}): {detail}")]
    Submission { status: u16, detail: ErrorDetail },

    /// The status endpoint answered with a non-success code other than 404.
    #[error("Status check rejected ({status}): {detail}")]
    StatusRejected { status: u16, detail: ErrorDetail },

    /// The result of a completed job could not be fetched.
    #[error("Result fetch failed ({status}): {detail}")]
    ResultFetch { status: u16, detail: ErrorDetail },

    /// The queue reported a status tag this client does not know.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// The job disappeared from the queue while being polled.
    #[error("Request {request_id} expired: {detail}")]
    JobExpired {
        request_id: String,
        detail: ErrorDetail,
    },

    /// Polling was stopped by shutdown before the job finished.
    #[error("Polling cancelled")]
    Cancelled,

    /// The configured secret cannot be sent as an HTTP header.
    #[error("Invalid queue credential: {0}")]
    InvalidCredential(String),
}

impl QueueError {
    /// `true` when the queue was never reached or its answer was unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Payload to show the user for this error.
    ///
    /// Remote failures carry the queue's own error body; local failures
    /// are wrapped as `{"error": "<message>"}`.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            Self::Submission { detail, .. }
            | Self::StatusRejected { detail, .. }
            | Self::ResultFetch { detail, .. }
            | Self::JobExpired { detail, .. } => detail.clone(),
            other => ErrorDetail::message(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for QueueError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(TransportError::Http(e))
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport(TransportError::Decode(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_expose_their_body() {
        let err = QueueError::Submission {
            status: 422,
            detail: ErrorDetail::from_body(r#"{"detail":[{"msg":"field required"}]}"#),
        };
        assert_eq!(err.detail().as_value()["detail"][0]["msg"], "field required");
        assert!(!err.is_transport());
    }

    #[test]
    fn local_errors_are_wrapped() {
        let err = QueueError::UnknownStatus("PAUSED".into());
        assert_eq!(
            err.detail().as_value(),
            &serde_json::json!({ "error": "Unknown status: PAUSED" })
        );
    }

    #[test]
    fn decode_failures_are_transport_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = QueueError::from(json_err);
        assert!(err.is_transport());
        assert!(err.to_string().starts_with("Malformed response body"));
    }
}
