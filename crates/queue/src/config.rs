use std::time::Duration;

/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path under an application URL where its queue lives.
const QUEUE_PATH: &str = "/fal/queue";

/// Connection settings for one fal.ai application's queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Application URL, e.g. `https://110602490-fooocus.gateway.alpha.fal.ai`.
    pub app_url: String,
    /// API secret, sent as `Authorization: Key <secret>`.
    pub secret: String,
    /// Upper bound on a single HTTP round trip.
    pub request_timeout: Duration,
}

impl QueueConfig {
    pub fn new(app_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
            secret: secret.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Base URL of the queue endpoints (no trailing slash).
    pub fn base_url(&self) -> String {
        format!("{}{QUEUE_PATH}", self.app_url.trim_end_matches('/'))
    }
}
