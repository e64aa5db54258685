use std::time::Duration;

use falbot_queue::config::{QueueConfig, DEFAULT_REQUEST_TIMEOUT};

/// Fooocus application used when `FOOOCUS_BASE_URL` is not set.
pub const DEFAULT_FOOOCUS_BASE_URL: &str = "https://110602490-fooocus.gateway.alpha.fal.ai";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub queue: QueueConfig,
    /// Icon for the result card footer (`FALAI_LOGO_URL`).
    pub logo_url: Option<String>,
}

impl BotConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Required | Default                                          |
    /// |------------------------|----------|--------------------------------------------------|
    /// | `FAL_SECRET`           | yes      | --                                               |
    /// | `FOOOCUS_BASE_URL`     | no       | `https://110602490-fooocus.gateway.alpha.fal.ai` |
    /// | `FALAI_LOGO_URL`       | no       | none                                             |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secret = var("FAL_SECRET").ok_or(ConfigError::Missing("FAL_SECRET"))?;
        let app_url = var("FOOOCUS_BASE_URL").unwrap_or_else(|| DEFAULT_FOOOCUS_BASE_URL.into());
        let logo_url = var("FALAI_LOGO_URL");

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUEST_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value,
                    })
                }
            },
        };

        let mut queue = QueueConfig::new(app_url, secret);
        queue.request_timeout = request_timeout;

        Ok(Self { queue, logo_url })
    }
}
