//! Run configuration.
//!
//! Everything the fetcher and submitter need is carried by an explicit
//! [`Config`] value. [`Config::from_env`] reads it from the process
//! environment; callers may override individual fields afterwards.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://challenge.crossmint.com/api/";
/// Pause between attempts when the remote answers 429. The API does not
/// document its window; five seconds has been enough in practice.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_CANDIDATE_ID: &str = "CANDIDATE_ID";
pub const ENV_BASE_URL: &str = "MEGAVERSE_BASE_URL";
pub const ENV_RETRY_DELAY_SECS: &str = "MEGAVERSE_RETRY_DELAY_SECS";
pub const ENV_TIMEOUT_SECS: &str = "MEGAVERSE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub candidate_id: String,
    pub base_url: String,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Config {
    /// Defaults for everything but the candidate id.
    pub fn new(candidate_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let candidate_id = lookup(ENV_CANDIDATE_ID)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCandidateId)?;

        let mut config = Self::new(candidate_id);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_RETRY_DELAY_SECS) {
            config.retry_delay = parse_secs(ENV_RETRY_DELAY_SECS, &secs)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = parse_secs(ENV_TIMEOUT_SECS, &secs)?;
        }
        Ok(config)
    }

    /// Absolute URL for an API path relative to `base_url`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}
