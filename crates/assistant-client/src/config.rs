use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config_env::{optional_trimmed_env, parse_bool_env, parse_u64_env, parse_usize_env};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout_ms: u64,
    /// When false, a send issued while another is in flight is refused with
    /// `DispatchOutcome::Busy` instead of racing it.
    pub allow_overlapping_sends: bool,
    pub event_capacity: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid boolean in env var {0}")]
    ParseBool(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            allow_overlapping_sends: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            ..Self::default()
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = optional_trimmed_env("TASK_ASSISTANT_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let config = Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            timeout_ms: parse_u64_env("TASK_ASSISTANT_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
            allow_overlapping_sends: parse_bool_env("TASK_ASSISTANT_ALLOW_OVERLAPPING_SENDS", true)?,
            event_capacity: parse_usize_env(
                "TASK_ASSISTANT_EVENT_CAPACITY",
                DEFAULT_EVENT_CAPACITY,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_base_url(&self.api_base_url)?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "TASK_ASSISTANT_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "TASK_ASSISTANT_EVENT_CAPACITY must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_overlapping_sends(mut self, allow: bool) -> Self {
        self.allow_overlapping_sends = allow;
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| {
        ConfigError::InvalidConfiguration(format!("api base url '{trimmed}' is invalid: {err}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidConfiguration(
            "api base url must start with http:// or https://".to_string(),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
