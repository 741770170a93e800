//! Client configuration loaded from environment variables.

use std::time::Duration;

use toolhub_core::job::ToolKind;

use crate::poller::{PollConfig, DEFAULT_MAX_IN_FLIGHT};

/// Backend address used when `TOOLHUB_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Per-request timeout used when `TOOLHUB_REQUEST_TIMEOUT_SECS` is unset.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// An environment variable was set but could not be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Overrides every tool's own poll cadence when set.
    pub poll_interval: Option<Duration>,
    pub poll_max_attempts: Option<u32>,
    pub poll_deadline: Option<Duration>,
    pub poll_max_in_flight: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll_interval: None,
            poll_max_attempts: None,
            poll_deadline: None,
            poll_max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment (after reading a
    /// `.env` file if one exists).
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `TOOLHUB_BASE_URL`             | `http://127.0.0.1:5000` |
    /// | `TOOLHUB_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `TOOLHUB_POLL_INTERVAL_MS`     | per tool (500 / 1000)   |
    /// | `TOOLHUB_POLL_MAX_ATTEMPTS`    | unbounded               |
    /// | `TOOLHUB_POLL_DEADLINE_SECS`   | unbounded               |
    /// | `TOOLHUB_POLL_MAX_IN_FLIGHT`   | `4`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("TOOLHUB_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let request_timeout = parse_var::<u64>(&lookup, "TOOLHUB_REQUEST_TIMEOUT_SECS", "a number of seconds")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let poll_interval = parse_var::<u64>(&lookup, "TOOLHUB_POLL_INTERVAL_MS", "a number of milliseconds")?
            .map(Duration::from_millis);

        let poll_max_attempts = parse_var::<u32>(&lookup, "TOOLHUB_POLL_MAX_ATTEMPTS", "a positive integer")?;
        if poll_max_attempts == Some(0) {
            return Err(ConfigError::Invalid {
                var: "TOOLHUB_POLL_MAX_ATTEMPTS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }

        let poll_deadline = parse_var::<u64>(&lookup, "TOOLHUB_POLL_DEADLINE_SECS", "a number of seconds")?
            .map(Duration::from_secs);

        let poll_max_in_flight = parse_var::<usize>(&lookup, "TOOLHUB_POLL_MAX_IN_FLIGHT", "a positive integer")?
            .unwrap_or(defaults.poll_max_in_flight);

        if poll_max_in_flight == 0 {
            return Err(ConfigError::Invalid {
                var: "TOOLHUB_POLL_MAX_IN_FLIGHT",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            base_url,
            request_timeout,
            poll_interval,
            poll_max_attempts,
            poll_deadline,
            poll_max_in_flight,
        })
    }

    /// Poll settings for a job started by `tool`.
    pub fn poll_config(&self, tool: ToolKind) -> PollConfig {
        PollConfig {
            interval: self.poll_interval.unwrap_or_else(|| tool.poll_interval()),
            max_attempts: self.poll_max_attempts,
            deadline: self.poll_deadline,
            max_in_flight: self.poll_max_in_flight,
            request_timeout: self.request_timeout,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                expected,
                value: raw,
            }),
    }
}
