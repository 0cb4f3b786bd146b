//! Client configuration.
//!
//! No timeout is applied unless one is configured; the transport default
//! governs otherwise. There is no retry setting: every call fails once.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const BASE_URL_VAR: &str = "JOBMATCH_BASE_URL";
const TIMEOUT_VAR: &str = "JOBMATCH_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    EmptyBaseUrl { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `JOBMATCH_BASE_URL` and `JOBMATCH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup(BASE_URL_VAR) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::EmptyBaseUrl { var: BASE_URL_VAR })
            }
            Some(url) => url,
            None => DEFAULT_BASE_URL.to_string(),
        };
        let mut config = Self::new(base_url.trim());

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_base_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("JOBMATCH_BASE_URL", "https://api.example.com/"),
            ("JOBMATCH_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for value in ["0", "soon", "-5"] {
            let err = ClientConfig::from_lookup(lookup(&[("JOBMATCH_TIMEOUT_SECS", value)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{value}");
        }
    }

    #[test]
    fn rejects_blank_base_url() {
        let err = ClientConfig::from_lookup(lookup(&[("JOBMATCH_BASE_URL", " ")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyBaseUrl {
                var: "JOBMATCH_BASE_URL"
            }
        );
    }
}
