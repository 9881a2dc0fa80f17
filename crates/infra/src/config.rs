//! Configuration loading from the process environment.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

pub const BASE_URL_ENV: &str = "AGENCY_LLM_BASE_URL";
pub const API_KEY_ENV: &str = "AGENCY_LLM_API_KEY";
pub const MODEL_ENV: &str = "AGENCY_LLM_MODEL";
pub const TIMEOUT_ENV: &str = "AGENCY_LLM_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_ENV: &str = "AGENCY_LLM_CONNECT_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Settings for an OpenAI-compatible chat completions endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

// Keeps the key out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Read the `AGENCY_LLM_*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a timeout is not a whole number of
    /// seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GatewayConfig::from_env`] with an injectable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a timeout is not a whole number of
    /// seconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV);
        if api_key.is_none() {
            warn!("{API_KEY_ENV} is not set; requests will be sent without authorization");
        }

        let config = Self {
            base_url: get(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            api_key,
            model: get(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            timeout: seconds(TIMEOUT_ENV, get(TIMEOUT_ENV), DEFAULT_TIMEOUT_SECS)?,
            connect_timeout: seconds(
                CONNECT_TIMEOUT_ENV,
                get(CONNECT_TIMEOUT_ENV),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };

        info!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout.as_secs(),
            "model gateway configured"
        );
        Ok(config)
    }
}

fn seconds(key: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be greater than zero".to_owned(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_values_use_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn values_override_defaults_and_blank_key_is_unset() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "http://localhost:11434/v1"),
            (API_KEY_ENV, "  "),
            (MODEL_ENV, "qwen2.5"),
            (TIMEOUT_ENV, "5"),
            (CONNECT_TIMEOUT_ENV, "2"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn unparseable_or_zero_timeout_is_invalid() {
        let err = GatewayConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TIMEOUT_ENV, .. }));

        let err = GatewayConfig::from_lookup(lookup(&[(CONNECT_TIMEOUT_ENV, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: CONNECT_TIMEOUT_ENV, .. }));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = GatewayConfig {
            api_key: Some("sk-secret".to_owned()),
            ..GatewayConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
