use std::env;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use robodream_gemini_model::{GeminiConfig, GeminiConfigBuilder};

const API_KEY_VAR: &str = "API_KEY";
const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "GEMINI_MODEL";
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
const TIMEOUT_VAR: &str = "ROBODREAM_TIMEOUT_SECS";

/// The error returned when the configuration can't be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `API_KEY` nor `GEMINI_API_KEY` is set.
    MissingApiKey,
    /// `ROBODREAM_TIMEOUT_SECS` is not a positive number of seconds.
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(
                f,
                "{API_KEY_VAR} (or {GEMINI_API_KEY_VAR}) environment variable is not set"
            ),
            ConfigError::InvalidTimeout(raw) => write!(
                f,
                "{TIMEOUT_VAR} must be a positive number of seconds, got {raw:?}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the assistant, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };

        let api_key = var(API_KEY_VAR)
            .or_else(|| var(GEMINI_API_KEY_VAR))
            .ok_or(ConfigError::MissingApiKey)?;
        let timeout = match var(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => None,
        };

        Ok(Self {
            api_key,
            model: var(MODEL_VAR),
            base_url: var(BASE_URL_VAR),
            timeout,
        })
    }

    /// Returns the request timeout, if one is configured.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the provider configuration.
    pub fn gemini_config(&self) -> GeminiConfig {
        let mut builder = GeminiConfigBuilder::with_api_key(&self.api_key);
        if let Some(model) = &self.model {
            builder = builder.with_model(model);
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        builder.build()
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_minimal() {
        let config = load(&[("API_KEY", "k-123")]).unwrap();
        assert_eq!(config.timeout(), None);

        let gemini = config.gemini_config();
        assert_eq!(gemini.model(), "gemini-3-flash-preview");
        assert!(!format!("{config:?}").contains("k-123"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GEMINI_API_KEY", "k-456"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:9000/v1beta"),
            ("ROBODREAM_TIMEOUT_SECS", " 15 "),
        ])
        .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));

        let gemini = config.gemini_config();
        assert_eq!(gemini.model(), "gemini-2.5-flash");
        assert_eq!(gemini.base_url(), "http://127.0.0.1:9000/v1beta");
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingApiKey);
        assert_eq!(
            load(&[("API_KEY", "  ")]).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["soon", "0", "-3"] {
            assert_eq!(
                load(&[("API_KEY", "k"), ("ROBODREAM_TIMEOUT_SECS", raw)])
                    .unwrap_err(),
                ConfigError::InvalidTimeout(raw.to_owned())
            );
        }
    }
}
