//! Loading of the `config.json` API settings.

use crate::error::ConfigError;
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Default PurpleAir API root.
pub const DEFAULT_BASE_URL: &str = "https://api.purpleair.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// API settings shared by every history request of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse a config from its JSON text.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    ///
    /// A missing file is reported as [`ConfigError::NotFound`]; callers treat
    /// any error here as fatal for the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Config::from_json(&json)
    }
}
