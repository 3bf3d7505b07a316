use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use std::time::Duration;
use anyhow::Result;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "DASHBOARD_BACKEND_URL";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the analytics backend, e.g. "http://localhost:8000".
    pub base_url: String,
    /// No timeout is applied when unset; the transport decides how long a request may stay pending.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Joins an endpoint path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, log records are appended to this file instead of stderr.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Loads `.env` and lets `DASHBOARD_BACKEND_URL` replace the configured base URL.
    /// Called once at startup; nothing reads the environment afterwards.
    pub fn apply_env_overrides(mut self) -> Self {
        dotenv::dotenv().ok();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
        self
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(crate::error::Error::ConfigError(
                "backend.base_url must be set".to_string(),
            ));
        }
        if !self.backend.base_url.starts_with("http://") && !self.backend.base_url.starts_with("https://") {
            return Err(crate::error::Error::ConfigError(format!(
                "backend.base_url must be an http(s) URL, got {}",
                self.backend.base_url
            )));
        }
        Ok(())
    }
}
