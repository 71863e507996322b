//! Solver configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `HOD_DATA_DIR` - Directory holding the four CSV tables (default: `data`)
//! - `HOD_OFFLINE` - Use built-in reference tables instead of fetching them (default: false)
//! - `HOD_REFERENCE_BASE_URL` - Base URL of the reference articles (default: `https://en.wikipedia.org/wiki/`)
//! - `HOD_HTTP_TIMEOUT_SECS` - Per-request timeout for reference fetches (default: 30)
//! - `HOD_HTTP_RETRIES` - Extra attempts after a failed fetch (default: 2)
//! - `HOD_LOG_FORMAT` - `text` or `json` (default: `text`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REFERENCE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_RETRIES: &str = "2";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid log format: {s}")),
        }
    }
}

/// HTTP settings for reference fetches.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL that article titles are appended to.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_REFERENCE_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout: Duration::from_secs(30),
            retries: 2,
        }
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Directory holding the CSV tables.
    pub data_dir: PathBuf,
    /// Skip network fetches and use built-in reference tables.
    pub offline: bool,
    /// Reference fetch settings.
    pub http: HttpConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl SolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let invalid = |key: &str, e: &dyn std::fmt::Display| {
            ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
        };

        let data_dir = PathBuf::from(get_or("HOD_DATA_DIR", DEFAULT_DATA_DIR));
        let offline = parse_bool(&get_or("HOD_OFFLINE", "false"))
            .map_err(|e| invalid("HOD_OFFLINE", &e))?;

        let base_url = get_or("HOD_REFERENCE_BASE_URL", DEFAULT_REFERENCE_BASE_URL);
        let mut base_url =
            Url::parse(&base_url).map_err(|e| invalid("HOD_REFERENCE_BASE_URL", &e))?;
        // Article titles are joined onto the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout_secs = get_or("HOD_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| invalid("HOD_HTTP_TIMEOUT_SECS", &e))?;
        let retries = get_or("HOD_HTTP_RETRIES", DEFAULT_RETRIES)
            .parse::<u32>()
            .map_err(|e| invalid("HOD_HTTP_RETRIES", &e))?;
        let log_format = get_or("HOD_LOG_FORMAT", "text")
            .parse::<LogFormat>()
            .map_err(|e| invalid("HOD_LOG_FORMAT", &e))?;

        Ok(Self {
            data_dir,
            offline,
            http: HttpConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                retries,
            },
            log_format,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<SolverConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SolverConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.offline);
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert_eq!(config.http.retries, 2);
        assert_eq!(config.http.base_url.as_str(), "https://en.wikipedia.org/wiki/");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HOD_DATA_DIR", "/tmp/noah"),
            ("HOD_OFFLINE", "yes"),
            ("HOD_HTTP_TIMEOUT_SECS", "5"),
            ("HOD_HTTP_RETRIES", "0"),
            ("HOD_REFERENCE_BASE_URL", "http://localhost:8080/wiki"),
            ("HOD_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/noah"));
        assert!(config.offline);
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.retries, 0);
        assert_eq!(config.http.base_url.as_str(), "http://localhost:8080/wiki/");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("HOD_HTTP_RETRIES", "  ")]).unwrap();
        assert_eq!(config.http.retries, 2);
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("HOD_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("HOD_HTTP_TIMEOUT_SECS"));

        let err = config(&[("HOD_OFFLINE", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("HOD_OFFLINE"));

        assert!(config(&[("HOD_LOG_FORMAT", "xml")]).is_err());
    }
}
