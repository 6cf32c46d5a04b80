//! Runtime configuration loaded from an optional YAML file.
//!
//! ```yaml
//! api_key: "..."            # usually supplied via NEWS_API_KEY instead
//! base_url: https://newsapi.org/v2
//! country: us
//! timeout_secs: 15
//! max_retries: 2
//! retry_base_delay_ms: 500
//! page_size: 10
//! ```
//!
//! Every key is optional. Command-line flags and environment variables win
//! over the file, and the file wins over the built-in defaults.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub user_agent: String,
    pub page_size: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "us".to_string(),
            timeout_secs: 15,
            max_retries: 2,
            retry_base_delay_ms: 500,
            user_agent: format!("news_dashboard/{}", env!("CARGO_PKG_VERSION")),
            page_size: 10,
        }
    }
}

impl NewsConfig {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Let a key from the command line or environment override the file.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }

    /// The configured credential, treating blank values as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NewsConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.country, "us");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = NewsConfig::from_yaml("country: gb\nmax_retries: 0\n").unwrap();
        assert_eq!(config.country, "gb");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(NewsConfig::from_yaml("").unwrap(), NewsConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(NewsConfig::from_yaml("timeout_secs: [1, 2").is_err());
    }

    #[test]
    fn test_cli_key_overrides_file_key() {
        let config = NewsConfig::from_yaml("api_key: from-file\n")
            .unwrap()
            .with_api_key(Some("from-cli".to_string()));
        assert_eq!(config.api_key(), Some("from-cli"));

        let config = NewsConfig::from_yaml("api_key: from-file\n")
            .unwrap()
            .with_api_key(None);
        assert_eq!(config.api_key(), Some("from-file"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = NewsConfig::default().with_api_key(Some("   ".to_string()));
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "page_size: 25\n").unwrap();

        let config = NewsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.page_size, 25);

        assert!(NewsConfig::load(Some(&dir.path().join("missing.yaml"))).is_err());
        assert_eq!(NewsConfig::load(None).unwrap(), NewsConfig::default());
    }
}
