//! Client configuration.
//!
//! An optional YAML file supplies the endpoint and defaults; command-line
//! flags always override it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::DEFAULT_TIMEOUT_MS;

/// Default config file names to search for, in priority order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["lexiscan.yaml", ".lexiscan.yaml"];

/// Default service base URL when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Base URL of the analysis service.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Default language identifier when none is given.
    #[serde(default)]
    pub language: Option<String>,
    /// Default output format: "pretty" or "json".
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the discovered config file, or defaults when none exists.
    pub fn load() -> anyhow::Result<Self> {
        match discover_config() {
            Some(path) => Config::parse_file(path),
            None => Ok(Config::default()),
        }
    }

    /// Returns the configured endpoint (defaults to the local service).
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Returns the request timeout in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// Returns the output format (defaults to "pretty").
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("pretty")
    }
}

/// Discover a config file in the current directory.
fn discover_config() -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
