// src/config.rs
// =============================================================================
// Runtime settings.
//
// Sources, lowest priority first:
// 1. Built-in defaults
// 2. A TOML file passed with --config
// 3. Command-line flags (--rate-limit-ms, --pattern)
//
// Example file:
//
//   rate_limit_ms = 3000
//   next_pattern = "next|continued"
//   timeout_secs = 20
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum milliseconds between two requests
    pub rate_limit_ms: u64,
    /// Case-insensitive regex matched against link text to find the next part
    pub next_pattern: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 2000,
            next_pattern: "next".to_string(),
            user_agent: concat!("series-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Settings {
    // Loads settings from `path`, or the defaults when there is no file
    //
    // Missing keys in the file keep their default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
