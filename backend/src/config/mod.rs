//! Application configuration management
//!
//! Process settings come from the environment. Scoring weights and the Plex
//! connection live in a JSON document that is re-read on every request, see
//! [scoring].

pub mod scoring;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::CliOptions;

pub use scoring::{DashboardSettings, FilenamePattern, ScoreConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Path of the JSON document holding score tables and Plex credentials
    pub settings_path: PathBuf,

    /// Overrides PLEX_SERVER from the settings document
    pub plex_server: Option<String>,

    /// Overrides PLEX_TOKEN from the settings document
    pub plex_token: Option<String>,

    /// Timeout applied to every call to the Plex server
    pub plex_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: var("HOST"),

            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,

            settings_path: PathBuf::from(
                var("DEDUPE_CONFIG").unwrap_or_else(|| "config.json".to_string()),
            ),

            plex_server: var("PLEX_SERVER").filter(|v| !v.is_empty()),

            plex_token: var("PLEX_TOKEN").filter(|v| !v.is_empty()),

            plex_timeout: Duration::from_secs(
                var("PLEX_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("Invalid PLEX_TIMEOUT_SECS")?,
            ),
        })
    }

    /// Apply command line overrides on top of the environment
    pub fn with_cli(mut self, options: &CliOptions) -> Self {
        if let Some(path) = &options.config_path {
            self.settings_path = path.clone();
        }
        if let Some(port) = options.port {
            self.port = port;
        }
        self
    }
}
