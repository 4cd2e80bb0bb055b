//! Configuration management for the reservation client.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Default page size for bucket fetches
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the booking API, without trailing slash
    pub api_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Records requested per page
    pub page_size: u32,
    /// Log filter (trace, debug, info, warn, error or an `EnvFilter` directive)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `PITCHSIDE_API_URL` (default `http://localhost:3000/api`)
    /// - `PITCHSIDE_API_TOKEN` (optional)
    /// - `PITCHSIDE_PAGE_SIZE` (default 10, zero is ignored)
    /// - `RUST_LOG` (default `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a dotenv file, process variables taking precedence
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let entries = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::from_lookup(|key| {
            env::var(key).ok().or_else(|| entries.get(key).cloned())
        }))
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: lookup("PITCHSIDE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            api_token: lookup("PITCHSIDE_API_TOKEN").filter(|token| !token.is_empty()),
            page_size: lookup("PITCHSIDE_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}
