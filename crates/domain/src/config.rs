//! Client configuration structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TOKEN_FILE, DEFAULT_USER_AGENT};

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the crew scheduling backend (e.g. `https://crewmobile.example.aero`)
    pub host: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Configuration for `host` with default HTTP and storage settings.
    #[must_use]
    pub fn for_host(host: impl Into<String>) -> Self {
        Self { host: host.into(), http: HttpConfig::default(), storage: StorageConfig::default() }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: default_user_agent() }
    }
}

/// Token persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding persisted token records
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { token_path: default_token_path() }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILE)
}
