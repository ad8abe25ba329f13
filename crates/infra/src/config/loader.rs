//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when `CREWCONNECT_HOST` is set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//!
//! ## Environment Variables
//! - `CREWCONNECT_HOST`: backend base URL (required)
//! - `CREWCONNECT_TIMEOUT_SECS`: per-request timeout in seconds
//! - `CREWCONNECT_USER_AGENT`: `User-Agent` header value
//! - `CREWCONNECT_TOKEN_PATH`: JSON file holding persisted tokens
//!
//! ## File Locations
//! `crewconnect.{json,toml}` then `config.{json,toml}`, first in the working
//! directory and then next to the executable.

use std::path::{Path, PathBuf};

use crewconnect_domain::{Config, CrewConnectError, HttpConfig, Result, StorageConfig};

const ENV_HOST: &str = "CREWCONNECT_HOST";
const ENV_TIMEOUT_SECS: &str = "CREWCONNECT_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "CREWCONNECT_USER_AGENT";
const ENV_TOKEN_PATH: &str = "CREWCONNECT_TOKEN_PATH";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["crewconnect.json", "crewconnect.toml", "config.json", "config.toml"];

/// Load configuration from the environment, falling back to a config file
/// only when `CREWCONNECT_HOST` is unset.
///
/// # Errors
/// Returns `CrewConnectError::Config` if the environment is set but invalid,
/// or if it is unset and no valid config file is found.
pub fn load() -> Result<Config> {
    if std::env::var_os(ENV_HOST).is_none() {
        tracing::debug!("{ENV_HOST} not set, trying config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from `CREWCONNECT_*` environment variables.
///
/// # Errors
/// Returns `CrewConnectError::Config` if `CREWCONNECT_HOST` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let host = env_var(ENV_HOST)?;

    let mut http = HttpConfig::default();
    if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
        http.timeout_secs = timeout.parse::<u64>().map_err(|e| {
            CrewConnectError::Config(format!("Invalid {ENV_TIMEOUT_SECS} `{timeout}`: {e}"))
        })?;
    }
    if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
        http.user_agent = agent;
    }

    let mut storage = StorageConfig::default();
    if let Ok(path) = std::env::var(ENV_TOKEN_PATH) {
        storage.token_path = PathBuf::from(path);
    }

    Ok(Config { host, http, storage })
}

/// Load configuration from a file, probing the standard locations when
/// `path` is `None`.
///
/// # Errors
/// Returns `CrewConnectError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CrewConnectError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CrewConnectError::Config(format!(
                "No config file found and {ENV_HOST} is not set"
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CrewConnectError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration content; the format follows the file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CrewConnectError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CrewConnectError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CrewConnectError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory or next to the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CrewConnectError::Config(format!("Missing required environment variable: {key}"))
    })
}
