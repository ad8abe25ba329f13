//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CrewConnect
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum CrewConnectError {
    /// Network, DNS or timeout failure while talking to a remote service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No usable credential and no way to obtain one.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-2xx status or a response body with an unexpected shape.
    #[error("{}", backend_message(*status, message))]
    Backend {
        /// HTTP status, absent when the response was malformed rather than
        /// rejected.
        status: Option<u16>,
        /// Response body or a description of the unexpected shape.
        message: String,
    },

    /// A field required to build a domain model is missing or invalid.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token persistence failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

fn backend_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) if message.is_empty() => format!("Backend error: status {status}"),
        Some(status) => format!("Backend error: status {status}: {message}"),
        None => format!("Backend error: {message}"),
    }
}

impl CrewConnectError {
    /// Build a backend error for a rejected HTTP response.
    pub fn backend_status(status: u16, body: impl Into<String>) -> Self {
        Self::Backend { status: Some(status), message: body.into() }
    }

    /// Build a backend error for a response with an unexpected shape.
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::Backend { status: None, message: message.into() }
    }

    /// Build a schema error for a missing required field.
    pub fn missing_field(model: &str, field: &str) -> Self {
        Self::Schema(format!("{model} is missing required field `{field}`"))
    }

    /// HTTP status carried by a backend error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Authentication(_) => "authentication",
            Self::Backend { .. } => "backend",
            Self::Schema(_) => "schema",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
        }
    }
}

/// Result type alias for CrewConnect operations
pub type Result<T> = std::result::Result<T, CrewConnectError>;
