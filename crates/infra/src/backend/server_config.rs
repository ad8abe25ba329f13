//! Server bootstrap configuration (`GET /api/config`)

use crewconnect_domain::{CrewConnectError, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::into_domain;
use crate::http::HttpClient;

/// Authentication mode for which the OIDC login flow is implemented
pub const OKTA_AUTHENTICATION_MODE: &str = "okta";

const SERVER_CONFIG_PATH: &str = "/api/config";

/// Login settings published by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub authentication_mode: String,
    /// Issuer URL of the identity provider
    pub discovery_uri: String,
    pub client_id: String,
}

impl ServerConfig {
    /// Whether the backend delegates login to the OIDC identity provider.
    #[must_use]
    pub fn uses_identity_provider(&self) -> bool {
        self.authentication_mode.eq_ignore_ascii_case(OKTA_AUTHENTICATION_MODE)
    }
}

/// Fetch the server configuration from `host`.
///
/// # Errors
/// `Config` for an invalid host, `Transport` on network failure, `Backend`
/// for a rejected request or a body that is not a server configuration.
#[instrument(skip(http))]
pub async fn fetch_server_config(http: &HttpClient, host: &str) -> Result<ServerConfig> {
    let url = Url::parse(host)
        .and_then(|base| base.join(SERVER_CONFIG_PATH))
        .map_err(|e| CrewConnectError::Config(format!("invalid host `{host}`: {e}")))?;

    let response = http.send(http.request(Method::GET, url)).await?;
    let status = response.status();
    let body = response.text().await.map_err(into_domain)?;

    if !status.is_success() {
        return Err(CrewConnectError::backend_status(status.as_u16(), body));
    }

    let config: ServerConfig = serde_json::from_str(&body).map_err(|e| {
        CrewConnectError::unexpected_response(format!("invalid server configuration: {e}"))
    })?;
    debug!(mode = %config.authentication_mode, "server configuration fetched");
    Ok(config)
}
