//! OpenID Connect session with PKCE support
//!
//! Handles the native-app authorization flow against the airline's identity
//! provider:
//! - Provider discovery from the issuer's well-known document
//! - Authorization URL building with a fresh PKCE challenge
//! - Code exchange from a pasted redirect URL
//! - Token refresh and userinfo retrieval

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use url::Url;

use super::pkce::{PkceChallenge, CHALLENGE_METHOD};
use super::traits::IdentityProvider;
use super::types::{
    IdentityProviderConfig, OAuthError, OidcConfiguration, TokenRecord, TokenResponse, UserInfo,
};

const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// Error type for identity provider operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// Provider returned an OAuth error (token endpoint or redirect)
    OAuthError(OAuthError),

    /// Provider answered with a non-success status and no OAuth error body
    UnexpectedStatus { status: u16, body: String },

    /// State parameter mismatch (CSRF attack detected)
    StateMismatch { expected: String, received: String },

    /// Redirect URL could not be parsed or lacks `code` / `state`
    InvalidRedirect(String),

    /// `complete_from_redirect` called without a pending authorization
    NoPendingChallenge,

    /// No refresh token available
    NoRefreshToken,

    /// Failed to parse response
    ParseError(String),

    /// Invalid configuration
    ConfigError(String),

    /// Interactive step aborted or failed
    Interaction(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::UnexpectedStatus { status, body } => {
                write!(f, "Identity provider returned status {status}: {body}")
            }
            Self::StateMismatch { .. } => write!(f, "State mismatch (CSRF)"),
            Self::InvalidRedirect(msg) => write!(f, "Invalid redirect URL: {msg}"),
            Self::NoPendingChallenge => write!(f, "No authorization in progress"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            Self::Interaction(msg) => write!(f, "Authorization aborted: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Session with an OpenID Connect provider
///
/// Holds the PKCE challenge of the authorization in progress, if any. A new
/// call to [`Self::generate_authorization_url`] replaces it.
#[derive(Debug, Clone)]
pub struct IdentityProviderSession {
    config: IdentityProviderConfig,
    endpoints: OidcConfiguration,
    client: Client,
    current_challenge: Arc<Mutex<Option<PkceChallenge>>>,
}

impl IdentityProviderSession {
    /// Create a session from already known provider endpoints
    #[must_use]
    pub fn new(config: IdentityProviderConfig, endpoints: OidcConfiguration, client: Client) -> Self {
        Self { config, endpoints, client, current_challenge: Arc::new(Mutex::new(None)) }
    }

    /// Fetch the provider metadata from `issuer` and create a session
    ///
    /// The well-known document is resolved against the issuer's origin.
    ///
    /// # Errors
    /// Returns error if `issuer` is not a URL, the request fails, or the
    /// document lacks the authorization or token endpoint
    #[instrument(skip(client, config), fields(client_id = %config.client_id))]
    pub async fn discover(
        client: Client,
        issuer: &str,
        config: IdentityProviderConfig,
    ) -> Result<Self, OAuthClientError> {
        let url = Url::parse(issuer)
            .and_then(|base| base.join(WELL_KNOWN_PATH))
            .map_err(|e| OAuthClientError::ConfigError(format!("invalid issuer {issuer}: {e}")))?;

        debug!(%url, "fetching OpenID configuration");
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthClientError::UnexpectedStatus { status: status.as_u16(), body });
        }

        let endpoints: OidcConfiguration =
            response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;
        info!(authorization_endpoint = %endpoints.authorization_endpoint, "identity provider discovered");

        Ok(Self::new(config, endpoints, client))
    }

    /// Build the authorization URL for a new login
    ///
    /// Includes the S256 challenge, the native redirect URI, the configured
    /// scopes, a random `state` and `access_type=offline`.
    ///
    /// # Errors
    /// Returns error if the authorization endpoint is not a valid URL
    pub async fn generate_authorization_url(&self) -> Result<String, OAuthClientError> {
        let endpoint = Url::parse(&self.endpoints.authorization_endpoint)
            .map_err(|e| OAuthClientError::ConfigError(format!("authorization endpoint: {e}")))?;

        let challenge = PkceChallenge::generate();
        let params = [
            ("response_type", "code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("redirect_uri", self.config.redirect_uri.clone()),
            ("scope", self.config.scope_string()),
            ("state", challenge.state.clone()),
            ("code_challenge", challenge.code_challenge.clone()),
            ("code_challenge_method", CHALLENGE_METHOD.to_string()),
            ("access_type", "offline".to_string()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if endpoint.query().is_some() { '&' } else { '?' };

        *self.current_challenge.lock().await = Some(challenge);

        Ok(format!("{endpoint}{separator}{query_string}"))
    }

    /// Exchange the code carried by `redirect_url` for tokens
    ///
    /// # Errors
    /// Returns error if:
    /// - The redirect carries an `error` parameter
    /// - `code` or `state` is missing, or `state` does not match
    /// - No authorization is in progress
    /// - The token exchange fails
    #[instrument(skip_all)]
    pub async fn complete_from_redirect(
        &self,
        redirect_url: &str,
    ) -> Result<TokenRecord, OAuthClientError> {
        let redirect = Url::parse(redirect_url.trim())
            .map_err(|e| OAuthClientError::InvalidRedirect(e.to_string()))?;

        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut error_description = None;
        for (key, value) in redirect.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            self.current_challenge.lock().await.take();
            return Err(OAuthClientError::OAuthError(OAuthError { error, error_description }));
        }
        let code = code.ok_or_else(|| OAuthClientError::InvalidRedirect("missing code".into()))?;
        let state =
            state.ok_or_else(|| OAuthClientError::InvalidRedirect("missing state".into()))?;

        let challenge =
            self.current_challenge.lock().await.take().ok_or(OAuthClientError::NoPendingChallenge)?;
        if !challenge.matches_state(&state) {
            return Err(OAuthClientError::StateMismatch {
                expected: challenge.state,
                received: state,
            });
        }

        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", challenge.code_verifier.as_str()),
        ];
        let record = TokenRecord::from(self.token_request(&form).await?);
        info!(refreshable = record.can_refresh(), "authorization code exchanged");

        Ok(record)
    }

    /// Refresh `existing` and return its successor
    ///
    /// # Errors
    /// Returns error if there is no refresh token or the provider rejects it
    #[instrument(skip_all)]
    pub async fn refresh(&self, existing: &TokenRecord) -> Result<TokenRecord, OAuthClientError> {
        let refresh_token = existing
            .refresh_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(OAuthClientError::NoRefreshToken)?;

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", refresh_token),
        ];
        let response = self.token_request(&form).await?;
        debug!(rotated = response.refresh_token.is_some(), "identity token refreshed");

        Ok(existing.refreshed(response))
    }

    /// Fetch the userinfo claims for `record`
    ///
    /// # Errors
    /// Returns error if the provider has no userinfo endpoint or the request
    /// fails
    #[instrument(skip_all)]
    pub async fn fetch_user_info(&self, record: &TokenRecord) -> Result<UserInfo, OAuthClientError> {
        let endpoint = self.endpoints.userinfo_endpoint.as_deref().ok_or_else(|| {
            OAuthClientError::ConfigError("provider has no userinfo endpoint".to_string())
        })?;

        let response = self.client.get(endpoint).bearer_auth(&record.access_token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthClientError::UnexpectedStatus { status: status.as_u16(), body });
        }

        response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, OAuthClientError> {
        let response = self.client.post(&self.endpoints.token_endpoint).form(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<OAuthError>(&body) {
                Ok(error) => OAuthClientError::OAuthError(error),
                Err(_) => OAuthClientError::UnexpectedStatus { status: status.as_u16(), body },
            });
        }

        response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for IdentityProviderSession {
    async fn generate_authorization_url(&self) -> Result<String, OAuthClientError> {
        self.generate_authorization_url().await
    }

    async fn complete_from_redirect(
        &self,
        redirect_url: &str,
    ) -> Result<TokenRecord, OAuthClientError> {
        self.complete_from_redirect(redirect_url).await
    }

    async fn refresh(&self, existing: &TokenRecord) -> Result<TokenRecord, OAuthClientError> {
        self.refresh(existing).await
    }

    async fn fetch_user_info(&self, record: &TokenRecord) -> Result<UserInfo, OAuthClientError> {
        self.fetch_user_info(record).await
    }
}
