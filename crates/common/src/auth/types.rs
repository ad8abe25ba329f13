//! OAuth 2.0 / OpenID Connect types
//!
//! Token records persisted by a [`super::TokenStore`], the raw token-endpoint
//! response they are built from, and the provider metadata needed to drive
//! the authorization-code flow.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Native redirect URI registered for the crew app
pub const REDIRECT_URI: &str = "com.apm.crewconnect:/callback";

/// Scopes requested during authorization
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// An access credential with its metadata
///
/// Used both for identity-provider tokens and for the backend token obtained
/// from the credential exchange. Records are replaced after a refresh, never
/// mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Bearer token presented to the resource server
    pub access_token: String,

    /// Refresh token, when the provider issued one (`offline_access`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// OpenID Connect ID token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime in seconds; zero when unknown
    #[serde(default)]
    pub expires_in: i64,

    /// Absolute expiry computed when the record was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Crew code the credential belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl TokenRecord {
    /// Create a record, deriving `expires_at` from `expires_in`.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        id_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at =
            (expires_in > 0).then(|| Utc::now() + chrono::Duration::seconds(expires_in));

        Self {
            access_token,
            refresh_token,
            id_token,
            token_type: default_token_type(),
            expires_in,
            expires_at,
            scope,
            subject: None,
        }
    }

    /// A bare bearer token without refresh capability or known expiry.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new(access_token.into(), None, None, 0, None)
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Build the successor of `self` from a refresh response.
    ///
    /// Providers that do not rotate refresh tokens omit them from the
    /// response; the previous refresh token, ID token and subject carry over.
    #[must_use]
    pub fn refreshed(&self, response: TokenResponse) -> Self {
        let mut next = Self::from(response);
        if next.refresh_token.is_none() {
            next.refresh_token.clone_from(&self.refresh_token);
        }
        if next.id_token.is_none() {
            next.id_token.clone_from(&self.id_token);
        }
        next.subject.clone_from(&self.subject);
        next
    }

    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .field("subject", &self.subject)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 section 5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenRecord {
    fn from(response: TokenResponse) -> Self {
        let mut record = Self::new(
            response.access_token,
            response.refresh_token,
            response.id_token,
            response.expires_in,
            response.scope,
        );
        record.token_type = response.token_type;
        record
    }
}

/// Error response from the authorization server (RFC 6749 section 5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}

/// Subset of the OpenID Provider metadata document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OidcConfiguration {
    pub issuer: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: Option<String>,
}

/// Claims returned by the userinfo endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub sub: Option<String>,
    /// Airline crew code; the backend user id
    #[serde(rename = "crewCode")]
    pub crew_code: Option<String>,
    pub name: Option<String>,
    pub preferred_username: Option<String>,
}

/// Client registration used against the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl IdentityProviderConfig {
    /// Registration with the native redirect URI and default scopes.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Scopes as a space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}
