//! Conversions from external infrastructure errors into domain errors.

use crewconnect_common::{OAuthClientError, TokenStoreError};
use crewconnect_domain::CrewConnectError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CrewConnectError);

impl From<InfraError> for CrewConnectError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CrewConnectError> for InfraError {
    fn from(value: CrewConnectError) -> Self {
        InfraError(value)
    }
}

/// Convert any infrastructure error straight into the domain error.
pub fn into_domain(err: impl Into<InfraError>) -> CrewConnectError {
    err.into().0
}

trait IntoCrewConnectError {
    fn into_crewconnect(self) -> CrewConnectError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CrewConnectError */
/* -------------------------------------------------------------------------- */

impl IntoCrewConnectError for HttpError {
    fn into_crewconnect(self) -> CrewConnectError {
        if self.is_timeout() {
            return CrewConnectError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CrewConnectError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return CrewConnectError::unexpected_response(format!(
                "failed to decode response body: {self}"
            ));
        }

        if self.is_builder() {
            return CrewConnectError::Config(format!("invalid HTTP request: {self}"));
        }

        CrewConnectError::Transport(format!("HTTP request failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_crewconnect())
    }
}

/* -------------------------------------------------------------------------- */
/* OAuthClientError → CrewConnectError */
/* -------------------------------------------------------------------------- */

impl IntoCrewConnectError for OAuthClientError {
    fn into_crewconnect(self) -> CrewConnectError {
        match self {
            OAuthClientError::RequestFailed(err) => err.into_crewconnect(),
            OAuthClientError::ConfigError(msg) => CrewConnectError::Config(msg),
            OAuthClientError::ParseError(msg) => {
                CrewConnectError::Authentication(format!("identity provider response: {msg}"))
            }
            other => CrewConnectError::Authentication(other.to_string()),
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_crewconnect())
    }
}

/* -------------------------------------------------------------------------- */
/* TokenStoreError → CrewConnectError */
/* -------------------------------------------------------------------------- */

impl IntoCrewConnectError for TokenStoreError {
    fn into_crewconnect(self) -> CrewConnectError {
        CrewConnectError::Storage(self.to_string())
    }
}

impl From<TokenStoreError> for InfraError {
    fn from(value: TokenStoreError) -> Self {
        InfraError(value.into_crewconnect())
    }
}

#[cfg(test)]
mod tests {
    use crewconnect_common::auth::OAuthError;

    use super::*;

    #[test]
    fn oauth_rejection_is_authentication() {
        let err = into_domain(OAuthClientError::OAuthError(OAuthError {
            error: "invalid_grant".into(),
            error_description: Some("refresh token expired".into()),
        }));

        match err {
            CrewConnectError::Authentication(msg) => assert!(msg.contains("invalid_grant")),
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn missing_refresh_token_is_authentication() {
        assert_eq!(into_domain(OAuthClientError::NoRefreshToken).label(), "authentication");
    }

    #[test]
    fn oauth_config_error_stays_config() {
        let err = into_domain(OAuthClientError::ConfigError("bad issuer".into()));
        assert_eq!(err, CrewConnectError::Config("bad issuer".into()));
    }

    #[test]
    fn store_errors_map_to_storage() {
        let err = into_domain(TokenStoreError::Corrupted("expected map".into()));
        assert_eq!(err.label(), "storage");
        assert!(err.to_string().contains("expected map"));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::get(format!("http://{addr}")).await.unwrap_err();
        match into_domain(err) {
            CrewConnectError::Transport(msg) => assert!(msg.to_lowercase().contains("http")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
