//! Session setup
//!
//! Builds a [`BackendSession`] from whatever the token store holds. When
//! both the identity and backend records are present they are reused as-is
//! (an expired backend token is recovered by the session's `401` handling).
//! Otherwise the interactive authorization-code flow runs:
//!
//! ```text
//! server config ─► OIDC discovery ─► authorization URL ─► code provider
//!        ─► redirect ─► token exchange ─► userinfo (crewCode) ─► /login
//! ```

use std::sync::Arc;

use crewconnect_common::{
    AuthorizationCodeProvider, IdentityProvider, IdentityProviderSession, TokenRecord, TokenStore,
};
use crewconnect_common::auth::IdentityProviderConfig;
use crewconnect_domain::constants::{BACKEND_TOKEN_KEY, IDENTITY_TOKEN_KEY};
use crewconnect_domain::{Config, CrewConnectError, Result};
use tracing::{info, instrument};

use crate::backend::{fetch_server_config, BackendSession};
use crate::errors::into_domain;
use crate::http::HttpClient;

/// Creates authenticated backend sessions
#[derive(Clone)]
pub struct Authenticator {
    host: String,
    http: HttpClient,
    store: Arc<dyn TokenStore>,
}

impl Authenticator {
    pub fn new(host: impl Into<String>, http: HttpClient, store: Arc<dyn TokenStore>) -> Self {
        Self { host: host.into(), http, store }
    }

    /// Authenticator for a loaded configuration.
    ///
    /// # Errors
    /// `Config` when the HTTP client cannot be built from the settings.
    pub fn from_config(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        Ok(Self::new(config.host.clone(), HttpClient::from_config(&config.http)?, store))
    }

    /// Discover the identity provider named by the server configuration and
    /// open a session.
    ///
    /// # Errors
    /// `Authentication` when the backend uses an unsupported login mode or
    /// the authorization flow fails, plus any error from
    /// [`Authenticator::connect_with`].
    #[instrument(skip(self, code_provider), fields(host = %self.host))]
    pub async fn connect(
        &self,
        code_provider: &dyn AuthorizationCodeProvider,
    ) -> Result<BackendSession> {
        let server = fetch_server_config(&self.http, &self.host).await?;
        if !server.uses_identity_provider() {
            return Err(CrewConnectError::Authentication(format!(
                "authentication mode `{}` is not supported",
                server.authentication_mode
            )));
        }

        let provider = IdentityProviderSession::discover(
            self.http.inner().clone(),
            &server.discovery_uri,
            IdentityProviderConfig::new(server.client_id),
        )
        .await
        .map_err(into_domain)?;

        self.connect_with(Arc::new(provider), code_provider).await
    }

    /// Open a session using `provider` for login and refresh.
    ///
    /// # Errors
    /// `Storage` when the token store fails, `Authentication` when the
    /// interactive flow is rejected or userinfo has no crew code, `Backend`
    /// when `/login` is refused.
    pub async fn connect_with(
        &self,
        provider: Arc<dyn IdentityProvider>,
        code_provider: &dyn AuthorizationCodeProvider,
    ) -> Result<BackendSession> {
        if let Some((identity, backend)) = self.stored_credentials().await? {
            let user_id = match backend.subject.clone().or_else(|| identity.subject.clone()) {
                Some(user_id) => user_id,
                None => crew_code(provider.as_ref(), &identity).await?,
            };
            info!(user = %user_id, "reusing stored credentials");

            return Ok(BackendSession::new(&self.host, self.http.clone(), user_id)?
                .with_identity(provider, identity)
                .with_backend_token(backend)
                .with_token_store(self.store.clone()));
        }

        let identity = authorize(provider.as_ref(), code_provider).await?;
        let user_id = crew_code(provider.as_ref(), &identity).await?;
        let identity = identity.with_subject(user_id.clone());
        self.store.set(IDENTITY_TOKEN_KEY, identity.clone()).await.map_err(into_domain)?;

        let session = BackendSession::new(&self.host, self.http.clone(), user_id)?
            .with_identity(provider, identity)
            .with_token_store(self.store.clone());
        session.ensure_backend_token().await?;

        info!(user = %session.user_id(), "interactive login completed");
        Ok(session)
    }

    async fn stored_credentials(&self) -> Result<Option<(TokenRecord, TokenRecord)>> {
        if !(self.store.has(IDENTITY_TOKEN_KEY).await && self.store.has(BACKEND_TOKEN_KEY).await) {
            return Ok(None);
        }

        let identity = self.store.get(IDENTITY_TOKEN_KEY).await.map_err(into_domain)?;
        let backend = self.store.get(BACKEND_TOKEN_KEY).await.map_err(into_domain)?;
        Ok(identity.zip(backend))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").field("host", &self.host).finish_non_exhaustive()
    }
}

async fn authorize(
    provider: &dyn IdentityProvider,
    code_provider: &dyn AuthorizationCodeProvider,
) -> Result<TokenRecord> {
    let url = provider.generate_authorization_url().await.map_err(into_domain)?;
    let redirect = code_provider.authorize(&url).await.map_err(into_domain)?;
    provider.complete_from_redirect(&redirect).await.map_err(into_domain)
}

async fn crew_code(provider: &dyn IdentityProvider, identity: &TokenRecord) -> Result<String> {
    provider
        .fetch_user_info(identity)
        .await
        .map_err(into_domain)?
        .crew_code
        .ok_or_else(|| {
            CrewConnectError::Authentication("userinfo response has no `crewCode` claim".into())
        })
}
