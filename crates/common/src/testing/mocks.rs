//! Mock implementations of the auth capability traits

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{
    AuthorizationCodeProvider, IdentityProvider, OAuthClientError, OAuthError, TokenRecord,
    TokenResponse, UserInfo,
};

/// Identity provider that issues predictable tokens without network calls
///
/// Refreshed access tokens are numbered (`idp-access-1`, `idp-access-2`, ...)
/// so tests can tell which refresh produced a credential.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    crew_code: Option<String>,
    refresh_calls: AtomicUsize,
    fail_refresh: AtomicBool,
}

impl MockIdentityProvider {
    /// Provider whose userinfo reports `crew_code`.
    pub fn new(crew_code: impl Into<String>) -> Self {
        Self { crew_code: Some(crew_code.into()), ..Self::default() }
    }

    /// Force subsequent refresh calls to fail with `invalid_grant`.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.fail_refresh.store(should_fail, Ordering::SeqCst);
    }

    /// Number of refresh calls received so far.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Record returned by a successful authorization.
    #[must_use]
    pub fn issued_record() -> TokenRecord {
        TokenRecord::new(
            "idp-access".to_string(),
            Some("idp-refresh".to_string()),
            None,
            3600,
            Some("openid profile offline_access".to_string()),
        )
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn generate_authorization_url(&self) -> Result<String, OAuthClientError> {
        Ok("https://idp.test/authorize?client_id=crew-app&state=mock-state".to_string())
    }

    async fn complete_from_redirect(
        &self,
        redirect_url: &str,
    ) -> Result<TokenRecord, OAuthClientError> {
        if redirect_url.contains("code=") {
            Ok(Self::issued_record())
        } else {
            Err(OAuthClientError::InvalidRedirect("missing code".to_string()))
        }
    }

    async fn refresh(&self, existing: &TokenRecord) -> Result<TokenRecord, OAuthClientError> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(OAuthClientError::OAuthError(OAuthError {
                error: "invalid_grant".to_string(),
                error_description: None,
            }));
        }
        if !existing.can_refresh() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        Ok(existing.refreshed(TokenResponse {
            access_token: format!("idp-access-{call}"),
            refresh_token: None,
            id_token: None,
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            scope: existing.scope.clone(),
        }))
    }

    async fn fetch_user_info(&self, _record: &TokenRecord) -> Result<UserInfo, OAuthClientError> {
        Ok(UserInfo { crew_code: self.crew_code.clone(), ..UserInfo::default() })
    }
}

/// Authorization-code provider that answers with a fixed redirect URL
#[derive(Debug)]
pub struct StaticRedirectProvider {
    redirect_url: String,
    seen: Mutex<Vec<String>>,
}

impl StaticRedirectProvider {
    pub fn new(redirect_url: impl Into<String>) -> Self {
        Self { redirect_url: redirect_url.into(), seen: Mutex::new(Vec::new()) }
    }

    /// Authorization URLs presented so far, oldest first.
    #[must_use]
    pub fn presented_urls(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl AuthorizationCodeProvider for StaticRedirectProvider {
    async fn authorize(&self, authorization_url: &str) -> Result<String, OAuthClientError> {
        self.seen.lock().push(authorization_url.to_string());
        Ok(self.redirect_url.clone())
    }
}
