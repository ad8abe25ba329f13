//! Backend API session with transparent re-authentication

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use crewconnect_common::{IdentityProvider, TokenRecord, TokenStore};
use crewconnect_core::schedule::ports::QueryParams;
use crewconnect_core::CrewApi;
use crewconnect_domain::constants::{BACKEND_TOKEN_KEY, IDENTITY_TOKEN_KEY};
use crewconnect_domain::{CrewConnectError, Result};
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::into_domain;
use crate::http::HttpClient;

const LOGIN_PATH: &str = "/login";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_id: &'a str,
    access_token: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Default)]
struct Credentials {
    backend: Option<TokenRecord>,
    identity: Option<TokenRecord>,
}

/// Authenticated session against the crew scheduling backend.
///
/// Every request carries the backend bearer token. A `401` triggers one
/// identity-token refresh followed by a new `/login` exchange; both new
/// records are written to the token store before the request is retried
/// once. Concurrent callers holding the same stale token share a single
/// refresh.
pub struct BackendSession {
    host: Url,
    http: HttpClient,
    user_id: String,
    credentials: RwLock<Credentials>,
    refresh_lock: Mutex<()>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl BackendSession {
    /// Session for `user_id` (the crew code) against `host`, with no
    /// credentials yet.
    ///
    /// # Errors
    /// `Config` when `host` is not an absolute URL.
    pub fn new(host: &str, http: HttpClient, user_id: impl Into<String>) -> Result<Self> {
        let host = Url::parse(host)
            .map_err(|e| CrewConnectError::Config(format!("invalid host `{host}`: {e}")))?;

        Ok(Self {
            host,
            http,
            user_id: user_id.into(),
            credentials: RwLock::new(Credentials::default()),
            refresh_lock: Mutex::new(()),
            identity_provider: None,
            token_store: None,
        })
    }

    #[must_use]
    pub fn with_backend_token(mut self, record: TokenRecord) -> Self {
        self.credentials.get_mut().backend = Some(record);
        self
    }

    /// Identity-provider credential, and the provider able to refresh it.
    #[must_use]
    pub fn with_identity(mut self, provider: Arc<dyn IdentityProvider>, record: TokenRecord) -> Self {
        self.credentials.get_mut().identity = Some(record);
        self.identity_provider = Some(provider);
        self
    }

    /// Store receiving every credential this session obtains.
    #[must_use]
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Crew code used in endpoint paths.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Issue an authenticated request and decode the JSON response.
    ///
    /// `path` is joined to the host; absolute URLs are used as-is.
    ///
    /// # Errors
    /// `Authentication` when no backend credential can be obtained,
    /// `Transport` on network failure, `Backend` for a non-2xx status or a
    /// body that is not JSON.
    #[instrument(skip(self, query, body), fields(user = %self.user_id))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.resolve(path)?;
        let token = self.backend_token().await?;

        let response = self.send(&method, &url, query, body, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return decode_json(response).await;
        }

        warn!(%url, "backend rejected credential; re-authenticating");
        let token = self.reauthenticate(&token).await?;
        let response = self.send(&method, &url, query, body, &token).await?;
        decode_json(response).await
    }

    /// Exchange an identity-provider credential for a backend credential.
    ///
    /// # Errors
    /// `Backend` when the backend rejects the exchange or answers without a
    /// token, `Transport` on network failure.
    #[instrument(skip(self, identity), fields(user = %self.user_id))]
    pub async fn login(&self, identity: &TokenRecord) -> Result<TokenRecord> {
        let url = self.resolve(LOGIN_PATH)?;
        let payload = LoginRequest { user_id: &self.user_id, access_token: &identity.access_token };

        let response = self.http.send(self.http.request(Method::POST, url).json(&payload)).await?;
        let value = decode_json(response).await?;
        let login: LoginResponse = serde_json::from_value(value).map_err(|e| {
            CrewConnectError::unexpected_response(format!("invalid login response: {e}"))
        })?;

        debug!("backend credential issued");
        Ok(TokenRecord::bearer(login.token).with_subject(self.user_id.clone()))
    }

    /// Make sure a backend credential is held, logging in with the identity
    /// credential when necessary.
    ///
    /// # Errors
    /// As [`BackendSession::login`], or `Authentication` when there is no
    /// identity credential either.
    pub async fn ensure_backend_token(&self) -> Result<()> {
        self.backend_token().await.map(|_| ())
    }

    async fn backend_token(&self) -> Result<String> {
        if let Some(record) = self.credentials.read().await.backend.as_ref() {
            return Ok(record.access_token.clone());
        }

        let _guard = self.refresh_lock.lock().await;

        let identity = {
            let creds = self.credentials.read().await;
            if let Some(record) = creds.backend.as_ref() {
                return Ok(record.access_token.clone());
            }
            creds.identity.clone().ok_or_else(|| {
                CrewConnectError::Authentication(
                    "no backend credential and no identity credential to log in with".into(),
                )
            })?
        };

        let backend = self.login(&identity).await?;
        self.credentials.write().await.backend = Some(backend.clone());
        self.persist(BACKEND_TOKEN_KEY, backend.clone()).await?;

        info!(user = %self.user_id, "logged in to backend");
        Ok(backend.access_token)
    }

    async fn reauthenticate(&self, stale: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let identity = {
            let creds = self.credentials.read().await;
            if let Some(current) = creds.backend.as_ref() {
                if current.access_token != stale {
                    debug!("credential already refreshed by a concurrent request");
                    return Ok(current.access_token.clone());
                }
            }
            creds.identity.clone()
        };

        let (provider, identity) = match (self.identity_provider.as_ref(), identity) {
            (Some(provider), Some(identity)) => (provider, identity),
            _ => {
                return Err(CrewConnectError::Authentication(
                    "backend rejected the credential and re-authentication is not configured"
                        .into(),
                ))
            }
        };

        let identity = provider.refresh(&identity).await.map_err(into_domain)?;
        let backend = self.login(&identity).await?;

        {
            let mut creds = self.credentials.write().await;
            creds.identity = Some(identity.clone());
            creds.backend = Some(backend.clone());
        }
        self.persist(IDENTITY_TOKEN_KEY, identity).await?;
        self.persist(BACKEND_TOKEN_KEY, backend.clone()).await?;

        info!(user = %self.user_id, "re-authenticated with backend");
        Ok(backend.access_token)
    }

    async fn persist(&self, key: &str, record: TokenRecord) -> Result<()> {
        match self.token_store.as_ref() {
            Some(store) => store.set(key, record).await.map_err(into_domain),
            None => Ok(()),
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        query: &QueryParams,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Response> {
        let mut builder = self.http.request(method.clone(), url.clone()).bearer_auth(token);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.http.send(builder).await
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        let resolved = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            self.host.join(path)
        };
        resolved.map_err(|e| CrewConnectError::Config(format!("invalid request URL `{path}`: {e}")))
    }
}

impl fmt::Debug for BackendSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSession")
            .field("host", &self.host.as_str())
            .field("user_id", &self.user_id)
            .field("reauthentication", &self.identity_provider.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CrewApi for BackendSession {
    fn user_id(&self) -> String {
        self.user_id.clone()
    }

    fn base_url(&self) -> Url {
        self.host.clone()
    }

    async fn get_json(&self, path_or_url: &str, query: &QueryParams) -> Result<Value> {
        self.request(Method::GET, path_or_url, query, None).await
    }
}

async fn decode_json(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await.map_err(into_domain)?;

    if !status.is_success() {
        return Err(CrewConnectError::backend_status(status.as_u16(), body));
    }

    serde_json::from_str(&body).map_err(|e| {
        CrewConnectError::unexpected_response(format!("response body is not JSON: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use crewconnect_common::testing::MockIdentityProvider;
    use crewconnect_common::MemoryTokenStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn session(server: &MockServer) -> BackendSession {
        BackendSession::new(&server.uri(), HttpClient::new().unwrap(), "JDOE").unwrap()
    }

    #[tokio::test]
    async fn sends_bearer_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/crews/JDOE/flight-schedule"))
            .and(header("authorization", "Bearer backend-1"))
            .and(query_param("from", "2024-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server).await.with_backend_token(TokenRecord::bearer("backend-1"));
        let value = session
            .get_json(
                "/api/crews/JDOE/flight-schedule",
                &[("from".to_string(), "2024-07-01".to_string())],
            )
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn absolute_urls_are_used_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/page/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server).await.with_backend_token(TokenRecord::bearer("t"));
        let next = format!("{}/api/page/2", server.uri());

        assert_eq!(session.get_json(&next, &[]).await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn missing_credentials_is_authentication_error() {
        let server = MockServer::start().await;
        let session = session(&server).await;

        let err = session.get_json("/api/anything", &[]).await.unwrap_err();

        assert_eq!(err.label(), "authentication");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logs_in_with_identity_token_when_backend_token_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"userId": "JDOE", "accessToken": "idp-access"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "backend-1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .and(header("authorization", "Bearer backend-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let session = session(&server)
            .await
            .with_identity(
                Arc::new(MockIdentityProvider::new("JDOE")),
                MockIdentityProvider::issued_record(),
            )
            .with_token_store(store.clone());

        session.get_json("/api/ping", &[]).await.unwrap();
        session.get_json("/api/ping", &[]).await.unwrap();

        let stored = store.get(BACKEND_TOKEN_KEY).await.unwrap().unwrap();
        assert_eq!(stored.access_token, "backend-1");
        assert_eq!(stored.subject.as_deref(), Some("JDOE"));
    }

    #[tokio::test]
    async fn non_success_status_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such crew"))
            .mount(&server)
            .await;

        let session = session(&server).await.with_backend_token(TokenRecord::bearer("t"));
        let err = session.get_json("/api/crews/NOPE", &[]).await.unwrap_err();

        assert_eq!(err, CrewConnectError::backend_status(404, "no such crew"));
    }

    #[tokio::test]
    async fn non_json_body_is_backend_error_without_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let session = session(&server).await.with_backend_token(TokenRecord::bearer("t"));
        let err = session.get_json("/api/crews/JDOE", &[]).await.unwrap_err();

        assert_eq!(err.label(), "backend");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn unauthorized_without_identity_provider_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server).await.with_backend_token(TokenRecord::bearer("stale"));
        let err = session.get_json("/api/crews/JDOE", &[]).await.unwrap_err();

        assert_eq!(err.label(), "authentication");
    }

    #[tokio::test]
    async fn rejected_login_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(403).set_body_string("unknown crew"))
            .mount(&server)
            .await;

        let err = session(&server)
            .await
            .login(&TokenRecord::bearer("idp-access"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn debug_output_omits_tokens() {
        let session = BackendSession::new("https://crew.example", HttpClient::new().unwrap(), "JDOE")
            .unwrap()
            .with_backend_token(TokenRecord::bearer("secret-backend-token"));

        let rendered = format!("{session:?}");
        assert!(rendered.contains("JDOE"));
        assert!(!rendered.contains("secret-backend-token"));
    }
}
