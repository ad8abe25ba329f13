//! Shared fixtures for the infra integration tests

use std::sync::Arc;

use async_trait::async_trait;
use crewconnect_common::testing::MockIdentityProvider;
use crewconnect_common::{
    AuthorizationCodeProvider, MemoryTokenStore, OAuthClientError, TokenRecord,
};
use crewconnect_infra::{BackendSession, HttpClient};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "JDOE";

/// Session holding `backend_token` with a mock identity provider able to
/// refresh, persisting into `store`.
pub fn refreshable_session(
    server: &MockServer,
    backend_token: &str,
    provider: Arc<MockIdentityProvider>,
    store: Arc<MemoryTokenStore>,
) -> BackendSession {
    BackendSession::new(&server.uri(), HttpClient::new().expect("http client"), USER)
        .expect("session")
        .with_backend_token(TokenRecord::bearer(backend_token).with_subject(USER))
        .with_identity(provider, MockIdentityProvider::issued_record())
        .with_token_store(store)
}

/// `POST /login` answering with `token`, expected exactly `calls` times.
pub async fn mount_login(server: &MockServer, token: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(calls)
        .mount(server)
        .await;
}

/// Pairing summary as returned by the pairing-requests listing.
pub fn pairing_json(id: &str, from: &str, to: &str, stopovers: &[&str], on_days: u32) -> Value {
    json!({
        "id": id,
        "pairingCode": format!("P{id}"),
        "scheduledDepartureDate": from,
        "scheduledArrivalDate": to,
        "stopovers": stopovers,
        "totalOnDays": on_days,
        "restPeriods": [{"duration": 43200}]
    })
}

/// Code provider that completes the authorization by echoing the `state` of
/// the authorization URL back in a redirect carrying `code`.
#[derive(Debug)]
pub struct EchoStateProvider {
    pub code: String,
}

#[async_trait]
impl AuthorizationCodeProvider for EchoStateProvider {
    async fn authorize(&self, authorization_url: &str) -> Result<String, OAuthClientError> {
        let url = Url::parse(authorization_url)
            .map_err(|e| OAuthClientError::Interaction(e.to_string()))?;
        let state = url
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| OAuthClientError::Interaction("no state".into()))?;

        Ok(format!("com.apm.crewconnect:/callback?code={}&state={state}", self.code))
    }
}
