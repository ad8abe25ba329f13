//! Integration tests for session setup
//!
//! **Coverage:**
//! - Interactive login: server config → discovery → PKCE authorization →
//!   code exchange → userinfo → `/login`, persisted to a file store
//! - Stored credentials are reused without prompting or logging in
//! - Unsupported authentication modes are rejected
//!
//! **Infrastructure:**
//! - WireMock server playing both the crew backend and the identity provider
//! - FileTokenStore in a temporary directory

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use crewconnect_common::testing::{MockIdentityProvider, StaticRedirectProvider};
use crewconnect_common::{MemoryTokenStore, TokenRecord, TokenStore};
use crewconnect_core::CrewApi;
use crewconnect_domain::constants::{BACKEND_TOKEN_KEY, IDENTITY_TOKEN_KEY};
use crewconnect_domain::CrewConnectError;
use crewconnect_infra::{Authenticator, FileTokenStore, HttpClient};
use serde_json::json;
use support::{mount_login, EchoStateProvider, USER};
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_server_config(server: &MockServer, mode: &str) {
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authenticationMode": mode,
            "discoveryUri": format!("{}/oauth2/default", server.uri()),
            "clientId": "crew-app"
        })))
        .mount(server)
        .await;
}

async fn mount_identity_provider(server: &MockServer) {
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": format!("{uri}/oauth2/default"),
            "authorization_endpoint": format!("{uri}/oauth2/v1/authorize"),
            "token_endpoint": format!("{uri}/oauth2/v1/token"),
            "userinfo_endpoint": format!("{uri}/oauth2/v1/userinfo")
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-1"))
        .and(body_string_contains("code_verifier="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "idp-access",
            "refresh_token": "idp-refresh",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "openid profile offline_access"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v1/userinfo"))
        .and(header("authorization", "Bearer idp-access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sub": "00u1", "crewCode": USER})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn interactive_login_persists_both_records() {
    let server = MockServer::start().await;
    mount_server_config(&server, "okta").await;
    mount_identity_provider(&server).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"userId": USER, "accessToken": "idp-access"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "backend-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/crews/JDOE/ping"))
        .and(header("authorization", "Bearer backend-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": true})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("tokens.json");
    let authenticator = Authenticator::new(
        server.uri(),
        HttpClient::new().unwrap(),
        Arc::new(FileTokenStore::new(&token_path)),
    );

    let session = authenticator
        .connect(&EchoStateProvider { code: "auth-code-1".into() })
        .await
        .unwrap();

    assert_eq!(session.user_id(), USER);
    assert_eq!(
        session.get_json("/api/crews/JDOE/ping", &[]).await.unwrap(),
        json!({"pong": true})
    );

    let reopened = FileTokenStore::new(&token_path);
    let identity = reopened.get(IDENTITY_TOKEN_KEY).await.unwrap().unwrap();
    assert_eq!(identity.access_token, "idp-access");
    assert_eq!(identity.subject.as_deref(), Some(USER));
    let backend = reopened.get(BACKEND_TOKEN_KEY).await.unwrap().unwrap();
    assert_eq!(backend.access_token, "backend-1");
}

#[tokio::test]
async fn stored_credentials_are_reused() {
    let server = MockServer::start().await;
    mount_login(&server, "unused", 0).await;
    Mock::given(method("GET"))
        .and(path("/api/crews/JDOE/ping"))
        .and(header("authorization", "Bearer stored-backend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_records([
        (IDENTITY_TOKEN_KEY, MockIdentityProvider::issued_record()),
        (BACKEND_TOKEN_KEY, TokenRecord::bearer("stored-backend").with_subject(USER)),
    ]));
    let prompt = StaticRedirectProvider::new("com.apm.crewconnect:/callback?code=x&state=y");
    let authenticator = Authenticator::new(server.uri(), HttpClient::new().unwrap(), store);

    let session = authenticator
        .connect_with(Arc::new(MockIdentityProvider::new(USER)), &prompt)
        .await
        .unwrap();

    assert_eq!(session.user_id(), USER);
    session.get_json("/api/crews/JDOE/ping", &[]).await.unwrap();
    assert!(prompt.presented_urls().is_empty());
}

#[tokio::test]
async fn stored_credentials_without_subject_ask_userinfo() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::with_records([
        (IDENTITY_TOKEN_KEY, MockIdentityProvider::issued_record()),
        (BACKEND_TOKEN_KEY, TokenRecord::bearer("stored-backend")),
    ]));
    let authenticator = Authenticator::new(server.uri(), HttpClient::new().unwrap(), store);

    let session = authenticator
        .connect_with(
            Arc::new(MockIdentityProvider::new("ABC")),
            &StaticRedirectProvider::new("unused"),
        )
        .await
        .unwrap();

    assert_eq!(session.user_id(), "ABC");
}

#[tokio::test]
async fn mock_flow_logs_in_when_store_is_empty() {
    let server = MockServer::start().await;
    mount_login(&server, "backend-1", 1).await;

    let store = Arc::new(MemoryTokenStore::new());
    let prompt = StaticRedirectProvider::new("com.apm.crewconnect:/callback?code=abc&state=s");
    let authenticator =
        Authenticator::new(server.uri(), HttpClient::new().unwrap(), store.clone());

    let session = authenticator
        .connect_with(Arc::new(MockIdentityProvider::new(USER)), &prompt)
        .await
        .unwrap();

    assert_eq!(session.user_id(), USER);
    assert_eq!(prompt.presented_urls().len(), 1);
    assert!(store.has(IDENTITY_TOKEN_KEY).await);
    assert!(store.has(BACKEND_TOKEN_KEY).await);
}

#[tokio::test]
async fn unsupported_authentication_mode_is_rejected() {
    let server = MockServer::start().await;
    mount_server_config(&server, "ldap").await;

    let authenticator = Authenticator::new(
        server.uri(),
        HttpClient::new().unwrap(),
        Arc::new(MemoryTokenStore::new()),
    );
    let err = authenticator
        .connect(&StaticRedirectProvider::new("unused"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrewConnectError::Authentication(ref msg) if msg.contains("ldap")));
}
