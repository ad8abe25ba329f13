//! Integration tests for BackendSession credential recovery
//!
//! **Coverage:**
//! - 401 then 200: one identity refresh, one `/login`, one retry
//! - A second 401 is surfaced, never retried again
//! - Concurrent 401s with the same stale token share one refresh
//! - Refresh rejection surfaces as an authentication error

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use crewconnect_common::testing::MockIdentityProvider;
use crewconnect_common::{MemoryTokenStore, TokenStore};
use crewconnect_core::CrewApi;
use crewconnect_domain::constants::{BACKEND_TOKEN_KEY, IDENTITY_TOKEN_KEY};
use crewconnect_domain::CrewConnectError;
use serde_json::json;
use support::{mount_login, refreshable_session};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROSTER_PATH: &str = "/api/crews/JDOE/roster";

async fn mount_roster(server: &MockServer, token: &str, status: u16, calls: u64) {
    Mock::given(method("GET"))
        .and(path(ROSTER_PATH))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"days": []})))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn unauthorized_then_ok_refreshes_exactly_once() {
    let server = MockServer::start().await;
    mount_roster(&server, "stale", 401, 1).await;
    mount_roster(&server, "fresh", 200, 1).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"userId": "JDOE", "accessToken": "idp-access-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(MockIdentityProvider::new("JDOE"));
    let store = Arc::new(MemoryTokenStore::new());
    let session = refreshable_session(&server, "stale", provider.clone(), store.clone());

    let value = session.get_json(ROSTER_PATH, &[]).await.unwrap();

    assert_eq!(value, json!({"days": []}));
    assert_eq!(provider.refresh_count(), 1);

    let identity = store.get(IDENTITY_TOKEN_KEY).await.unwrap().unwrap();
    assert_eq!(identity.access_token, "idp-access-1");
    assert_eq!(identity.refresh_token.as_deref(), Some("idp-refresh"));
    let backend = store.get(BACKEND_TOKEN_KEY).await.unwrap().unwrap();
    assert_eq!(backend.access_token, "fresh");
}

#[tokio::test]
async fn second_unauthorized_is_surfaced() {
    let server = MockServer::start().await;
    mount_roster(&server, "stale", 401, 1).await;
    mount_roster(&server, "fresh", 401, 1).await;
    mount_login(&server, "fresh", 1).await;

    let provider = Arc::new(MockIdentityProvider::new("JDOE"));
    let session =
        refreshable_session(&server, "stale", provider.clone(), Arc::new(MemoryTokenStore::new()));

    let err = session.get_json(ROSTER_PATH, &[]).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(provider.refresh_count(), 1);
}

#[tokio::test]
async fn concurrent_unauthorized_share_one_refresh() {
    let server = MockServer::start().await;
    mount_roster(&server, "stale", 401, 2).await;
    mount_roster(&server, "fresh", 200, 2).await;
    mount_login(&server, "fresh", 1).await;

    let provider = Arc::new(MockIdentityProvider::new("JDOE"));
    let session =
        refreshable_session(&server, "stale", provider.clone(), Arc::new(MemoryTokenStore::new()));

    let (first, second) =
        tokio::join!(session.get_json(ROSTER_PATH, &[]), session.get_json(ROSTER_PATH, &[]));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(provider.refresh_count(), 1);
}

#[tokio::test]
async fn rejected_refresh_is_authentication_error() {
    let server = MockServer::start().await;
    mount_roster(&server, "stale", 401, 1).await;
    mount_login(&server, "fresh", 0).await;

    let provider = Arc::new(MockIdentityProvider::new("JDOE"));
    provider.set_should_fail(true);
    let store = Arc::new(MemoryTokenStore::new());
    let session = refreshable_session(&server, "stale", provider, store.clone());

    let err = session.get_json(ROSTER_PATH, &[]).await.unwrap_err();

    assert!(matches!(err, CrewConnectError::Authentication(ref msg) if msg.contains("invalid_grant")));
    assert!(!store.has(BACKEND_TOKEN_KEY).await);
}
