//! Capability traits for credential storage and identity providers
//!
//! These traits let the backend session and the session orchestration be
//! tested with in-memory doubles and keep interactive login out of the
//! library.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::store::TokenStoreError;
use super::types::{TokenRecord, UserInfo};

/// Keyed persistence for token records
///
/// Keys are short identifiers such as `identity` and `backend`. A store
/// outlives any client that writes to it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Check whether a record exists for `key`
    async fn has(&self, key: &str) -> bool;

    /// Fetch the record stored under `key`
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be read or decoded
    async fn get(&self, key: &str) -> Result<Option<TokenRecord>, TokenStoreError>;

    /// Store `record` under `key`, replacing any previous record
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    async fn set(&self, key: &str, record: TokenRecord) -> Result<(), TokenStoreError>;
}

/// OAuth 2.0 / OpenID Connect provider operations
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Start an authorization-code flow and return the URL to visit
    ///
    /// # Errors
    /// Returns error if the authorization endpoint is not a valid URL
    async fn generate_authorization_url(&self) -> Result<String, OAuthClientError>;

    /// Finish the flow from the full redirect URL the browser landed on
    ///
    /// # Errors
    /// Returns error on provider error parameters, state mismatch, or a
    /// failed code exchange
    async fn complete_from_redirect(&self, redirect_url: &str)
        -> Result<TokenRecord, OAuthClientError>;

    /// Obtain a successor record with the refresh token of `existing`
    ///
    /// # Errors
    /// Returns error if `existing` has no refresh token or the provider
    /// rejects it
    async fn refresh(&self, existing: &TokenRecord) -> Result<TokenRecord, OAuthClientError>;

    /// Claims of the user `record` was issued to
    ///
    /// # Errors
    /// Returns error if the provider has no userinfo endpoint or rejects the
    /// token
    async fn fetch_user_info(&self, record: &TokenRecord) -> Result<UserInfo, OAuthClientError>;
}

/// Interactive step of the authorization-code flow
///
/// Receives the authorization URL, lets the user sign in, and returns the
/// full redirect URL (including `code` and `state`).
#[async_trait]
pub trait AuthorizationCodeProvider: Send + Sync {
    /// # Errors
    /// Returns [`OAuthClientError::Interaction`] when the user aborts or the
    /// redirect cannot be read
    async fn authorize(&self, authorization_url: &str) -> Result<String, OAuthClientError>;
}
