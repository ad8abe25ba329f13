//! Shared identity plumbing for the CrewConnect crates.
//!
//! # Modules
//! - [`auth`]: OAuth 2.0 / OpenID Connect with PKCE, token records, and the
//!   capability traits (`TokenStore`, `IdentityProvider`,
//!   `AuthorizationCodeProvider`) the other layers depend on
//! - [`testing`]: in-memory doubles, behind the `test-utils` feature

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{
    AuthorizationCodeProvider, IdentityProvider, IdentityProviderSession, MemoryTokenStore,
    OAuthClientError, TokenRecord, TokenStore, TokenStoreError,
};
