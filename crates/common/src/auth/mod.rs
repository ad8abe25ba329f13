//! OAuth 2.0 + OpenID Connect for the crew identity provider
//!
//! The crew backend does not authenticate users itself: the crew member
//! signs in with the airline's identity provider, and the resulting access
//! token is exchanged for a backend token.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ IdentityProviderSession  │  discovery, PKCE flow, refresh, userinfo
//! └────────────┬─────────────┘
//!              │ produces
//!              ▼
//!        TokenRecord ──► TokenStore (memory here, file in infra)
//! ```
//!
//! The interactive step (showing the URL, reading back the redirect) sits
//! behind [`AuthorizationCodeProvider`] so the library never reads stdin.
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenRecord`, token responses, provider metadata
//! - **[`pkce`]**: PKCE challenge generation
//! - **[`client`]**: `IdentityProviderSession`
//! - **[`traits`]**: capability traits
//! - **[`store`]**: `MemoryTokenStore` and the store error type

pub mod client;
pub mod pkce;
pub mod store;
pub mod traits;
pub mod types;

pub use client::{IdentityProviderSession, OAuthClientError};
pub use pkce::PkceChallenge;
pub use store::{MemoryTokenStore, TokenStoreError};
pub use traits::{AuthorizationCodeProvider, IdentityProvider, TokenStore};
pub use types::{
    IdentityProviderConfig, OAuthError, OidcConfiguration, TokenRecord, TokenResponse, UserInfo,
    DEFAULT_SCOPES, REDIRECT_URI,
};
