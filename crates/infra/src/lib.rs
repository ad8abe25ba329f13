//! # CrewConnect Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client
//! - [`BackendSession`], the authenticated backend adapter behind
//!   [`CrewApi`](crewconnect_core::CrewApi)
//! - [`Authenticator`], which turns stored or interactive credentials into a
//!   session
//! - File token persistence, configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `crewconnect-core` and `crewconnect-common`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod token_store;

// Re-export commonly used items
pub use auth::Authenticator;
pub use backend::{fetch_server_config, BackendSession, ServerConfig};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use token_store::FileTokenStore;
