//! Authenticated access to the crew scheduling backend
//!
//! [`BackendSession`] owns the backend and identity-provider credentials and
//! implements the [`CrewApi`](crewconnect_core::CrewApi) port consumed by the
//! schedule client. [`fetch_server_config`] reads the unauthenticated
//! bootstrap document that tells the client how to log in.

pub mod server_config;
pub mod session;

pub use server_config::{fetch_server_config, ServerConfig, OKTA_AUTHENTICATION_MODE};
pub use session::BackendSession;
