//! Testing utilities shared with downstream crates
//!
//! Enabled with the `test-utils` feature:
//! - **[`mocks`]**: in-memory identity provider and authorization-code
//!   provider that never touch the network or stdin

pub mod mocks;

pub use mocks::{MockIdentityProvider, StaticRedirectProvider};
