//! Login orchestration

pub mod authenticator;

pub use authenticator::Authenticator;
