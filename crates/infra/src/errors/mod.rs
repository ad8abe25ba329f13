//! Infrastructure error conversions

mod conversions;

pub use conversions::{into_domain, InfraError};
