//! Shared helpers for the domain layer

pub mod json;
