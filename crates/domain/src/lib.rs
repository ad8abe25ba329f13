//! # CrewConnect Domain
//!
//! Crew-scheduling domain models for the CrewConnect client.
//!
//! This crate contains:
//! - Flight, roster and pairing models with their `from_raw` mappers
//! - The shared error type and Result alias
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other CrewConnect crates
//! - No I/O; models are built from already-decoded JSON

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

pub use config::*;
pub use errors::*;
pub use types::*;
