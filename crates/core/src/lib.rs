//! # CrewConnect Core
//!
//! Crew-scheduling use cases over an abstract backend port.
//!
//! This crate contains:
//! - The [`CrewApi`] port (authenticated JSON reads against the backend)
//! - [`ScheduleClient`]: flight schedule retrieval and the pairing-options
//!   pipeline (pagination, filtering, enrichment, sorting)
//!
//! ## Architecture Principles
//! - The only workspace dependency is `crewconnect-domain`
//! - No HTTP or storage code; everything external goes through the port
//! - Every pipeline step awaits sequentially, one request at a time

pub mod schedule;

pub use schedule::ports::CrewApi;
pub use schedule::query::PairingQuery;
pub use schedule::sort::{SortBy, SortKey};
pub use schedule::ScheduleClient;
