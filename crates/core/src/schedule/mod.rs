//! Flight schedule and pairing options

pub mod ports;
pub mod query;
pub mod service;
pub mod sort;

pub use service::ScheduleClient;
