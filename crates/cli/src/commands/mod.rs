//! Subcommand implementations

pub mod pairings;
pub mod schedule;
