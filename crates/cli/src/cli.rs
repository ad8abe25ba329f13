//! Command-line arguments

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use crewconnect_core::SortKey;

#[derive(Debug, Parser)]
#[command(name = "crewconnect", version, about = "Crew flight schedules and pairing options")]
pub struct Cli {
    /// Config file to use instead of the environment / probed locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Flights operated between two dates (inclusive)
    Schedule(ScheduleArgs),
    /// Pairing options around a reference date
    Pairings(PairingsArgs),
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    pub start: NaiveDate,
    /// Last day to include; defaults to the start date
    pub end: Option<NaiveDate>,
    /// Only flights with no crew member assigned to this role code
    #[arg(long, value_name = "ROLE")]
    pub missing: Option<String>,
    /// Only flights operated with this aircraft type
    #[arg(long, value_name = "TYPE")]
    pub aircraft: Option<String>,
}

#[derive(Debug, Args)]
pub struct PairingsArgs {
    pub reference_date: NaiveDate,
    #[arg(long, default_value = "rest", value_name = "KEY")]
    pub sort: SortKey,
    #[arg(long = "airport", value_name = "IATA")]
    pub airports: Vec<String>,
    #[arg(long = "stopover", value_name = "IATA")]
    pub stopovers: Vec<String>,
    #[arg(long = "flight-number", value_name = "NUMBER")]
    pub flight_numbers: Vec<String>,
    #[arg(long)]
    pub total_on_days: Option<u32>,
    #[arg(long, value_name = "NIGHTS")]
    pub consecutive_stopover_nights: Option<u32>,
    /// Drop pairings touching this day (repeatable)
    #[arg(long = "exclude-date", value_name = "DATE")]
    pub excluded_dates: Vec<NaiveDate>,
    /// Drop pairings overnighting at this airport (repeatable)
    #[arg(long = "exclude-stopover", value_name = "IATA")]
    pub excluded_stopovers: Vec<String>,
    #[arg(long, default_value_t = 1, value_name = "DAYS")]
    pub min_on_days: u32,
}
