//! Sector timing and delay records

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json::{decode, required};
use crate::Result;

/// Scheduled, estimated and actual block times of one sector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightTimes {
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub estimated_departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
}

impl FlightTimes {
    /// Build from the `flightTimes` object of a sector.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: FlightTimesDto = decode("FlightTimes", raw)?;
        Ok(Self {
            scheduled_departure: dto.scheduled_departure_date_time,
            scheduled_arrival: dto.scheduled_arrival_date_time,
            estimated_departure: dto.estimated_departure_date_time,
            estimated_arrival: dto.estimated_arrival_date_time,
            actual_departure: dto.actual_departure_date_time,
            actual_arrival: dto.actual_arrival_date_time,
        })
    }

    /// Best known departure: actual, then estimated, then scheduled.
    #[must_use]
    pub fn departure(&self) -> Option<DateTime<Utc>> {
        self.actual_departure.or(self.estimated_departure).or(self.scheduled_departure)
    }

    /// Best known arrival: actual, then estimated, then scheduled.
    #[must_use]
    pub fn arrival(&self) -> Option<DateTime<Utc>> {
        self.actual_arrival.or(self.estimated_arrival).or(self.scheduled_arrival)
    }
}

/// A delay attributed to a sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delay {
    /// IATA delay code
    pub code: String,
    pub duration: Option<Duration>,
    pub reason: Option<String>,
}

impl Delay {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: DelayDto = decode("Delay", raw)?;
        Ok(Self {
            code: required(dto.code, "Delay", "code")?,
            duration: dto.duration.map(Duration::from_secs),
            reason: dto.reason,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightTimesDto {
    scheduled_departure_date_time: Option<DateTime<Utc>>,
    scheduled_arrival_date_time: Option<DateTime<Utc>>,
    estimated_departure_date_time: Option<DateTime<Utc>>,
    estimated_arrival_date_time: Option<DateTime<Utc>>,
    actual_departure_date_time: Option<DateTime<Utc>>,
    actual_arrival_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct DelayDto {
    code: Option<String>,
    duration: Option<u64>,
    reason: Option<String>,
}
