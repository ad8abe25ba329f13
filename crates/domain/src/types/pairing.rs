//! Pairing (multi-day trip) offers

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::duty_period::DutyPeriod;
use crate::utils::json::{decode, id_string, required};
use crate::Result;

/// A rest period between two duty periods of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestPeriod {
    pub duration: Duration,
}

/// A multi-day trip offer
///
/// `duty_periods` stays empty until the pairing has been enriched from its
/// details endpoint; `rest_periods` comes with the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id: String,
    pub code: Option<String>,
    pub scheduled_departure_date: NaiveDate,
    pub scheduled_arrival_date: NaiveDate,
    /// IATA codes of the airports where the crew overnights
    pub stopovers: Vec<String>,
    pub total_on_days: u32,
    pub rest_periods: Vec<RestPeriod>,
    pub duty_periods: Vec<DutyPeriod>,
}

impl Pairing {
    /// Build a pairing from one entry of a pairing-requests page.
    ///
    /// # Errors
    /// Returns [`crate::CrewConnectError::Schema`] when the identifier or a
    /// scheduled date is missing.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: PairingDto = decode("Pairing", raw)?;

        Ok(Self {
            id: required(dto.id.as_ref().and_then(id_string), "Pairing", "id")?,
            code: dto.pairing_code,
            scheduled_departure_date: required(
                dto.scheduled_departure_date,
                "Pairing",
                "scheduledDepartureDate",
            )?,
            scheduled_arrival_date: required(
                dto.scheduled_arrival_date,
                "Pairing",
                "scheduledArrivalDate",
            )?,
            stopovers: dto.stopovers.unwrap_or_default(),
            total_on_days: dto.total_on_days.unwrap_or_default(),
            rest_periods: dto
                .rest_periods
                .unwrap_or_default()
                .into_iter()
                .map(|rest| RestPeriod { duration: Duration::from_secs(rest.duration) })
                .collect(),
            duty_periods: Vec::new(),
        })
    }

    /// Replace the duty periods with those of a details response.
    ///
    /// # Errors
    /// Returns a schema error when `dutyPeriods` is present but malformed.
    pub fn apply_details(&mut self, raw: &Value) -> Result<()> {
        let dto: PairingDetailsDto = decode("PairingDetails", raw)?;
        self.duty_periods = dto
            .duty_periods
            .unwrap_or_default()
            .iter()
            .map(DutyPeriod::from_raw)
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// True when any day of `[departure, arrival]` is in `dates`.
    #[must_use]
    pub fn overlaps_any(&self, dates: &HashSet<NaiveDate>) -> bool {
        dates
            .iter()
            .any(|date| (self.scheduled_departure_date..=self.scheduled_arrival_date).contains(date))
    }

    /// True when the pairing overnights at any airport of `airports`.
    #[must_use]
    pub fn stops_at_any(&self, airports: &HashSet<String>) -> bool {
        self.stopovers.iter().any(|stopover| airports.contains(stopover))
    }

    /// Arithmetic mean of rest-period durations in seconds; zero when there
    /// are none.
    #[must_use]
    pub fn mean_rest_secs(&self) -> f64 {
        mean_secs(self.rest_periods.iter().map(|rest| rest.duration))
    }

    /// Arithmetic mean of duty-period block times in seconds; zero before
    /// enrichment.
    #[must_use]
    pub fn mean_block_secs(&self) -> f64 {
        mean_secs(self.duty_periods.iter().map(|duty| duty.block_time))
    }

    /// Number of calendar days between departure and arrival, inclusive.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.scheduled_arrival_date - self.scheduled_departure_date).num_days() + 1
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_secs(durations: impl Iterator<Item = Duration>) -> f64 {
    let (total, count) =
        durations.fold((0.0_f64, 0_usize), |(total, count), d| (total + d.as_secs_f64(), count + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairingDto {
    id: Option<Value>,
    pairing_code: Option<String>,
    scheduled_departure_date: Option<NaiveDate>,
    scheduled_arrival_date: Option<NaiveDate>,
    stopovers: Option<Vec<String>>,
    total_on_days: Option<u32>,
    rest_periods: Option<Vec<RestPeriodDto>>,
}

#[derive(Debug, Deserialize)]
struct RestPeriodDto {
    duration: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairingDetailsDto {
    duty_periods: Option<Vec<Value>>,
}
