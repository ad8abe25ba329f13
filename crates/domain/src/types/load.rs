//! Passenger and freight load figures attached to a sector

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json::decode;
use crate::Result;

/// Passenger counts per cabin class
///
/// `expected_*` come from reservations, `booked_*` from check-in and the
/// plain counts from the load sheet. Every figure is optional because the
/// backend fills them progressively as the departure approaches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassengerInfo {
    pub total_pax_from_mvt: Option<u32>,
    pub expected_pax_f: Option<u32>,
    pub expected_pax_c: Option<u32>,
    pub expected_pax_w: Option<u32>,
    pub expected_pax_y: Option<u32>,
    pub expected_pax_infant: Option<u32>,
    pub expected_pax_pad: Option<u32>,
    pub pax_f: Option<u32>,
    pub pax_c: Option<u32>,
    pub pax_w: Option<u32>,
    pub pax_y: Option<u32>,
    pub pax_pad: Option<u32>,
    pub pax_male: Option<u32>,
    pub pax_female: Option<u32>,
    pub pax_infant: Option<u32>,
    pub booked_pax_f: Option<u32>,
    pub booked_pax_c: Option<u32>,
    pub booked_pax_w: Option<u32>,
    pub booked_pax_y: Option<u32>,
    pub booked_pax_infant: Option<u32>,
    pub booked_pax_pad: Option<u32>,
    pub pax_adults: Option<u32>,
    pub pax_children: Option<u32>,
}

impl PassengerInfo {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        decode("PassengerInfo", raw)
    }

    /// Seated passengers from the load sheet, summed over all cabins.
    ///
    /// Returns `None` until at least one cabin figure is known. Saturates at
    /// `u32::MAX`.
    #[must_use]
    pub fn seated_total(&self) -> Option<u32> {
        [self.pax_f, self.pax_c, self.pax_w, self.pax_y]
            .into_iter()
            .flatten()
            .fold(None, |acc, n| Some(acc.unwrap_or(0).saturating_add(n)))
    }
}

/// Hold load in kilograms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreightInfo {
    pub freight_weight: Option<f64>,
    pub mail_weight: Option<f64>,
    pub baggage_weight: Option<f64>,
}

impl FreightInfo {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        decode("FreightInfo", raw)
    }
}
