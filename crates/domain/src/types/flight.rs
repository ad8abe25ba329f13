//! Flight sector as returned by the flight schedule endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::flight_times::{Delay, FlightTimes};
use super::load::{FreightInfo, PassengerInfo};
use super::roster::Roster;
use crate::utils::json::{decode, required};
use crate::Result;

/// One scheduled sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub airline_code: Option<String>,
    /// IATA code of the departure airport
    pub departure_airport: String,
    /// IATA code of the arrival airport
    pub arrival_airport: String,
    /// Aircraft subtype code, e.g. `73H`
    pub aircraft_type: Option<String>,
    pub aircraft_registration: Option<String>,
    pub status: Option<String>,
    pub times: FlightTimes,
    pub delays: Vec<Delay>,
    pub roster: Roster,
    pub passenger_info: Option<PassengerInfo>,
    pub freight_info: Option<FreightInfo>,
}

impl Flight {
    /// Build a flight from one entry of an aircraft's `sectors` array.
    ///
    /// # Errors
    /// Returns [`crate::CrewConnectError::Schema`] when the flight number or
    /// either airport is missing, or a nested record is invalid.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: FlightDto = decode("Flight", raw)?;

        Ok(Self {
            flight_number: required(dto.flight_number, "Flight", "flightNumber")?,
            airline_code: dto.airline_code,
            departure_airport: required(
                dto.departure_airport_code,
                "Flight",
                "departureAirportCode",
            )?,
            arrival_airport: required(dto.arrival_airport_code, "Flight", "arrivalAirportCode")?,
            aircraft_type: dto.aircraft_type,
            aircraft_registration: dto.aircraft_registration,
            status: dto.status,
            times: dto
                .flight_times
                .as_ref()
                .map(FlightTimes::from_raw)
                .transpose()?
                .unwrap_or_default(),
            delays: dto
                .delays
                .unwrap_or_default()
                .iter()
                .map(Delay::from_raw)
                .collect::<Result<_>>()?,
            roster: Roster::from_raw(&dto.crew_members.unwrap_or_default())?,
            passenger_info: dto.passenger_info.as_ref().map(PassengerInfo::from_raw).transpose()?,
            freight_info: dto.freight_info.as_ref().map(FreightInfo::from_raw).transpose()?,
        })
    }

    /// True when no crew member with `role` is assigned to this sector.
    #[must_use]
    pub fn is_missing_crew_members(&self, role: &str) -> bool {
        self.roster.is_missing(role)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightDto {
    flight_number: Option<String>,
    airline_code: Option<String>,
    departure_airport_code: Option<String>,
    arrival_airport_code: Option<String>,
    aircraft_type: Option<String>,
    aircraft_registration: Option<String>,
    status: Option<String>,
    flight_times: Option<Value>,
    delays: Option<Vec<Value>>,
    crew_members: Option<Vec<Value>>,
    passenger_info: Option<Value>,
    freight_info: Option<Value>,
}
