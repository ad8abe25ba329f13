//! Duty periods and their components, populated from pairing details

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_code_conversions;
use crate::utils::json::decode;
use crate::Result;

/// Kind of activity a duty period component represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Flight,
    Ground,
    Shuttle,
    Train,
    Simulator,
    Hotel,
    /// Any code this client does not know about yet
    Other,
}

impl_code_conversions!(ActivityKind {
    Flight => "flight",
    Ground => "ground",
    Shuttle => "shuttle",
    Train => "train",
    Simulator => "simulator",
    Hotel => "hotel",
    Other => "other",
});

/// One flight or ground activity within a duty period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyPeriodComponent {
    pub kind: ActivityKind,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    /// Set for flight components (operating or positioning)
    pub flight_number: Option<String>,
    pub description: Option<String>,
}

impl DutyPeriodComponent {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: ComponentDto = decode("DutyPeriodComponent", raw)?;
        let kind = dto
            .kind
            .as_deref()
            .and_then(|code| code.parse().ok())
            .unwrap_or(ActivityKind::Other);

        Ok(Self {
            kind,
            start: dto.start_date_time,
            end: dto.end_date_time,
            departure_airport: dto.departure_airport_code,
            arrival_airport: dto.arrival_airport_code,
            flight_number: dto.flight_number,
            description: dto.description,
        })
    }

    /// Elapsed time between start and end, when both are known and ordered.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = (self.start?, self.end?);
        (end - start).to_std().ok()
    }
}

/// One working day within a pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyPeriod {
    pub components: Vec<DutyPeriodComponent>,
    /// Flight-hours (block) time of the day
    pub block_time: Duration,
    /// Rest before the next duty period; absent on the last day of a trip
    pub rest_to_next: Option<Duration>,
}

impl DutyPeriod {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: DutyPeriodDto = decode("DutyPeriod", raw)?;

        Ok(Self {
            components: dto
                .components
                .unwrap_or_default()
                .iter()
                .map(DutyPeriodComponent::from_raw)
                .collect::<Result<_>>()?,
            block_time: Duration::from_secs(dto.block_time.unwrap_or_default()),
            rest_to_next: dto.rest_duration.map(Duration::from_secs),
        })
    }

    /// Components flown as flights, in duty order.
    pub fn flights(&self) -> impl Iterator<Item = &DutyPeriodComponent> {
        self.components.iter().filter(|c| c.kind == ActivityKind::Flight)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentDto {
    #[serde(rename = "type")]
    kind: Option<String>,
    start_date_time: Option<DateTime<Utc>>,
    end_date_time: Option<DateTime<Utc>>,
    departure_airport_code: Option<String>,
    arrival_airport_code: Option<String>,
    flight_number: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DutyPeriodDto {
    components: Option<Vec<Value>>,
    block_time: Option<u64>,
    rest_duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_duty_period_with_components() {
        let duty = DutyPeriod::from_raw(&json!({
            "components": [
                {
                    "type": "FLIGHT",
                    "startDateTime": "2024-07-01T05:00:00Z",
                    "endDateTime": "2024-07-01T07:30:00Z",
                    "departureAirportCode": "ORY",
                    "arrivalAirportCode": "LIS",
                    "flightNumber": "TO3456"
                },
                {"type": "HOTEL", "description": "Lisbon city hotel"},
                {"type": "BRIEFING"}
            ],
            "blockTime": 9000,
            "restDuration": 50400
        }))
        .unwrap();

        assert_eq!(duty.components.len(), 3);
        assert_eq!(duty.components[0].kind, ActivityKind::Flight);
        assert_eq!(duty.components[0].duration(), Some(Duration::from_secs(9000)));
        assert_eq!(duty.components[1].kind, ActivityKind::Hotel);
        assert_eq!(duty.components[2].kind, ActivityKind::Other);
        assert_eq!(duty.flights().count(), 1);
        assert_eq!(duty.block_time, Duration::from_secs(9000));
        assert_eq!(duty.rest_to_next, Some(Duration::from_secs(50400)));
    }

    #[test]
    fn last_duty_period_has_no_rest() {
        let duty = DutyPeriod::from_raw(&json!({"blockTime": 3600})).unwrap();

        assert!(duty.components.is_empty());
        assert_eq!(duty.rest_to_next, None);
    }

    #[test]
    fn inverted_component_has_no_duration() {
        let component = DutyPeriodComponent::from_raw(&json!({
            "type": "GROUND",
            "startDateTime": "2024-07-01T08:00:00Z",
            "endDateTime": "2024-07-01T07:00:00Z"
        }))
        .unwrap();

        assert_eq!(component.duration(), None);
    }
}
