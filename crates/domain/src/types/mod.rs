//! Domain models built from raw backend JSON
//!
//! Each model exposes a `from_raw` constructor that maps the backend's wire
//! shape onto typed fields and reports missing required fields as
//! [`crate::CrewConnectError::Schema`].

pub mod duty_period;
pub mod flight;
pub mod flight_times;
pub mod load;
pub mod pairing;
pub mod roster;

pub use duty_period::{ActivityKind, DutyPeriod, DutyPeriodComponent};
pub use flight::Flight;
pub use flight_times::{Delay, FlightTimes};
pub use load::{FreightInfo, PassengerInfo};
pub use pairing::{Pairing, RestPeriod};
pub use roster::{CrewMember, Roster};
