//! `crewconnect schedule`

use crewconnect_domain::Flight;
use serde_json::Value;

use crate::cli::ScheduleArgs;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, args: &ScheduleArgs) -> anyhow::Result<Value> {
    let mut flights = ctx.schedule.get_flight_schedule(args.start, args.end).await?;
    retain_matching(&mut flights, args);
    Ok(serde_json::to_value(flights)?)
}

/// Apply the `--missing` and `--aircraft` filters.
fn retain_matching(flights: &mut Vec<Flight>, args: &ScheduleArgs) {
    if let Some(role) = args.missing.as_deref() {
        flights.retain(|flight| flight.is_missing_crew_members(role));
    }
    if let Some(aircraft) = args.aircraft.as_deref() {
        flights.retain(|flight| {
            flight.aircraft_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(aircraft))
        });
    }
}
