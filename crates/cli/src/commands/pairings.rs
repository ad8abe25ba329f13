//! `crewconnect pairings`

use crewconnect_core::PairingQuery;
use serde_json::Value;

use crate::cli::PairingsArgs;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, args: PairingsArgs) -> anyhow::Result<Value> {
    let pairings = ctx.schedule.get_pairing_options(build_query(args)).await?;
    Ok(serde_json::to_value(pairings)?)
}

fn build_query(args: PairingsArgs) -> PairingQuery {
    let mut query = PairingQuery::new(args.reference_date, args.sort)
        .airports(args.airports)
        .stopovers(args.stopovers)
        .flight_numbers(args.flight_numbers)
        .exclude_dates(args.excluded_dates)
        .exclude_stopovers(args.excluded_stopovers)
        .minimum_on_days(args.min_on_days);

    if let Some(days) = args.total_on_days {
        query = query.total_on_days(days);
    }
    if let Some(nights) = args.consecutive_stopover_nights {
        query = query.consecutive_stopover_nights(nights);
    }
    query
}
