//! Schedule client - flight schedule and pairing options use cases

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use crewconnect_domain::constants::{PAIRING_DETAILS_ZONE_OFFSET, SCHEDULE_ZONE_OFFSET};
use crewconnect_domain::utils::json::array;
use crewconnect_domain::{CrewConnectError, Flight, Pairing, Result};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::ports::CrewApi;
use super::query::PairingQuery;

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

/// `/api/crews/{user}` followed by `segments`, each percent-encoded.
fn crew_path(user_id: &str, segments: &[&str]) -> String {
    let mut path = format!("/api/crews/{}", urlencoding::encode(user_id));
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
    }
    path
}

/// Crew schedule use cases
pub struct ScheduleClient {
    api: Arc<dyn CrewApi>,
}

impl ScheduleClient {
    /// Create a new schedule client over an authenticated backend
    pub fn new(api: Arc<dyn CrewApi>) -> Self {
        Self { api }
    }

    /// Crew code the client queries for
    pub fn user_id(&self) -> String {
        self.api.user_id()
    }

    /// Flights operated by the company between `start_date` and `end_date`
    /// (inclusive; defaults to `start_date`), in server order.
    ///
    /// # Errors
    /// Propagates session errors; a response missing the aircraft nesting is
    /// a [`CrewConnectError::Backend`] without status, and an invalid sector
    /// a [`CrewConnectError::Schema`].
    #[instrument(skip(self))]
    pub async fn get_flight_schedule(
        &self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Flight>> {
        let end_date = end_date.unwrap_or(start_date);
        // `to` is exclusive on the backend
        let to = end_date.succ_opt().ok_or_else(|| {
            CrewConnectError::Config(format!("end date {end_date} is out of range"))
        })?;

        let path = crew_path(&self.api.user_id(), &["flight-schedule"]);
        let query = [
            param("from", start_date),
            param("to", to),
            param("zoneOffset", SCHEDULE_ZONE_OFFSET),
        ];
        let raw = self.api.get_json(&path, &query).await?;

        let mut flights = Vec::new();
        for aircraft_by_date in array(&raw, &["_embedded", "companyAircraftByDateDtoList"])? {
            let fleet =
                array(aircraft_by_date, &["aircraftList", "_embedded", "companyAircraftDtoList"])?;
            for aircraft in fleet {
                for sector in array(aircraft, &["sectors"])? {
                    flights.push(Flight::from_raw(sector)?);
                }
            }
        }

        info!(count = flights.len(), "flight schedule retrieved");
        Ok(flights)
    }

    /// Pairing options matching `query`, enriched with duty periods and
    /// ordered by `query.sort_by`.
    ///
    /// Pages are fetched by following `_links.next.href`; the exclusions of
    /// the query are then applied, and only surviving pairings have their
    /// details fetched. Any failing request aborts the whole call.
    ///
    /// # Errors
    /// Propagates session errors and schema errors from pairing summaries or
    /// details.
    #[instrument(skip_all, fields(reference_date = %query.reference_date))]
    pub async fn get_pairing_options(&self, query: PairingQuery) -> Result<Vec<Pairing>> {
        let user_id = self.api.user_id();
        let base = crew_path(&user_id, &["pairing-requests"]);

        let mut params = vec![param("referenceDate", query.reference_date), param("isLocal", true)];
        params.extend(query.filter_params());

        let mut pairings = self.fetch_pairing_pages(&base, &params).await?;
        let fetched = pairings.len();

        query.retain_eligible(&mut pairings);

        for pairing in &mut pairings {
            let details = self
                .api
                .get_json(
                    &crew_path(&user_id, &["pairing-requests", &pairing.id, "details"]),
                    &[param("zoneOffset", PAIRING_DETAILS_ZONE_OFFSET)],
                )
                .await?;
            pairing.apply_details(&details)?;
        }

        query.sort_by.sort(&mut pairings);

        info!(fetched, returned = pairings.len(), sort_by = ?query.sort_by, "pairing options retrieved");
        Ok(pairings)
    }

    /// Fetch the first page at `path` and every page linked from it.
    ///
    /// Links are resolved against the URL of the page that carries them.
    async fn fetch_pairing_pages(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<Pairing>> {
        let mut current = first_page_url(&self.api.base_url(), path, params)?;
        let mut seen = HashSet::from([current.to_string()]);
        let mut pairings = Vec::new();

        let mut page = self.api.get_json(path, params).await?;
        let mut page_count = 1_usize;
        loop {
            if let Some(self_href) = link(&page, "self") {
                seen.insert(resolve_link(&current, self_href)?.into());
            }

            pairings.extend(page_pairings(&page)?);

            let Some(next) = link(&page, "next") else {
                break;
            };
            let next = resolve_link(&current, next)?;
            if !seen.insert(next.to_string()) {
                warn!(next = %next, pages = page_count, "pagination loops back to a fetched page");
                break;
            }

            debug!(next = %next, "following pagination link");
            page = self.api.get_json(next.as_str(), &[]).await?;
            current = next;
            page_count += 1;
        }

        debug!(pages = page_count, count = pairings.len(), "pairing pages fetched");
        Ok(pairings)
    }
}

fn first_page_url(base: &Url, path: &str, params: &[(String, String)]) -> Result<Url> {
    let mut url = base.join(path).map_err(|e| {
        CrewConnectError::Config(format!("invalid request path `{path}`: {e}"))
    })?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

fn resolve_link(page_url: &Url, href: &str) -> Result<Url> {
    page_url.join(href).map_err(|e| {
        CrewConnectError::unexpected_response(format!("invalid pagination link `{href}`: {e}"))
    })
}

fn link<'a>(page: &'a Value, rel: &str) -> Option<&'a str> {
    page.get("_links")?.get(rel)?.get("href")?.as_str()
}

fn page_pairings(page: &Value) -> Result<Vec<Pairing>> {
    match page.pointer("/_embedded/pairingRequestDtoList") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(Pairing::from_raw).collect(),
        Some(_) => Err(CrewConnectError::unexpected_response(
            "`pairingRequestDtoList` is not an array",
        )),
    }
}
