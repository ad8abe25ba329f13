//! Pairing options request parameters

use std::collections::HashSet;

use chrono::NaiveDate;
use crewconnect_domain::constants::DEFAULT_MINIMUM_ON_DAYS;
use crewconnect_domain::Pairing;
use tracing::debug;

use super::sort::SortBy;

/// What to ask the backend for and how to post-process the answer
///
/// `airports`, `stopovers`, `flight_numbers`, `total_on_days` and
/// `consecutive_stopover_nights` are forwarded to the backend. The exclusion
/// sets and `minimum_on_days` are applied locally after pagination.
#[derive(Debug, Clone)]
pub struct PairingQuery {
    pub reference_date: NaiveDate,
    pub sort_by: SortBy,
    pub airports: Vec<String>,
    pub stopovers: Vec<String>,
    pub flight_numbers: Vec<String>,
    pub total_on_days: Option<u32>,
    pub consecutive_stopover_nights: Option<u32>,
    /// Drop pairings whose trip covers any of these days
    pub excluded_dates: HashSet<NaiveDate>,
    /// Drop pairings that overnight at any of these airports
    pub excluded_stopovers: HashSet<String>,
    pub minimum_on_days: u32,
}

impl PairingQuery {
    #[must_use]
    pub fn new(reference_date: NaiveDate, sort_by: impl Into<SortBy>) -> Self {
        Self {
            reference_date,
            sort_by: sort_by.into(),
            airports: Vec::new(),
            stopovers: Vec::new(),
            flight_numbers: Vec::new(),
            total_on_days: None,
            consecutive_stopover_nights: None,
            excluded_dates: HashSet::new(),
            excluded_stopovers: HashSet::new(),
            minimum_on_days: DEFAULT_MINIMUM_ON_DAYS,
        }
    }

    #[must_use]
    pub fn airports<I: IntoIterator<Item = S>, S: Into<String>>(mut self, airports: I) -> Self {
        self.airports = airports.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn stopovers<I: IntoIterator<Item = S>, S: Into<String>>(mut self, stopovers: I) -> Self {
        self.stopovers = stopovers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn flight_numbers<I: IntoIterator<Item = S>, S: Into<String>>(mut self, numbers: I) -> Self {
        self.flight_numbers = numbers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn total_on_days(mut self, days: u32) -> Self {
        self.total_on_days = Some(days);
        self
    }

    #[must_use]
    pub fn consecutive_stopover_nights(mut self, nights: u32) -> Self {
        self.consecutive_stopover_nights = Some(nights);
        self
    }

    #[must_use]
    pub fn exclude_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.excluded_dates.extend(dates);
        self
    }

    #[must_use]
    pub fn exclude_stopovers<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        airports: I,
    ) -> Self {
        self.excluded_stopovers.extend(airports.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn minimum_on_days(mut self, days: u32) -> Self {
        self.minimum_on_days = days;
        self
    }

    /// Backend-side filters as query parameters.
    ///
    /// List filters are space-joined; empty or absent filters are omitted.
    #[must_use]
    pub fn filter_params(&self) -> Vec<(String, String)> {
        let lists = [
            ("airports", &self.airports),
            ("stopovers", &self.stopovers),
            ("flightNumbers", &self.flight_numbers),
        ];
        let counts = [
            ("totalOnDays", self.total_on_days),
            ("consecutiveStopoverNights", self.consecutive_stopover_nights),
        ];

        lists
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| (name.to_string(), values.join(" ")))
            .chain(
                counts
                    .into_iter()
                    .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string()))),
            )
            .collect()
    }

    /// Apply the local exclusions in order: date overlap, stopovers, then
    /// minimum ON days.
    pub fn retain_eligible(&self, pairings: &mut Vec<Pairing>) {
        let fetched = pairings.len();

        if !self.excluded_dates.is_empty() {
            pairings.retain(|pairing| !pairing.overlaps_any(&self.excluded_dates));
        }
        let after_dates = pairings.len();

        if !self.excluded_stopovers.is_empty() {
            pairings.retain(|pairing| !pairing.stops_at_any(&self.excluded_stopovers));
        }
        let after_stopovers = pairings.len();

        pairings.retain(|pairing| pairing.total_on_days >= self.minimum_on_days);

        debug!(
            fetched,
            after_dates,
            after_stopovers,
            eligible = pairings.len(),
            "pairing exclusions applied"
        );
    }
}
