//! The facet filter and sort engine shared by every station view.

use crate::types::facet::{FacetFilterSpec, OperatingHours, SortKey};
use crate::types::station::Station;
use chrono::{Local, NaiveTime};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Ordering;

/// A station "opens early" if it opens before this hour.
const EARLY_OPENING_HOUR: u32 = 7;
/// A station "closes late" if it is still open after this hour.
const LATE_CLOSING_HOUR: u32 = 22;

/// The filtered and sorted stations of one search, with their count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub results: Vec<Station>,
    pub count: usize,
}

/// Applies every active facet of `spec` (AND), then sorts stably by `spec.sort_key`.
///
/// Paging through the results is left to the caller.
///
/// # Examples
///
/// ```
/// use fuelmap::{apply, FacetFilterSpec};
///
/// let results = apply(&[], &FacetFilterSpec::default());
/// assert_eq!(results.count, 0);
/// ```
pub fn apply(stations: &[Station], spec: &FacetFilterSpec) -> SearchResults {
    let filter = CompiledFilter::new(spec);
    let mut results: Vec<Station> = stations
        .iter()
        .filter(|station| filter.matches(station))
        .cloned()
        .collect();

    if let Some(key) = spec.sort_key {
        sort_stations(&mut results, key);
    }

    let count = results.len();
    SearchResults { results, count }
}

/// Sorts in place. `sort_by` is stable, so ties keep their input order.
pub fn sort_stations(stations: &mut [Station], key: SortKey) {
    match key {
        // Missing values sort last.
        SortKey::Price => stations.sort_by_key(|s| {
            OrderedFloat(s.price().unwrap_or(f64::INFINITY))
        }),
        SortKey::Distance => stations.sort_by_key(|s| OrderedFloat(s.distance_km)),
        SortKey::Brand => stations.sort_by(|a, b| a.brand.cmp(&b.brand)),
        SortKey::Name => stations.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Updated => stations.sort_by(|a, b| {
            match (a.last_updated_age(), b.last_updated_age()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

/// A spec with its text lowered and its clock resolved once per evaluation.
pub(crate) struct CompiledFilter<'a> {
    spec: &'a FacetFilterSpec,
    query: Option<String>,
    now: NaiveTime,
    early: NaiveTime,
    late: NaiveTime,
}

impl<'a> CompiledFilter<'a> {
    pub(crate) fn new(spec: &'a FacetFilterSpec) -> Self {
        let query = spec
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let now = spec.evaluated_at.unwrap_or_else(|| Local::now().time());
        let at_hour = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
        Self {
            spec,
            query,
            now,
            early: at_hour(EARLY_OPENING_HOUR),
            late: at_hour(LATE_CLOSING_HOUR),
        }
    }

    pub(crate) fn matches(&self, station: &Station) -> bool {
        self.matches_query(station)
            && self.matches_fuel_types(station)
            && self.matches_price(station)
            && self.matches_distance(station)
            && self.matches_brand(station)
            && self.matches_amenities(station)
            && self.matches_hours(station)
    }

    fn matches_query(&self, station: &Station) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        [
            &station.name,
            &station.address,
            &station.city,
            &station.brand,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(query.as_str()))
    }

    /// Any of the requested fuel types.
    fn matches_fuel_types(&self, station: &Station) -> bool {
        self.spec.fuel_types.is_empty()
            || self.spec.fuel_types.iter().any(|wanted| {
                station
                    .fuel_types
                    .iter()
                    .any(|f| f.eq_ignore_ascii_case(wanted))
            })
    }

    fn matches_price(&self, station: &Station) -> bool {
        match self.spec.price_range {
            None => true,
            Some(range) => station.price_cents().is_some_and(|c| range.contains(c)),
        }
    }

    fn matches_distance(&self, station: &Station) -> bool {
        self.spec
            .max_distance_km
            .is_none_or(|max| station.distance_km <= max)
    }

    /// Any of the accepted brands.
    fn matches_brand(&self, station: &Station) -> bool {
        self.spec.brands.is_empty()
            || self
                .spec
                .brands
                .iter()
                .any(|brand| station.brand.eq_ignore_ascii_case(brand))
    }

    /// All of the requested amenities.
    fn matches_amenities(&self, station: &Station) -> bool {
        self.spec.amenities.iter().all(|wanted| {
            station
                .amenities
                .iter()
                .any(|a| a.eq_ignore_ascii_case(wanted))
        })
    }

    fn matches_hours(&self, station: &Station) -> bool {
        match self.spec.operating_hours {
            OperatingHours::Any => true,
            OperatingHours::TwentyFourSeven => station.hours.is_always_open(),
            OperatingHours::OpenNow => station.hours.is_open_at(self.now),
            OperatingHours::Early => station.hours.opens_before(self.early),
            OperatingHours::Late => station.hours.closes_after(self.late),
        }
    }
}
