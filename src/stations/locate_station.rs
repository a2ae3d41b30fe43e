use crate::filtering::CompiledFilter;
use crate::geo::{distance_km, LatLon, EARTH_RADIUS_KM};
use crate::types::facet::FacetFilterSpec;
use crate::types::station::Station;
use ordered_float::OrderedFloat;
use rstar::{RTree, AABB};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::FRAC_PI_2;

/// Spatial index over the canonical stations, used for "near me" queries.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<Station>,
}

// Helper struct for BinaryHeap ordering
struct StationCandidate<'a> {
    distance_km: OrderedFloat<f64>,
    station: &'a Station,
}
// Manual implementations (only compare distance)
impl PartialEq for StationCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.distance_km == other.distance_km
    }
}
impl Eq for StationCandidate<'_> {}
impl PartialOrd for StationCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for StationCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_km.cmp(&other.distance_km)
    }
}

impl StationLocator {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            rtree: RTree::bulk_load(stations),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Finds up to `n_results` stations within `max_distance_km` of `location`, closest
    /// first, optionally restricted to the stations passing `filter`.
    ///
    /// Distances are haversine kilometers from `location`, not the stations' stored
    /// reference distance. The sort key of `filter` is ignored.
    pub fn query(
        &self,
        location: LatLon,
        n_results: usize,
        max_distance_km: f64,
        filter: Option<&FacetFilterSpec>,
    ) -> Vec<(Station, f64)> {
        if n_results == 0 || !location.is_finite() || max_distance_km < 0.0 {
            return vec![];
        }

        let compiled = filter.map(CompiledFilter::new);
        let envelopes = search_envelopes(location, max_distance_km);
        let mut heap: BinaryHeap<StationCandidate<'_>> =
            BinaryHeap::with_capacity(n_results.min(self.len()));

        for station in envelopes
            .iter()
            .flat_map(|envelope| self.rtree.locate_in_envelope(envelope))
        {
            if let Some(compiled) = &compiled {
                if !compiled.matches(station) {
                    continue;
                }
            }

            let dist_km = distance_km(location, station.location());
            if dist_km > max_distance_km {
                continue;
            }

            let candidate = StationCandidate {
                distance_km: OrderedFloat(dist_km),
                station,
            };
            if heap.len() < n_results {
                heap.push(candidate);
            } else if heap
                .peek()
                .is_some_and(|worst| candidate.distance_km < worst.distance_km)
            {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.station.to_owned(), c.distance_km.into_inner()))
            .collect()
    }
}

/// Latitude/longitude boxes that together contain every point within `km` of `location`.
///
/// The longitude half-width is the exact bound for a spherical cap,
/// `asin(sin r / cos lat)`. A cap that reaches a pole spans every longitude, and a
/// box crossing the antimeridian is split in two.
fn search_envelopes(location: LatLon, km: f64) -> Vec<AABB<[f64; 2]>> {
    // Angular radius with a small margin for rounding at the boundary.
    let radius = km / EARTH_RADIUS_KM * 1.001 + 1e-9;
    let lat = location.latitude().to_radians();
    let min_lat = (lat - radius).max(-FRAC_PI_2).to_degrees();
    let max_lat = (lat + radius).min(FRAC_PI_2).to_degrees();
    let whole_band = vec![AABB::from_corners([min_lat, -180.0], [max_lat, 180.0])];

    if lat - radius <= -FRAC_PI_2 || lat + radius >= FRAC_PI_2 {
        return whole_band;
    }
    let ratio = radius.sin() / lat.cos();
    if ratio >= 1.0 {
        return whole_band;
    }

    let half_width = ratio.asin().to_degrees();
    let west = location.longitude() - half_width;
    let east = location.longitude() + half_width;
    if west < -180.0 {
        vec![
            AABB::from_corners([min_lat, west + 360.0], [max_lat, 180.0]),
            AABB::from_corners([min_lat, -180.0], [max_lat, east]),
        ]
    } else if east > 180.0 {
        vec![
            AABB::from_corners([min_lat, west], [max_lat, 180.0]),
            AABB::from_corners([min_lat, -180.0], [max_lat, east - 360.0]),
        ]
    } else {
        vec![AABB::from_corners([min_lat, west], [max_lat, east])]
    }
}
