//! Great-circle distance helpers shared by the normalizer, the fallback
//! generator and the station locator.

use haversine::{distance, Location as HaversineLocation, Units};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance in this crate.
pub(crate) const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographical coordinate using latitude and longitude in decimal degrees.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use fuelmap::LatLon;
///
/// let melbourne_cbd = LatLon(-37.8136, 144.9631);
/// assert_eq!(melbourne_cbd.0, -37.8136); // Latitude
/// assert_eq!(melbourne_cbd.1, 144.9631); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl From<LatLon> for HaversineLocation {
    fn from(value: LatLon) -> Self {
        HaversineLocation {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

/// Haversine distance in kilometers between two points (Earth radius 6371 km).
///
/// Both points must be finite; callers holding possibly missing coordinates
/// repair them before calling this.
///
/// ```
/// use fuelmap::{distance_km, LatLon};
///
/// let a = LatLon(-37.8136, 144.9631);
/// assert_eq!(distance_km(a, a), 0.0);
/// ```
pub fn distance_km(a: LatLon, b: LatLon) -> f64 {
    debug_assert!(a.is_finite() && b.is_finite());
    distance(a.into(), b.into(), Units::Kilometers)
}

/// Rounds a distance to the one-decimal precision stations are displayed with.
pub(crate) fn round_to_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const MELBOURNE: LatLon = LatLon(-37.8136, 144.9631);
    const ST_KILDA: LatLon = LatLon(-37.868, 144.978);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(MELBOURNE, MELBOURNE), 0.0);
        assert_eq!(distance_km(LatLon(0.0, 0.0), LatLon(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (MELBOURNE, ST_KILDA),
            (LatLon(51.5074, -0.1278), LatLon(40.7128, -74.006)),
            (LatLon(-33.8688, 151.2093), LatLon(35.6762, 139.6503)),
            (LatLon(89.9, 0.0), LatLon(-89.9, 179.9)),
        ];
        for (a, b) in pairs {
            let ab = distance_km(a, b);
            let ba = distance_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba} for {a:?} / {b:?}");
        }
    }

    #[test]
    fn test_distance_matches_known_value() {
        // Melbourne CBD to St Kilda is a little over 6 km.
        let d = distance_km(MELBOURNE, ST_KILDA);
        assert!(d > 5.5 && d < 6.8, "unexpected distance {d}");
    }

    #[test]
    fn test_one_degree_of_latitude_matches_earth_radius() {
        let d = distance_km(LatLon(10.0, 20.0), LatLon(11.0, 20.0));
        let expected = EARTH_RADIUS_KM * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6, "{d} != {expected}");
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(6.04), 6.0);
        assert_eq!(round_to_tenth(6.06), 6.1);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }
}
