//! Turns raw store or upload records into canonical [`Station`]s.
//!
//! Normalization never fails. Every field that is missing, blank or malformed is
//! replaced by a synthesized value, so a record with no usable data still comes
//! out as a complete station rather than being dropped.

use crate::geo::{distance_km, round_to_tenth, LatLon};
use crate::types::raw_record::*;
use crate::types::region::NamedRegion;
use crate::types::station::{OpeningHours, Station};
use crate::types::vocabulary::{
    infer_brand, ALWAYS_OPEN_AMENITY, AMENITIES, FUEL_TYPES, TRADING_WINDOWS,
};
use crate::utils::{format_hours_ago, format_price, parse_price};
use chrono::NaiveTime;
use rand::seq::IndexedRandom;
use rand::Rng;

pub const PLACEHOLDER_ADDRESS: &str = "Address not available";

/// Total jitter, in degrees, applied around the reference point to missing coordinates.
const COORDINATE_JITTER: f64 = 0.1;
/// Band, in dollars per litre, of synthesized prices.
const FALLBACK_PRICE_MIN: f64 = 1.45;
const FALLBACK_PRICE_SPREAD: f64 = 0.30;

#[derive(Debug, Clone)]
pub struct StationNormalizer {
    reference: NamedRegion,
}

impl Default for StationNormalizer {
    fn default() -> Self {
        Self::new(NamedRegion::melbourne_cbd())
    }
}

impl StationNormalizer {
    /// `reference` supplies the distance origin, the coordinate fallback and the default city.
    pub fn new(reference: NamedRegion) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &NamedRegion {
        &self.reference
    }

    /// Builds the canonical station for the `index`-th (0-based) record of a fetch.
    pub fn normalize<R: Rng + ?Sized>(&self, raw: &RawRecord, index: usize, rng: &mut R) -> Station {
        let id = raw
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("record-{}", index + 1));

        let name = raw
            .text(FIELD_NAME)
            .unwrap_or_else(|| format!("Station {}", index + 1));
        let address = raw
            .text(FIELD_ADDRESS)
            .unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string());
        let city = raw
            .text(FIELD_CITY)
            .unwrap_or_else(|| self.reference.name.clone());

        let latitude = raw
            .number(FIELD_LATITUDE)
            .filter(|lat| (-90.0..=90.0).contains(lat))
            .unwrap_or_else(|| jitter(self.reference.center.latitude(), COORDINATE_JITTER, rng));
        let longitude = raw
            .number(FIELD_LONGITUDE)
            .filter(|lng| (-180.0..=180.0).contains(lng))
            .unwrap_or_else(|| jitter(self.reference.center.longitude(), COORDINATE_JITTER, rng));

        let price_display = raw
            .text(FIELD_PRICE)
            .and_then(|text| parse_price(&text))
            .filter(|price| *price > 0.0)
            .map(format_price)
            .unwrap_or_else(|| {
                format_price(FALLBACK_PRICE_MIN + rng.random::<f64>() * FALLBACK_PRICE_SPREAD)
            });

        let brand = raw
            .text(FIELD_BRAND)
            .unwrap_or_else(|| infer_brand(&name).to_string());

        let last_updated_label = raw
            .text(FIELD_LAST_UPDATED)
            .unwrap_or_else(|| random_update_label(rng));

        let mut amenities = raw.list(FIELD_AMENITIES);
        if amenities.is_empty() {
            amenities = sample_tags(AMENITIES, 2..=6, rng);
        }
        let mut fuel_types = raw.list(FIELD_FUEL_TYPES);
        if fuel_types.is_empty() {
            fuel_types = sample_tags(FUEL_TYPES, 2..=5, rng);
        }

        let hours = raw
            .text(FIELD_OPENING_HOURS)
            .and_then(|text| OpeningHours::parse(&text))
            .unwrap_or_else(|| fallback_hours(&amenities, rng));

        let distance_km = self.distance_from_reference(LatLon(latitude, longitude));

        Station {
            id,
            name,
            address,
            city,
            latitude,
            longitude,
            price_display,
            brand,
            distance_km,
            last_updated_label,
            amenities,
            fuel_types,
            hours,
        }
    }

    /// Distance to the reference point, rounded to one decimal.
    pub(crate) fn distance_from_reference(&self, location: LatLon) -> f64 {
        round_to_tenth(distance_km(self.reference.center, location))
    }
}

/// `base` moved by up to half of `range` in either direction.
pub(crate) fn jitter<R: Rng + ?Sized>(base: f64, range: f64, rng: &mut R) -> f64 {
    base + (rng.random::<f64>() - 0.5) * range
}

pub(crate) fn random_update_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    format_hours_ago(rng.random_range(1..=12))
}

/// Distinct tags from `vocabulary`, between the bounds of `count` many.
pub(crate) fn sample_tags<R: Rng + ?Sized>(
    vocabulary: &[&str],
    count: std::ops::RangeInclusive<usize>,
    rng: &mut R,
) -> Vec<String> {
    let amount = rng.random_range(count).min(vocabulary.len());
    vocabulary
        .choose_multiple(rng, amount)
        .map(|tag| tag.to_string())
        .collect()
}

/// Always open when the amenities say so, otherwise one of the usual trading windows.
pub(crate) fn fallback_hours<R: Rng + ?Sized>(amenities: &[String], rng: &mut R) -> OpeningHours {
    if amenities.iter().any(|a| a == ALWAYS_OPEN_AMENITY) {
        return OpeningHours::AlwaysOpen;
    }
    match TRADING_WINDOWS.choose(rng) {
        Some(((open_h, open_m), (close_h, close_m))) => {
            match (
                NaiveTime::from_hms_opt(*open_h, *open_m, 0),
                NaiveTime::from_hms_opt(*close_h, *close_m, 0),
            ) {
                (Some(open), Some(close)) => OpeningHours::Daily { open, close },
                _ => OpeningHours::AlwaysOpen,
            }
        }
        None => OpeningHours::AlwaysOpen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn assert_canonical(station: &Station) {
        assert!(!station.id.is_empty());
        assert!(!station.name.trim().is_empty());
        assert!(!station.address.is_empty());
        assert!(!station.city.is_empty());
        assert!(station.latitude.is_finite() && station.longitude.is_finite());
        assert!(station.price().is_some(), "bad price {}", station.price_display);
        assert!(!station.brand.is_empty());
        assert!(station.distance_km.is_finite() && station.distance_km >= 0.0);
        assert!(station.last_updated_age().is_some());
        assert!(!station.amenities.is_empty());
        assert!(!station.fuel_types.is_empty());
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_complete_record_is_kept_verbatim() {
        let raw = RawRecord::new(Some("recShell".into()))
            .with_field(FIELD_NAME, "Shell Coles Express Richmond")
            .with_field(FIELD_ADDRESS, "123 Swan Street")
            .with_field(FIELD_CITY, "Richmond")
            .with_field(FIELD_LATITUDE, -37.82)
            .with_field(FIELD_LONGITUDE, 144.995)
            .with_field(FIELD_PRICE, json!(["$1.61"]))
            .with_field(FIELD_LAST_UPDATED, "2 hours ago")
            .with_field(FIELD_AMENITIES, "24/7, ATM")
            .with_field(FIELD_FUEL_TYPES, "Unleaded 91,Diesel");

        let station = StationNormalizer::default().normalize(&raw, 0, &mut rng());
        assert_eq!(station.id, "recShell");
        assert_eq!(station.name, "Shell Coles Express Richmond");
        assert_eq!(station.city, "Richmond");
        assert_eq!(station.latitude, -37.82);
        assert_eq!(station.price_display, "$1.61");
        assert_eq!(station.brand, "Shell");
        assert_eq!(station.amenities, vec!["24/7", "ATM"]);
        assert_eq!(station.fuel_types, vec!["Unleaded 91", "Diesel"]);
        assert_eq!(station.hours, OpeningHours::AlwaysOpen);
        assert_canonical(&station);
    }

    #[test]
    fn test_every_subset_of_missing_fields_is_repaired() {
        let full = [
            (FIELD_NAME, json!("BP Brunswick")),
            (FIELD_ADDRESS, json!("1 Sydney Road")),
            (FIELD_CITY, json!("Brunswick")),
            (FIELD_LATITUDE, json!(-37.77)),
            (FIELD_LONGITUDE, json!(144.96)),
            (FIELD_PRICE, json!("$1.59")),
            (FIELD_AMENITIES, json!("ATM")),
            (FIELD_FUEL_TYPES, json!("E10")),
        ];
        let normalizer = StationNormalizer::default();
        let mut rng = rng();
        for mask in 0u32..(1 << full.len()) {
            let mut raw = RawRecord::new(None);
            for (bit, (key, value)) in full.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    raw = raw.with_field(key, value.clone());
                }
            }
            let station = normalizer.normalize(&raw, mask as usize, &mut rng);
            assert_canonical(&station);
        }
    }

    #[test]
    fn test_empty_record_gets_placeholders() {
        let raw = RawRecord::new(None)
            .with_field(FIELD_NAME, "")
            .with_field(FIELD_LATITUDE, json!(null))
            .with_field(FIELD_LONGITUDE, json!(null));
        let normalizer = StationNormalizer::default();
        let station = normalizer.normalize(&raw, 4, &mut rng());

        assert_eq!(station.id, "record-5");
        assert_eq!(station.name, "Station 5");
        assert_eq!(station.address, PLACEHOLDER_ADDRESS);
        assert_eq!(station.city, "Melbourne");
        assert_eq!(station.brand, "Independent");
        assert!((station.latitude - -37.8136).abs() <= 0.05);
        assert!((station.longitude - 144.9631).abs() <= 0.05);
        let price = station.price().unwrap();
        assert!((1.45..=1.75).contains(&price), "price {price} out of band");
        assert_eq!(
            station.distance_km,
            normalizer.distance_from_reference(station.location())
        );
        assert_canonical(&station);
    }

    #[test]
    fn test_malformed_values_are_replaced() {
        let raw = RawRecord::new(Some("  ".into()))
            .with_field(FIELD_LATITUDE, "north-ish")
            .with_field(FIELD_LONGITUDE, 512.0)
            .with_field(FIELD_PRICE, "call for price")
            .with_field(FIELD_AMENITIES, json!(42))
            .with_field(FIELD_OPENING_HOURS, "whenever");
        let station = StationNormalizer::default().normalize(&raw, 0, &mut rng());
        assert_eq!(station.id, "record-1");
        assert!((-180.0..=180.0).contains(&station.longitude));
        assert!(station.price().is_some());
        assert!(station.amenities.len() >= 2);
        assert_canonical(&station);
    }

    #[test]
    fn test_explicit_brand_wins_over_name() {
        let raw = RawRecord::new(None)
            .with_field(FIELD_NAME, "Shell Carlton")
            .with_field(FIELD_BRAND, "Coles Express");
        let station = StationNormalizer::default().normalize(&raw, 0, &mut rng());
        assert_eq!(station.brand, "Coles Express");
    }

    #[test]
    fn test_distance_uses_post_fallback_coordinates() {
        let normalizer = StationNormalizer::default();
        let at_reference = RawRecord::new(None)
            .with_field(FIELD_LATITUDE, -37.8136)
            .with_field(FIELD_LONGITUDE, 144.9631);
        let station = normalizer.normalize(&at_reference, 0, &mut rng());
        assert_eq!(station.distance_km, 0.0);

        // Only latitude present: longitude is synthesized, distance still follows both.
        let half = RawRecord::new(None).with_field(FIELD_LATITUDE, -37.9);
        let station = normalizer.normalize(&half, 0, &mut rng());
        assert_eq!(
            station.distance_km,
            normalizer.distance_from_reference(station.location())
        );
    }

    #[test]
    fn test_sampled_tags_are_distinct() {
        let mut rng = rng();
        for _ in 0..50 {
            let tags = sample_tags(AMENITIES, 2..=6, &mut rng);
            assert!((2..=6).contains(&tags.len()));
            let mut deduped = tags.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), tags.len());
        }
    }

    #[test]
    fn test_fallback_hours_respect_always_open_amenity() {
        let mut rng = rng();
        assert_eq!(
            fallback_hours(&["24/7".to_string()], &mut rng),
            OpeningHours::AlwaysOpen
        );
        assert!(!fallback_hours(&["ATM".to_string()], &mut rng).is_always_open());
    }
}
