//! Synthetic stations used when the remote store is unavailable or too small.

use crate::geo::LatLon;
use crate::stations::normalizer::{
    fallback_hours, jitter, random_update_label, sample_tags, StationNormalizer,
};
use crate::types::region::NamedRegion;
use crate::types::station::Station;
use crate::types::vocabulary::{AMENITIES, FUEL_TYPES, STREET_NAMES, STREET_TYPES};
use crate::utils::format_price;
use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::slice;

/// Total jitter, in degrees, around a region center.
const REGION_JITTER: f64 = 0.02;
const PRICE_MIN: f64 = 1.50;
const PRICE_SPREAD: f64 = 0.25;

/// Produces plausible stations spread across a list of regions.
///
/// Output is random; only its shape is stable: every region gets two to four
/// stations, each with a brand from the given list, coordinates near the region
/// center and a consistent distance to the reference point.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    normalizer: StationNormalizer,
}

impl FallbackGenerator {
    pub fn new(normalizer: StationNormalizer) -> Self {
        Self { normalizer }
    }

    /// Sweeps `regions` until at least `min_count` stations exist (always one full sweep).
    ///
    /// Station ids continue from `first_id` so generated stations can be appended to
    /// real ones without collisions. An empty region list uses the reference region;
    /// an empty brand list brands everything as independent.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        regions: &[NamedRegion],
        brands: &[&str],
        min_count: usize,
        first_id: usize,
        rng: &mut R,
    ) -> Vec<Station> {
        let regions = if regions.is_empty() {
            warn!("No regions configured for generated stations, using the reference region");
            slice::from_ref(self.normalizer.reference())
        } else {
            regions
        };

        let mut stations = Vec::with_capacity(min_count.max(regions.len() * 3));
        let mut sweep = 0usize;
        loop {
            for region in regions {
                let count = rng.random_range(2..=4);
                for i in 0..count {
                    let id = first_id + stations.len() + 1;
                    let suffix = sweep * 4 + i;
                    stations.push(self.station(region, brands, id, suffix, rng));
                }
            }
            sweep += 1;
            if stations.len() >= min_count {
                break;
            }
        }

        debug!(
            "Generated {} stations across {} regions in {} sweeps",
            stations.len(),
            regions.len(),
            sweep
        );
        stations
    }

    fn station<R: Rng + ?Sized>(
        &self,
        region: &NamedRegion,
        brands: &[&str],
        id: usize,
        suffix: usize,
        rng: &mut R,
    ) -> Station {
        let brand = brands
            .choose(rng)
            .copied()
            .unwrap_or(crate::types::vocabulary::INDEPENDENT_BRAND);
        let name = if suffix == 0 {
            format!("{} {}", brand, region.name)
        } else {
            format!("{} {} {}", brand, region.name, suffix + 1)
        };

        let address = format!(
            "{} {} {}",
            rng.random_range(1..=999),
            STREET_NAMES.choose(rng).copied().unwrap_or("Main"),
            STREET_TYPES.choose(rng).copied().unwrap_or("Street"),
        );

        let latitude = jitter(region.center.latitude(), REGION_JITTER, rng);
        let longitude = jitter(region.center.longitude(), REGION_JITTER, rng);
        let amenities = sample_tags(AMENITIES, 2..=6, rng);
        let fuel_types = sample_tags(FUEL_TYPES, 2..=5, rng);
        let hours = fallback_hours(&amenities, rng);

        Station {
            id: format!("generated-{}", id),
            name,
            address,
            city: region.name.clone(),
            latitude,
            longitude,
            price_display: format_price(PRICE_MIN + rng.random::<f64>() * PRICE_SPREAD),
            brand: brand.to_string(),
            distance_km: self
                .normalizer
                .distance_from_reference(LatLon(latitude, longitude)),
            last_updated_label: random_update_label(rng),
            amenities,
            fuel_types,
            hours,
        }
    }
}
