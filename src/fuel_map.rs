//! The main entry point: one loaded station collection with search, proximity
//! queries and export on top of it.

use crate::config::StoreConfig;
use crate::error::FuelMapError;
use crate::filtering::{apply, SearchResults};
use crate::geo::LatLon;
use crate::stations::locate_station::StationLocator;
use crate::stations::repository::{DataSource, StationCollection, StationRepository};
use crate::transfer::export::{self, ExportFormat};
use crate::types::facet::FacetFilterSpec;
use crate::types::station::Station;
use bon::bon;
use log::info;
use std::path::Path;

/// A loaded station collection.
///
/// Create one with [`FuelMap::load`] from a configured [`StationRepository`], or with
/// [`FuelMap::from_env`] to read the store credentials from the environment.
/// Loading never fails for lack of data: without credentials, or when the store
/// is unreachable, the collection consists of generated stations and
/// [`FuelMap::source`] says so.
///
/// # Examples
///
/// ```rust
/// # use fuelmap::{FuelMap, StationRepository, FacetFilterSpec, SortKey};
/// # #[tokio::main]
/// # async fn main() -> Result<(), fuelmap::FuelMapError> {
/// let repository = StationRepository::builder().seed(7).build()?;
/// let map = FuelMap::load(&repository).await;
///
/// let cheapest = map.search(&FacetFilterSpec::default().sorted_by(SortKey::Price));
/// assert_eq!(cheapest.count, map.stations().len());
/// # Ok(())
/// # }
/// ```
pub struct FuelMap {
    stations: Vec<Station>,
    source: DataSource,
    locator: StationLocator,
}

#[bon]
impl FuelMap {
    /// Fetches the canonical collection once and indexes it.
    pub async fn load(repository: &StationRepository) -> Self {
        let StationCollection { stations, source } = repository.fetch_with_provenance().await;
        info!("Loaded {} stations ({:?})", stations.len(), source);
        Self::from_collection(stations, source)
    }

    /// Reads [`StoreConfig`] from the environment (and a `.env` file), then loads
    /// with an otherwise default repository.
    ///
    /// # Errors
    ///
    /// Returns [`FuelMapError::Config`] if an optional store variable is malformed, and
    /// [`FuelMapError::Store`] if the HTTP client cannot be built.
    pub async fn from_env() -> Result<Self, FuelMapError> {
        let store = StoreConfig::load()?;
        let repository = StationRepository::builder().maybe_store(store).build()?;
        Ok(Self::load(&repository).await)
    }

    pub fn from_collection(stations: Vec<Station>, source: DataSource) -> Self {
        Self {
            locator: StationLocator::new(stations.clone()),
            stations,
            source,
        }
    }

    /// All stations, in collection order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Applies a facet filter to the whole collection. See [`apply`].
    pub fn search(&self, spec: &FacetFilterSpec) -> SearchResults {
        apply(&self.stations, spec)
    }

    /// Merges stations into the collection. A station whose id already exists
    /// replaces the old one in place; new ones are appended.
    pub fn add_stations(&mut self, stations: Vec<Station>) {
        let mut appended = 0;
        for station in stations {
            match self.stations.iter_mut().find(|s| s.id == station.id) {
                Some(existing) => *existing = station,
                None => {
                    self.stations.push(station);
                    appended += 1;
                }
            }
        }
        info!(
            "Merged stations, {} new, {} total",
            appended,
            self.stations.len()
        );
        self.locator = StationLocator::new(self.stations.clone());
    }

    /// Finds the stations closest to a location.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The point to search around.
    /// * `.filter(&FacetFilterSpec)`: Optional. Only stations passing the filter are considered; its sort key is ignored.
    /// * `.station_limit(usize)`: Optional. Maximum number of stations returned. Defaults to `5`.
    /// * `.max_distance_km(f64)`: Optional. Search radius in kilometers. Defaults to `10.0`.
    ///
    /// # Returns
    ///
    /// Stations with their distance in kilometers from `location`, closest first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fuelmap::{FuelMap, LatLon, StationRepository, FacetFilterSpec};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), fuelmap::FuelMapError> {
    /// let repository = StationRepository::builder().seed(3).build()?;
    /// let map = FuelMap::load(&repository).await;
    ///
    /// let diesel = FacetFilterSpec::default().with_fuel_types(["Diesel"]);
    /// let nearby = map
    ///     .nearest()
    ///     .location(LatLon(-37.8136, 144.9631))
    ///     .filter(&diesel)
    ///     .station_limit(3)
    ///     .call();
    /// assert!(nearby.len() <= 3);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn nearest(
        &self,
        location: LatLon,
        filter: Option<&FacetFilterSpec>,
        #[builder(default = 5)] station_limit: usize,
        #[builder(default = 10.0)] max_distance_km: f64,
    ) -> Vec<(Station, f64)> {
        self.locator
            .query(location, station_limit, max_distance_km, filter)
    }

    /// The collection as CSV. See [`export::export_csv`].
    pub fn export_csv(&self) -> Result<String, FuelMapError> {
        Ok(export::export_csv(&self.stations)?)
    }

    /// The collection as pretty JSON. See [`export::export_json`].
    pub fn export_json(&self) -> Result<String, FuelMapError> {
        Ok(export::export_json(&self.stations)?)
    }

    pub async fn write_export(&self, path: &Path, format: ExportFormat) -> Result<(), FuelMapError> {
        Ok(export::write_export(path, &self.stations, format).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::distance_km;
    use crate::stations::repository::{FallbackReason, DEFAULT_MIN_STATIONS};
    use crate::transfer::import::import_csv;
    use crate::types::facet::SortKey;
    use std::collections::HashSet;

    const MELBOURNE: LatLon = LatLon(-37.8136, 144.9631);

    async fn generated_map(seed: u64) -> FuelMap {
        let repository = StationRepository::builder().seed(seed).build().unwrap();
        FuelMap::load(&repository).await
    }

    #[test]
    fn test_fuel_map_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FuelMap>();
    }

    #[tokio::test]
    async fn test_load_without_credentials() {
        let map = generated_map(1).await;
        assert!(map.stations().len() >= DEFAULT_MIN_STATIONS);
        assert_eq!(
            map.source(),
            &DataSource::Generated {
                reason: FallbackReason::MissingCredentials
            }
        );
    }

    #[tokio::test]
    async fn test_search_identity_and_sort() {
        let map = generated_map(2).await;
        let all = map.search(&FacetFilterSpec::default());
        assert_eq!(all.results, map.stations());

        let by_distance = map.search(&FacetFilterSpec::default().sorted_by(SortKey::Distance));
        assert_eq!(by_distance.count, map.stations().len());
        assert!(by_distance
            .results
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let map = generated_map(3).await;
        let first = &map.stations()[0];
        assert_eq!(map.find_by_id(&first.id), Some(first));
        assert!(map.find_by_id("no-such-station").is_none());
    }

    #[tokio::test]
    async fn test_nearest_defaults() {
        let map = generated_map(4).await;
        let nearby = map.nearest().location(MELBOURNE).call();
        assert!(!nearby.is_empty());
        assert!(nearby.len() <= 5);
        for (station, dist) in &nearby {
            assert!(*dist <= 10.0);
            assert_eq!(*dist, distance_km(MELBOURNE, station.location()));
        }
        assert!(nearby.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[tokio::test]
    async fn test_nearest_with_filter() {
        let map = generated_map(5).await;
        let spec = FacetFilterSpec::default().with_brands(["BP"]);
        let nearby = map
            .nearest()
            .location(MELBOURNE)
            .filter(&spec)
            .station_limit(50)
            .max_distance_km(100.0)
            .call();
        let expected = map.search(&spec).count;
        assert_eq!(nearby.len(), expected.min(50));
        assert!(nearby.iter().all(|(s, _)| s.brand == "BP"));
    }

    #[tokio::test]
    async fn test_add_uploaded_stations() {
        let repository = StationRepository::builder().seed(8).build().unwrap();
        let mut map = FuelMap::load(&repository).await;
        let before = map.stations().len();

        let upload = import_csv(
            "station_name,latitude,longitude,diesel\nUnited Footscray,-37.8,144.9,1.71\n",
        )
        .unwrap();
        map.add_stations(repository.normalize_upload(&upload));
        assert_eq!(map.stations().len(), before + 1);
        assert_eq!(map.find_by_id("upload-1").unwrap().brand, "United");

        // Same id again replaces rather than duplicates.
        map.add_stations(repository.normalize_upload(&upload));
        assert_eq!(map.stations().len(), before + 1);
        let ids: HashSet<_> = map.stations().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), map.stations().len());

        let nearby = map
            .nearest()
            .location(LatLon(-37.8, 144.9))
            .station_limit(1)
            .call();
        assert_eq!(nearby[0].0.id, "upload-1");
    }

    #[tokio::test]
    async fn test_export_round_trip_through_import() {
        let map = generated_map(9).await;
        let csv = map.export_csv().unwrap();
        assert_eq!(csv.lines().count(), map.stations().len() + 1);

        // The export's price column is not an upload column, but names and coordinates are.
        let csv = csv.replacen("name,", "station_name,", 1);
        let upload = import_csv(&csv).unwrap();
        assert!(upload.report.is_valid());
        assert_eq!(upload.report.valid_rows, map.stations().len());

        let json = map.export_json().unwrap();
        let back: Vec<Station> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map.stations());
    }

    #[tokio::test]
    async fn test_write_export() {
        let map = generated_map(10).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.json");
        map.write_export(&path, ExportFormat::Json).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, map.export_json().unwrap());
    }
}
