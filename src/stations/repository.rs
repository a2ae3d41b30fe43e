//! Loads the canonical station collection.
//!
//! The repository always resolves to a non-empty, fully normalized collection:
//! missing credentials and store failures are answered with generated stations,
//! and a store that returns too few records is topped up with generated ones.

use crate::config::StoreConfig;
use crate::stations::error::StoreError;
use crate::stations::generator::FallbackGenerator;
use crate::stations::normalizer::StationNormalizer;
use crate::stations::store_client::StoreClient;
use crate::transfer::import::ImportedUpload;
use crate::types::region::NamedRegion;
use crate::types::station::Station;
use crate::types::vocabulary::BRANDS;
use bon::bon;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const DEFAULT_MIN_STATIONS: usize = 50;

/// Why a collection consists of generated stations only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API key or base id configured; the store was never contacted.
    MissingCredentials,
    /// The store failed mid-way; the message of the error that aborted pagination.
    StoreFailure(String),
}

/// Where the stations of a collection came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Every station came from the store.
    Remote { records: usize },
    /// The store returned fewer stations than the minimum; generated ones follow the real ones.
    RemoteWithTopUp { records: usize, generated: usize },
    /// Every station is generated.
    Generated { reason: FallbackReason },
}

impl DataSource {
    pub fn is_fully_generated(&self) -> bool {
        matches!(self, DataSource::Generated { .. })
    }
}

/// The stations of one fetch cycle together with their provenance.
#[derive(Debug, Clone)]
pub struct StationCollection {
    pub stations: Vec<Station>,
    pub source: DataSource,
}

pub struct StationRepository {
    client: Option<StoreClient>,
    normalizer: StationNormalizer,
    generator: FallbackGenerator,
    regions: Vec<NamedRegion>,
    brands: Vec<String>,
    min_stations: usize,
    rng: Mutex<StdRng>,
}

#[bon]
impl StationRepository {
    /// Creates a repository.
    ///
    /// # Arguments
    ///
    /// * `.store(StoreConfig)`: Optional. Without it every fetch returns generated stations.
    /// * `.min_stations(usize)`: Optional. Minimum collection size, defaults to `50`. Values below `1` are raised to `1`.
    /// * `.reference(NamedRegion)`: Optional. Distance origin and coordinate fallback, defaults to Melbourne CBD.
    /// * `.regions(Vec<NamedRegion>)`: Optional. Regions generated stations are spread over, defaults to Greater Melbourne.
    /// * `.brands(Vec<String>)`: Optional. Brands handed to generated stations.
    /// * `.seed(u64)`: Optional. Seeds the random source so generated values repeat.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ClientBuild`] if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuelmap::StationRepository;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), fuelmap::StoreError> {
    /// let repository = StationRepository::builder().seed(1).build()?;
    /// let stations = repository.fetch_all().await;
    /// assert!(stations.len() >= 50);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        store: Option<StoreConfig>,
        #[builder(default = DEFAULT_MIN_STATIONS)] min_stations: usize,
        #[builder(default = NamedRegion::melbourne_cbd())] reference: NamedRegion,
        #[builder(default = NamedRegion::greater_melbourne())] regions: Vec<NamedRegion>,
        #[builder(default = BRANDS.iter().map(|b| b.to_string()).collect())] brands: Vec<String>,
        seed: Option<u64>,
    ) -> Result<Self, StoreError> {
        let client = store.map(StoreClient::new).transpose()?;
        let normalizer = StationNormalizer::new(reference);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            client,
            generator: FallbackGenerator::new(normalizer.clone()),
            normalizer,
            regions,
            brands,
            min_stations: min_stations.max(1),
            rng: Mutex::new(rng),
        })
    }

    pub fn normalizer(&self) -> &StationNormalizer {
        &self.normalizer
    }

    /// Fetches the canonical station collection. Never fails.
    pub async fn fetch_all(&self) -> Vec<Station> {
        self.fetch_with_provenance().await.stations
    }

    /// Like [`StationRepository::fetch_all`], also reporting which path produced the stations.
    pub async fn fetch_with_provenance(&self) -> StationCollection {
        let Some(client) = &self.client else {
            warn!("Store credentials not found. Using generated stations.");
            return self.generated_only(FallbackReason::MissingCredentials);
        };

        let records = match client.fetch_all_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Error fetching stations from {}: {}. Using generated stations.",
                    client.config().list_url(),
                    e
                );
                return self.generated_only(FallbackReason::StoreFailure(e.to_string()));
            }
        };

        let mut rng = self.rng();
        let mut stations: Vec<Station> = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalizer.normalize(record, index, &mut *rng))
            .collect();
        let real = stations.len();
        info!("Processed {} stations from the store", real);

        if real >= self.min_stations {
            return StationCollection {
                stations,
                source: DataSource::Remote { records: real },
            };
        }

        let deficit = self.min_stations - real;
        let brands = self.brand_refs();
        let mut extra =
            self.generator
                .generate(&self.regions, &brands, deficit, real, &mut *rng);
        extra.truncate(deficit);
        info!(
            "Adding {} generated stations to reach the minimum of {}",
            extra.len(),
            self.min_stations
        );
        stations.extend(extra);

        StationCollection {
            stations,
            source: DataSource::RemoteWithTopUp {
                records: real,
                generated: deficit,
            },
        }
    }

    /// Repairs the records of a CSV upload the same way fetched records are repaired.
    pub fn normalize_upload(&self, upload: &ImportedUpload) -> Vec<Station> {
        let mut rng = self.rng();
        upload
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalizer.normalize(record, index, &mut *rng))
            .collect()
    }

    fn generated_only(&self, reason: FallbackReason) -> StationCollection {
        let brands = self.brand_refs();
        let stations =
            self.generator
                .generate(&self.regions, &brands, self.min_stations, 0, &mut *self.rng());
        info!(
            "Generated {} stations across {} regions",
            stations.len(),
            self.regions.len()
        );
        StationCollection {
            stations,
            source: DataSource::Generated { reason },
        }
    }

    fn brand_refs(&self) -> Vec<&str> {
        self.brands.iter().map(String::as_str).collect()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
