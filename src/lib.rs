mod config;
mod error;
mod filtering;
mod fuel_map;
mod geo;
mod stations;
mod transfer;
mod types;
mod utils;

pub use config::*;
pub use error::FuelMapError;
pub use filtering::{apply, sort_stations, SearchResults};
pub use fuel_map::*;
pub use geo::{distance_km, LatLon};

pub use stations::error::StoreError;
pub use stations::generator::FallbackGenerator;
pub use stations::locate_station::StationLocator;
pub use stations::normalizer::{StationNormalizer, PLACEHOLDER_ADDRESS};
pub use stations::repository::*;
pub use stations::store_client::StoreClient;

pub use transfer::error::TransferError;
pub use transfer::export::{export_csv, export_json, write_export, ExportFormat};
pub use transfer::import::{import_csv, ImportedUpload, ValidationIssue, ValidationReport};

pub use types::facet::*;
pub use types::raw_record::*;
pub use types::region::NamedRegion;
pub use types::saved_search::{SavedSearch, SavedSearches};
pub use types::station::*;
pub use types::vocabulary::{
    infer_brand, ALWAYS_OPEN_AMENITY, AMENITIES, BRANDS, FUEL_TYPES, INDEPENDENT_BRAND,
};
