use crate::transfer::error::TransferError;
use crate::types::facet::UnknownOption;
use crate::types::station::Station;
use log::info;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

// Flat CSV row; list fields are joined since CSV cells can't nest.
#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    address: &'a str,
    city: &'a str,
    brand: &'a str,
    latitude: f64,
    longitude: f64,
    price: &'a str,
    distance_km: f64,
    last_updated: &'a str,
    amenities: String,
    fuel_types: String,
    hours: String,
}

impl<'a> From<&'a Station> for ExportRow<'a> {
    fn from(station: &'a Station) -> Self {
        Self {
            id: &station.id,
            name: &station.name,
            address: &station.address,
            city: &station.city,
            brand: &station.brand,
            latitude: station.latitude,
            longitude: station.longitude,
            price: &station.price_display,
            distance_km: station.distance_km,
            last_updated: &station.last_updated_label,
            amenities: station.amenities.join("; "),
            fuel_types: station.fuel_types.join("; "),
            hours: station.hours.to_string(),
        }
    }
}

/// Renders stations as CSV with a header row, in the given order.
pub fn export_csv(stations: &[Station]) -> Result<String, TransferError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for station in stations {
        writer
            .serialize(ExportRow::from(station))
            .map_err(TransferError::CsvWrite)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TransferError::CsvFlush(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Renders stations as a pretty-printed JSON array using the camelCase field names.
pub fn export_json(stations: &[Station]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(stations)?)
}

/// Writes stations to `path` in the given format.
pub async fn write_export(
    path: &Path,
    stations: &[Station],
    format: ExportFormat,
) -> Result<(), TransferError> {
    let contents = match format {
        ExportFormat::Csv => export_csv(stations)?,
        ExportFormat::Json => export_json(stations)?,
    };
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| TransferError::FileWrite(path.to_path_buf(), e))?;
    info!(
        "Exported {} stations as {} to {}",
        stations.len(),
        format,
        path.display()
    );
    Ok(())
}
