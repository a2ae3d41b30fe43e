//! Reading station uploads in CSV form.
//!
//! Rows are checked one by one. Rows with errors are reported and left out;
//! warnings are reported but the row is kept. Kept rows become [`RawRecord`]s
//! that go through the normal repair path.

use crate::transfer::error::TransferError;
use crate::types::raw_record::*;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use serde::Serialize;
use std::collections::HashMap;

/// Price columns an upload may carry, with the fuel type each one stands for.
/// The first one holding a valid price becomes the station's primary price.
const PRICE_COLUMNS: &[(&str, &str)] = &[
    ("unleaded_91", "Unleaded 91"),
    ("premium_95", "Premium 95"),
    ("diesel", "Diesel"),
];
/// Prices above this many dollars per litre are flagged.
const SUSPICIOUS_PRICE: f64 = 5.00;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// 1-based line number; the header is row 1.
    pub row: usize,
    pub column: String,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub total_rows: usize,
    pub valid_rows: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ImportedUpload {
    /// Records of the rows without errors, in file order.
    pub records: Vec<RawRecord>,
    pub report: ValidationReport,
}

/// Parses and validates a CSV upload.
///
/// # Errors
///
/// Returns [`TransferError::NotEnoughRows`] when there is no data row and
/// [`TransferError::CsvRead`] when the text is not readable CSV.
///
/// # Examples
///
/// ```
/// use fuelmap::import_csv;
///
/// let upload = import_csv("station_name,latitude,longitude\nBP Carlton,-37.795,144.967\n")?;
/// assert!(upload.report.is_valid());
/// assert_eq!(upload.records.len(), 1);
/// # Ok::<(), fuelmap::TransferError>(())
/// ```
pub fn import_csv(text: &str) -> Result<ImportedUpload, TransferError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(TransferError::CsvRead)?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(TransferError::CsvRead)?;
    if headers.is_empty() || rows.is_empty() {
        return Err(TransferError::NotEnoughRows);
    }

    let mut report = ValidationReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    for (index, record) in rows.iter().enumerate() {
        let row_number = index + 2;
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let errors_before = report.errors.len();
        validate_row(&row, row_number, &mut report);
        if report.errors.len() == errors_before {
            report.valid_rows += 1;
            records.push(to_raw_record(&row, report.valid_rows));
        }
    }

    info!(
        "Imported {} of {} uploaded rows ({} errors, {} warnings)",
        report.valid_rows,
        report.total_rows,
        report.errors.len(),
        report.warnings.len()
    );
    Ok(ImportedUpload { records, report })
}

fn issue(row: usize, column: &str, message: String, suggestion: &str) -> ValidationIssue {
    ValidationIssue {
        row,
        column: column.to_string(),
        message,
        suggestion: suggestion.to_string(),
    }
}

fn validate_row(row: &HashMap<&str, &str>, row_number: usize, report: &mut ValidationReport) {
    if !row.contains_key("station_name") {
        report.errors.push(issue(
            row_number,
            "station_name",
            "Station name is required".to_string(),
            "Provide a valid station name",
        ));
    }

    match (row.get("latitude"), row.get("longitude")) {
        (Some(lat), Some(lng)) => match (lat.parse::<f64>(), lng.parse::<f64>()) {
            (Ok(lat), Ok(lng)) if lat.is_finite() && lng.is_finite() => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    report.errors.push(issue(
                        row_number,
                        "coordinates",
                        "Coordinates out of valid range".to_string(),
                        "Latitude: -90 to 90, Longitude: -180 to 180",
                    ));
                }
            }
            _ => report.errors.push(issue(
                row_number,
                "coordinates",
                "Invalid coordinate format".to_string(),
                "Use decimal format (e.g., -37.8136)",
            )),
        },
        _ => report.errors.push(issue(
            row_number,
            "coordinates",
            "Latitude and longitude are required".to_string(),
            "Provide valid decimal coordinates",
        )),
    }

    for (column, _) in PRICE_COLUMNS {
        let Some(raw) = row.get(column) else {
            continue;
        };
        match valid_price(raw) {
            Some(price) => {
                if price > SUSPICIOUS_PRICE {
                    report.warnings.push(issue(
                        row_number,
                        column,
                        format!("Unusually high price for {}", column),
                        "Please verify the price is correct",
                    ));
                }
            }
            None => report.warnings.push(issue(
                row_number,
                column,
                format!("Invalid price format for {}", column),
                "Use decimal format (e.g., 1.65)",
            )),
        }
    }
}

/// A finite, positive price per litre.
fn valid_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

fn to_raw_record(row: &HashMap<&str, &str>, ordinal: usize) -> RawRecord {
    let mut record = RawRecord::new(Some(format!("upload-{}", ordinal)));
    let columns = [
        ("station_name", FIELD_NAME),
        ("address", FIELD_ADDRESS),
        ("city", FIELD_CITY),
        ("latitude", FIELD_LATITUDE),
        ("longitude", FIELD_LONGITUDE),
        ("brand", FIELD_BRAND),
        ("amenities", FIELD_AMENITIES),
        ("fuel_types", FIELD_FUEL_TYPES),
        ("opening_hours", FIELD_OPENING_HOURS),
        ("last_updated", FIELD_LAST_UPDATED),
    ];
    for (column, field) in columns {
        if let Some(value) = row.get(column) {
            record = record.with_field(field, *value);
        }
    }

    // Columns that only produced a warning are left out of both price and fuel types.
    let priced: Vec<(&str, &str)> = PRICE_COLUMNS
        .iter()
        .filter_map(|(column, fuel)| row.get(column).map(|price| (*fuel, *price)))
        .filter(|(_, price)| valid_price(price).is_some())
        .collect();
    if let Some((_, price)) = priced.first() {
        record = record.with_field(FIELD_PRICE, *price);
    }
    if !row.contains_key("fuel_types") && !priced.is_empty() {
        let fuels: Vec<&str> = priced.iter().map(|(fuel, _)| *fuel).collect();
        record = record.with_field(FIELD_FUEL_TYPES, fuels.join(","));
    }
    record
}
