//! Raw records as the remote store (or a CSV upload) hands them over, before any
//! repair. Field values are kept as loose JSON so a record with unexpected types
//! still reaches the normalizer instead of failing deserialization.

use crate::utils::split_list;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_NAME: &str = "Station Name";
pub const FIELD_ADDRESS: &str = "Address";
pub const FIELD_CITY: &str = "City";
pub const FIELD_LATITUDE: &str = "Latitude";
pub const FIELD_LONGITUDE: &str = "Longitude";
pub const FIELD_PRICE: &str = "Price Per Liter (from Fuel Prices)";
pub const FIELD_BRAND: &str = "Brand";
pub const FIELD_AMENITIES: &str = "Amenities";
pub const FIELD_FUEL_TYPES: &str = "Fuel Types";
pub const FIELD_LAST_UPDATED: &str = "Last Updated";
pub const FIELD_OPENING_HOURS: &str = "Opening Hours";

/// One record of the remote table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One page of the paginated list endpoint. A missing `offset` marks the last page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

impl RawRecord {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Sets a field, returning the record for chaining.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Non-blank text. Numbers are rendered; single element lookup arrays are unwrapped.
    pub fn text(&self, key: &str) -> Option<String> {
        match unwrap_lookup(self.fields.get(key)?) {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A finite number, from a JSON number or a numeric string.
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match unwrap_lookup(self.fields.get(key)?) {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// A list from a JSON array of strings or a comma separated string.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::String(s)) => split_list(s),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Lookup fields ("from Fuel Prices") arrive as arrays; use the first entry.
fn unwrap_lookup(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.first().unwrap_or(&Value::Null),
        other => other,
    }
}
