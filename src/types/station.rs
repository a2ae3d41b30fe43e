//! Defines the canonical fuel station record produced by the normalizer and the
//! fallback generator, including its opening hours. Also includes implementations
//! necessary for spatial indexing using the `rstar` crate.

use crate::geo::LatLon;
use crate::utils::{parse_age_label, parse_price};
use chrono::{NaiveTime, TimeDelta};
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Data Structures ---

/// A single fuel station after every missing or malformed field was repaired.
///
/// Stations are built once per fetch cycle and never mutated afterwards. In particular
/// `distance_km` is computed from `latitude`/`longitude` when the station is built and
/// is not recomputed anywhere else.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Unique identifier, stable across pagination within one fetch.
    pub id: String,
    /// Display name, never empty.
    pub name: String,
    pub address: String,
    pub city: String,
    /// Latitude in decimal degrees, always finite.
    pub latitude: f64,
    /// Longitude in decimal degrees, always finite.
    pub longitude: f64,
    /// Currency formatted price of the primary fuel type (e.g. "$1.65").
    pub price_display: String,
    pub brand: String,
    /// Distance to the reference point in kilometers, rounded to one decimal.
    pub distance_km: f64,
    /// Human readable freshness label (e.g. "3 hours ago").
    pub last_updated_label: String,
    /// Non-empty list of amenity tags.
    pub amenities: Vec<String>,
    /// Non-empty list of fuel type tags.
    pub fuel_types: Vec<String>,
    pub hours: OpeningHours,
}

impl Station {
    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// The price per litre parsed back from [`Station::price_display`].
    pub fn price(&self) -> Option<f64> {
        parse_price(&self.price_display)
    }

    /// The price per litre in whole cents.
    pub fn price_cents(&self) -> Option<u32> {
        self.price()
            .filter(|p| *p >= 0.0)
            .map(|p| (p * 100.0).round() as u32)
    }

    /// How long ago the price was updated, parsed from [`Station::last_updated_label`].
    pub fn last_updated_age(&self) -> Option<TimeDelta> {
        parse_age_label(&self.last_updated_label)
    }

    /// Distance formatted the way listings show it (e.g. "2.4 km").
    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.distance_km)
    }

    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.iter().any(|a| a == amenity)
    }

    pub fn has_fuel_type(&self, fuel_type: &str) -> bool {
        self.fuel_types.iter().any(|f| f == fuel_type)
    }
}

/// When a station is open.
///
/// `Daily` windows whose `close` is earlier than `open` run past midnight.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum OpeningHours {
    AlwaysOpen,
    Daily { open: NaiveTime, close: NaiveTime },
}

impl OpeningHours {
    pub fn is_always_open(&self) -> bool {
        matches!(self, OpeningHours::AlwaysOpen)
    }

    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        match *self {
            OpeningHours::AlwaysOpen => true,
            OpeningHours::Daily { open, close } if open <= close => open <= time && time < close,
            OpeningHours::Daily { open, close } => time >= open || time < close,
        }
    }

    /// Opens strictly before `time`.
    pub fn opens_before(&self, time: NaiveTime) -> bool {
        match *self {
            OpeningHours::AlwaysOpen => true,
            OpeningHours::Daily { open, .. } => open < time,
        }
    }

    /// Still open after `time`, counting windows that run past midnight.
    pub fn closes_after(&self, time: NaiveTime) -> bool {
        match *self {
            OpeningHours::AlwaysOpen => true,
            OpeningHours::Daily { open, close } => close > time || close < open,
        }
    }

    /// Parses "24/7", "24 hours" or an "HH:MM-HH:MM" window.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lowered = text.to_lowercase();
        if lowered == "24/7" || lowered == "24 hours" || lowered == "24h" {
            return Some(OpeningHours::AlwaysOpen);
        }
        let (open, close) = text.split_once('-')?;
        let open = NaiveTime::parse_from_str(open.trim(), "%H:%M").ok()?;
        let close = NaiveTime::parse_from_str(close.trim(), "%H:%M").ok()?;
        if open == close {
            return Some(OpeningHours::AlwaysOpen);
        }
        Some(OpeningHours::Daily { open, close })
    }
}

impl fmt::Display for OpeningHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpeningHours::AlwaysOpen => write!(f, "24/7"),
            OpeningHours::Daily { open, close } => {
                write!(f, "{}-{}", open.format("%H:%M"), close.format("%H:%M"))
            }
        }
    }
}

// --- R-Tree Implementations ---

/// Lets the station locator keep stations in an R-tree keyed on `[latitude, longitude]`.
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for Station {
    /// Squared Euclidean distance in degree space. Good enough to order candidates
    /// for nearest-neighbour iteration; the locator re-ranks them with haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}
