//! Named regions the fallback generator spreads synthetic stations across.

use crate::geo::LatLon;
use serde::{Deserialize, Serialize};

/// A named area with a center point, e.g. a suburb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub center: LatLon,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, center: LatLon) -> Self {
        Self {
            name: name.into(),
            center,
        }
    }

    /// Melbourne CBD, the point every station distance is measured from by default.
    pub fn melbourne_cbd() -> Self {
        Self::new("Melbourne", LatLon(-37.8136, 144.9631))
    }

    /// Thirty suburbs across Greater Melbourne.
    pub fn greater_melbourne() -> Vec<Self> {
        GREATER_MELBOURNE
            .iter()
            .map(|(name, lat, lng)| Self::new(*name, LatLon(*lat, *lng)))
            .collect()
    }
}

const GREATER_MELBOURNE: &[(&str, f64, f64)] = &[
    // Inner
    ("Melbourne", -37.8136, 144.9631),
    ("Carlton", -37.7950, 144.9670),
    ("Fitzroy", -37.7950, 144.9780),
    ("Richmond", -37.8200, 144.9950),
    ("South Yarra", -37.8400, 144.9900),
    ("Prahran", -37.8500, 144.9900),
    ("St Kilda", -37.8680, 144.9780),
    ("Docklands", -37.8200, 144.9400),
    ("Southbank", -37.8250, 144.9600),
    ("Collingwood", -37.8050, 144.9850),
    // North
    ("Brunswick", -37.7700, 144.9600),
    ("Northcote", -37.7700, 144.9950),
    ("Preston", -37.7400, 144.9950),
    ("Coburg", -37.7450, 144.9650),
    ("Thornbury", -37.7600, 144.9950),
    // East
    ("Hawthorn", -37.8220, 145.0350),
    ("Camberwell", -37.8270, 145.0580),
    ("Glen Iris", -37.8650, 145.0650),
    ("Malvern", -37.8570, 145.0280),
    ("Toorak", -37.8420, 145.0120),
    // West
    ("Footscray", -37.7950, 144.9000),
    ("Yarraville", -37.8150, 144.8950),
    ("Williamstown", -37.8650, 144.8950),
    ("Newport", -37.8450, 144.8850),
    ("Altona", -37.8700, 144.8300),
    // South
    ("Port Melbourne", -37.8400, 144.9350),
    ("Albert Park", -37.8450, 144.9650),
    ("Middle Park", -37.8500, 144.9600),
    ("Elwood", -37.8800, 144.9900),
    ("Brighton", -37.9050, 144.9950),
];
