//! Fixed vocabularies stations are described with.

/// Brands recognised in station names, in match priority order.
pub const BRANDS: &[&str] = &[
    "Shell", "BP", "7-Eleven", "Caltex", "Mobil", "United", "Metro", "Liberty",
];

/// Brand given to stations whose name matches none of [`BRANDS`].
pub const INDEPENDENT_BRAND: &str = "Independent";

pub const AMENITIES: &[&str] = &[
    "24/7",
    "Car Wash",
    "ATM",
    "Convenience Store",
    "Restrooms",
    "Air Pump",
    "Vacuum",
    "Coffee",
    "Food Service",
    "Loyalty Program",
    "Pay at Pump",
    "Truck Stop",
    "Electric Charging",
    "WiFi",
];

/// Amenity tag marking a station that never closes.
pub const ALWAYS_OPEN_AMENITY: &str = "24/7";

pub const FUEL_TYPES: &[&str] = &[
    "Unleaded 91",
    "Premium 95",
    "Premium 98",
    "Diesel",
    "E10",
    "LPG",
    "AdBlue",
];

pub(crate) const STREET_NAMES: &[&str] = &[
    "Collins", "Bourke", "Flinders", "Swanston", "Elizabeth", "Queen", "King", "William",
    "Spencer", "Russell", "Exhibition", "Spring", "Lonsdale", "Little Collins",
    "Little Bourke", "Chapel", "Toorak", "High", "Burke", "Punt", "Bridge", "Swan", "Church",
    "Commercial", "Station", "Main", "Centre", "Park", "Victoria", "Albert", "Royal", "Crown",
];

pub(crate) const STREET_TYPES: &[&str] = &[
    "Street", "Road", "Avenue", "Drive", "Lane", "Place", "Court", "Way",
];

/// Opening windows handed to stations that are not open around the clock.
pub(crate) const TRADING_WINDOWS: &[((u32, u32), (u32, u32))] = &[
    ((5, 0), (23, 0)),
    ((6, 0), (22, 0)),
    ((6, 0), (21, 0)),
    ((7, 0), (22, 0)),
];

/// Finds the first known brand contained in `name`, ignoring case.
///
/// ```
/// use fuelmap::infer_brand;
///
/// assert_eq!(infer_brand("shell richmond"), "Shell");
/// assert_eq!(infer_brand("Joe's Garage"), "Independent");
/// ```
pub fn infer_brand(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    BRANDS
        .iter()
        .find(|brand| lowered.contains(&brand.to_lowercase()))
        .copied()
        .unwrap_or(INDEPENDENT_BRAND)
}
