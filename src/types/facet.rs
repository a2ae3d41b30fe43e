//! Defines the facet filter specification a search is evaluated against, together
//! with the operating-hours and sort options it carries.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Inclusive price bounds in cents per litre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_cents: u32,
    pub max_cents: u32,
}

impl PriceRange {
    pub fn new(min_cents: u32, max_cents: u32) -> Self {
        Self {
            min_cents,
            max_cents,
        }
    }

    pub fn contains(&self, cents: u32) -> bool {
        self.min_cents <= cents && cents <= self.max_cents
    }
}

/// Opening-hours facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingHours {
    /// No time restriction.
    #[default]
    Any,
    /// Open around the clock.
    TwentyFourSeven,
    /// Open at the time the search is evaluated.
    OpenNow,
    /// Opens before 7 AM.
    Early,
    /// Open after 10 PM.
    Late,
}

impl OperatingHours {
    fn as_str(&self) -> &'static str {
        match self {
            OperatingHours::Any => "any",
            OperatingHours::TwentyFourSeven => "24/7",
            OperatingHours::OpenNow => "openNow",
            OperatingHours::Early => "early",
            OperatingHours::Late => "late",
        }
    }
}

impl fmt::Display for OperatingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingHours {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(OperatingHours::Any),
            "24/7" | "24h" => Ok(OperatingHours::TwentyFourSeven),
            "opennow" | "open_now" | "current" => Ok(OperatingHours::OpenNow),
            "early" => Ok(OperatingHours::Early),
            "late" => Ok(OperatingHours::Late),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

/// Order of the search results. Every key sorts stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Cheapest first.
    Price,
    /// Closest first.
    Distance,
    /// Lexical on the stored brand.
    Brand,
    /// Lexical on the stored name.
    Name,
    /// Most recently updated first, by the age parsed from the freshness label.
    Updated,
}

impl SortKey {
    fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Distance => "distance",
            SortKey::Brand => "brand",
            SortKey::Name => "name",
            SortKey::Updated => "updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "distance" => Ok(SortKey::Distance),
            "brand" => Ok(SortKey::Brand),
            "name" => Ok(SortKey::Name),
            "updated" => Ok(SortKey::Updated),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown option '{0}'")]
pub struct UnknownOption(pub String);

/// The combination of facets one search is evaluated with.
///
/// Facets are combined with AND. Within `brands` and `fuel_types` a station has to
/// match any of the listed values, within `amenities` it has to carry all of them.
/// An empty set, `None` or [`OperatingHours::Any`] imposes no constraint, so
/// `FacetFilterSpec::default()` keeps every station in its original order.
///
/// # Examples
///
/// ```
/// use fuelmap::{FacetFilterSpec, PriceRange, SortKey};
///
/// let spec = FacetFilterSpec::default()
///     .with_query("carlton")
///     .with_brands(["Shell", "BP"])
///     .with_amenities(["ATM"])
///     .with_price_range(PriceRange::new(150, 170))
///     .with_max_distance_km(5.0)
///     .sorted_by(SortKey::Price);
/// assert_eq!(spec.brands.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilterSpec {
    /// Case-insensitive substring of name, address, city or brand.
    pub query: Option<String>,
    pub fuel_types: BTreeSet<String>,
    pub price_range: Option<PriceRange>,
    /// Inclusive upper bound on the station's reference distance.
    pub max_distance_km: Option<f64>,
    pub brands: BTreeSet<String>,
    pub amenities: BTreeSet<String>,
    pub operating_hours: OperatingHours,
    /// `None` keeps the input order.
    pub sort_key: Option<SortKey>,
    /// Time of day [`OperatingHours::OpenNow`] is checked against.
    /// Falls back to the local wall clock when unset.
    pub evaluated_at: Option<NaiveTime>,
}

impl FacetFilterSpec {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_fuel_types<I, S>(mut self, fuel_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fuel_types = fuel_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_operating_hours(mut self, hours: OperatingHours) -> Self {
        self.operating_hours = hours;
        self
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }

    pub fn evaluated_at(mut self, time: NaiveTime) -> Self {
        self.evaluated_at = Some(time);
        self
    }

    /// Number of facets that constrain the result, as shown on an "active filters" badge.
    pub fn active_facet_count(&self) -> usize {
        let query = self
            .query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty());
        [
            query,
            !self.fuel_types.is_empty(),
            self.price_range.is_some(),
            self.max_distance_km.is_some(),
            !self.brands.is_empty(),
            !self.amenities.is_empty(),
            self.operating_hours != OperatingHours::Any,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_has_no_active_facets() {
        let spec = FacetFilterSpec::default();
        assert_eq!(spec.active_facet_count(), 0);
        assert!(spec.sort_key.is_none());
        assert_eq!(FacetFilterSpec::default().with_query("  ").active_facet_count(), 0);
    }

    #[test]
    fn test_active_facet_count() {
        let spec = FacetFilterSpec::default()
            .with_query("yarra")
            .with_brands(["Shell"])
            .with_operating_hours(OperatingHours::Late)
            .sorted_by(SortKey::Distance);
        assert_eq!(spec.active_facet_count(), 3);
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Price".parse::<SortKey>(), Ok(SortKey::Price));
        assert_eq!("updated".parse::<SortKey>(), Ok(SortKey::Updated));
        assert!("rating".parse::<SortKey>().is_err());
        assert_eq!("24/7".parse::<OperatingHours>(), Ok(OperatingHours::TwentyFourSeven));
        assert_eq!("current".parse::<OperatingHours>(), Ok(OperatingHours::OpenNow));
        assert_eq!("".parse::<OperatingHours>(), Ok(OperatingHours::Any));
        assert_eq!(OperatingHours::OpenNow.to_string(), "openNow");
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let range = PriceRange::new(150, 170);
        assert!(range.contains(150));
        assert!(range.contains(170));
        assert!(!range.contains(171));
        assert!(!range.contains(149));
    }
}
