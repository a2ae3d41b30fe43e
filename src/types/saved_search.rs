//! Named filter presets a user can come back to.

use crate::transfer::error::TransferError;
use crate::types::facet::FacetFilterSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: u64,
    pub name: String,
    pub filters: FacetFilterSpec,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl SavedSearch {
    /// Short description of the filters, e.g. `"2 fuel types • 10km radius • 1 brand"`.
    pub fn summary(&self) -> String {
        let filters = &self.filters;
        let mut parts = Vec::new();
        if let Some(query) = &filters.query {
            parts.push(format!("\"{}\"", query));
        }
        if !filters.fuel_types.is_empty() {
            parts.push(counted(filters.fuel_types.len(), "fuel type"));
        }
        if let Some(km) = filters.max_distance_km {
            parts.push(format!("{}km radius", km));
        }
        if !filters.brands.is_empty() {
            parts.push(counted(filters.brands.len(), "brand"));
        }
        if !filters.amenities.is_empty() {
            parts.push(counted(filters.amenities.len(), "amenity"));
        }
        parts.join(" • ")
    }
}

fn counted(n: usize, noun: &str) -> String {
    match (n, noun.strip_suffix('y')) {
        (1, _) => format!("1 {}", noun),
        (_, Some(stem)) => format!("{} {}ies", n, stem),
        (_, None) => format!("{} {}s", n, noun),
    }
}

/// Saved searches, most recently saved first.
///
/// # Examples
///
/// ```
/// use fuelmap::{FacetFilterSpec, SavedSearches};
///
/// let mut saved = SavedSearches::default();
/// let diesel = FacetFilterSpec::default().with_fuel_types(["Diesel"]);
/// let id = saved.save("Diesel nearby", &diesel).unwrap();
///
/// assert_eq!(saved.load(id), Some(diesel));
/// assert!(saved.remove(id));
/// assert!(saved.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedSearches {
    searches: Vec<SavedSearch>,
    next_id: u64,
}

impl SavedSearches {
    /// Saves `filters` under `name`, returning the new id. Blank names are refused.
    pub fn save(&mut self, name: &str, filters: &FacetFilterSpec) -> Option<u64> {
        self.save_at(name, filters, Utc::now())
    }

    /// [`SavedSearches::save`] with an explicit clock reading.
    pub fn save_at(
        &mut self,
        name: &str,
        filters: &FacetFilterSpec,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.next_id += 1;
        // A pinned evaluation time belongs to the moment of the search, not the preset.
        let filters = FacetFilterSpec {
            evaluated_at: None,
            ..filters.clone()
        };
        self.searches.insert(
            0,
            SavedSearch {
                id: self.next_id,
                name: name.to_string(),
                filters,
                created_at: now,
                last_used: now,
            },
        );
        Some(self.next_id)
    }

    /// Returns the filters of a saved search and marks it as used.
    pub fn load(&mut self, id: u64) -> Option<FacetFilterSpec> {
        self.load_at(id, Utc::now())
    }

    pub fn load_at(&mut self, id: u64, now: DateTime<Utc>) -> Option<FacetFilterSpec> {
        let search = self.searches.iter_mut().find(|s| s.id == id)?;
        search.last_used = now;
        Some(search.filters.clone())
    }

    /// Deletes a saved search. Returns whether it existed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.searches.len();
        self.searches.retain(|s| s.id != id);
        self.searches.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&SavedSearch> {
        self.searches.iter().find(|s| s.id == id)
    }

    pub fn list(&self) -> &[SavedSearch] {
        &self.searches
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    pub fn to_json(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string_pretty(&self.searches)?)
    }

    /// Restores searches written by [`SavedSearches::to_json`]. New ids continue after the
    /// highest restored one.
    pub fn from_json(json: &str) -> Result<Self, TransferError> {
        let searches: Vec<SavedSearch> = serde_json::from_str(json)?;
        let next_id = searches.iter().map(|s| s.id).max().unwrap_or(0);
        Ok(Self { searches, next_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::facet::{OperatingHours, PriceRange};
    use chrono::{NaiveTime, TimeDelta, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn cheap_unleaded() -> FacetFilterSpec {
        FacetFilterSpec::default()
            .with_fuel_types(["Unleaded 91", "E10"])
            .with_price_range(PriceRange::new(120, 160))
            .with_max_distance_km(10.0)
    }

    #[test]
    fn test_newest_first() {
        let mut saved = SavedSearches::default();
        let first = saved.save_at("Cheap unleaded", &cheap_unleaded(), at(8)).unwrap();
        let second = saved
            .save_at("Shell", &FacetFilterSpec::default().with_brands(["Shell"]), at(9))
            .unwrap();

        let ids: Vec<_> = saved.list().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_ne!(first, second);
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn test_blank_name_is_refused() {
        let mut saved = SavedSearches::default();
        assert_eq!(saved.save("   ", &cheap_unleaded()), None);
        assert!(saved.is_empty());

        let id = saved.save("  Near home ", &cheap_unleaded()).unwrap();
        assert_eq!(saved.get(id).unwrap().name, "Near home");
    }

    #[test]
    fn test_load_returns_filters_and_marks_used() {
        let mut saved = SavedSearches::default();
        let id = saved.save_at("Cheap unleaded", &cheap_unleaded(), at(8)).unwrap();

        assert_eq!(saved.load_at(id, at(12)), Some(cheap_unleaded()));
        let search = saved.get(id).unwrap();
        assert_eq!(search.created_at, at(8));
        assert_eq!(search.last_used, at(12));
        assert_eq!(search.last_used - search.created_at, TimeDelta::hours(4));

        assert_eq!(saved.load(id + 100), None);
    }

    #[test]
    fn test_evaluation_time_is_not_saved() {
        let mut spec = cheap_unleaded().with_operating_hours(OperatingHours::OpenNow);
        spec.evaluated_at = NaiveTime::from_hms_opt(23, 30, 0);

        let mut saved = SavedSearches::default();
        let id = saved.save("Open now", &spec).unwrap();
        let loaded = saved.load(id).unwrap();
        assert_eq!(loaded.evaluated_at, None);
        assert_eq!(loaded.operating_hours, OperatingHours::OpenNow);
    }

    #[test]
    fn test_remove() {
        let mut saved = SavedSearches::default();
        let keep = saved.save("Keep", &cheap_unleaded()).unwrap();
        let drop = saved.save("Drop", &cheap_unleaded()).unwrap();

        assert!(saved.remove(drop));
        assert!(!saved.remove(drop));
        assert_eq!(saved.list().len(), 1);
        assert_eq!(saved.list()[0].id, keep);
    }

    #[test]
    fn test_json_round_trip_keeps_ids_unique() {
        let mut saved = SavedSearches::default();
        saved.save_at("Cheap unleaded", &cheap_unleaded(), at(8));
        saved.save_at("Shell", &FacetFilterSpec::default().with_brands(["Shell"]), at(9));

        let json = saved.to_json().unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"lastUsed\""));

        let mut restored = SavedSearches::from_json(&json).unwrap();
        assert_eq!(restored, saved);
        let id = restored.save("Another", &cheap_unleaded()).unwrap();
        assert_eq!(id, 3);
        assert_eq!(restored.list()[0].id, 3);

        assert!(matches!(
            SavedSearches::from_json("{not json"),
            Err(TransferError::Json(_))
        ));
    }

    #[test]
    fn test_summary() {
        let mut saved = SavedSearches::default();
        let spec = cheap_unleaded()
            .with_brands(["Shell"])
            .with_amenities(["ATM", "Car Wash"]);
        let id = saved.save("Everything", &spec).unwrap();
        assert_eq!(
            saved.get(id).unwrap().summary(),
            "2 fuel types • 10km radius • 1 brand • 2 amenities"
        );

        let id = saved.save("Nothing", &FacetFilterSpec::default()).unwrap();
        assert_eq!(saved.get(id).unwrap().summary(), "");
    }
}
