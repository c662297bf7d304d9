pub mod filter;
pub mod hover;
pub mod loader;

pub use filter::{filter, FilterState, FilteredView, Selection};
pub use hover::{build_hover_text, HoverLine, HoverText};
pub use loader::{load, DataLoadError, TableCache};

/// One power-generation facility
#[derive(Debug, Clone, PartialEq)]
pub struct PowerPlant {
    pub name: String,
    pub country_long: Option<String>,
    pub capacity_mw: Option<f64>,
    pub primary_fuel: Option<String>,
    /// `other_fuel1..3` joined by ", ", absent when all three are
    pub other_fuels: Option<String>,
    pub commissioning_year: Option<i64>,
    pub owner: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Immutable in-memory table of plants, loaded once and shared by handle
#[derive(Debug, Default)]
pub struct PlantTable {
    plants: Vec<PowerPlant>,
}

impl PlantTable {
    pub fn new(plants: Vec<PowerPlant>) -> Self {
        Self { plants }
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&PowerPlant> {
        self.plants.get(idx)
    }

    #[inline(always)]
    pub fn plants(&self) -> &[PowerPlant] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Distinct, non-absent, alphabetically sorted countries
    pub fn countries(&self) -> Vec<String> {
        distinct_sorted(self.plants.iter().map(|p| p.country_long.as_deref()))
    }

    /// Distinct, non-absent, alphabetically sorted primary fuels
    pub fn fuels(&self) -> Vec<String> {
        distinct_sorted(self.plants.iter().map(|p| p.primary_fuel.as_deref()))
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = values.flatten().map(str::to_string).collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal plant for tests; optional fields start absent
    pub(crate) fn plant(name: &str, country: Option<&str>, fuel: Option<&str>) -> PowerPlant {
        PowerPlant {
            name: name.to_string(),
            country_long: country.map(str::to_string),
            capacity_mw: None,
            primary_fuel: fuel.map(str::to_string),
            other_fuels: None,
            commissioning_year: None,
            owner: None,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_options_sorted_distinct_without_absent() {
        let table = PlantTable::new(vec![
            plant("a", Some("Spain"), Some("Solar")),
            plant("b", None, Some("Gas")),
            plant("c", Some("Brazil"), None),
            plant("d", Some("Spain"), Some("Gas")),
        ]);

        assert_eq!(table.countries(), vec!["Brazil", "Spain"]);
        assert_eq!(table.fuels(), vec!["Gas", "Solar"]);
    }
}
