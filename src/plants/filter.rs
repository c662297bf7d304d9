use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use super::{PlantTable, PowerPlant};

pub const ALL_COUNTRIES: &str = "All countries";
pub const ALL_FUELS: &str = "All fuels";

/// Selection on one filter axis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// Every row where the column has a value
    #[default]
    All,
    /// Rows whose column equals the value exactly
    Only(String),
}

impl Selection {
    fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Selection::All, Some(_)) => true,
            (Selection::Only(wanted), Some(v)) => wanted == v,
        }
    }

    /// Label for display, using `all_label` for the sentinel
    pub fn label<'a>(&'a self, all_label: &'a str) -> &'a str {
        match self {
            Selection::All => all_label,
            Selection::Only(v) => v,
        }
    }
}

/// Current country × fuel selection. Immutable: changing an axis produces a
/// new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterState {
    pub country: Selection,
    pub fuel: Selection,
}

impl FilterState {
    pub fn new(country: Selection, fuel: Selection) -> Self {
        Self { country, fuel }
    }

    pub fn with_country(&self, country: Selection) -> Self {
        Self {
            country,
            fuel: self.fuel.clone(),
        }
    }

    pub fn with_fuel(&self, fuel: Selection) -> Self {
        Self {
            country: self.country.clone(),
            fuel,
        }
    }

    pub fn matches(&self, plant: &PowerPlant) -> bool {
        self.country.matches(plant.country_long.as_deref())
            && self.fuel.matches(plant.primary_fuel.as_deref())
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}",
            self.country.label(ALL_COUNTRIES),
            self.fuel.label(ALL_FUELS)
        )
    }
}

/// Rows of a shared table that pass a filter, in table order
#[derive(Debug, Clone)]
pub struct FilteredView {
    table: Arc<PlantTable>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// Table the indices point into
    pub fn table(&self) -> &Arc<PlantTable> {
        &self.table
    }

    /// Row indices into the table
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Plant at position `pos` of the view
    pub fn get(&self, pos: usize) -> Option<&PowerPlant> {
        self.indices.get(pos).and_then(|&idx| self.table.get(idx))
    }

    /// Iterate `(table_index, plant)` pairs in view order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PowerPlant)> + '_ {
        self.indices
            .iter()
            .filter_map(move |&idx| self.table.get(idx).map(|p| (idx, p)))
    }
}

/// Apply country AND fuel masks to the table. Never mutates the table; an
/// empty result is a valid view.
pub fn filter(table: &Arc<PlantTable>, state: &FilterState) -> FilteredView {
    let indices = table
        .plants()
        .par_iter()
        .enumerate()
        .filter(|(_, plant)| state.matches(plant))
        .map(|(idx, _)| idx)
        .collect();

    FilteredView {
        table: Arc::clone(table),
        indices,
    }
}
