//! CSV loading for the power plant table.
//!
//! Rows without coordinates are dropped, the three `other_fuel` columns are
//! folded into one `other_fuels` field and `commissioning_year` is coerced to
//! a whole number. Field-level problems recover to absent values; only
//! structural problems (missing file, malformed CSV, missing required
//! columns) are errors.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use super::{PlantTable, PowerPlant};

/// Columns that must appear in the CSV header
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "latitude",
    "longitude",
    "name",
    "country_long",
    "primary_fuel",
    "capacity_mw",
];

/// Cell values read as "no value", on top of empty cells
const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Structural failure while loading the data file
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required columns: {}", .path.display(), .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
}

/// One CSV row before cleaning. Every column is optional here so absent
/// optional columns deserialize to `None` instead of failing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    name: Option<String>,
    country_long: Option<String>,
    capacity_mw: Option<String>,
    primary_fuel: Option<String>,
    other_fuel1: Option<String>,
    other_fuel2: Option<String>,
    other_fuel3: Option<String>,
    commissioning_year: Option<String>,
    owner: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl RawRow {
    /// Clean the row, or `None` when it lacks a coordinate
    fn into_plant(self) -> Option<PowerPlant> {
        let latitude = parse_number(self.latitude.as_deref())?;
        let longitude = parse_number(self.longitude.as_deref())?;

        let other_fuels = join_other_fuels([
            self.other_fuel1.as_deref(),
            self.other_fuel2.as_deref(),
            self.other_fuel3.as_deref(),
        ]);

        Some(PowerPlant {
            name: text(self.name).unwrap_or_default(),
            country_long: text(self.country_long),
            capacity_mw: parse_number(self.capacity_mw.as_deref()),
            primary_fuel: text(self.primary_fuel),
            other_fuels,
            commissioning_year: coerce_year(self.commissioning_year.as_deref()),
            owner: text(self.owner),
            latitude,
            longitude,
        })
    }
}

/// Load the plant table from a CSV file
pub fn load(path: &Path) -> Result<PlantTable, DataLoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DataLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    load_reader(file, path)
}

/// Load the plant table from any CSV byte source. `path` is only used for
/// error messages and logging.
pub fn load_reader<R: Read>(reader: R, path: &Path) -> Result<PlantTable, DataLoadError> {
    let start = Instant::now();
    let csv_error = |source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let raw: Vec<RawRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(csv_error)?;
    let total = raw.len();

    // Indexed parallel collect keeps file order
    let plants: Vec<PowerPlant> = raw.into_par_iter().filter_map(RawRow::into_plant).collect();

    tracing::info!(
        path = %path.display(),
        rows = total,
        kept = plants.len(),
        dropped = total - plants.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded power plant table"
    );

    Ok(PlantTable::new(plants))
}

/// Loaded tables keyed by source path. Lives for the whole process; a path
/// is read at most once.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, Arc<PlantTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<PlantTable>, DataLoadError> {
        if let Some(table) = self.entries.get(path) {
            tracing::debug!(path = %path.display(), "Plant table cache hit");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}

/// Trimmed cell text, `None` for empty cells and missing-value tokens
fn text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if is_missing(trimmed) {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Finite number from a cell, `None` for anything else
fn parse_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if is_missing(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Nearest whole year (ties to even); unparseable values are absent
fn coerce_year(value: Option<&str>) -> Option<i64> {
    parse_number(value).map(|year| year.round_ties_even() as i64)
}

/// Present `other_fuel` values in column order, joined by ", "
fn join_other_fuels(values: [Option<&str>; 3]) -> Option<String> {
    let present: Vec<&str> = values
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|v| !is_missing(v))
        .collect();

    if present.is_empty() {
        None
    } else {
        Some(present.join(", "))
    }
}
