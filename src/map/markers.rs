//! Plant markers for one filtered view: size by capacity, ink by primary
//! fuel, and a spatial index for hover picking.

use crate::map::projection::Viewport;
use crate::map::spatial::SpatialGrid;
use crate::plants::FilteredView;

/// Largest marker radius in dots, reached by the biggest plant in view
pub const MAX_MARKER_RADIUS: i32 = 4;
/// Radius for plants with unknown or tiny capacity
pub const MIN_MARKER_RADIUS: i32 = 1;
/// Number of distinct fuel inks before colors repeat
pub const FUEL_COLOR_COUNT: usize = 10;
/// Ink reserved for the inspected plant
pub const HIGHLIGHT_INK: u8 = u8::MAX;

/// Extra dots of tolerance around a marker when picking
const PICK_SLOP: i32 = 2;
/// Degrees per spatial grid cell
const GRID_CELL_DEG: f64 = 2.0;

/// Fuels visible in the current view, in order of first appearance.
/// The position of a fuel is its color slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuelPalette {
    fuels: Vec<String>,
}

impl FuelPalette {
    fn slot_or_insert(&mut self, fuel: &str) -> usize {
        match self.fuels.iter().position(|f| f == fuel) {
            Some(slot) => slot,
            None => {
                self.fuels.push(fuel.to_string());
                self.fuels.len() - 1
            }
        }
    }

    /// Ink for a color slot
    pub fn ink(slot: usize) -> u8 {
        (slot % FUEL_COLOR_COUNT) as u8
    }

    /// `(fuel, ink)` pairs for the legend
    pub fn entries(&self) -> impl Iterator<Item = (&str, u8)> + '_ {
        self.fuels
            .iter()
            .enumerate()
            .map(|(slot, fuel)| (fuel.as_str(), Self::ink(slot)))
    }

    pub fn len(&self) -> usize {
        self.fuels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuels.is_empty()
    }
}

/// One marker on the map
#[derive(Debug, Clone, PartialEq)]
pub struct PlantMarker {
    /// Row index in the plant table
    pub table_idx: usize,
    pub lon: f64,
    pub lat: f64,
    pub radius: i32,
    pub ink: u8,
}

/// Marker radius for a capacity: area grows linearly with capacity relative
/// to the largest plant in view, capped at `MAX_MARKER_RADIUS`
pub fn marker_radius(capacity_mw: Option<f64>, max_capacity_mw: f64) -> i32 {
    match capacity_mw {
        Some(mw) if mw > 0.0 && max_capacity_mw > 0.0 => {
            let r = MAX_MARKER_RADIUS as f64 * (mw / max_capacity_mw).min(1.0).sqrt();
            (r.round() as i32).clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
        }
        _ => MIN_MARKER_RADIUS,
    }
}

/// Markers derived from a filtered view. Rebuilt on every selection change.
pub struct PlantMarkers {
    markers: Vec<PlantMarker>,
    grid: SpatialGrid<usize>,
    palette: FuelPalette,
}

impl PlantMarkers {
    pub fn build(view: &FilteredView) -> Self {
        let max_capacity = view
            .iter()
            .filter_map(|(_, p)| p.capacity_mw)
            .fold(0.0_f64, f64::max);

        let mut palette = FuelPalette::default();
        let mut grid = SpatialGrid::new(GRID_CELL_DEG);
        let mut markers = Vec::with_capacity(view.len());

        for (table_idx, plant) in view.iter() {
            let slot = plant
                .primary_fuel
                .as_deref()
                .map(|fuel| palette.slot_or_insert(fuel))
                .unwrap_or(0);

            grid.insert(plant.longitude, plant.latitude, markers.len());
            markers.push(PlantMarker {
                table_idx,
                lon: plant.longitude,
                lat: plant.latitude,
                radius: marker_radius(plant.capacity_mw, max_capacity),
                ink: FuelPalette::ink(slot),
            });
        }

        Self {
            markers,
            grid,
            palette,
        }
    }

    pub fn markers(&self) -> &[PlantMarker] {
        &self.markers
    }

    pub fn palette(&self) -> &FuelPalette {
        &self.palette
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Mean position of all markers
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.markers.is_empty() {
            return None;
        }
        let n = self.markers.len() as f64;
        let (lon, lat) = self
            .markers
            .iter()
            .fold((0.0, 0.0), |(lon, lat), m| (lon + m.lon, lat + m.lat));
        Some((lon / n, lat / n))
    }

    /// Marker for a table row, if it is in this view
    pub fn find(&self, table_idx: usize) -> Option<&PlantMarker> {
        self.markers.iter().find(|m| m.table_idx == table_idx)
    }

    /// Table index of the marker under dot (px, py). The nearest marker
    /// wins; on a tie the one drawn last (on top) wins.
    pub fn pick(&self, viewport: &Viewport, px: i32, py: i32) -> Option<usize> {
        let (lon, lat) = viewport.unproject(px, py);
        let reach = (MAX_MARKER_RADIUS + PICK_SLOP) as f64 * viewport.degrees_per_pixel();

        let mut best: Option<(i32, usize)> = None;
        for candidate in self.grid.query_radius(lon, lat, reach) {
            let Some(&marker_idx) = self.grid.get(candidate) else {
                continue;
            };
            let marker = &self.markers[marker_idx];
            let (mx, my) = viewport.project(marker.lon, marker.lat);
            let dist2 = (mx - px).pow(2) + (my - py).pow(2);
            let tolerance = marker.radius + PICK_SLOP;
            if dist2 > tolerance * tolerance {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_dist, best_idx)) => {
                    dist2 < best_dist || (dist2 == best_dist && marker_idx > best_idx)
                }
            };
            if better {
                best = Some((dist2, marker_idx));
            }
        }

        best.map(|(_, marker_idx)| self.markers[marker_idx].table_idx)
    }
}
