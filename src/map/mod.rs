mod geometry;
pub mod markers;
mod projection;
mod renderer;
mod spatial;

pub use markers::{FuelPalette, PlantMarkers, HIGHLIGHT_INK};
pub use projection::Viewport;
pub use renderer::{Lod, MapLayers, MapRenderer};
