use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_disc, draw_line};
use crate::map::markers::{PlantMarkers, HIGHLIGHT_INK};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for basemap data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    /// Natural Earth scale label
    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// Toggleable basemap layers
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
        }
    }
}

/// Rendered canvases, back to front
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    /// Plant markers; cell ink is the fuel color slot
    pub plants: BrailleCanvas,
}

/// Basemap line data per level of detail plus plant marker drawing
#[derive(Default)]
pub struct MapRenderer {
    coastlines: [Vec<LineString>; 3],
    borders: [Vec<LineString>; 3],
    pub settings: DisplaySettings,
}

#[inline(always)]
fn lod_slot(lod: Lod) -> usize {
    match lod {
        Lod::Low => 0,
        Lod::Medium => 1,
        Lod::High => 2,
    }
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most detailed non-empty set at or below `lod`
    fn best_at_or_below(sets: &[Vec<LineString>; 3], lod: Lod) -> &[LineString] {
        sets[..=lod_slot(lod)]
            .iter()
            .rev()
            .find(|set| !set.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Draw basemap layers and plant markers for the given viewport.
    /// `highlight` is a plant table index drawn in the highlight ink.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: Option<&PlantMarkers>,
        highlight: Option<usize>,
    ) -> MapLayers {
        let lod = Lod::from_zoom(viewport.zoom);
        let mut layers = MapLayers {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            plants: BrailleCanvas::new(width, height),
        };

        if self.settings.show_coastlines {
            for line in Self::best_at_or_below(&self.coastlines, lod) {
                draw_linestring(&mut layers.coastlines, line, viewport);
            }
        }

        // Borders only exist from the 50m set upwards
        if self.settings.show_borders && lod != Lod::Low {
            for line in Self::best_at_or_below(&self.borders, lod) {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        if let Some(markers) = markers {
            draw_markers(&mut layers.plants, markers, viewport, highlight);
        }

        layers
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        self.coastlines[lod_slot(lod)].push(line);
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        self.borders[lod_slot(lod)].push(line);
    }

    pub fn has_data(&self) -> bool {
        self.coastlines.iter().any(|set| !set.is_empty())
    }

    pub fn toggle_coastlines(&mut self) {
        self.settings.show_coastlines = !self.settings.show_coastlines;
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let point = viewport.project(lon, lat);
        if let Some(last) = prev {
            // Segments spanning most of the canvas are antimeridian wraps
            let span = ((point.0 - last.0).abs() + (point.1 - last.1).abs()) as usize;
            if span < viewport.width && viewport.line_might_be_visible(last, point) {
                draw_line(last.0, last.1, point.0, point.1, |x, y| canvas.set_pixel(x, y));
            }
        }
        prev = Some(point);
    }
}

fn draw_markers(
    canvas: &mut BrailleCanvas,
    markers: &PlantMarkers,
    viewport: &Viewport,
    highlight: Option<usize>,
) {
    for marker in markers.markers() {
        let (px, py) = viewport.project(marker.lon, marker.lat);
        if viewport.is_visible(px, py) {
            draw_disc(px, py, marker.radius, |x, y| {
                canvas.set_inked_pixel(x, y, marker.ink)
            });
        }
    }

    // Inspected plant goes on top with a one-dot halo
    if let Some(marker) = highlight.and_then(|idx| markers.find(idx)) {
        let (px, py) = viewport.project(marker.lon, marker.lat);
        draw_disc(px, py, marker.radius + 1, |x, y| {
            canvas.set_inked_pixel(x, y, HIGHLIGHT_INK)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::tests::plant;
    use crate::plants::{filter, FilterState, PlantTable};
    use std::sync::Arc;

    #[test]
    fn test_lod_fallback_uses_coarser_data() {
        let mut renderer = MapRenderer::new();
        renderer.add_coastline(vec![(-2.0, 0.0), (2.0, 0.0)], Lod::Low);

        let zoomed = Viewport::new(0.0, 0.0, 10.0, 80, 40);
        let layers = renderer.render(40, 10, &zoomed, None, None);
        assert!(layers.coastlines.cells().count() > 0);
        assert!(renderer.has_data());
    }

    #[test]
    fn test_borders_hidden_at_world_zoom() {
        let mut renderer = MapRenderer::new();
        renderer.add_border(vec![(-10.0, 0.0), (10.0, 0.0)], Lod::Medium);

        let world = Viewport::new(0.0, 0.0, 1.0, 80, 40);
        assert_eq!(renderer.render(40, 10, &world, None, None).borders.cells().count(), 0);

        let continental = Viewport::new(0.0, 0.0, 3.0, 80, 40);
        assert!(renderer.render(40, 10, &continental, None, None).borders.cells().count() > 0);
    }

    #[test]
    fn test_markers_inked_and_highlighted() {
        let mut p = plant("p", Some("USA"), Some("Gas"));
        p.capacity_mw = Some(10.0);
        let table = Arc::new(PlantTable::new(vec![p]));
        let markers = PlantMarkers::build(&filter(&table, &FilterState::default()));
        let viewport = Viewport::new(0.0, 0.0, 1.0, 80, 40);
        let renderer = MapRenderer::new();

        let layers = renderer.render(40, 10, &viewport, Some(&markers), None);
        assert!(layers.plants.cells().all(|c| c.ink == Some(0)));
        assert!(layers.plants.cells().count() > 0);

        let layers = renderer.render(40, 10, &viewport, Some(&markers), Some(0));
        assert!(layers.plants.cells().any(|c| c.ink == Some(HIGHLIGHT_INK)));
    }
}
