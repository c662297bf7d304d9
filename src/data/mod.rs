//! Basemap background: Natural Earth coastlines and country borders from
//! GeoJSON, with built-in continent outlines when no files are present.

use crate::map::{Lod, MapRenderer};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy)]
enum Layer {
    Coastline,
    Border,
}

/// Files looked up in the basemap directory
const BASEMAP_FILES: [(&str, Layer, Lod); 5] = [
    ("ne_110m_coastline.json", Layer::Coastline, Lod::Low),
    ("ne_50m_coastline.json", Layer::Coastline, Lod::Medium),
    ("ne_10m_coastline.json", Layer::Coastline, Lod::High),
    ("ne_50m_borders.json", Layer::Border, Lod::Medium),
    ("ne_10m_borders.json", Layer::Border, Lod::High),
];

/// Load every basemap file present in `dir`, then fall back to the
/// built-in outlines if no coastline data was found. Unreadable files are
/// logged and skipped.
pub fn load_basemap(renderer: &mut MapRenderer, dir: &Path) {
    for (filename, layer, lod) in BASEMAP_FILES {
        let path = dir.join(filename);
        if !path.is_file() {
            continue;
        }
        match load_lines(&path) {
            Ok(lines) => {
                tracing::debug!(file = filename, lines = lines.len(), "Loaded basemap layer");
                for line in lines {
                    match layer {
                        Layer::Coastline => renderer.add_coastline(line, lod),
                        Layer::Border => renderer.add_border(line, lod),
                    }
                }
            }
            Err(e) => tracing::warn!(file = filename, error = %e, "Failed to load basemap layer"),
        }
    }

    if !renderer.has_data() {
        tracing::info!(dir = %dir.display(), "No basemap files found, using built-in outlines");
        add_fallback_outlines(renderer);
    }
}

/// Read a GeoJSON file into line strings
fn load_lines(path: &Path) -> Result<Vec<Vec<(f64, f64)>>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut lines = Vec::new();
    collect_lines(&geojson, &mut lines);
    Ok(lines)
}

fn collect_lines(geojson: &GeoJson, out: &mut Vec<Vec<(f64, f64)>>) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_lines(geometry, out);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                geometry_lines(geometry, out);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, out),
    }
}

fn geometry_lines(geometry: &Geometry, out: &mut Vec<Vec<(f64, f64)>>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(to_line)),
        // Polygon outlines only need their exterior ring
        Value::Polygon(rings) => out.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first().map(to_line)))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                geometry_lines(g, out);
            }
        }
        _ => {}
    }
}

/// Coarse continent outlines (lon, lat), closed rings
const FALLBACK_OUTLINES: [&[(f64, f64)]; 7] = [
    // North America
    &[
        (-165.0, 68.0), (-162.0, 58.0), (-150.0, 60.0), (-135.0, 57.0), (-124.0, 46.0),
        (-121.0, 35.0), (-109.0, 23.0), (-96.0, 19.0), (-88.0, 21.0), (-83.0, 9.0),
        (-78.0, 8.0), (-89.0, 30.0), (-81.0, 26.0), (-76.0, 38.0), (-66.0, 44.0),
        (-56.0, 51.0), (-64.0, 59.0), (-78.0, 62.0), (-94.0, 60.0), (-110.0, 69.0),
        (-140.0, 70.0), (-165.0, 68.0),
    ],
    // South America
    &[
        (-78.0, 8.0), (-62.0, 10.0), (-50.0, 0.0), (-35.0, -6.0), (-40.0, -22.0),
        (-53.0, -34.0), (-65.0, -41.0), (-69.0, -52.0), (-74.0, -50.0), (-72.0, -30.0),
        (-70.0, -18.0), (-81.0, -5.0), (-78.0, 8.0),
    ],
    // Europe
    &[
        (-9.0, 37.0), (-2.0, 36.5), (3.0, 42.0), (12.0, 44.0), (16.0, 38.0),
        (19.0, 42.0), (24.0, 37.5), (28.0, 41.0), (30.0, 46.0), (40.0, 47.0),
        (45.0, 58.0), (30.0, 70.0), (18.0, 70.0), (5.0, 61.0), (10.0, 54.0),
        (1.0, 51.0), (-4.5, 48.0), (-1.5, 44.0), (-9.0, 43.0), (-9.0, 37.0),
    ],
    // Africa
    &[
        (-17.0, 21.0), (-10.0, 35.5), (10.0, 37.0), (20.0, 31.0), (32.0, 31.0),
        (43.0, 12.0), (51.0, 11.5), (40.0, -3.0), (40.0, -16.0), (33.0, -26.0),
        (20.0, -35.0), (15.0, -27.0), (12.0, -6.0), (9.0, 4.0), (-8.0, 4.5),
        (-17.0, 14.5), (-17.0, 21.0),
    ],
    // Asia
    &[
        (45.0, 58.0), (40.0, 47.0), (36.0, 36.0), (34.0, 28.0), (43.0, 13.0),
        (56.0, 26.0), (67.0, 24.0), (73.0, 16.0), (78.0, 8.0), (80.0, 15.0),
        (90.0, 22.0), (98.0, 16.0), (104.0, 1.5), (109.0, 12.0), (108.0, 21.0),
        (121.0, 30.0), (122.0, 40.0), (129.0, 35.0), (132.0, 43.0), (141.0, 52.0),
        (135.0, 55.0), (160.0, 61.0), (180.0, 66.0), (180.0, 71.0), (140.0, 73.0),
        (105.0, 78.0), (70.0, 73.0), (60.0, 69.0), (45.0, 58.0),
    ],
    // Australia
    &[
        (114.0, -22.0), (122.0, -18.0), (131.0, -12.0), (137.0, -12.0), (142.0, -11.0),
        (146.0, -19.0), (153.0, -26.0), (150.0, -37.0), (141.0, -38.5), (131.0, -31.5),
        (115.0, -34.0), (114.0, -22.0),
    ],
    // Japan
    &[
        (130.0, 31.0), (135.0, 34.0), (140.0, 35.0), (142.0, 40.0), (145.0, 44.0),
        (141.0, 45.5), (139.5, 40.0), (136.0, 37.0), (130.0, 33.5), (130.0, 31.0),
    ],
];

fn add_fallback_outlines(renderer: &mut MapRenderer) {
    for outline in FALLBACK_OUTLINES {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = MapRenderer::new();
        load_basemap(&mut renderer, &dir.path().join("nope"));
        assert!(renderer.has_data());
    }

    #[test]
    fn test_loads_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}
            ]
        }"#;
        fs::write(dir.path().join("ne_110m_coastline.json"), json).unwrap();

        let lines = load_lines(&dir.path().join("ne_110m_coastline.json")).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn test_bad_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ne_50m_borders.json"), "{ nope").unwrap();

        let mut renderer = MapRenderer::new();
        load_basemap(&mut renderer, dir.path());
        // Fallback still kicks in for the missing coastlines
        assert!(renderer.has_data());
    }
}
