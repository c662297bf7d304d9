//! Benchmarks for the paths that run on startup and on every filter change.
//!
//! ```bash
//! cargo bench -- filter
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plant_map::map::{PlantMarkers, Viewport};
use plant_map::plants::loader::load_reader;
use plant_map::plants::{build_hover_text, filter, FilterState, PlantTable, Selection};
use std::path::Path;
use std::sync::Arc;

const COUNTRIES: [&str; 6] = [
    "Brazil",
    "China",
    "France",
    "India",
    "Kenya",
    "United States of America",
];
const FUELS: [&str; 8] = [
    "Coal", "Gas", "Hydro", "Nuclear", "Oil", "Solar", "Wind", "Biomass",
];

/// CSV shaped like the power plant database, with some gaps
fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from(concat!(
        "country_long,name,capacity_mw,latitude,longitude,primary_fuel,",
        "other_fuel1,other_fuel2,other_fuel3,commissioning_year,owner\n",
    ));
    for i in 0..rows {
        let lat = (i % 170) as f64 - 85.0;
        let lon = (i * 7 % 360) as f64 - 180.0;
        let capacity = if i % 13 == 0 {
            String::new()
        } else {
            format!("{}", (i % 4000) as f64 + 0.5)
        };
        let year = if i % 5 == 0 {
            "nan".to_string()
        } else {
            format!("{}.0", 1950 + i % 70)
        };
        csv.push_str(&format!(
            "{},Plant {i},{capacity},{lat},{lon},{},Oil,,,{year},Owner {}\n",
            COUNTRIES[i % COUNTRIES.len()],
            FUELS[i % FUELS.len()],
            i % 97,
        ));
    }
    csv
}

fn table(rows: usize) -> Arc<PlantTable> {
    let csv = synthetic_csv(rows);
    Arc::new(load_reader(csv.as_bytes(), Path::new("bench.csv")).expect("synthetic CSV loads"))
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    for rows in [1_000, 30_000] {
        let csv = synthetic_csv(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| load_reader(black_box(csv.as_bytes()), Path::new("bench.csv")))
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let table = table(30_000);
    let all = FilterState::default();
    let one_country = all.with_country(Selection::Only("India".to_string()));
    let narrow = one_country.with_fuel(Selection::Only("Coal".to_string()));

    let mut group = c.benchmark_group("filter");
    group.bench_function("all", |b| b.iter(|| filter(&table, black_box(&all))));
    group.bench_function("country", |b| {
        b.iter(|| filter(&table, black_box(&one_country)))
    });
    group.bench_function("country_and_fuel", |b| {
        b.iter(|| filter(&table, black_box(&narrow)))
    });
    group.finish();
}

fn bench_markers(c: &mut Criterion) {
    let table = table(30_000);
    let view = filter(&table, &FilterState::default());
    c.bench_function("markers_build", |b| b.iter(|| PlantMarkers::build(black_box(&view))));

    let markers = PlantMarkers::build(&view);
    let viewport = Viewport::world(240, 160);
    c.bench_function("markers_pick", |b| {
        b.iter(|| markers.pick(&viewport, black_box(120), black_box(80)))
    });
}

fn bench_hover(c: &mut Criterion) {
    let table = table(1_000);
    c.bench_function("hover_text", |b| {
        b.iter(|| {
            for plant in table.plants() {
                black_box(build_hover_text(plant));
            }
        })
    });
}

criterion_group!(benches, bench_load, bench_filter, bench_markers, bench_hover);
criterion_main!(benches);
