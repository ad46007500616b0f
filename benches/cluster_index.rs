//! Criterion benchmarks for cluster index builds and viewport queries.
//!
//! Run with: `cargo bench --bench cluster_index --features synthetic`
//!
//! Builds run over synthetic fire seasons of increasing size; queries pan a
//! fixed viewport across zoom levels the way a map does on every move.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use firemap::synthetic::FireScenario;
use firemap::{ClusterConfig, ClusterIndex, LatLng, MeasurementEngine, MeasurementMode};
use std::hint::black_box;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_build");
    group.sample_size(20);

    for count in [1_000usize, 10_000, 50_000] {
        let detections = FireScenario::with_detection_count(count).generate();
        group.bench_with_input(
            BenchmarkId::new("build", count),
            &detections,
            |b, points| {
                b.iter(|| ClusterIndex::build(black_box(points), ClusterConfig::default()));
            },
        );
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let detections = FireScenario::continental().generate();
    let index = ClusterIndex::build(&detections, ClusterConfig::default());
    let viewport = [-125.0, 30.0, -110.0, 42.0];

    let mut group = c.benchmark_group("cluster_query");
    for zoom in [3, 6, 9, 12, 14] {
        group.bench_with_input(BenchmarkId::new("query", zoom), &zoom, |b, &z| {
            b.iter(|| index.query(black_box(viewport), z));
        });
    }
    group.finish();
}

fn bench_expansion_zoom(c: &mut Criterion) {
    let detections = FireScenario::continental().generate();
    let index = ClusterIndex::build(&detections, ClusterConfig::default());
    let ids: Vec<_> = index
        .query([-180.0, -90.0, 180.0, 90.0], 5)
        .iter()
        .filter_map(|item| item.cluster_id())
        .collect();

    c.bench_function("expansion_zoom_all_z5", |b| {
        b.iter(|| {
            ids.iter()
                .filter_map(|&id| index.expansion_zoom(black_box(id)))
                .count()
        });
    });
}

fn bench_area_measurement(c: &mut Criterion) {
    c.bench_function("area_measurement_200_points", |b| {
        b.iter(|| {
            let mut engine = MeasurementEngine::new();
            engine.start(MeasurementMode::Area);
            for i in 0..200 {
                let angle = i as f64 / 200.0 * std::f64::consts::TAU;
                engine.add_point(LatLng::new(37.0 + angle.sin(), -120.0 + angle.cos()));
            }
            engine.area_square_meters()
        });
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_query,
    bench_expansion_zoom,
    bench_area_measurement
);
criterion_main!(benches);
