//! Benchmarks for broad-phase strategies.
//!
//! Run with: cargo bench -p clash-detect

#![allow(
    missing_docs,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::unwrap_used
)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use clash_detect::{
    BroadPhaseFilter, BroadPhaseStrategy, ClashDetector, DetectConfig, RecordingReporter,
    RunContext,
};
use clash_geometry::PolyhedronKernel;
use clash_types::{Aabb, Body, BodyId, Point3, Solid, Vector3};

/// Unit boxes on a cubic grid with the given spacing.
///
/// Spacing below 1.0 makes neighbours overlap.
fn grid_boxes(per_side: usize, spacing: f64) -> Vec<Aabb> {
    let mut boxes = Vec::with_capacity(per_side.pow(3));
    for x in 0..per_side {
        for y in 0..per_side {
            for z in 0..per_side {
                let center = Point3::new(x as f64, y as f64, z as f64) * spacing;
                boxes.push(Aabb::from_center(center, Vector3::repeat(0.5)));
            }
        }
    }
    boxes
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("broad_phase");

    for per_side in [4, 8, 12] {
        let boxes = grid_boxes(per_side, 0.9);
        group.throughput(Throughput::Elements(boxes.len() as u64));

        for strategy in BroadPhaseStrategy::all() {
            let config = DetectConfig::default().with_strategy(strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), boxes.len()),
                &boxes,
                |b, boxes| {
                    let mut filter = BroadPhaseFilter::new(&config);
                    b.iter(|| black_box(filter.find_candidates(black_box(boxes))));
                },
            );
        }
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let bodies: Vec<Body> = grid_boxes(6, 0.9)
        .iter()
        .enumerate()
        .map(|(i, aabb)| {
            let center = aabb.center();
            Body::new(
                BodyId::new(i as u64 + 1),
                format!("cube{i}"),
                Solid::unit_cube(),
            )
            .with_translation(center.x, center.y, center.z)
        })
        .collect();

    let mut group = c.benchmark_group("detect");
    for strategy in BroadPhaseStrategy::all() {
        let detector = ClashDetector::new(
            PolyhedronKernel::default(),
            DetectConfig::default().with_strategy(strategy),
        )
        .unwrap();
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                let mut reporter = RecordingReporter::new();
                let mut ctx = RunContext::new(&mut reporter);
                black_box(detector.detect(Some(&bodies), &mut ctx))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_full_run);
criterion_main!(benches);
