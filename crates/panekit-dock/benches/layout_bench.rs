//! Benchmarks for the dock layout pass and drop resolution.
//!
//! Run with: cargo bench -p panekit-dock

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use panekit_core::{CompassDirection, Point, Rect, Size};
use panekit_dock::{DockablePaneModel, PaneGeometry};
use std::hint::black_box;

/// A pane with `n` frames spread round-robin over the four sides.
fn make_model(n: usize) -> DockablePaneModel {
    let mut model = DockablePaneModel::default();
    for i in 0..n {
        let direction = CompassDirection::ALL[i % 4];
        model
            .add_frame(format!("frame-{i}"), direction, Size::new(120, 90))
            .expect("bench frame");
    }
    model
}

fn bench_layout_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("dock/layout_pass");
    let geometry = PaneGeometry::new(Rect::from_size(1920, 1080));

    for n in [1, 4, 16, 64] {
        let model = make_model(n);
        group.bench_with_input(BenchmarkId::new("frames", n), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |mut model| {
                    black_box(model.layout_container(&geometry).expect("layout").bounds.len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_drop_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dock/drop_data");
    let geometry = PaneGeometry::new(Rect::from_size(1920, 1080));

    for n in [4, 16, 64] {
        let mut model = make_model(n);
        model.layout_container(&geometry).expect("layout");
        let payload = model.create_drag_payload("frame-0").expect("payload");
        group.bench_with_input(BenchmarkId::new("frames", n), &model, |b, model| {
            b.iter(|| black_box(model.drop_data(&payload, Point::new(960, 540))))
        });
    }

    group.finish();
}

fn bench_drop_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("dock/drop_commit");
    let geometry = PaneGeometry::new(Rect::from_size(1920, 1080));

    for n in [4, 16, 64] {
        let mut model = make_model(n);
        model.layout_container(&geometry).expect("layout");
        let payload = model.create_drag_payload("frame-0").expect("payload");
        group.bench_with_input(BenchmarkId::new("outer_north", n), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |mut model| black_box(model.drop(&payload, Point::new(960, 5)).expect("drop")),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_layout_pass,
    bench_drop_resolution,
    bench_drop_commit
);
criterion_main!(benches);
