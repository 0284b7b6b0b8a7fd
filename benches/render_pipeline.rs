use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mandel_tiles::controllers::progressive::events::RenderEvent;
use mandel_tiles::controllers::progressive::ports::RenderSink;
use mandel_tiles::controllers::progressive::render_progressive;
use mandel_tiles::core::actions::cancellation::{NeverCancel, RunToken};
use mandel_tiles::core::actions::escape_time::escape_time;
use mandel_tiles::core::actions::evaluate_tile::{evaluate_tile, evaluate_tile_rayon};
use mandel_tiles::core::actions::split_zone::split_zone;
use mandel_tiles::core::data::complex::Complex;
use mandel_tiles::core::data::tile_job::TileJob;
use mandel_tiles::core::data::transform::Transform;
use mandel_tiles::core::data::zone::Zone;
use mandel_tiles::{RenderRequest, WorkerPool};

struct NullSink;

impl RenderSink for NullSink {
    fn present(&self, event: RenderEvent) {
        black_box(event);
    }
}

fn classic_zone() -> Zone {
    Zone::new(-2.0, 1.0, -1.5, 1.5).unwrap()
}

fn bench_escape_time(c: &mut Criterion) {
    // Near the set boundary, so the loop runs a realistic mix of
    // escape depths.
    let point = Complex {
        real: -0.75,
        imag: 0.1,
    };

    c.bench_function("escape_time_boundary_point", |b| {
        b.iter(|| escape_time(black_box(point), black_box(500), black_box(2.0)))
    });
}

fn bench_evaluate_tile(c: &mut Criterion) {
    let job = TileJob {
        zone: classic_zone(),
        step_count_x: 64,
        step_count_y: 64,
        nb_iteration: 100,
        threshold: 2.0,
    };

    c.bench_function("evaluate_tile_serial_64x64", |b| {
        b.iter(|| evaluate_tile(black_box(&job)))
    });

    c.bench_function("evaluate_tile_rayon_64x64", |b| {
        b.iter(|| evaluate_tile_rayon(black_box(&job), &NeverCancel).unwrap())
    });
}

fn bench_split_zone(c: &mut Criterion) {
    let zone = classic_zone();

    c.bench_function("split_zone_depth_4", |b| {
        b.iter(|| split_zone(black_box(zone), black_box(4)))
    });
}

fn bench_progressive_run(c: &mut Criterion) {
    let request = RenderRequest {
        zone: classic_zone(),
        zoom: 64.0,
        depth: 2,
        target_cell_size: 4.0,
        nb_iteration: 100,
        threshold: 2.0,
        is_debugging: false,
    };
    let transform = Transform::anchored_to(request.zone, request.zoom);
    let pool = WorkerPool::with_escape_time(4).unwrap();
    let sink = NullSink;

    c.bench_function("progressive_run_depth_2", |b| {
        b.iter(|| {
            let token = RunToken::new();
            render_progressive(
                black_box(&request),
                transform,
                &token,
                &pool,
                &sink,
                1,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_escape_time,
    bench_evaluate_tile,
    bench_split_zone,
    bench_progressive_run
);
criterion_main!(benches);
