//! Benchmarks for surface building and incremental repair.
//!
//! Run with: cargo bench --package cavern_core --bench surface_benchmark

#![allow(missing_docs)]

use cavern_core::{BlockTag, HandleRegistry, SurfaceTracker, VoxelGrid};
use cavern_shared::{Coord, GridDims, WorldOffset};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn solid_world() -> VoxelGrid {
    VoxelGrid::filled(GridDims::new(64, 32, 64), BlockTag::Stone)
}

fn benchmark_build_initial(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_build");
    group.throughput(Throughput::Elements(64 * 32 * 64));
    group.sample_size(20);
    group.bench_function("64x32x64_solid", |b| {
        b.iter(|| {
            let mut surface =
                SurfaceTracker::new(solid_world(), WorldOffset::IDENTITY, HandleRegistry::new());
            black_box(surface.build_initial())
        });
    });
    group.finish();
}

fn benchmark_break_place(c: &mut Criterion) {
    let mut surface =
        SurfaceTracker::new(solid_world(), WorldOffset::IDENTITY, HandleRegistry::new());
    surface.build_initial();

    c.bench_function("break_then_place_interior", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = (i + 1) % 60;
            let cell = Coord::new(2 + i, 16, 2 + (i * 7) % 60);
            black_box(surface.break_block(cell));
            black_box(surface.place(cell, BlockTag::Stone));
        });
    });
}

criterion_group!(benches, benchmark_build_initial, benchmark_break_place);
criterion_main!(benches);
