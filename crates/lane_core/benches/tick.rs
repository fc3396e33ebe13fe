//! Tick benchmarks for lane_core.
//!
//! Run with: `cargo bench -p lane_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lane_core::math::Fixed;
use lane_test_utils::scenarios::{melee_clash, mixed_skirmish};

pub fn tick_benchmark(c: &mut Criterion) {
    let dt = Fixed::from_num(0.05);

    c.bench_function("tick_melee_60", |b| {
        b.iter_batched(
            || melee_clash(30),
            |mut sim| {
                for _ in 0..10 {
                    black_box(sim.tick(dt));
                }
                sim
            },
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("tick_mixed_100", |b| {
        b.iter_batched(
            || mixed_skirmish(30),
            |mut sim| {
                for _ in 0..10 {
                    black_box(sim.tick(dt));
                }
                sim
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
