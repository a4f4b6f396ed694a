//! # Pool Throughput Benchmark
//!
//! REQUIREMENTS:
//! - Warm acquire/release must not touch the template
//! - 10,000 spawn/despawn pairs well under a frame
//!
//! Run with: `cargo bench --package revenant_core`

#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use revenant_core::{
    FnTemplate, Placement, PoolDescriptor, PoolLogger, PoolRegistry, PooledInstance, Vec3,
};

/// Instances in the warm pool.
const POOL_SIZE: u32 = 10_000;

struct Particle {
    placement: Placement,
    active: bool,
}

impl PooledInstance for Particle {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}

fn particle() -> Particle {
    Particle {
        placement: Placement::IDENTITY,
        active: false,
    }
}

type Template = FnTemplate<fn() -> Particle>;

fn registry(descriptor: PoolDescriptor<Template>) -> PoolRegistry<Template> {
    PoolRegistry::with_pools(PoolLogger::silent(), [descriptor]).expect("valid pool")
}

/// Benchmark: acquire then immediately release one instance.
fn bench_acquire_release_pair(c: &mut Criterion) {
    let mut registry = registry(PoolDescriptor::fixed(
        "particle",
        FnTemplate(particle as fn() -> Particle),
        POOL_SIZE,
    ));
    let placement = Placement::at(Vec3::new(1.0, 2.0, 3.0));

    c.bench_function("acquire_release_pair", |b| {
        b.iter(|| {
            let handle = registry
                .acquire(black_box("particle"), placement)
                .expect("warm pool");
            registry.release(black_box(&handle)).expect("known pool");
        });
    });
}

/// Benchmark: drain a warm pool, then return everything.
fn bench_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst");

    for count in [100_u32, 1_000, POOL_SIZE] {
        let mut registry = registry(PoolDescriptor::fixed(
            "particle",
            FnTemplate(particle as fn() -> Particle),
            count,
        ));
        let mut held = Vec::with_capacity(count as usize);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                while let Some(handle) = registry.acquire("particle", Placement::IDENTITY) {
                    held.push(handle);
                }
                for handle in held.drain(..) {
                    registry.release(&handle).expect("known pool");
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: cold growth from an empty growable pool.
fn bench_growth(c: &mut Criterion) {
    c.bench_function("grow_1000", |b| {
        b.iter(|| {
            let mut registry = registry(PoolDescriptor::growable(
                "particle",
                FnTemplate(particle as fn() -> Particle),
                0,
            ));
            for _ in 0..1_000 {
                black_box(registry.acquire_at_origin("particle"));
            }
            registry
        });
    });
}

criterion_group!(benches, bench_acquire_release_pair, bench_burst, bench_growth);
criterion_main!(benches);
