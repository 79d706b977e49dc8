//! # Registry Benchmark
//!
//! Measures the hot operations of the sparse-set registry:
//! - entity create/destroy cycles with index recycling
//! - emplace into fresh pools
//! - single-type view and multi-type group iteration
//!
//! Run with: `cargo bench --package ember_ecs`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ember_ecs::{Component, Registry, RegistryConfig};

const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy, Debug, Default)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Position {}

#[derive(Clone, Copy, Debug, Default)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Velocity {}

/// Registry where every entity has a Position and every fourth a Velocity.
fn populated(count: usize) -> Registry {
    let config = RegistryConfig::default()
        .with_entity_capacity(count)
        .with_pool_capacity(count);
    let mut registry = Registry::with_config(config);
    for i in 0..count {
        let entity = registry.create();
        let f = i as f32;
        registry.emplace(entity, Position { x: f, y: f, z: f });
        if i % 4 == 0 {
            registry.emplace(entity, Velocity { x: 0.1, y: 0.2, z: 0.3 });
        }
    }
    registry
}

/// Benchmark: create N entities into an empty registry.
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entities");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut registry = Registry::new();
                for _ in 0..count {
                    black_box(registry.create());
                }
                registry.len()
            });
        });
    }

    group.finish();
}

/// Benchmark: destroy and recreate through the free list.
fn bench_create_destroy_cycle(c: &mut Criterion) {
    let mut registry = populated(ENTITY_COUNT);
    let mut handles: Vec<_> = registry.iter().take(10_000).collect();

    c.bench_function("destroy_create_cycle_10K", |b| {
        b.iter(|| {
            for handle in &mut handles {
                registry.destroy(*handle);
                *handle = registry.create();
            }
            black_box(registry.len())
        });
    });
}

/// Benchmark: emplace two components per entity.
fn bench_emplace(c: &mut Criterion) {
    c.bench_function("emplace_100K", |b| {
        b.iter(|| black_box(populated(ENTITY_COUNT).len()));
    });
}

/// Benchmark: integrate velocities with a mutable view.
fn bench_view(c: &mut Criterion) {
    let mut registry = populated(ENTITY_COUNT);

    c.bench_function("view_mut_100K_positions", |b| {
        b.iter(|| {
            for (_, position) in registry.view_mut::<Position>() {
                position.x += 0.016;
            }
        });
    });

    c.bench_function("view_100K_positions", |b| {
        b.iter(|| {
            let sum: f32 = registry.view::<Position>().map(|(_, p)| p.x + p.y + p.z).sum();
            black_box(sum)
        });
    });
}

/// Benchmark: group driven by the smaller Velocity pool.
fn bench_group(c: &mut Criterion) {
    let registry = populated(ENTITY_COUNT);

    c.bench_function("group_position_velocity_25K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for (_, (position, velocity)) in registry.group::<(Position, Velocity)>().with_components() {
                sum += position.x * velocity.x + position.y * velocity.y + position.z * velocity.z;
            }
            black_box(sum)
        });
    });
}

/// Benchmark: deep copy of a populated registry.
fn bench_clone(c: &mut Criterion) {
    let registry = populated(ENTITY_COUNT);

    c.bench_function("clone_100K", |b| {
        b.iter(|| black_box(registry.clone().len()));
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_create_destroy_cycle,
    bench_emplace,
    bench_view,
    bench_group,
    bench_clone,
);
criterion_main!(benches);
