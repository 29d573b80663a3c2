//! Registry microbenchmarks using Criterion.
//!
//! These benchmarks measure individual registry operations in isolation:
//! - Entity create/destroy
//! - Component emplace/find/remove
//! - View iteration over one and two stores, including skewed store sizes

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ecs::ecs::{Entity, Registry};
use rusty_ecs_bench::components::*;

fn populated(n: usize) -> (Registry, Vec<Entity>) {
    let mut registry = Registry::new();
    let entities = registry.create_many(n);
    for (i, &entity) in entities.iter().enumerate() {
        registry
            .insert(entity, Position { x: i as f32, y: 0.0, z: 0.0 })
            .unwrap();
        registry
            .insert(entity, Velocity { x: 1.0, y: 1.0, z: 1.0 })
            .unwrap();
    }
    (registry, entities)
}

// =============================================================================
// Entity Benchmarks
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("single", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                for _ in 0..n {
                    black_box(registry.create());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("batch", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                black_box(registry.create_many(n));
            });
        });

        // Destroy everything, then create again from the recycled pool
        group.bench_with_input(BenchmarkId::new("recycled", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                for entity in registry.create_many(n) {
                    registry.destroy(entity);
                }
                for _ in 0..n {
                    black_box(registry.create());
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Component Benchmarks
// =============================================================================

fn bench_emplace(c: &mut Criterion) {
    let mut group = c.benchmark_group("emplace");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("lazy_store", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                for entity in registry.create_many(n) {
                    black_box(registry.emplace::<Transform>(entity).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("registered_store", count), &count, |b, &n| {
            b.iter(|| {
                let mut registry = Registry::new();
                registry.register::<Transform>(n).unwrap();
                for entity in registry.create_many(n) {
                    black_box(registry.emplace::<Transform>(entity).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        let (registry, entities) = populated(count);
        group.bench_with_input(BenchmarkId::new("hit", count), &entities, |b, entities| {
            b.iter(|| {
                for &entity in entities {
                    black_box(registry.find::<Position>(entity));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", count), &entities, |b, entities| {
            b.iter(|| {
                for &entity in entities {
                    black_box(registry.find::<Health>(entity));
                }
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Remove in random order so swap-remove moves elements around
        group.bench_with_input(BenchmarkId::new("random_order", count), &count, |b, &n| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter_batched(
                || {
                    let (registry, mut entities) = populated(n);
                    for i in (1..entities.len()).rev() {
                        entities.swap(i, rng.gen_range(0..=i));
                    }
                    (registry, entities)
                },
                |(mut registry, entities)| {
                    for entity in entities {
                        black_box(registry.remove::<Position>(entity));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("destroy", count), &count, |b, &n| {
            b.iter_batched(
                || populated(n),
                |(mut registry, entities)| {
                    for entity in entities {
                        registry.destroy(entity);
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// View Benchmarks
// =============================================================================

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("view");

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("single_read", count), &count, |b, &n| {
            let (mut registry, _) = populated(n);
            b.iter(|| {
                let mut sum = 0.0;
                for (_, position) in registry.view::<&Position>() {
                    sum += position.x;
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("two_write", count), &count, |b, &n| {
            let (mut registry, _) = populated(n);
            b.iter(|| {
                for (_, (position, velocity)) in registry.view::<(&mut Position, &Velocity)>() {
                    position.x += velocity.x;
                    position.y += velocity.y;
                    position.z += velocity.z;
                }
            });
        });

        // Only 1% of entities carry Health; the Health store drives iteration
        group.bench_with_input(BenchmarkId::new("skewed", count), &count, |b, &n| {
            let (mut registry, entities) = populated(n);
            for entity in entities.iter().step_by(100) {
                registry.emplace::<Health>(*entity).unwrap();
            }
            b.iter(|| {
                for (_, (health, position)) in registry.view::<(&mut Health, &Position)>() {
                    health.current += position.x;
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_emplace,
    bench_find,
    bench_remove,
    bench_view
);
criterion_main!(benches);
