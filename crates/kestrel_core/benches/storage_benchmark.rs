//! # Storage Benchmark
//!
//! Measures the hot paths of the storage core:
//! 1. Attaching components to fresh entities
//! 2. Reading columns through one or two mappers
//! 3. Tick-boundary cleanup of deleted entities
//!
//! Run with: `cargo bench --package kestrel_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_core::{Bag, Component, Entity, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
}
impl Component for Velocity {}

fn populated_world(count: usize) -> (World, Vec<Entity>) {
    let mut world = World::new();
    let mut entities = Vec::with_capacity(count);
    for i in 0..count {
        let entity = world.create_entity();
        world.add_entity(entity);
        #[allow(clippy::cast_precision_loss)]
        let f = i as f32;
        world
            .add_component(entity, Position { x: f, y: f })
            .unwrap();
        world
            .add_component(entity, Velocity { x: 0.1, y: 0.2 })
            .unwrap();
        entities.push(entity);
    }
    world.maintain();
    (world, entities)
}

fn bench_bag_add(c: &mut Criterion) {
    c.bench_function("bag_add_100k", |b| {
        b.iter(|| {
            let mut bag = Bag::new();
            for i in 0..ENTITY_COUNT {
                bag.add(i);
            }
            black_box(bag.size())
        });
    });
}

fn bench_add_component(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_component");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let (world, _) = populated_world(count);
                black_box(world.entity_manager().active_entity_count())
            });
        });
    }

    group.finish();
}

fn bench_mapper_iteration(c: &mut Criterion) {
    let (world, entities) = populated_world(ENTITY_COUNT);

    c.bench_function("mapper_linear_100k", |b| {
        let positions = world.mapper::<Position>().unwrap();
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &entity in &entities {
                let position = positions.get(entity);
                sum += position.x + position.y;
            }
            black_box(sum)
        });
    });

    c.bench_function("two_mappers_integrate_100k", |b| {
        let positions = world.mapper::<Position>().unwrap();
        let velocities = world.mapper::<Velocity>().unwrap();
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &entity in &entities {
                let position = positions.get(entity);
                let velocity = velocities.get(entity);
                sum += position.x + velocity.x + position.y + velocity.y;
            }
            black_box(sum)
        });
    });

    let mut shuffled = entities.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(0xC0FFEE));

    c.bench_function("mapper_random_100k", |b| {
        let velocities = world.mapper::<Velocity>().unwrap();
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &entity in &shuffled {
                let velocity = velocities.get(entity);
                sum += velocity.x + velocity.y;
            }
            black_box(sum)
        });
    });
}

fn bench_cleanup(c: &mut Criterion) {
    c.bench_function("delete_and_cleanup_10pct_of_100k", |b| {
        b.iter_batched(
            || populated_world(ENTITY_COUNT),
            |(mut world, entities)| {
                for &entity in entities.iter().step_by(10) {
                    world.delete_entity(entity);
                }
                black_box(world.maintain())
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_bag_add,
    bench_add_component,
    bench_mapper_iteration,
    bench_cleanup,
);

criterion_main!(benches);
