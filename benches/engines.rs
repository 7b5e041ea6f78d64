//! Engine benchmarks
//!
//! Measures the per-frame cost of the hot paths:
//! - Pairwise collision resolution
//! - Ray tracing through a refracting block
//! - Monte Carlo decay sampling
//! - Stepping each simulation variant for one frame

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

extern crate physicsim;
use physicsim::config::SimulationConfig;
use physicsim::physics::collision::CollisionResolver;
use physicsim::physics::components::Particle;
use physicsim::physics::decay::DecayState;
use physicsim::physics::math::Vector;
use physicsim::physics::optics::{BoxGeometry, RayTracer};
use physicsim::resources::SharedRng;
use physicsim::simulations::{Simulation, SimulationKind};

fn bench_collision_resolution(c: &mut Criterion) {
    let resolver = CollisionResolver::new(0.8);
    let a = Particle::new(1.0, Vector::ZERO, Vector::new(3.0, 1.0, 0.0)).with_radius(1.0);
    let b = Particle::new(2.0, Vector::new(1.5, 0.5, 0.0), Vector::new(-1.0, 0.5, 0.2))
        .with_radius(1.0);

    c.bench_function("collision_resolve", |bencher| {
        bencher.iter(|| {
            let (mut a, mut b) = (a, b);
            black_box(resolver.resolve(black_box(&mut a), black_box(&mut b)))
        })
    });
}

fn bench_ray_tracing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray_trace");
    let scene = [BoxGeometry::new(Vector::ZERO, 75.0, 15.0, 40.0, 1.5)];
    let origin = Vector::new(-60.0, 30.0, 0.0);
    let direction = Vector::new(1.0, -1.0, 0.0);

    for max_depth in [2, 10, 50] {
        let tracer = RayTracer {
            max_depth,
            ..RayTracer::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(max_depth),
            &tracer,
            |bencher, tracer| {
                bencher.iter(|| {
                    black_box(tracer.trace(
                        black_box(&scene),
                        black_box(origin),
                        black_box(direction),
                        1.0,
                    ))
                })
            },
        );
    }
    group.finish();
}

fn bench_decay_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("decay_step");
    for nuclei in [1_000u64, 100_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(nuclei),
            &nuclei,
            |bencher, &nuclei| {
                let mut rng = SharedRng::from_seed(42);
                bencher.iter(|| {
                    let mut decay = DecayState::new(nuclei, 0.5);
                    black_box(decay.step(black_box(1.0), &mut *rng))
                })
            },
        );
    }
    group.finish();
}

fn bench_simulation_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_frame");
    let config = SimulationConfig::default();

    for kind in SimulationKind::ALL {
        let mut simulation = kind.create();
        if simulation.init(&config).is_err() {
            continue;
        }
        let dt = simulation.time_scale() / 30.0;
        group.bench_function(kind.name(), |bencher| {
            bencher.iter(|| {
                simulation.step(black_box(dt));
                black_box(simulation.state())
            })
        });
    }
    group.finish();
}

criterion_group!(
    engines,
    bench_collision_resolution,
    bench_ray_tracing,
    bench_decay_sampling,
    bench_simulation_frames
);
criterion_main!(engines);
