//! Criterion benchmarks for the drivetrain graph.
//!
//! - `rwd_tick`: one full two-phase tick of a rear-wheel-drive drivetrain
//! - `inertia_query`: the recursive inertia lookup a wheel performs each tick

use criterion::{Criterion, criterion_group, criterion_main};
use gearwork_core::differential::DiffType;
use gearwork_core::graph::{Direction, Velocities};
use gearwork_core::math::{Vec2, rpm_to_rads};
use gearwork_core::system::PowertrainSystem;
use gearwork_core::test_utils::*;
use std::hint::black_box;

fn bench_rwd_tick(c: &mut Criterion) {
    let mut d = rwd_drivetrain(DiffType::Locked);
    d.graph.shift(d.gearbox, 2).unwrap();
    d.graph.engine_mut(d.engine).unwrap().angular_velocity = rpm_to_rads(2500.0);
    let system = PowertrainSystem::new(vec![d.engine]);
    let model = test_tire_model();
    let velocities = Velocities {
        velocity_cog: Vec2::new(12.0, 0.0),
        yaw_velocity: 0.05,
    };
    let dt = 1.0 / 1000.0;

    c.bench_function("rwd_tick", |b| {
        b.iter(|| {
            let torque = d.graph.engine(d.engine).unwrap().torque(black_box(0.6));
            d.graph.send_torque(d.engine, torque, velocities, dt);
            for w in [d.left, d.right] {
                let wheel = d.graph.wheel_mut(w).unwrap();
                black_box(wheel.force(&model, wheel_load(), 1.0));
            }
            system.update(&mut d.graph);
            d.graph.take_events();
        })
    });
}

fn bench_inertia_query(c: &mut Criterion) {
    let mut d = rwd_drivetrain(DiffType::Locked);
    d.graph.shift(d.gearbox, 1).unwrap();

    c.bench_function("inertia_query", |b| {
        b.iter(|| black_box(d.graph.inertia(black_box(d.left), None, Direction::TowardRoot)))
    });
}

criterion_group!(benches, bench_rwd_tick, bench_inertia_query);
criterion_main!(benches);
