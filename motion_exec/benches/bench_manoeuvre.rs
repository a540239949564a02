//! # Manoeuvre Benchmark
//!
//! Cost of running complete manoeuvres against the simulated robot. The poll
//! period is kept short so that most of the time is spent in the poll loops
//! of the motion controller.

use criterion::{criterion_group, criterion_main, Criterion};

use motion_lib::{
    motion_ctrl::{Direction, MotionCtrl, Params, TurnDirection},
    sensor::Comparison,
    sim::{SimParams, SimWorld},
    course::Course,
};

fn build_params() -> Params {
    Params {
        poll_period_s: 0.001,
        settle_s: 0.0,
        ..Default::default()
    }
}

fn manoeuvre_benchmark(c: &mut Criterion) {
    c.bench_function("move_distance 12 in", |b| {
        b.iter(|| {
            let world = SimWorld::new(SimParams::default());
            let mut ctrl = MotionCtrl::new(
                build_params(),
                world.motors(),
                world.encoders(),
                world.light_sensor(),
                world.clock()
            ).unwrap();

            ctrl.move_distance(12.0, Direction::Forward, 50.0).unwrap()
        })
    });

    c.bench_function("turn_failsafe 90 deg", |b| {
        b.iter(|| {
            let world = SimWorld::new(SimParams::default());
            let mut ctrl = MotionCtrl::new(
                build_params(),
                world.motors(),
                world.encoders(),
                world.light_sensor(),
                world.clock()
            ).unwrap();

            ctrl.turn_failsafe(90.0, TurnDirection::Left, 50.0, 5.0).unwrap()
        })
    });

    c.bench_function("move_to_threshold 2 s", |b| {
        b.iter(|| {
            let world = SimWorld::new(SimParams {
                light_schedule: vec![(2.0, 0.5)],
                ..Default::default()
            });
            let mut ctrl = MotionCtrl::new(
                build_params(),
                world.motors(),
                world.encoders(),
                world.light_sensor(),
                world.clock()
            ).unwrap();

            ctrl.move_to_threshold(Direction::Forward, 50.0, Comparison::Below(2.2)).unwrap()
        })
    });
}

fn course_benchmark(c: &mut Criterion) {
    let course = Course::parse(
        r#"
        move: {"distance_in": 6.0, "direction": "forward"};
        turn: {"angle_deg": 83.0, "direction": "left"};
        move_failsafe: {"distance_in": 10.0, "direction": "reverse", "failsafe_s": 3.0};
        turn: {"angle_deg": 45.0, "direction": "right"};
        "#
    ).unwrap();

    c.bench_function("course 4 steps", |b| {
        b.iter(|| {
            let world = SimWorld::new(SimParams::default());
            let mut ctrl = MotionCtrl::new(
                build_params(),
                world.motors(),
                world.encoders(),
                world.light_sensor(),
                world.clock()
            ).unwrap();

            course.run(&mut ctrl, |_| ()).unwrap()
        })
    });
}

criterion_group!(benches, manoeuvre_benchmark, course_benchmark);
criterion_main!(benches);
