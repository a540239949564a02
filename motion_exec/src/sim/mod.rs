//! # Simulated robot
//!
//! A deterministic stand-in for the robot's motors, encoders, light sensor and
//! clock, used by the tests, the benchmark and by `motion_exec` when no
//! hardware is attached.
//!
//! All four handles share one [`SimWorld`]. Simulated time only moves when the
//! clock is read (each read costs `read_cost_s`) or paused, so a polling loop
//! that reads the clock on every pass always makes progress. Whenever time
//! moves the wheels' tick counts are advanced from the current motor demands.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use log::trace;
use serde::Serialize;

pub use params::*;
use crate::hal::{Clock, Encoders, LightSensor, Motors, Wheel};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Shared simulated world. Cloning gives another handle onto the same world.
#[derive(Clone)]
pub struct SimWorld {
    state: Rc<RefCell<SimState>>
}

/// Motor handle onto a [`SimWorld`].
#[derive(Clone)]
pub struct SimMotors(SimWorld);

/// Encoder handle onto a [`SimWorld`].
#[derive(Clone)]
pub struct SimEncoders(SimWorld);

/// Light sensor handle onto a [`SimWorld`].
#[derive(Clone)]
pub struct SimLightSensor(SimWorld);

/// Clock handle onto a [`SimWorld`].
#[derive(Clone)]
pub struct SimClock(SimWorld);

/// A motor demand received by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorEvent {
    pub time_s: f64,
    pub wheel: Wheel,
    pub percent: f64
}

struct SimState {
    params: SimParams,
    time_s: f64,
    percent: [f64; 2],

    /// Fractional ticks so that slow wheels still accumulate whole ticks
    ticks: [f64; 2],

    light_override: Option<f64>,

    /// Time at which both motors last came to rest, `None` while moving
    rest_since_s: Option<f64>,

    history: Vec<MotorEvent>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimWorld {

    /// Create a new world at time zero with both wheels at rest.
    pub fn new(params: SimParams) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                params,
                time_s: 0.0,
                percent: [0.0; 2],
                ticks: [0.0; 2],
                light_override: None,
                rest_since_s: Some(0.0),
                history: Vec::new()
            }))
        }
    }

    pub fn motors(&self) -> SimMotors {
        SimMotors(self.clone())
    }

    pub fn encoders(&self) -> SimEncoders {
        SimEncoders(self.clone())
    }

    pub fn light_sensor(&self) -> SimLightSensor {
        SimLightSensor(self.clone())
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    /// Move simulated time forward, rolling the wheels as demanded.
    pub fn advance(&self, dt_s: f64) {
        if !(dt_s > 0.0) {
            return;
        }

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        for wheel in Wheel::BOTH.iter() {
            let i = wheel.index();

            if state.params.stalled[i] {
                continue;
            }

            // Magnitude only, as the real encoders count
            state.ticks[i] += state.params.full_speed_ticks_per_s
                * state.percent[i].abs() / 100.0
                * dt_s;
        }

        state.time_s += dt_s;
    }

    /// Current simulated time.
    ///
    /// Units: seconds
    pub fn time_s(&self) -> f64 {
        self.state.borrow().time_s
    }

    /// Current demand on a wheel's motor.
    pub fn motor_percent(&self, wheel: Wheel) -> f64 {
        self.state.borrow().percent[wheel.index()]
    }

    /// Current demands as `[left, right]`.
    pub fn motor_percents(&self) -> [f64; 2] {
        self.state.borrow().percent
    }

    /// Time at which both motors last came to rest, or `None` if a motor is
    /// currently driven.
    pub fn rest_since_s(&self) -> Option<f64> {
        self.state.borrow().rest_since_s
    }

    /// Every motor demand received so far.
    pub fn motor_history(&self) -> Vec<MotorEvent> {
        self.state.borrow().history.clone()
    }

    /// Overwrite a wheel's tick count.
    pub fn set_ticks(&self, wheel: Wheel, ticks: u32) {
        self.state.borrow_mut().ticks[wheel.index()] = ticks as f64;
    }

    /// Jam or free a wheel.
    pub fn set_stalled(&self, wheel: Wheel, stalled: bool) {
        self.state.borrow_mut().params.stalled[wheel.index()] = stalled;
    }

    /// Force the light sensor to read a fixed level, or return to the
    /// schedule with `None`.
    pub fn set_light_level(&self, level_v: Option<f64>) {
        self.state.borrow_mut().light_override = level_v;
    }
}

impl Motors for SimMotors {
    fn set_percent(&mut self, wheel: Wheel, percent: f64) {
        let mut state = self.0.state.borrow_mut();

        let time_s = state.time_s;
        state.percent[wheel.index()] = percent;
        state.history.push(MotorEvent { time_s, wheel, percent });

        if state.percent == [0.0; 2] {
            if state.rest_since_s.is_none() {
                state.rest_since_s = Some(time_s);
            }
        }
        else {
            state.rest_since_s = None;
        }
    }
}

impl Encoders for SimEncoders {
    fn tick_count(&self, wheel: Wheel) -> u32 {
        self.0.state.borrow().ticks[wheel.index()].floor() as u32
    }

    fn reset_ticks(&mut self) {
        self.0.state.borrow_mut().ticks = [0.0; 2];
    }
}

impl LightSensor for SimLightSensor {
    fn read_light_level(&mut self) -> f64 {
        let state = self.0.state.borrow();

        match state.light_override {
            Some(v) => v,
            None => state.params.light_at(state.time_s)
        }
    }
}

impl Clock for SimClock {
    fn now_s(&mut self) -> f64 {
        let read_cost_s = self.0.state.borrow().params.read_cost_s;
        self.0.advance(read_cost_s);

        self.0.time_s()
    }

    fn pause_s(&mut self, duration_s: f64) {
        trace!("Sim pause for {:.3} s", duration_s);
        self.0.advance(duration_s);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheels_roll_with_demand() {
        let world = SimWorld::new(SimParams {
            full_speed_ticks_per_s: 100.0,
            ..Default::default()
        });
        let mut motors = world.motors();
        let mut enc = world.encoders();
        let mut clock = world.clock();

        motors.set_percent(Wheel::Left, 50.0);
        motors.set_percent(Wheel::Right, -100.0);
        clock.pause_s(2.0);

        assert_eq!(enc.tick_count(Wheel::Left), 100);
        // Reverse still counts up
        assert_eq!(enc.tick_count(Wheel::Right), 200);

        enc.reset_ticks();
        assert_eq!(enc.tick_count(Wheel::Left), 0);
        assert_eq!(enc.tick_count(Wheel::Right), 0);
    }

    #[test]
    fn test_stalled_wheel() {
        let world = SimWorld::new(SimParams::default());
        world.set_stalled(Wheel::Right, true);

        let mut motors = world.motors();
        motors.set_percent(Wheel::Left, 50.0);
        motors.set_percent(Wheel::Right, 50.0);
        world.clock().pause_s(1.0);

        let enc = world.encoders();
        assert!(enc.tick_count(Wheel::Left) > 0);
        assert_eq!(enc.tick_count(Wheel::Right), 0);
    }

    #[test]
    fn test_clock_reads_advance_time() {
        let world = SimWorld::new(SimParams {
            read_cost_s: 0.01,
            ..Default::default()
        });
        let mut clock = world.clock();

        let t0 = clock.now_s();
        let t1 = clock.now_s();

        assert!(t1 > t0);
        assert!((t1 - t0 - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_rest_tracking() {
        let world = SimWorld::new(SimParams::default());
        let mut motors = world.motors();

        assert_eq!(world.rest_since_s(), Some(0.0));

        motors.set_percent(Wheel::Left, 20.0);
        assert_eq!(world.rest_since_s(), None);

        world.clock().pause_s(1.5);
        motors.set_percent(Wheel::Left, 0.0);
        assert_eq!(world.rest_since_s(), Some(1.5));

        // A further zero demand doesn't move the rest time
        world.clock().pause_s(1.0);
        motors.set_percent(Wheel::Right, 0.0);
        assert_eq!(world.rest_since_s(), Some(1.5));

        assert_eq!(world.motor_history().len(), 3);
    }

    #[test]
    fn test_light_override() {
        let world = SimWorld::new(SimParams {
            light_schedule: vec![(0.0, 2.5)],
            ..Default::default()
        });
        let mut sensor = world.light_sensor();

        assert_eq!(sensor.read_light_level(), 2.5);

        world.set_light_level(Some(0.3));
        assert_eq!(sensor.read_light_level(), 0.3);

        world.set_light_level(None);
        assert_eq!(sensor.read_light_level(), 2.5);
    }
}
