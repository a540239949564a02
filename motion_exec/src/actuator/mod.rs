//! # Actuator driver
//!
//! Applies signed power percentages to the two drive wheels and brings both
//! to rest. The driver remembers the last demand sent to each wheel so the
//! motion core can check that nothing is left running when a manoeuvre ends.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use thiserror::Error;

// Internal
use crate::hal::{Motors, Wheel};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest power percentage that can be demanded of a wheel.
pub const MAX_PERCENT: f64 = 100.0;

/// Smallest (most negative) power percentage that can be demanded of a wheel.
pub const MIN_PERCENT: f64 = -100.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Driver for the two drive motors.
pub struct DriveMotors<M: Motors> {
    motors: M,

    /// Last demand sent to each wheel, `[left, right]`.
    commanded: [f64; 2]
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by the actuator driver.
#[derive(Debug, Error, PartialEq)]
pub enum ActuatorError {
    #[error("Power demand for the {0:?} wheel is not a finite number ({1})")]
    NonFinite(Wheel, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<M: Motors> DriveMotors<M> {

    /// Create a new driver. Both wheels are commanded to rest immediately so
    /// that the driver's record of the demands matches the hardware.
    pub fn new(motors: M) -> Self {
        let mut driver = Self {
            motors,
            commanded: [0.0; 2]
        };

        driver.stop_all();

        driver
    }

    /// Set the power of one wheel.
    ///
    /// Demands outside `[-100, 100]` are limited to the nearest bound with a
    /// warning.
    pub fn set_power(&mut self, wheel: Wheel, percent: f64) -> Result<(), ActuatorError> {
        if !percent.is_finite() {
            return Err(ActuatorError::NonFinite(wheel, percent));
        }

        let limited = clamp(&percent, &MIN_PERCENT, &MAX_PERCENT);

        if limited != percent {
            warn!(
                "{:?} wheel demand of {:.1} % limited to {:.1} %",
                wheel, percent, limited
            );
        }

        trace!("{:?} wheel demand: {:.1} %", wheel, limited);

        self.motors.set_percent(wheel, limited);
        self.commanded[wheel.index()] = limited;

        Ok(())
    }

    /// Set the power of both wheels, left first.
    pub fn set_powers(&mut self, left_pct: f64, right_pct: f64) -> Result<(), ActuatorError> {
        // Check both before sending either so a bad demand never leaves one
        // wheel armed
        if !left_pct.is_finite() {
            return Err(ActuatorError::NonFinite(Wheel::Left, left_pct));
        }
        if !right_pct.is_finite() {
            return Err(ActuatorError::NonFinite(Wheel::Right, right_pct));
        }

        self.set_power(Wheel::Left, left_pct)?;
        self.set_power(Wheel::Right, right_pct)
    }

    /// Bring both wheels to rest.
    ///
    /// This is the only rest state. Calling it again has no further effect.
    pub fn stop_all(&mut self) {
        for wheel in Wheel::BOTH.iter() {
            self.motors.set_percent(*wheel, 0.0);
        }
        self.commanded = [0.0; 2];

        debug!("Drive motors stopped");
    }

    /// The last demand sent to the wheel.
    pub fn commanded(&self, wheel: Wheel) -> f64 {
        self.commanded[wheel.index()]
    }

    /// True if both wheels were last commanded to zero.
    pub fn is_at_rest(&self) -> bool {
        self.commanded == [0.0; 2]
    }
}
