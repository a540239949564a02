//! # Hardware abstraction
//!
//! The motion core never talks to hardware directly. Instead it is given one
//! object for each of these capabilities when it's constructed:
//!
//! - [`Motors`] - sets the power percentage of a drive wheel,
//! - [`Encoders`] - reads and resets the quadrature encoder tick counts,
//! - [`LightSensor`] - samples the analog light sensor,
//! - [`Clock`] - a monotonic clock which can also hold for a duration.
//!
//! Everything runs on a single thread, so none of these traits need to be
//! `Send` or `Sync`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod system_clock;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use system_clock::SystemClock;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// One of the two independently driven wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wheel {
    Left,
    Right
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Drive motor output.
pub trait Motors {
    /// Set the power of a wheel's motor as a percentage in `[-100, 100]`.
    ///
    /// Positive values drive the robot forward.
    fn set_percent(&mut self, wheel: Wheel, percent: f64);
}

/// Quadrature encoders on the drive wheels.
///
/// Counts are magnitudes: they increase whichever way the wheel turns, and
/// only go down when [`Encoders::reset_ticks`] is called.
pub trait Encoders {
    /// Number of ticks counted on the wheel since the last reset.
    fn tick_count(&self, wheel: Wheel) -> u32;

    /// Reset both wheels' counts to zero. Any read made after this returns
    /// counts measured from the reset.
    fn reset_ticks(&mut self);
}

/// Analog light sensor (CdS cell).
pub trait LightSensor {
    /// Sample the sensor voltage.
    ///
    /// Units: volts, observed in roughly 0.0 to 3.3.
    fn read_light_level(&mut self) -> f64;
}

/// Monotonic time source.
pub trait Clock {
    /// Seconds elapsed since an arbitrary fixed point.
    fn now_s(&mut self) -> f64;

    /// Hold the calling thread for the given number of seconds.
    fn pause_s(&mut self, duration_s: f64);
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Wheel {
    /// Both wheels, left first.
    pub const BOTH: [Wheel; 2] = [Wheel::Left, Wheel::Right];

    /// Index of the wheel in `[left, right]` arrays.
    pub fn index(self) -> usize {
        match self {
            Wheel::Left => 0,
            Wheel::Right => 1
        }
    }
}
