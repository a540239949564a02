//! # Motion control module
//!
//! Executes the robot's closed-loop manoeuvres. Every manoeuvre runs the same
//! four stages:
//!
//! 1. **Arm** - demand power on both wheels for the requested direction and
//!    speed,
//! 2. **Baseline** - reset the encoder counts (and start the failsafe, if the
//!    manoeuvre has one),
//! 3. **Poll** - repeatedly check the stop condition until it's met or the
//!    failsafe expires,
//! 4. **Stop** - bring both wheels to rest and hold for the settle time.
//!
//! The stop conditions are:
//!
//! | Manoeuvre           | Stop condition                                         |
//! |---------------------|--------------------------------------------------------|
//! | `move_distance`     | Both wheels have rolled at least the distance          |
//! | `turn`              | The forward driven wheel has covered the turn's arc    |
//! | `move_to_threshold` | The light sensor satisfies the comparison              |
//!
//! The plain variants have no failsafe and will poll forever if their
//! condition is never met, for example when a wheel is jammed. The
//! `_failsafe` variants also stop once their duration has elapsed. Which of
//! the two happened is returned as a [`MotionOutcome`].
//!
//! Whatever the outcome, both wheels are at rest when a manoeuvre returns.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod classify;
mod cmd;
mod failsafe;
mod params;
mod poll;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use classify::*;
pub use cmd::*;
pub use failsafe::*;
pub use params::*;
pub use poll::*;
pub use state::*;

use crate::actuator::ActuatorError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during MotionCtrl operation.
///
/// All argument errors are raised before the wheels are armed.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Distance must be finite and not negative, found {0}")]
    InvalidDistance(f64),

    #[error("Turn angle must be finite and not negative, found {0}")]
    InvalidAngle(f64),

    #[error("Speed must be greater than 0 and at most 100 %, found {0}")]
    InvalidSpeed(f64),

    #[error("Failsafe duration must be finite and positive, found {0}")]
    InvalidFailsafe(f64),

    #[error("Pause duration must be finite and not negative, found {0}")]
    InvalidPause(f64),

    #[error("Sensor threshold must be finite, found {0}")]
    InvalidThreshold(f64),

    #[error("Motion parameters are invalid: {0}")]
    InvalidParams(ParamsError),

    #[error("Actuator error: {0}")]
    ActuatorError(ActuatorError)
}
