//! # Motion library.
//!
//! Closed-loop motion execution for a two-wheel differential-drive robot.
//! High level manoeuvres ("move forward 6 inches", "turn 83 degrees left",
//! "drive until the light sensor crosses 2.0 V") are converted into wheel
//! power demands, and quadrature encoder counts, light sensor samples and a
//! monotonic clock decide when each manoeuvre is finished.
//!
//! Hardware is reached only through the capability traits in [`hal`], which
//! are injected into [`motion_ctrl::MotionCtrl`] at construction. The [`sim`]
//! module provides a deterministic simulated robot implementing them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Hardware capability traits - motors, encoders, light sensor and clock
pub mod hal;

/// Odometry - converts encoder counts into distance travelled
pub mod odometry;

/// Actuator driver - applies power demands to the drive wheels
pub mod actuator;

/// Sensor reader - samples the light sensor and compares it against thresholds
pub mod sensor;

/// Motion control - the move/turn/threshold manoeuvres, failsafes and light classification
pub mod motion_ctrl;

/// Simulated robot - deterministic implementation of the hardware traits
pub mod sim;

/// Course scripts - sequences of manoeuvres loaded from a file
pub mod course;
