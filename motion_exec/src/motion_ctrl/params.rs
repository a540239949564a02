//! Parameters structure for MotionCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use thiserror::Error;

use crate::odometry::Calibration;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for motion control.
///
/// Any field missing from the parameter file takes its default value, which
/// are the values used on the competition robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Wheel and encoder calibration.
    pub calibration: Calibration,

    // ---- SPEEDS ----

    /// Speed used for straight line manoeuvres when a script gives none.
    ///
    /// Units: percent
    pub move_speed_pct: f64,

    /// Speed used for turns when a script gives none.
    ///
    /// Units: percent
    pub turn_speed_pct: f64,

    // ---- TIMING ----

    /// Failsafe used by scripted failsafe manoeuvres that don't give one.
    ///
    /// Units: seconds
    pub default_failsafe_s: f64,

    /// Time held between polls of a stop condition. Zero polls continuously.
    ///
    /// Units: seconds
    pub poll_period_s: f64,

    /// Time held after stopping the wheels so that the robot comes to rest
    /// before the next manoeuvre.
    ///
    /// Units: seconds
    pub settle_s: f64,

    // ---- LIGHT CLASSIFICATION ----

    /// Length of the window over which the light is sampled before it's
    /// classified.
    ///
    /// Units: seconds
    pub classify_window_s: f64,

    /// Time held after classifying the light.
    ///
    /// Units: seconds
    pub classify_hold_s: f64,

    /// Readings above this are classified as blue, others as red.
    ///
    /// Units: volts
    pub colour_threshold_v: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("The odometry calibration is invalid: {0:?}")]
    InvalidCalibration(Calibration),

    #[error("{0} must be greater than 0 and at most 100 %, found {1}")]
    InvalidSpeed(&'static str, f64),

    #[error("{0} must be finite and not negative, found {1}")]
    InvalidDuration(&'static str, f64),

    #[error("The colour threshold must be finite, found {0}")]
    InvalidThreshold(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            move_speed_pct: 50.0,
            turn_speed_pct: 50.0,
            default_failsafe_s: 5.0,
            poll_period_s: 0.005,
            settle_s: 0.5,
            classify_window_s: 1.0,
            classify_hold_s: 0.5,
            colour_threshold_v: 0.9
        }
    }
}

impl Params {

    /// Determines if the parameters are valid.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if !self.calibration.is_valid() {
            return Err(ParamsError::InvalidCalibration(self.calibration));
        }

        for (name, speed) in [
            ("move_speed_pct", self.move_speed_pct),
            ("turn_speed_pct", self.turn_speed_pct)
        ].iter() {
            if !is_valid_speed(*speed) {
                return Err(ParamsError::InvalidSpeed(*name, *speed));
            }
        }

        for (name, duration) in [
            ("poll_period_s", self.poll_period_s),
            ("settle_s", self.settle_s),
            ("classify_hold_s", self.classify_hold_s)
        ].iter() {
            if !(duration.is_finite() && *duration >= 0.0) {
                return Err(ParamsError::InvalidDuration(*name, *duration));
            }
        }

        // These two must also be non-zero
        for (name, duration) in [
            ("default_failsafe_s", self.default_failsafe_s),
            ("classify_window_s", self.classify_window_s)
        ].iter() {
            if !(duration.is_finite() && *duration > 0.0) {
                return Err(ParamsError::InvalidDuration(*name, *duration));
            }
        }

        if !self.colour_threshold_v.is_finite() {
            return Err(ParamsError::InvalidThreshold(self.colour_threshold_v));
        }

        Ok(())
    }
}

/// Speeds must be in `(0, 100]`. The sign of the wheel demand comes from the
/// manoeuvre's direction, not from the speed.
pub(crate) fn is_valid_speed(speed_pct: f64) -> bool {
    speed_pct.is_finite() && speed_pct > 0.0 && speed_pct <= 100.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_valid() {
        assert!(Params::default().are_valid().is_ok());
    }

    #[test]
    fn test_invalid() {
        let p = Params { turn_speed_pct: 0.0, ..Default::default() };
        assert!(matches!(p.are_valid(), Err(ParamsError::InvalidSpeed("turn_speed_pct", _))));

        let p = Params { settle_s: -0.1, ..Default::default() };
        assert!(matches!(p.are_valid(), Err(ParamsError::InvalidDuration("settle_s", _))));

        let p = Params { classify_window_s: 0.0, ..Default::default() };
        assert!(matches!(p.are_valid(), Err(ParamsError::InvalidDuration("classify_window_s", _))));

        let p = Params {
            calibration: Calibration { counts_per_rev: 0, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(p.are_valid(), Err(ParamsError::InvalidCalibration(_))));
    }

    #[test]
    fn test_from_toml() {
        let p: Params = util::params::from_str(
            "move_speed_pct = 35.0\n\n[calibration]\nturn_radius_in = 4.25\n"
        ).unwrap();

        assert_eq!(p.move_speed_pct, 35.0);
        assert_eq!(p.turn_speed_pct, 50.0);
        assert_eq!(p.calibration.turn_radius_in, 4.25);
        assert_eq!(p.calibration.counts_per_rev, 318);
    }
}
