//! Odometry calibration constants

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Radius of the drive wheels in use.
pub const DEFAULT_WHEEL_RADIUS_IN: f64 = 1.5;

/// Encoder counts per wheel revolution for the drive motors in use.
pub const DEFAULT_COUNTS_PER_REV: u32 = 318;

/// Distance from the pivot point to the gated wheel during a turn.
pub const DEFAULT_TURN_RADIUS_IN: f64 = 3.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibration of the drive wheels and encoders.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Radius of the drive wheels.
    ///
    /// Units: inches
    pub wheel_radius_in: f64,

    /// Number of encoder ticks in one full revolution of a wheel.
    pub counts_per_rev: u32,

    /// Radius of the arc traced by the gated wheel while turning.
    ///
    /// Units: inches
    pub turn_radius_in: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Calibration {
    fn default() -> Self {
        Self {
            wheel_radius_in: DEFAULT_WHEEL_RADIUS_IN,
            counts_per_rev: DEFAULT_COUNTS_PER_REV,
            turn_radius_in: DEFAULT_TURN_RADIUS_IN
        }
    }
}

impl Calibration {

    /// Convert a tick count into distance rolled.
    ///
    /// `distance = 2 * pi * wheel_radius * counts / counts_per_rev`
    pub fn counts_to_distance_in(&self, counts: u32) -> f64 {
        2.0 * PI * self.wheel_radius_in * counts as f64 / self.counts_per_rev as f64
    }

    /// Arc length covered by the gated wheel while turning through the angle.
    ///
    /// `target = turn_radius * angle_rad`
    pub fn turn_target_in(&self, angle_deg: f64) -> f64 {
        self.turn_radius_in * angle_deg.to_radians()
    }

    /// Circumference of a wheel.
    pub fn wheel_circumference_in(&self) -> f64 {
        2.0 * PI * self.wheel_radius_in
    }

    /// Determine if the calibration is usable.
    pub fn is_valid(&self) -> bool {
        self.wheel_radius_in.is_finite()
            && self.wheel_radius_in > 0.0
            && self.counts_per_rev > 0
            && self.turn_radius_in.is_finite()
            && self.turn_radius_in > 0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_counts() {
        assert_eq!(Calibration::default().counts_to_distance_in(0), 0.0);
    }

    #[test]
    fn test_one_revolution() {
        let calib = Calibration::default();

        let dist = calib.counts_to_distance_in(318);

        assert!((dist - 9.4248).abs() < 1e-4);
        assert!((dist - calib.wheel_circumference_in()).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_in_counts() {
        let calib = Calibration::default();

        let mut last = calib.counts_to_distance_in(0);
        for c in (1..5000).step_by(7) {
            let d = calib.counts_to_distance_in(c);
            assert!(d >= last);
            last = d;
        }

        assert!(calib.counts_to_distance_in(u32::MAX) >= last);
    }

    #[test]
    fn test_turn_target() {
        let calib = Calibration {
            turn_radius_in: 4.0,
            ..Default::default()
        };

        assert!((calib.turn_target_in(90.0) - 2.0 * PI).abs() < 1e-12);
        assert_eq!(calib.turn_target_in(0.0), 0.0);
    }

    #[test]
    fn test_validity() {
        assert!(Calibration::default().is_valid());
        assert!(!Calibration { counts_per_rev: 0, ..Default::default() }.is_valid());
        assert!(!Calibration { wheel_radius_in: -1.0, ..Default::default() }.is_valid());
        assert!(!Calibration { turn_radius_in: f64::NAN, ..Default::default() }.is_valid());
    }
}
