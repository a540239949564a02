//! # Odometry
//!
//! Converts the drive wheels' encoder tick counts into distance travelled
//! since the last baseline reset, and converts turn angles into the arc
//! length one wheel must cover.
//!
//! # Direction
//!
//! The encoders count ticks in magnitude only. A wheel driven in reverse
//! for one revolution reports the same count, and so the same distance, as
//! one driven forward. Every distance returned by this module is therefore
//! "how far the wheel has rolled", never a signed displacement. Gating a
//! reverse manoeuvre on [`Odometry::distance_traveled`] stops it once the
//! wheel has rolled that far backwards, which is what callers of the
//! manoeuvres expect, but a wheel that changes direction mid-manoeuvre will
//! add both legs together.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calibration;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
pub use calibration::*;
use crate::hal::{Encoders, Wheel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Odometry unit wrapping the drive encoders.
pub struct Odometry<E: Encoders> {
    encoders: E,
    calib: Calibration
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<E: Encoders> Odometry<E> {

    /// Create a new odometry unit from the encoders and their calibration.
    pub fn new(encoders: E, calib: Calibration) -> Self {
        Self {
            encoders,
            calib
        }
    }

    /// Distance the wheel has rolled since the last baseline reset.
    ///
    /// Units: inches. See the module documentation for why this is unsigned.
    pub fn distance_traveled(&self, wheel: Wheel) -> f64 {
        let counts = self.encoders.tick_count(wheel);
        let dist_in = self.calib.counts_to_distance_in(counts);

        trace!("{:?} wheel: {} counts, {:.3} in", wheel, counts, dist_in);

        dist_in
    }

    /// Distance rolled by both wheels as `[left, right]`.
    pub fn distances(&self) -> [f64; 2] {
        [
            self.distance_traveled(Wheel::Left),
            self.distance_traveled(Wheel::Right)
        ]
    }

    /// Zero both wheels' counts.
    ///
    /// Both encoders are reset by the same call, so the next sample of
    /// either wheel is measured from the same instant.
    pub fn reset_baseline(&mut self) {
        self.encoders.reset_ticks();
    }

    /// The arc length a wheel covers while pivoting through `angle_deg`.
    pub fn turn_target_in(&self, angle_deg: f64) -> f64 {
        self.calib.turn_target_in(angle_deg)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimParams, SimWorld};

    #[test]
    fn test_distance_from_counts() {
        let world = SimWorld::new(SimParams::default());
        let mut odom = Odometry::new(world.encoders(), Calibration::default());

        world.set_ticks(Wheel::Left, 318);
        world.set_ticks(Wheel::Right, 159);

        assert!((odom.distance_traveled(Wheel::Left) - 9.4248).abs() < 1e-3);
        assert!((odom.distance_traveled(Wheel::Right) - 4.7124).abs() < 1e-3);

        odom.reset_baseline();

        assert_eq!(odom.distances(), [0.0, 0.0]);
    }
}
