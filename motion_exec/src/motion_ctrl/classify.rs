//! Light classification
//!
//! Once a sensor-gated move has stopped over a coloured light, the light is
//! sampled for a short window and classified against the colour threshold.
//! Only the final sample of the window is used; the window exists to let the
//! reading settle after the robot stops, not to average it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use serde::Serialize;

use super::{Direction, MotionCtrl, MotionError, MotionOutcome};
use crate::{
    hal::{Clock, Encoders, LightSensor, Motors},
    sensor::Comparison,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Colour of the light under the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LightColour {
    /// Reading at or below the colour threshold. A red light gives the CdS
    /// cell a lower voltage than a blue one.
    Red,

    /// Reading above the colour threshold.
    Blue
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LightColour {
    /// Classify a voltage against the threshold.
    pub fn from_voltage(voltage: f64, threshold_v: f64) -> Self {
        if voltage > threshold_v {
            LightColour::Blue
        }
        else {
            LightColour::Red
        }
    }
}

impl<M, E, S, C> MotionCtrl<M, E, S, C>
where
    M: Motors,
    E: Encoders,
    S: LightSensor,
    C: Clock
{
    /// Sample the light for the classification window, classify the last
    /// sample, then hold for the classification hold time.
    ///
    /// The wheels are not driven.
    pub fn classify_light(&mut self) -> LightColour {
        let window_end_s = self.clock.now_s() + self.params.classify_window_s;

        let mut num_samples: u64 = 0;
        let last = loop {
            let sample = self.sensor.read();
            num_samples += 1;

            if self.clock.now_s() >= window_end_s {
                break sample;
            }
        };

        let colour = LightColour::from_voltage(last.voltage, self.params.colour_threshold_v);

        debug!("Light classified from the last of {} samples", num_samples);
        info!(
            "Light is {:?} ({:.3} V, threshold {:.3} V)",
            colour, last.voltage, self.params.colour_threshold_v
        );

        self.clock.pause_s(self.params.classify_hold_s);

        colour
    }

    /// Drive until the sensor satisfies the comparison, then classify the
    /// light the robot stopped over.
    ///
    /// If `failsafe_s` is given the move is failsafe guarded. The light is
    /// classified whichever way the move ended.
    pub fn move_to_threshold_then_classify(
        &mut self,
        direction: Direction,
        speed_pct: f64,
        comparison: Comparison,
        failsafe_s: Option<f64>
    ) -> Result<(MotionOutcome, LightColour), MotionError> {
        let outcome = match failsafe_s {
            Some(f) => self.move_to_threshold_failsafe(direction, speed_pct, comparison, f)?,
            None => self.move_to_threshold(direction, speed_pct, comparison)?
        };

        Ok((outcome, self.classify_light()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        motion_ctrl::Params,
        sim::{SimParams, SimWorld},
    };

    fn ctrl_with_light(
        schedule: Vec<(f64, f64)>
    ) -> (SimWorld, MotionCtrl<
        crate::sim::SimMotors,
        crate::sim::SimEncoders,
        crate::sim::SimLightSensor,
        crate::sim::SimClock
    >) {
        let world = SimWorld::new(SimParams {
            light_schedule: schedule,
            ..Default::default()
        });
        let ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        (world, ctrl)
    }

    #[test]
    fn test_from_voltage() {
        assert_eq!(LightColour::from_voltage(1.2, 0.9), LightColour::Blue);
        assert_eq!(LightColour::from_voltage(0.4, 0.9), LightColour::Red);
        assert_eq!(LightColour::from_voltage(0.9, 0.9), LightColour::Red);
    }

    #[test]
    fn test_sustained_high_is_blue() {
        let (world, mut ctrl) = ctrl_with_light(vec![(0.0, 1.4)]);

        assert_eq!(ctrl.classify_light(), LightColour::Blue);

        // Window plus hold
        assert!(world.time_s() >= 1.5);
    }

    #[test]
    fn test_sustained_low_is_red() {
        let (_world, mut ctrl) = ctrl_with_light(vec![(0.0, 0.3)]);

        assert_eq!(ctrl.classify_light(), LightColour::Red);
    }

    #[test]
    fn test_last_sample_wins() {
        // Blue for most of the window, red at the end
        let (_world, mut ctrl) = ctrl_with_light(vec![(0.0, 1.6), (0.9, 0.2)]);
        assert_eq!(ctrl.classify_light(), LightColour::Red);

        // Red for most of the window, blue at the end
        let (_world, mut ctrl) = ctrl_with_light(vec![(0.0, 0.2), (0.9, 1.6)]);
        assert_eq!(ctrl.classify_light(), LightColour::Blue);
    }

    #[test]
    fn test_move_then_classify() {
        // Dark until the robot reaches the light at 2 s
        let (world, mut ctrl) = ctrl_with_light(vec![(0.0, 3.0), (2.0, 0.4)]);

        let (outcome, colour) = ctrl.move_to_threshold_then_classify(
            Direction::Forward,
            50.0,
            Comparison::Below(2.0),
            Some(5.0)
        ).unwrap();

        assert_eq!(outcome, MotionOutcome::Completed);
        assert_eq!(colour, LightColour::Red);
        assert_eq!(world.motor_percents(), [0.0, 0.0]);
    }
}
