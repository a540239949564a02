//! Poll stage of the manoeuvres
//!
//! Polling is split into a step function, which samples the stop condition
//! and the failsafe once, and a loop which calls it until it stops returning
//! `Continue`. The loop runs on the calling thread and does nothing else
//! between steps apart from holding for `poll_period_s`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use super::{Failsafe, MotionCtrl, MotionOutcome};
use crate::{
    hal::{Clock, Encoders, LightSensor, Motors, Wheel},
    sensor::Comparison,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Condition which ends the poll stage of a manoeuvre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Both wheels have rolled at least `target_in` inches.
    BothWheels { target_in: f64 },

    /// The given wheel has rolled at least `target_in` inches.
    Wheel { wheel: Wheel, target_in: f64 },

    /// The light sensor satisfies the comparison.
    Sensor(Comparison)
}

/// Result of one poll step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Neither the stop condition nor the failsafe has been reached.
    Continue,

    /// The stop condition has been met.
    Satisfied,

    /// The failsafe has expired without the stop condition being met.
    Expired
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<M, E, S, C> MotionCtrl<M, E, S, C>
where
    M: Motors,
    E: Encoders,
    S: LightSensor,
    C: Clock
{
    /// Sample the stop condition, and then the failsafe if there is one.
    ///
    /// If both are reached on the same step the condition wins.
    pub(crate) fn poll_step(
        &mut self,
        condition: &StopCondition,
        failsafe: Option<&Failsafe>
    ) -> PollStatus {
        let met = match *condition {
            StopCondition::BothWheels { target_in } => {
                let [left_in, right_in] = self.odom.distances();
                left_in >= target_in && right_in >= target_in
            },
            StopCondition::Wheel { wheel, target_in } => {
                self.odom.distance_traveled(wheel) >= target_in
            },
            StopCondition::Sensor(comparison) => {
                comparison.is_satisfied_by(self.sensor.read())
            }
        };

        if met {
            return PollStatus::Satisfied;
        }

        match failsafe {
            Some(fs) if fs.has_expired(self.clock.now_s()) => PollStatus::Expired,
            _ => PollStatus::Continue
        }
    }

    /// Poll until the condition is met or the failsafe expires.
    pub(crate) fn poll_until(
        &mut self,
        condition: &StopCondition,
        failsafe: Option<&Failsafe>
    ) -> MotionOutcome {
        let mut num_polls: u64 = 0;

        let outcome = loop {
            num_polls += 1;

            match self.poll_step(condition, failsafe) {
                PollStatus::Continue => (),
                PollStatus::Satisfied => break MotionOutcome::Completed,
                PollStatus::Expired => break MotionOutcome::TimedOut
            }

            if self.params.poll_period_s > 0.0 {
                self.clock.pause_s(self.params.poll_period_s);
            }
        };

        trace!("Poll ended after {} steps: {:?}", num_polls, outcome);

        outcome
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        motion_ctrl::Params,
        sim::{SimParams, SimWorld},
    };

    #[test]
    fn test_step_condition_wins_over_failsafe() {
        let world = SimWorld::new(SimParams::default());
        let mut ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        // Deadline already passed
        let fs = Failsafe::start(0.0, 0.001);
        world.clock().pause_s(1.0);

        world.set_ticks(Wheel::Left, 1000);
        world.set_ticks(Wheel::Right, 1000);
        let cond = StopCondition::BothWheels { target_in: 5.0 };
        assert_eq!(ctrl.poll_step(&cond, Some(&fs)), PollStatus::Satisfied);

        world.set_ticks(Wheel::Right, 10);
        assert_eq!(ctrl.poll_step(&cond, Some(&fs)), PollStatus::Expired);
        assert_eq!(ctrl.poll_step(&cond, None), PollStatus::Continue);
    }

    #[test]
    fn test_step_single_wheel() {
        let world = SimWorld::new(SimParams::default());
        let mut ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        // One revolution is about 9.42 in
        world.set_ticks(Wheel::Left, 318);
        let cond = StopCondition::Wheel { wheel: Wheel::Left, target_in: 9.4 };
        assert_eq!(ctrl.poll_step(&cond, None), PollStatus::Satisfied);

        let cond = StopCondition::Wheel { wheel: Wheel::Right, target_in: 9.4 };
        assert_eq!(ctrl.poll_step(&cond, None), PollStatus::Continue);
    }

    #[test]
    fn test_step_sensor() {
        let world = SimWorld::new(SimParams::default());
        let mut ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        let cond = StopCondition::Sensor(Comparison::Below(1.0));

        world.set_light_level(Some(2.0));
        assert_eq!(ctrl.poll_step(&cond, None), PollStatus::Continue);

        world.set_light_level(Some(0.5));
        assert_eq!(ctrl.poll_step(&cond, None), PollStatus::Satisfied);
    }
}
