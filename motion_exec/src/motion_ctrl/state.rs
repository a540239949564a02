//! MotionCtrl state and manoeuvres

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use super::{
    failsafe::is_valid_duration,
    params::is_valid_speed,
    Direction, Failsafe, ManoeuvreKind, ManoeuvreReport, MotionError, MotionOutcome, Params,
    StopCondition, TurnDirection,
};
use crate::{
    actuator::DriveMotors,
    hal::{Clock, Encoders, LightSensor, Motors},
    odometry::Odometry,
    sensor::{Comparison, SensorReader},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motion control state.
///
/// Owns the robot's drive hardware for as long as it exists. Manoeuvres take
/// `&mut self` so only one can ever be in progress.
pub struct MotionCtrl<M, E, S, C>
where
    M: Motors,
    E: Encoders,
    S: LightSensor,
    C: Clock
{
    pub(crate) params: Params,

    pub(crate) motors: DriveMotors<M>,
    pub(crate) odom: Odometry<E>,
    pub(crate) sensor: SensorReader<S>,
    pub(crate) clock: C,

    pub(crate) last_report: Option<ManoeuvreReport>
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
    /// Create a new motion controller from its parameters and hardware.
    ///
    /// The wheels are commanded to rest as part of construction.
    pub fn new(
        params: Params,
        motors: M,
        encoders: E,
        sensor: S,
        clock: C
    ) -> Result<Self, MotionError> {
        params.are_valid().map_err(MotionError::InvalidParams)?;

        Ok(Self {
            motors: DriveMotors::new(motors),
            odom: Odometry::new(encoders, params.calibration),
            sensor: SensorReader::new(sensor),
            clock,
            params,
            last_report: None
        })
    }

    /// Drive in a straight line until both wheels have rolled `distance_in`.
    ///
    /// There is no failsafe: if either wheel cannot turn this never returns.
    ///
    /// Encoders count regardless of direction, so a reverse move stops once
    /// the wheels have rolled `distance_in` backwards.
    pub fn move_distance(
        &mut self,
        distance_in: f64,
        direction: Direction,
        speed_pct: f64
    ) -> Result<MotionOutcome, MotionError> {
        self.move_inner(distance_in, direction, speed_pct, None)
    }

    /// As [`MotionCtrl::move_distance`], but stops anyway once `failsafe_s`
    /// has elapsed since the baseline.
    pub fn move_failsafe(
        &mut self,
        distance_in: f64,
        direction: Direction,
        speed_pct: f64,
        failsafe_s: f64
    ) -> Result<MotionOutcome, MotionError> {
        check_failsafe(failsafe_s)?;
        self.move_inner(distance_in, direction, speed_pct, Some(failsafe_s))
    }

    /// Pivot through `angle_deg` in the given direction.
    ///
    /// Only the wheel driven forward is checked: the turn is complete once it
    /// has covered the arc `turn_radius * angle`. There is no failsafe.
    pub fn turn(
        &mut self,
        angle_deg: f64,
        direction: TurnDirection,
        speed_pct: f64
    ) -> Result<MotionOutcome, MotionError> {
        self.turn_inner(angle_deg, direction, speed_pct, None)
    }

    /// As [`MotionCtrl::turn`], but stops anyway once `failsafe_s` has
    /// elapsed since the baseline.
    pub fn turn_failsafe(
        &mut self,
        angle_deg: f64,
        direction: TurnDirection,
        speed_pct: f64,
        failsafe_s: f64
    ) -> Result<MotionOutcome, MotionError> {
        check_failsafe(failsafe_s)?;
        self.turn_inner(angle_deg, direction, speed_pct, Some(failsafe_s))
    }

    /// Drive in a straight line until the light sensor satisfies the
    /// comparison. The encoders play no part in stopping. There is no
    /// failsafe.
    pub fn move_to_threshold(
        &mut self,
        direction: Direction,
        speed_pct: f64,
        comparison: Comparison
    ) -> Result<MotionOutcome, MotionError> {
        self.threshold_inner(direction, speed_pct, comparison, None)
    }

    /// As [`MotionCtrl::move_to_threshold`], but stops anyway once
    /// `failsafe_s` has elapsed since the baseline.
    pub fn move_to_threshold_failsafe(
        &mut self,
        direction: Direction,
        speed_pct: f64,
        comparison: Comparison,
        failsafe_s: f64
    ) -> Result<MotionOutcome, MotionError> {
        check_failsafe(failsafe_s)?;
        self.threshold_inner(direction, speed_pct, comparison, Some(failsafe_s))
    }

    /// Hold with the wheels at rest until the light sensor satisfies the
    /// comparison, for example waiting for the start light.
    ///
    /// With `timeout_s` of `None` this waits indefinitely.
    pub fn wait_for_light(
        &mut self,
        comparison: Comparison,
        timeout_s: Option<f64>
    ) -> Result<MotionOutcome, MotionError> {
        check_comparison(comparison)?;
        if let Some(t) = timeout_s {
            check_failsafe(t)?;
        }

        info!("Waiting for light {:?}", comparison);

        self.motors.stop_all();

        let failsafe = timeout_s.map(|t| Failsafe::start(self.clock.now_s(), t));
        let outcome = self.poll_until(&StopCondition::Sensor(comparison), failsafe.as_ref());

        match outcome {
            MotionOutcome::Completed => info!("Light seen"),
            MotionOutcome::TimedOut => warn!("Light not seen before the timeout")
        }

        Ok(outcome)
    }

    /// Bring both wheels to rest immediately.
    pub fn stop_all(&mut self) {
        self.motors.stop_all();
    }

    /// Hold for a duration with the wheels at rest.
    pub fn pause(&mut self, duration_s: f64) -> Result<(), MotionError> {
        if !(duration_s.is_finite() && duration_s >= 0.0) {
            return Err(MotionError::InvalidPause(duration_s));
        }

        self.motors.stop_all();
        self.clock.pause_s(duration_s);

        Ok(())
    }

    /// Report on the last manoeuvre, if there has been one.
    pub fn last_report(&self) -> Option<ManoeuvreReport> {
        self.last_report
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn motors(&self) -> &DriveMotors<M> {
        &self.motors
    }

    pub fn odometry(&self) -> &Odometry<E> {
        &self.odom
    }

    // ---- PRIVATE ----

    fn move_inner(
        &mut self,
        distance_in: f64,
        direction: Direction,
        speed_pct: f64,
        failsafe_s: Option<f64>
    ) -> Result<MotionOutcome, MotionError> {
        check_distance(distance_in)?;
        check_speed(speed_pct)?;

        info!(
            "Move {:.2} in {:?} at {:.0} % (failsafe: {:?})",
            distance_in, direction, speed_pct, failsafe_s
        );

        let pct = direction.sign() * speed_pct;

        self.execute(
            ManoeuvreKind::Move,
            [pct, pct],
            StopCondition::BothWheels { target_in: distance_in },
            failsafe_s
        )
    }

    fn turn_inner(
        &mut self,
        angle_deg: f64,
        direction: TurnDirection,
        speed_pct: f64,
        failsafe_s: Option<f64>
    ) -> Result<MotionOutcome, MotionError> {
        if !(angle_deg.is_finite() && angle_deg >= 0.0) {
            return Err(MotionError::InvalidAngle(angle_deg));
        }
        check_speed(speed_pct)?;

        let target_in = self.odom.turn_target_in(angle_deg);
        let wheel = direction.gated_wheel();

        info!(
            "Turn {:.1} deg {:?} at {:.0} % ({:?} wheel to {:.2} in, failsafe: {:?})",
            angle_deg, direction, speed_pct, wheel, target_in, failsafe_s
        );

        self.execute(
            ManoeuvreKind::Turn,
            direction.wheel_demands(speed_pct),
            StopCondition::Wheel { wheel, target_in },
            failsafe_s
        )
    }

    fn threshold_inner(
        &mut self,
        direction: Direction,
        speed_pct: f64,
        comparison: Comparison,
        failsafe_s: Option<f64>
    ) -> Result<MotionOutcome, MotionError> {
        check_comparison(comparison)?;
        check_speed(speed_pct)?;

        info!(
            "Move {:?} at {:.0} % until light {:?} (failsafe: {:?})",
            direction, speed_pct, comparison, failsafe_s
        );

        let pct = direction.sign() * speed_pct;

        self.execute(
            ManoeuvreKind::MoveToThreshold,
            [pct, pct],
            StopCondition::Sensor(comparison),
            failsafe_s
        )
    }

    /// Run the arm, baseline, poll and stop stages of a manoeuvre.
    ///
    /// Arguments must already have been checked.
    fn execute(
        &mut self,
        kind: ManoeuvreKind,
        demands: [f64; 2],
        condition: StopCondition,
        failsafe_s: Option<f64>
    ) -> Result<MotionOutcome, MotionError> {
        let start_s = self.clock.now_s();

        // ---- ARM ----

        if let Err(e) = self.motors.set_powers(demands[0], demands[1]) {
            self.motors.stop_all();
            return Err(MotionError::ActuatorError(e));
        }
        debug!("Armed: {:?}", demands);

        // ---- BASELINE ----

        self.odom.reset_baseline();
        let failsafe = failsafe_s.map(|d| Failsafe::start(self.clock.now_s(), d));
        match failsafe {
            Some(ref fs) => debug!("Baseline taken, failsafe expires at {:.3} s", fs.expires_s()),
            None => debug!("Baseline taken, no failsafe")
        }

        // ---- POLL ----

        let outcome = self.poll_until(&condition, failsafe.as_ref());

        // ---- STOP ----

        self.motors.stop_all();
        let stop_s = self.clock.now_s();
        let [left_in, right_in] = self.odom.distances();

        match outcome {
            MotionOutcome::Completed => info!(
                "{:?} complete after {:.3} s (left {:.2} in, right {:.2} in)",
                kind, stop_s - start_s, left_in, right_in
            ),
            MotionOutcome::TimedOut => warn!(
                "{:?} failsafe expired after {:.3} s (left {:.2} in, right {:.2} in)",
                kind, stop_s - start_s, left_in, right_in
            )
        }

        self.last_report = Some(ManoeuvreReport {
            kind,
            outcome,
            start_s,
            stop_s,
            left_in,
            right_in
        });

        self.clock.pause_s(self.params.settle_s);

        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_distance(distance_in: f64) -> Result<(), MotionError> {
    if distance_in.is_finite() && distance_in >= 0.0 {
        Ok(())
    }
    else {
        Err(MotionError::InvalidDistance(distance_in))
    }
}

fn check_speed(speed_pct: f64) -> Result<(), MotionError> {
    if is_valid_speed(speed_pct) {
        Ok(())
    }
    else {
        Err(MotionError::InvalidSpeed(speed_pct))
    }
}

fn check_failsafe(failsafe_s: f64) -> Result<(), MotionError> {
    if is_valid_duration(failsafe_s) {
        Ok(())
    }
    else {
        Err(MotionError::InvalidFailsafe(failsafe_s))
    }
}

fn check_comparison(comparison: Comparison) -> Result<(), MotionError> {
    if comparison.threshold().is_finite() {
        Ok(())
    }
    else {
        Err(MotionError::InvalidThreshold(comparison.threshold()))
    }
}
