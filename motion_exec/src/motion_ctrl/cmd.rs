//! Manoeuvre directions and results

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::hal::Wheel;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction of a straight line manoeuvre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse
}

/// Direction of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right
}

/// How a manoeuvre finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionOutcome {
    /// The stop condition was met.
    Completed,

    /// The failsafe expired before the stop condition was met. The robot may
    /// not have travelled as far as asked.
    TimedOut
}

/// The kinds of manoeuvre, used when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ManoeuvreKind {
    Move,
    Turn,
    MoveToThreshold
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Record of one executed manoeuvre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManoeuvreReport {
    pub kind: ManoeuvreKind,
    pub outcome: MotionOutcome,

    /// Time the manoeuvre was called.
    ///
    /// Units: seconds, on the motion clock
    pub start_s: f64,

    /// Time both wheels were commanded to rest.
    ///
    /// Units: seconds, on the motion clock
    pub stop_s: f64,

    /// Distance the left wheel had rolled when it was stopped.
    ///
    /// Units: inches
    pub left_in: f64,

    /// Distance the right wheel had rolled when it was stopped.
    ///
    /// Units: inches
    pub right_in: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Direction {
    /// Sign applied to the wheel demands, `+1` forward and `-1` reverse.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0
        }
    }
}

impl TurnDirection {

    /// Wheel demands `[left, right]` for a pivot at the given speed.
    ///
    /// Turning left drives the left wheel in reverse and the right wheel
    /// forward, turning right does the opposite.
    pub fn wheel_demands(self, speed_pct: f64) -> [f64; 2] {
        match self {
            TurnDirection::Left => [-speed_pct, speed_pct],
            TurnDirection::Right => [speed_pct, -speed_pct]
        }
    }

    /// The wheel whose distance decides when the turn is complete, which is
    /// the one driven forward.
    pub fn gated_wheel(self) -> Wheel {
        match self {
            TurnDirection::Left => Wheel::Right,
            TurnDirection::Right => Wheel::Left
        }
    }
}

impl MotionOutcome {
    pub fn is_completed(self) -> bool {
        self == MotionOutcome::Completed
    }
}
