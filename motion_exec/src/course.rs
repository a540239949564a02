//! # Course scripts
//!
//! A course script is the ordered list of manoeuvres making up one run of the
//! course. Scripts are plain text, one step per line:
//!
//! ```text
//! # Wait for the start light then drive up to the kiosk
//! wait_for_light: {"until": {"below": 1.0}};
//! move: {"distance_in": 6.0, "direction": "forward"};
//! turn: {"angle_deg": 83.0, "direction": "left", "speed_pct": 40.0};
//! move_to_threshold_failsafe: {"direction": "forward", "until": {"below": 2.2}, "failsafe_s": 4.0};
//! classify;
//! ```
//!
//! Each line is `op: {json arguments};`, or just `op;` for steps without
//! arguments. Blank lines and lines starting with `#` are ignored. Optional
//! speeds and failsafes default to the values in the motion parameters.
//!
//! Steps are executed strictly in order, each one finishing (wheels at rest)
//! before the next begins.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::{
    hal::{Clock, Encoders, LightSensor, Motors},
    motion_ctrl::{
        Direction, LightColour, ManoeuvreReport, MotionCtrl, MotionError, MotionOutcome,
        TurnDirection,
    },
    sensor::Comparison,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A loaded course script.
#[derive(Debug, Clone)]
pub struct Course {
    script_path: Option<PathBuf>,
    steps: Vec<ScriptedStep>
}

/// A step along with the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedStep {
    pub line: usize,
    pub step: CourseStep
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveArgs {
    pub distance_in: f64,
    pub direction: Direction,
    #[serde(default)]
    pub speed_pct: Option<f64>,
    #[serde(default)]
    pub failsafe_s: Option<f64>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnArgs {
    pub angle_deg: f64,
    pub direction: TurnDirection,
    #[serde(default)]
    pub speed_pct: Option<f64>,
    #[serde(default)]
    pub failsafe_s: Option<f64>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdArgs {
    pub direction: Direction,
    pub until: Comparison,
    #[serde(default)]
    pub speed_pct: Option<f64>,
    #[serde(default)]
    pub failsafe_s: Option<f64>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitArgs {
    pub until: Comparison,
    #[serde(default)]
    pub timeout_s: Option<f64>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PauseArgs {
    pub duration_s: f64
}

/// Record of one executed step, flat so that it can be archived as CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub line: usize,
    pub op: &'static str,
    pub outcome: Option<MotionOutcome>,
    pub colour: Option<LightColour>,
    pub start_s: Option<f64>,
    pub stop_s: Option<f64>,
    pub left_in: Option<f64>,
    pub right_in: Option<f64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// One step of a course.
///
/// The failsafe variants use the default failsafe from the motion parameters
/// when their `failsafe_s` is not given. The plain variants ignore
/// `failsafe_s` entirely and are never guarded.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseStep {
    Move(MoveArgs),
    MoveFailsafe(MoveArgs),
    Turn(TurnArgs),
    TurnFailsafe(TurnArgs),
    MoveToThreshold(ThresholdArgs),
    MoveToThresholdFailsafe(ThresholdArgs),
    Classify,
    WaitForLight(WaitArgs),
    Pause(PauseArgs)
}

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("Could not load the course script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The course script is empty")]
    ScriptEmpty,

    #[error("Line {0} is not a valid step, expected `op: {{args}};` (found \"{1}\")")]
    InvalidLine(usize, String),

    #[error("Line {0} has an unknown operation \"{1}\"")]
    UnknownOp(usize, String),

    #[error("Line {0} has invalid arguments: {1}")]
    InvalidArgs(usize, serde_json::Error),

    #[error("Step {0} (line {1}) failed: {2}")]
    StepFailed(usize, usize, MotionError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Course {

    /// Load a course script from a file.
    pub fn load<P: AsRef<Path>>(script_path: P) -> Result<Self, CourseError> {
        let script = fs::read_to_string(&script_path)
            .map_err(CourseError::ScriptLoadError)?;

        let mut course = Self::parse(&script)?;
        course.script_path = Some(script_path.as_ref().to_path_buf());

        Ok(course)
    }

    /// Parse a course script.
    pub fn parse(script: &str) -> Result<Self, CourseError> {
        // Only fails if the pattern itself is malformed
        let re = Regex::new(r"^([a-z_]+)\s*(?::\s*(.*?))?\s*;$")
            .expect("Course step pattern is invalid");

        let mut steps = Vec::new();

        for (i, raw_line) in script.lines().enumerate() {
            let line = i + 1;
            let text = raw_line.trim();

            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let cap = match re.captures(text) {
                Some(c) => c,
                None => return Err(CourseError::InvalidLine(line, text.to_string()))
            };

            let op = &cap[1];
            let payload = cap.get(2).map(|m| m.as_str()).unwrap_or("");

            steps.push(ScriptedStep {
                line,
                step: CourseStep::parse(line, op, payload)?
            });
        }

        if steps.is_empty() {
            return Err(CourseError::ScriptEmpty);
        }

        Ok(Self {
            script_path: None,
            steps
        })
    }

    /// Path the course was loaded from, `None` if it was parsed from a
    /// string.
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    pub fn steps(&self) -> &[ScriptedStep] {
        &self.steps
    }

    /// Get the number of steps in the course
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Execute the course from start to finish.
    ///
    /// `on_step` is called with the record of each step as soon as it
    /// finishes. Execution stops at the first step that fails.
    pub fn run<M, E, S, C, F>(
        &self,
        ctrl: &mut MotionCtrl<M, E, S, C>,
        mut on_step: F
    ) -> Result<Vec<StepRecord>, CourseError>
    where
        M: Motors,
        E: Encoders,
        S: LightSensor,
        C: Clock,
        F: FnMut(&StepRecord)
    {
        let mut records = Vec::with_capacity(self.steps.len());

        for (index, s) in self.steps.iter().enumerate() {
            info!("Step {}/{} (line {}): {}", index + 1, self.steps.len(), s.line, s.step.op());

            let record = s.step.execute(ctrl)
                .map(|(outcome, colour, report)| StepRecord::new(
                    index, s.line, s.step.op(), outcome, colour, report
                ))
                .map_err(|e| CourseError::StepFailed(index, s.line, e))?;

            on_step(&record);
            records.push(record);
        }

        info!("Course complete");

        Ok(records)
    }
}

impl CourseStep {

    fn parse(line: usize, op: &str, payload: &str) -> Result<Self, CourseError> {
        let payload = if payload.is_empty() { "{}" } else { payload };

        Ok(match op {
            "move" => CourseStep::Move(args(line, payload)?),
            "move_failsafe" => CourseStep::MoveFailsafe(args(line, payload)?),
            "turn" => CourseStep::Turn(args(line, payload)?),
            "turn_failsafe" => CourseStep::TurnFailsafe(args(line, payload)?),
            "move_to_threshold" => CourseStep::MoveToThreshold(args(line, payload)?),
            "move_to_threshold_failsafe" => CourseStep::MoveToThresholdFailsafe(args(line, payload)?),
            "wait_for_light" => CourseStep::WaitForLight(args(line, payload)?),
            "pause" => CourseStep::Pause(args(line, payload)?),
            "classify" => {
                // Check there's nothing but an empty object
                let _: serde_json::Map<String, serde_json::Value> = args(line, payload)?;
                CourseStep::Classify
            },
            _ => return Err(CourseError::UnknownOp(line, op.to_string()))
        })
    }

    /// Name of the step's operation as written in scripts.
    pub fn op(&self) -> &'static str {
        match self {
            CourseStep::Move(_) => "move",
            CourseStep::MoveFailsafe(_) => "move_failsafe",
            CourseStep::Turn(_) => "turn",
            CourseStep::TurnFailsafe(_) => "turn_failsafe",
            CourseStep::MoveToThreshold(_) => "move_to_threshold",
            CourseStep::MoveToThresholdFailsafe(_) => "move_to_threshold_failsafe",
            CourseStep::Classify => "classify",
            CourseStep::WaitForLight(_) => "wait_for_light",
            CourseStep::Pause(_) => "pause"
        }
    }

    /// Run the step, returning its outcome, light colour and manoeuvre
    /// report where they apply.
    fn execute<M, E, S, C>(
        &self,
        ctrl: &mut MotionCtrl<M, E, S, C>
    ) -> Result<(Option<MotionOutcome>, Option<LightColour>, Option<ManoeuvreReport>), MotionError>
    where
        M: Motors,
        E: Encoders,
        S: LightSensor,
        C: Clock
    {
        let move_speed = ctrl.params().move_speed_pct;
        let turn_speed = ctrl.params().turn_speed_pct;
        let failsafe = ctrl.params().default_failsafe_s;

        let outcome = match self {
            CourseStep::Move(a) => ctrl.move_distance(
                a.distance_in, a.direction, a.speed_pct.unwrap_or(move_speed)
            )?,
            CourseStep::MoveFailsafe(a) => ctrl.move_failsafe(
                a.distance_in,
                a.direction,
                a.speed_pct.unwrap_or(move_speed),
                a.failsafe_s.unwrap_or(failsafe)
            )?,
            CourseStep::Turn(a) => ctrl.turn(
                a.angle_deg, a.direction, a.speed_pct.unwrap_or(turn_speed)
            )?,
            CourseStep::TurnFailsafe(a) => ctrl.turn_failsafe(
                a.angle_deg,
                a.direction,
                a.speed_pct.unwrap_or(turn_speed),
                a.failsafe_s.unwrap_or(failsafe)
            )?,
            CourseStep::MoveToThreshold(a) => ctrl.move_to_threshold(
                a.direction, a.speed_pct.unwrap_or(move_speed), a.until
            )?,
            CourseStep::MoveToThresholdFailsafe(a) => ctrl.move_to_threshold_failsafe(
                a.direction,
                a.speed_pct.unwrap_or(move_speed),
                a.until,
                a.failsafe_s.unwrap_or(failsafe)
            )?,
            CourseStep::Classify => {
                return Ok((None, Some(ctrl.classify_light()), None));
            },
            CourseStep::WaitForLight(a) => {
                return Ok((Some(ctrl.wait_for_light(a.until, a.timeout_s)?), None, None));
            },
            CourseStep::Pause(a) => {
                ctrl.pause(a.duration_s)?;
                return Ok((None, None, None));
            }
        };

        Ok((Some(outcome), None, ctrl.last_report()))
    }
}

impl StepRecord {
    fn new(
        index: usize,
        line: usize,
        op: &'static str,
        outcome: Option<MotionOutcome>,
        colour: Option<LightColour>,
        report: Option<ManoeuvreReport>
    ) -> Self {
        Self {
            index,
            line,
            op,
            outcome,
            colour,
            start_s: report.map(|r| r.start_s),
            stop_s: report.map(|r| r.stop_s),
            left_in: report.map(|r| r.left_in),
            right_in: report.map(|r| r.right_in)
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn args<T: DeserializeOwned>(line: usize, payload: &str) -> Result<T, CourseError> {
    serde_json::from_str(payload).map_err(|e| CourseError::InvalidArgs(line, e))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        motion_ctrl::Params,
        sim::{SimParams, SimWorld},
    };

    const SCRIPT: &str = r#"
        # Start light, then out to the first kiosk
        wait_for_light: {"until": {"below": 1.0}};
        move: {"distance_in": 6.0, "direction": "forward"};
        turn: {"angle_deg": 83.0, "direction": "left", "speed_pct": 40.0};

        move_to_threshold_failsafe: {"direction": "forward", "until": {"below": 2.2}, "failsafe_s": 4.0};
        classify;
        pause: {"duration_s": 0.5};
        move_failsafe: {"distance_in": 12.0, "direction": "reverse"};
    "#;

    #[test]
    fn test_parse() {
        let course = Course::parse(SCRIPT).unwrap();

        assert_eq!(course.num_steps(), 7);
        assert_eq!(course.steps()[0].line, 3);
        assert_eq!(course.steps()[1].step, CourseStep::Move(MoveArgs {
            distance_in: 6.0,
            direction: Direction::Forward,
            speed_pct: None,
            failsafe_s: None
        }));
        assert_eq!(course.steps()[2].step, CourseStep::Turn(TurnArgs {
            angle_deg: 83.0,
            direction: TurnDirection::Left,
            speed_pct: Some(40.0),
            failsafe_s: None
        }));
        assert_eq!(course.steps()[4].step, CourseStep::Classify);
        assert_eq!(course.steps()[4].line, 8);

        let ops: Vec<_> = course.steps().iter().map(|s| s.step.op()).collect();
        assert_eq!(ops, vec![
            "wait_for_light", "move", "turn", "move_to_threshold_failsafe",
            "classify", "pause", "move_failsafe"
        ]);
    }

    #[test]
    fn test_load() {
        let path = std::env::temp_dir().join("motion_lib_test_course.txt");
        fs::write(&path, SCRIPT).unwrap();

        let course = Course::load(&path).unwrap();
        assert_eq!(course.num_steps(), 7);
        assert_eq!(course.script_path(), Some(path.as_path()));

        fs::remove_file(&path).ok();

        assert_eq!(Course::parse(SCRIPT).unwrap().script_path(), None);
        assert!(matches!(
            Course::load("does/not/exist.txt"),
            Err(CourseError::ScriptLoadError(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Course::parse("# nothing\n\n"), Err(CourseError::ScriptEmpty)));

        assert!(matches!(
            Course::parse("move {\"distance_in\": 1.0};"),
            Err(CourseError::InvalidLine(1, _))
        ));

        assert!(matches!(
            Course::parse("\nspin: {\"angle_deg\": 1.0};"),
            Err(CourseError::UnknownOp(2, _))
        ));

        // Missing direction
        assert!(matches!(
            Course::parse("move: {\"distance_in\": 1.0};"),
            Err(CourseError::InvalidArgs(1, _))
        ));

        // Misspelt field
        assert!(matches!(
            Course::parse("turn: {\"angle\": 90.0, \"direction\": \"left\"};"),
            Err(CourseError::InvalidArgs(1, _))
        ));

        assert!(matches!(
            Course::parse("classify: {\"window_s\": 2.0};"),
            Err(CourseError::InvalidArgs(1, _))
        ));
    }

    #[test]
    fn test_run() {
        let world = SimWorld::new(SimParams {
            // Start light at 1 s, kiosk light (red) from 4 s
            light_schedule: vec![(0.0, 2.9), (1.0, 0.4), (1.2, 2.9), (4.0, 0.5)],
            ..Default::default()
        });
        let mut ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        let course = Course::parse(SCRIPT).unwrap();

        let mut seen = 0;
        let records = course.run(&mut ctrl, |_| seen += 1).unwrap();

        assert_eq!(seen, 7);
        assert_eq!(records.len(), 7);
        assert!(records.iter().take(4).all(|r| r.outcome == Some(MotionOutcome::Completed)));
        assert_eq!(records[4].colour, Some(LightColour::Red));
        assert_eq!(records[5].outcome, None);
        assert_eq!(records[6].outcome, Some(MotionOutcome::Completed));
        assert!(records[6].left_in.unwrap() >= 12.0);
        assert_eq!(world.motor_percents(), [0.0, 0.0]);
    }

    #[test]
    fn test_run_stops_at_failed_step() {
        let world = SimWorld::new(SimParams::default());
        let mut ctrl = MotionCtrl::new(
            Params::default(),
            world.motors(),
            world.encoders(),
            world.light_sensor(),
            world.clock()
        ).unwrap();

        let course = Course::parse(
            "move: {\"distance_in\": 1.0, \"direction\": \"forward\"};\n\
             move: {\"distance_in\": -1.0, \"direction\": \"forward\"};\n\
             move: {\"distance_in\": 1.0, \"direction\": \"forward\"};\n"
        ).unwrap();

        let mut seen = 0;
        let res = course.run(&mut ctrl, |_| seen += 1);

        assert!(matches!(
            res,
            Err(CourseError::StepFailed(1, 2, MotionError::InvalidDistance(_)))
        ));
        assert_eq!(seen, 1);
        assert_eq!(world.motor_percents(), [0.0, 0.0]);
    }
}
