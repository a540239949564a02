//! Parameters for the simulated robot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated robot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Encoder ticks counted per second by a wheel driven at 100 %.
    ///
    /// Units: ticks/second
    pub full_speed_ticks_per_s: f64,

    /// Simulated time which passes each time the clock is read. This stands
    /// in for the time taken by one pass of a polling loop.
    ///
    /// Only clock reads and pauses move simulated time, so an unguarded
    /// manoeuvre polled with a zero poll period never completes.
    ///
    /// Units: seconds
    pub read_cost_s: f64,

    /// Wheels which are jammed and never turn, `[left, right]`.
    pub stalled: [bool; 2],

    /// Light level seen before the first step of the schedule.
    ///
    /// Units: volts
    pub ambient_light_v: f64,

    /// Light level steps as `(time_s, voltage)` pairs in time order. Each
    /// step holds until the next one begins.
    pub light_schedule: Vec<(f64, f64)>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the simulation parameters.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Full speed tick rate must be positive and finite, found {0}")]
    InvalidTickRate(f64),

    #[error("Clock read cost must be positive and finite, found {0}")]
    InvalidReadCost(f64),

    #[error("Light schedule steps must be in time order (step {0} is out of order)")]
    UnorderedSchedule(usize)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            // About 11 in/s at half power with the default calibration
            full_speed_ticks_per_s: 750.0,
            read_cost_s: 0.001,
            stalled: [false, false],
            ambient_light_v: 3.0,
            light_schedule: Vec::new()
        }
    }
}

impl SimParams {

    /// Determines if the parameters are valid.
    pub fn are_valid(&self) -> Result<(), SimError> {
        if !(self.full_speed_ticks_per_s.is_finite() && self.full_speed_ticks_per_s > 0.0) {
            return Err(SimError::InvalidTickRate(self.full_speed_ticks_per_s));
        }

        if !(self.read_cost_s.is_finite() && self.read_cost_s > 0.0) {
            return Err(SimError::InvalidReadCost(self.read_cost_s));
        }

        for i in 1..self.light_schedule.len() {
            if self.light_schedule[i].0 < self.light_schedule[i - 1].0 {
                return Err(SimError::UnorderedSchedule(i));
            }
        }

        Ok(())
    }

    /// The scheduled light level at the given time.
    pub fn light_at(&self, time_s: f64) -> f64 {
        self.light_schedule
            .iter()
            .take_while(|(t, _)| *t <= time_s)
            .last()
            .map(|(_, v)| *v)
            .unwrap_or(self.ambient_light_v)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_light_at() {
        let params = SimParams {
            ambient_light_v: 3.0,
            light_schedule: vec![(1.0, 0.5), (2.0, 1.8)],
            ..Default::default()
        };

        assert_eq!(params.light_at(0.0), 3.0);
        assert_eq!(params.light_at(1.0), 0.5);
        assert_eq!(params.light_at(1.99), 0.5);
        assert_eq!(params.light_at(5.0), 1.8);
    }

    #[test]
    fn test_validity() {
        assert!(SimParams::default().are_valid().is_ok());

        let params = SimParams {
            light_schedule: vec![(1.0, 0.5), (0.5, 1.8)],
            ..Default::default()
        };
        assert!(matches!(params.are_valid(), Err(SimError::UnorderedSchedule(1))));

        let params = SimParams {
            read_cost_s: 0.0,
            ..Default::default()
        };
        assert!(matches!(params.are_valid(), Err(SimError::InvalidReadCost(_))));
    }

    #[test]
    fn test_from_toml() {
        let params: SimParams = util::params::from_str(
            "read_cost_s = 0.002\nstalled = [false, true]\nlight_schedule = [[0.0, 3.1], [4.0, 0.6]]\n"
        ).unwrap();

        assert_eq!(params.read_cost_s, 0.002);
        assert_eq!(params.stalled, [false, true]);
        assert_eq!(params.light_schedule, vec![(0.0, 3.1), (4.0, 0.6)]);
        assert_eq!(params.full_speed_ticks_per_s, 750.0);
    }
}
