//! # Sensor reader
//!
//! Samples the analog light sensor. No filtering or unit conversion is done
//! here; thresholds belong to whoever is asking, since different manoeuvres
//! compare the same sensor against different levels.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::{Deserialize, Serialize};

// Internal
use crate::hal::LightSensor;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Reader for the light sensor.
pub struct SensorReader<S: LightSensor> {
    sensor: S
}

/// A single instantaneous sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct SensorSample {
    /// Units: volts
    pub voltage: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A threshold comparison applied to a sensor sample.
///
/// Both comparisons are strict, a sample exactly on the threshold satisfies
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Satisfied when the voltage is above the threshold.
    Above(f64),

    /// Satisfied when the voltage is below the threshold.
    Below(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<S: LightSensor> SensorReader<S> {
    pub fn new(sensor: S) -> Self {
        Self { sensor }
    }

    /// Take one sample of the sensor.
    pub fn read(&mut self) -> SensorSample {
        let sample = SensorSample {
            voltage: self.sensor.read_light_level()
        };

        trace!("Light sensor: {:.3} V", sample.voltage);

        sample
    }
}

impl Comparison {

    /// Determine if the sample satisfies this comparison.
    pub fn is_satisfied_by(&self, sample: SensorSample) -> bool {
        match *self {
            Comparison::Above(t) => sample.voltage > t,
            Comparison::Below(t) => sample.voltage < t
        }
    }

    /// The threshold being compared against.
    ///
    /// Units: volts
    pub fn threshold(&self) -> f64 {
        match *self {
            Comparison::Above(t) | Comparison::Below(t) => t
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimParams, SimWorld};

    #[test]
    fn test_comparison() {
        let s = |voltage| SensorSample { voltage };

        assert!(Comparison::Above(2.0).is_satisfied_by(s(2.2)));
        assert!(!Comparison::Above(2.0).is_satisfied_by(s(2.0)));
        assert!(!Comparison::Above(2.0).is_satisfied_by(s(1.1)));

        assert!(Comparison::Below(1.0).is_satisfied_by(s(0.4)));
        assert!(!Comparison::Below(1.0).is_satisfied_by(s(1.0)));

        assert_eq!(Comparison::Below(2.2).threshold(), 2.2);
    }

    #[test]
    fn test_comparison_deserialise() {
        let c: Comparison = serde_json::from_str(r#"{"above": 2.2}"#).unwrap();
        assert_eq!(c, Comparison::Above(2.2));

        let c: Comparison = serde_json::from_str(r#"{"below": 1.0}"#).unwrap();
        assert_eq!(c, Comparison::Below(1.0));
    }

    #[test]
    fn test_read() {
        let world = SimWorld::new(SimParams::default());
        let mut reader = SensorReader::new(world.light_sensor());

        world.set_light_level(Some(1.25));

        assert_eq!(reader.read().voltage, 1.25);
    }
}
