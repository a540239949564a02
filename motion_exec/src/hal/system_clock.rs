//! Wall clock implementation of [`Clock`]

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::thread;
use std::time::{Duration, Instant};

use super::Clock;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A [`Clock`] backed by the operating system's monotonic clock.
///
/// Time is measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now()
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_s(&mut self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn pause_s(&mut self, duration_s: f64) {
        // Negative or NaN durations are treated as no pause
        if duration_s > 0.0 && duration_s.is_finite() {
            thread::sleep(Duration::from_secs_f64(duration_s));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();

        let t0 = clock.now_s();
        clock.pause_s(0.01);
        let t1 = clock.now_s();

        assert!(t0 >= 0.0);
        assert!(t1 - t0 >= 0.01);

        // Invalid durations don't block
        clock.pause_s(-1.0);
        clock.pause_s(f64::NAN);
        assert!(clock.now_s() >= t1);
    }
}
