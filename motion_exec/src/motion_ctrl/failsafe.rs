//! Failsafe deadlines
//!
//! A failsafe bounds how long a manoeuvre can poll for. It's started when the
//! manoeuvre's baseline is taken and expires a fixed duration later on the
//! motion clock, regardless of what the encoders or sensor are doing.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A wall clock deadline for one manoeuvre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Failsafe {
    expires_s: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Failsafe {

    /// Start a failsafe of `duration_s` at time `now_s`.
    pub fn start(now_s: f64, duration_s: f64) -> Self {
        Self {
            expires_s: now_s + duration_s
        }
    }

    /// Returns true once `now_s` has reached the deadline.
    pub fn has_expired(&self, now_s: f64) -> bool {
        now_s >= self.expires_s
    }

    /// Time at which the failsafe expires.
    pub fn expires_s(&self) -> f64 {
        self.expires_s
    }
}

/// Check a failsafe duration given to a manoeuvre.
pub(crate) fn is_valid_duration(duration_s: f64) -> bool {
    duration_s.is_finite() && duration_s > 0.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_expiry() {
        let fs = Failsafe::start(10.0, 2.0);

        assert_eq!(fs.expires_s(), 12.0);
        assert!(!fs.has_expired(10.0));
        assert!(!fs.has_expired(11.999));
        assert!(fs.has_expired(12.0));
        assert!(fs.has_expired(30.0));
    }

    #[test]
    fn test_duration_validity() {
        assert!(is_valid_duration(2.0));
        assert!(!is_valid_duration(0.0));
        assert!(!is_valid_duration(-1.0));
        assert!(!is_valid_duration(f64::INFINITY));
        assert!(!is_valid_duration(f64::NAN));
    }
}
