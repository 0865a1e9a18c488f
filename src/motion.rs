use crate::domain::InterruptReason;

/// Pitch/roll magnitude above which the device counts as moved (radians)
pub const TILT_LIMIT_RAD: f64 = 0.7;

/// Per-axis user acceleration above which the device counts as moved (g)
pub const ACCEL_LIMIT_G: f64 = 0.3;

/// One reading from a device-motion feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Attitude pitch in radians
    pub pitch: f64,
    /// Attitude roll in radians
    pub roll: f64,
    /// User acceleration per axis in g
    pub accel: [f64; 3],
}

impl MotionSample {
    pub fn still() -> Self {
        Self {
            pitch: 0.0,
            roll: 0.0,
            accel: [0.0; 3],
        }
    }

    /// Whether this sample breaches the stillness thresholds
    pub fn is_breach(&self) -> bool {
        self.pitch.abs() > TILT_LIMIT_RAD
            || self.roll.abs() > TILT_LIMIT_RAD
            || self.accel.iter().any(|a| a.abs() > ACCEL_LIMIT_G)
    }
}

/// Gate between a motion feed and the timer session. Samples are only
/// consumed while armed; the watch never mutates the ledger, it only
/// reports an interruption for the session to act on.
#[derive(Debug, Clone, Default)]
pub struct MotionWatch {
    armed: bool,
}

impl MotionWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed one sample. Returns the interruption to surface, if any.
    pub fn observe(&self, sample: MotionSample) -> Option<InterruptReason> {
        if self.armed && sample.is_breach() {
            Some(InterruptReason::DeviceMoved)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_sample_is_not_a_breach() {
        assert!(!MotionSample::still().is_breach());
    }

    #[test]
    fn test_tilt_breach() {
        let mut sample = MotionSample::still();
        sample.pitch = 0.71;
        assert!(sample.is_breach());

        let mut sample = MotionSample::still();
        sample.roll = -0.8;
        assert!(sample.is_breach());

        let mut sample = MotionSample::still();
        sample.pitch = 0.7; // At the limit, not over it
        assert!(!sample.is_breach());
    }

    #[test]
    fn test_accel_breach_on_any_axis() {
        for axis in 0..3 {
            let mut sample = MotionSample::still();
            sample.accel[axis] = -0.31;
            assert!(sample.is_breach(), "axis {} should breach", axis);
        }

        let mut sample = MotionSample::still();
        sample.accel = [0.3, 0.3, 0.3];
        assert!(!sample.is_breach());
    }

    #[test]
    fn test_disarmed_watch_ignores_breaches() {
        let mut sample = MotionSample::still();
        sample.pitch = 1.0;

        let mut watch = MotionWatch::new();
        assert_eq!(watch.observe(sample), None);

        watch.arm();
        assert_eq!(watch.observe(sample), Some(InterruptReason::DeviceMoved));

        watch.disarm();
        assert_eq!(watch.observe(sample), None);
    }
}
