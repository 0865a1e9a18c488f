use std::time::Duration;

/// Event poll interval in milliseconds (render/input cadence)
pub const POLL_INTERVAL_MS: u64 = 250;

/// Accrual step: study time is credited in whole seconds
pub const ACCRUAL_STEP_SECS: u64 = 1;

/// Get the event poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_duration() {
        let duration = poll_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_poll_is_finer_than_accrual() {
        // Several polls per accrued second keeps input latency low without
        // ever crediting fractional seconds
        assert!(POLL_INTERVAL_MS < ACCRUAL_STEP_SECS * 1000);
    }
}
