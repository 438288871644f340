//! Wall-clock access for probe timestamps

use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Source of microsecond timestamps
pub trait Clock {
    /// Current time in microseconds since the Unix epoch
    fn now_micros(&self) -> u64;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> u64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            Err(e) => {
                warn!(error = %e, "System clock is before the Unix epoch");
                0
            }
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub Clock {}

        impl Clock for Clock {
            fn now_micros(&self) -> u64;
        }
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now_micros();
        let second = clock.now_micros();
        assert!(first > 0);
        assert!(second >= first);
    }

    #[test]
    fn test_clock_by_reference() {
        let mut mock = MockClock::new();
        mock.expect_now_micros().times(1).return_const(42u64);
        let by_ref = &mock;
        assert_eq!(by_ref.now_micros(), 42);
    }
}

#[cfg(test)]
pub use tests::MockClock;
