//! # Pitchside Testing
//!
//! Testing utilities for reducers and stores built on `pitchside-core`.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given/When/Then builder for reducer unit tests
//! - [`assertions`] over returned effects
//! - [`mocks::FixedClock`] for deterministic date-range resolution
//! - [`init_test_tracing`] to see `tracing` output in failing tests
//!
//! ## Example
//!
//! ```ignore
//! use pitchside_testing::{ReducerTest, assertions, test_clock};
//!
//! ReducerTest::new(ReservationReducer::new())
//!     .with_env(environment)
//!     .given_state(ReservationState::default())
//!     .when_action(ReservationAction::LoadMore { status: ReservationStatus::Pending })
//!     .then_effects(|effects| assertions::assert_future_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use pitchside_core::environment::Clock;


/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::TimeZone;

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use pitchside_testing::mocks::FixedClock;
    /// use pitchside_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Default fixed clock for tests: Wednesday 2025-01-01 10:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

/// Install a `tracing` subscriber that writes through the test harness
///
/// Honors `RUST_LOG`; calling it more than once is harmless.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_clock_is_fixed() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().year(), 2025);
    }
}
