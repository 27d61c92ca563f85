//! Clock abstraction for time-based expiry.

use chrono::{DateTime, Utc};

/// Abstraction over system time.
///
/// Session expiry is evaluated against this clock, so tests can move time
/// forward explicitly instead of sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
