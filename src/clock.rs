// Mentora: Time Source

use std::time::Instant;

use crate::events::Timestamp;

/// Monotonic millisecond clock.  The fusion core never reads time itself;
/// whoever drives the polling loop supplies it.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}
