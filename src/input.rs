// Mentora: Debounced Digital Input
//
// Lockout-style debounce shared by the touch pads and the tilt switch.  A raw
// level that differs from the stable one is committed only when more than the
// debounce interval has passed since the previous accepted transition;
// everything in between is treated as contact bounce and dropped.  Polled
// once per fusion tick with a caller-supplied timestamp.

use crate::events::{Timestamp, Transition};

#[derive(Debug, Clone)]
pub struct DebouncedInput {
    interval_ms: u64,

    // Debounce state
    raw: bool,
    stable: bool,
    previous_stable: bool,
    last_transition: Option<Timestamp>,
}

impl DebouncedInput {
    /// `initial` is the level read at bring-up; it is trusted without an edge.
    pub fn new(interval_ms: u64, initial: bool) -> Self {
        Self {
            interval_ms,
            raw: initial,
            stable: initial,
            previous_stable: initial,
            last_transition: None,
        }
    }

    /// Feed one raw sample.  Returns the edge direction when the sample is
    /// accepted as a new stable level.
    pub fn sample(&mut self, raw: bool, now: Timestamp) -> Option<Transition> {
        self.raw = raw;
        if raw == self.stable {
            return None;
        }

        // The first edge after bring-up has nothing to bounce against.
        if let Some(last) = self.last_transition {
            if now.saturating_sub(last) <= self.interval_ms {
                return None;
            }
        }

        self.previous_stable = self.stable;
        self.stable = raw;
        self.last_transition = Some(now);
        log::debug!("debounced edge -> {} at {} ms", raw, now);

        Some(if raw { Transition::Rising } else { Transition::Falling })
    }

    pub fn is_high(&self) -> bool {
        self.stable
    }

    /// Stable level before the most recent accepted transition.
    pub fn previous(&self) -> bool {
        self.previous_stable
    }

    /// Latest raw sample, bouncing or not.
    pub fn raw(&self) -> bool {
        self.raw
    }

    pub fn last_transition(&self) -> Option<Timestamp> {
        self.last_transition
    }
}
