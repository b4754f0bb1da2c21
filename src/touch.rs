// Mentora: Touch Pattern Detector
//
// Two TTP223 capacitive pads, each behind its own debounced input.  Touch is
// tap-only: a debounced rising edge on exactly one pad is a gesture, releases
// and simultaneous edges on both pads are not.

use crate::events::{Gesture, Timestamp, TouchEvent, TouchLevels, Transition};
use crate::input::DebouncedInput;

#[derive(Debug, Clone)]
pub struct TouchPatternDetector {
    pad1: DebouncedInput,
    pad2: DebouncedInput,
    last: Option<TouchEvent>,
}

impl TouchPatternDetector {
    pub fn new(debounce_ms: u64, initial: TouchLevels) -> Self {
        Self {
            pad1: DebouncedInput::new(debounce_ms, initial.pad1),
            pad2: DebouncedInput::new(debounce_ms, initial.pad2),
            last: None,
        }
    }

    /// Sample both pads and classify this tick's edges.
    pub fn update(&mut self, raw: TouchLevels, now: Timestamp) -> Gesture {
        let edge1 = self.pad1.sample(raw.pad1, now);
        let edge2 = self.pad2.sample(raw.pad2, now);

        let gesture = match (edge1, edge2) {
            (Some(Transition::Rising), None) => Gesture::Pad1,
            (None, Some(Transition::Rising)) => Gesture::Pad2,
            _ => Gesture::None,
        };

        if gesture != Gesture::None {
            log::debug!("touch gesture {} at {} ms", gesture.label(), now);
            self.last = Some(TouchEvent { gesture, detected_at: now });
        }
        gesture
    }

    /// Most recent gesture; kept until the next one replaces it.
    pub fn last_gesture(&self) -> Option<TouchEvent> {
        self.last
    }

    /// Acknowledgment for the most recent gesture, empty before the first.
    pub fn response(&self) -> &'static str {
        self.last.map_or("", |event| event.gesture.acknowledgment())
    }

    /// Current debounced levels of both pads.
    pub fn levels(&self) -> TouchLevels {
        TouchLevels {
            pad1: self.pad1.is_high(),
            pad2: self.pad2.is_high(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: u64 = 40;

    fn levels(pad1: bool, pad2: bool) -> TouchLevels {
        TouchLevels { pad1, pad2 }
    }

    fn detector() -> TouchPatternDetector {
        TouchPatternDetector::new(DEBOUNCE, TouchLevels::default())
    }

    #[test]
    fn rising_edge_on_each_pad_is_a_gesture() {
        let mut touch = detector();
        assert_eq!(touch.update(levels(true, false), 100), Gesture::Pad1);
        assert_eq!(touch.update(levels(false, false), 200), Gesture::None);
        assert_eq!(touch.update(levels(false, true), 300), Gesture::Pad2);
        assert_eq!(touch.response(), "Toggle Study Mode");
    }

    #[test]
    fn holding_a_pad_reports_once() {
        let mut touch = detector();
        assert_eq!(touch.update(levels(true, false), 100), Gesture::Pad1);
        for now in 101..400 {
            assert_eq!(touch.update(levels(true, false), now), Gesture::None);
        }
        assert!(touch.levels().pad1);
    }

    #[test]
    fn release_is_not_a_gesture() {
        let mut touch = TouchPatternDetector::new(DEBOUNCE, levels(true, false));
        assert_eq!(touch.update(levels(false, false), 100), Gesture::None);
        assert!(!touch.levels().pad1);
        assert_eq!(touch.last_gesture(), None);
    }

    #[test]
    fn simultaneous_edges_are_ignored() {
        let mut touch = detector();
        assert_eq!(touch.update(levels(true, true), 100), Gesture::None);
        assert!(touch.levels().pad1 && touch.levels().pad2);
        assert_eq!(touch.last_gesture(), None);
    }

    #[test]
    fn bouncing_pad_yields_a_single_gesture() {
        let mut touch = detector();
        let raw = [true, false, true, false, true, true];
        let gestures: Vec<Gesture> = raw
            .iter()
            .enumerate()
            .map(|(i, &level)| touch.update(levels(level, false), 1_000 + i as u64 * 5))
            .filter(|g| *g != Gesture::None)
            .collect();
        assert_eq!(gestures, vec![Gesture::Pad1]);
    }

    #[test]
    fn last_gesture_persists_until_replaced() {
        let mut touch = detector();
        touch.update(levels(true, false), 100);
        touch.update(levels(false, false), 500);
        touch.update(levels(false, false), 9_000);
        assert_eq!(
            touch.last_gesture(),
            Some(TouchEvent { gesture: Gesture::Pad1, detected_at: 100 })
        );
        assert_eq!(touch.response(), "Reaction: Play fun animation");

        touch.update(levels(false, true), 9_100);
        assert_eq!(touch.last_gesture().map(|e| e.gesture), Some(Gesture::Pad2));
    }
}
