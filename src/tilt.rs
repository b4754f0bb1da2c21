// Mentora: Tilt Event State Machine
//
// A single SW-520D ball switch reports the device being picked up or tipped
// over.  The hardware cannot tell the two apart, so `tilted` and `lifted`
// always move together.  Each disturbed episode may announce itself once, and
// setting the device back down may be acknowledged once.

use serde::Serialize;

use crate::events::{Activity, Timestamp, Transition};
use crate::input::DebouncedInput;

const LIFTED_LINES: [&str; 10] = [
    "Whoa! I'm getting dizzy up here!",
    "Hey! I'm not a toy, I'm your study buddy!",
    "The world looks funny upside down!",
    "I prefer staying grounded, literally!",
    "Is this how birds feel? Put me back down!",
    "I'm getting a different perspective on things!",
    "Everything's topsy-turvy! This is making me dizzy!",
    "I think I left my stomach down there!",
    "Houston, we have a problem - I'm floating!",
    "I'm not built for space travel, put me down!",
];

const TILTED_LINES: [&str; 8] = [
    "I think I need to recalibrate my balance!",
    "Everything's sideways! Are we doing geometry now?",
    "I'm getting a tilted view of the world!",
    "Is this part of the physics lesson?",
    "I feel like I'm on a roller coaster!",
    "This is making me lean into learning!",
    "I'm at an angle! Quick, calculate my degrees!",
    "Gravity is doing interesting things to me!",
];

const STUDYING_LINE: &str = "Hey! We're learning! Put me back down!";
const CHATTING_LINE: &str = "I can't chat properly when I'm floating!";
const IDLE_LINE: &str = "Don't put me away yet!";
const PUT_DOWN_LINE: &str = "Ahh, much better! Thanks for putting me back down.";

// ---------------------------------------------------------------------------
// Canned line cycle
// ---------------------------------------------------------------------------

/// Restartable walk over canned response tables.  One cursor is shared by
/// every table it is asked to draw from and wraps per table.
#[derive(Debug, Clone, Default)]
pub struct ResponseCycle {
    cursor: usize,
}

impl ResponseCycle {
    pub fn next_from(&mut self, table: &[&'static str]) -> &'static str {
        let line = table.get(self.cursor % table.len().max(1)).copied().unwrap_or("");
        self.cursor = self.cursor.wrapping_add(1);
        line
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

// ---------------------------------------------------------------------------
// One-shot announcement gate
// ---------------------------------------------------------------------------

/// Re-polling in the same instant the announcement was made replays it, so a
/// tick re-evaluated with identical inputs reports the same event.  Any later
/// poll is silent until the gate is re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Closed,
    Armed,
    Fired { at: Timestamp, line: &'static str },
}

impl Gate {
    fn poll(&mut self, now: Timestamp, compose: impl FnOnce() -> &'static str) -> Option<&'static str> {
        match *self {
            Gate::Closed => None,
            Gate::Armed => {
                let line = compose();
                *self = Gate::Fired { at: now, line };
                Some(line)
            }
            Gate::Fired { at, line } if at == now => Some(line),
            Gate::Fired { .. } => None,
        }
    }

    fn has_fired(&self) -> bool {
        matches!(self, Gate::Fired { .. })
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiltPhase {
    Flat,
    Disturbed,
}

/// Flags visible to the fusion snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltState {
    pub tilted: bool,
    pub lifted: bool,
    pub episode_responded: bool,
    pub humor_index: usize,
}

#[derive(Debug, Clone)]
pub struct TiltEventStateMachine {
    switch: DebouncedInput,
    sustain_ms: u64,
    tilted: bool,
    lifted: bool,
    episode_started_at: Option<Timestamp>,
    last_edge: Option<Transition>,
    episode: Gate,
    put_down: Gate,
    humor: ResponseCycle,
}

impl TiltEventStateMachine {
    /// `initial_level` is the switch level at bring-up.  Starting disturbed
    /// does not open an episode; only a debounced rising edge does.
    pub fn new(debounce_ms: u64, sustain_ms: u64, initial_level: bool) -> Self {
        Self {
            switch: DebouncedInput::new(debounce_ms, initial_level),
            sustain_ms,
            tilted: false,
            lifted: false,
            episode_started_at: None,
            last_edge: None,
            episode: Gate::Closed,
            put_down: Gate::Closed,
            humor: ResponseCycle::default(),
        }
    }

    pub fn update(&mut self, raw: bool, now: Timestamp) -> Option<Transition> {
        let edge = self.switch.sample(raw, now)?;
        match edge {
            Transition::Rising => {
                if !self.tilted && !self.lifted {
                    self.episode_started_at = Some(now);
                }
                self.tilted = true;
                self.lifted = true;
                self.episode = Gate::Armed;
                self.put_down = Gate::Closed;
                log::debug!("tilt episode opened at {} ms", now);
            }
            Transition::Falling => {
                self.tilted = false;
                self.lifted = false;
                self.episode_started_at = None;
                self.episode = Gate::Closed;
                self.put_down = Gate::Armed;
                log::debug!("tilt episode closed at {} ms", now);
            }
        }
        self.last_edge = Some(edge);
        Some(edge)
    }

    /// Announcement for the current episode, chosen by what the user is doing.
    /// While disturbed, the first poll of the episode answers and later polls
    /// are silent; back at rest, the first poll after the put-down thanks the
    /// user once.
    pub fn contextual_response(&mut self, activity: Activity, now: Timestamp) -> Option<&'static str> {
        let line = if self.is_disturbed() {
            let (lifted, tilted) = (self.lifted, self.tilted);
            let humor = &mut self.humor;
            self.episode.poll(now, || match activity {
                Activity::Studying => STUDYING_LINE,
                Activity::Chatting => CHATTING_LINE,
                Activity::Idle => IDLE_LINE,
                Activity::Playing => humor_line(humor, lifted, tilted),
            })
        } else {
            self.put_down.poll(now, || PUT_DOWN_LINE)
        };
        if let Some(line) = line {
            log::info!("tilt: {}", line);
        }
        line
    }

    /// Humor line for the current episode, sharing the episode's gate.
    pub fn humor_response(&mut self, now: Timestamp) -> Option<&'static str> {
        if !self.is_disturbed() {
            return None;
        }
        let (lifted, tilted) = (self.lifted, self.tilted);
        let humor = &mut self.humor;
        self.episode.poll(now, || humor_line(humor, lifted, tilted))
    }

    pub fn reset_humor(&mut self) {
        self.humor.reset();
    }

    pub fn phase(&self) -> TiltPhase {
        if self.is_disturbed() {
            TiltPhase::Disturbed
        } else {
            TiltPhase::Flat
        }
    }

    pub fn is_disturbed(&self) -> bool {
        self.tilted || self.lifted
    }

    pub fn is_tilted(&self) -> bool {
        self.tilted
    }

    pub fn is_lifted(&self) -> bool {
        self.lifted
    }

    /// Disturbed for longer than the sustain threshold.
    pub fn is_sustained(&self, now: Timestamp) -> bool {
        self.episode_started_at
            .is_some_and(|start| now.saturating_sub(start) > self.sustain_ms)
    }

    /// The most recent debounced edge was a pick-up.
    pub fn just_tilted(&self) -> bool {
        self.last_edge == Some(Transition::Rising)
    }

    /// The most recent debounced edge was a put-down.
    pub fn just_put_down(&self) -> bool {
        self.last_edge == Some(Transition::Falling)
    }

    pub fn state(&self) -> TiltState {
        TiltState {
            tilted: self.tilted,
            lifted: self.lifted,
            episode_responded: self.episode.has_fired(),
            humor_index: self.humor.position(),
        }
    }
}

/// Lifted takes precedence over tilted when picking a table.
fn humor_line(humor: &mut ResponseCycle, lifted: bool, tilted: bool) -> &'static str {
    if lifted {
        humor.next_from(&LIFTED_LINES)
    } else if tilted {
        humor.next_from(&TILTED_LINES)
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: u64 = 100;
    const SUSTAIN: u64 = 500;

    fn machine() -> TiltEventStateMachine {
        TiltEventStateMachine::new(DEBOUNCE, SUSTAIN, false)
    }

    #[test]
    fn pick_up_sets_both_flags() {
        let mut tilt = machine();
        assert_eq!(tilt.update(true, 1_000), Some(Transition::Rising));
        assert!(tilt.is_tilted() && tilt.is_lifted());
        assert_eq!(tilt.phase(), TiltPhase::Disturbed);
        assert!(tilt.just_tilted());
        assert!(!tilt.state().episode_responded);
    }

    #[test]
    fn one_announcement_per_episode() {
        let mut tilt = machine();
        tilt.update(true, 1_000);

        let mut spoken = Vec::new();
        for now in 1_000..1_400 {
            tilt.update(true, now);
            if let Some(line) = tilt.contextual_response(Activity::Studying, now + 1) {
                spoken.push(line);
            }
        }
        assert_eq!(spoken, vec![STUDYING_LINE]);
        assert!(tilt.state().episode_responded);
    }

    #[test]
    fn put_down_is_acknowledged_once() {
        let mut tilt = machine();
        tilt.update(true, 1_000);
        tilt.contextual_response(Activity::Idle, 1_000);

        assert_eq!(tilt.update(false, 2_000), Some(Transition::Falling));
        assert!(tilt.just_put_down());
        assert!(!tilt.state().episode_responded);
        assert_eq!(tilt.contextual_response(Activity::Idle, 2_000), Some(PUT_DOWN_LINE));
        for now in 2_001..2_300 {
            assert_eq!(tilt.contextual_response(Activity::Idle, now), None);
        }
    }

    #[test]
    fn put_down_is_acknowledged_even_if_the_episode_was_never_polled() {
        let mut tilt = machine();
        tilt.update(true, 1_000);
        tilt.update(false, 1_500);
        assert_eq!(tilt.contextual_response(Activity::Studying, 1_600), Some(PUT_DOWN_LINE));
    }

    #[test]
    fn nothing_to_say_before_any_episode() {
        let mut tilt = machine();
        assert_eq!(tilt.contextual_response(Activity::Idle, 10), None);
        assert_eq!(tilt.humor_response(10), None);
    }

    #[test]
    fn repoll_in_the_same_instant_replays_the_line() {
        let mut tilt = machine();
        tilt.update(true, 1_000);
        let first = tilt.contextual_response(Activity::Playing, 1_000);
        let again = tilt.contextual_response(Activity::Playing, 1_000);
        assert_eq!(first, Some(LIFTED_LINES[0]));
        assert_eq!(again, first);
        assert_eq!(tilt.state().humor_index, 1);
        assert_eq!(tilt.contextual_response(Activity::Playing, 1_001), None);
    }

    #[test]
    fn activity_picks_the_context_line() {
        let cases = [
            (Activity::Studying, STUDYING_LINE),
            (Activity::Chatting, CHATTING_LINE),
            (Activity::Idle, IDLE_LINE),
        ];
        for (activity, expected) in cases {
            let mut tilt = machine();
            tilt.update(true, 1_000);
            assert_eq!(tilt.contextual_response(activity, 1_000), Some(expected));
            assert_eq!(tilt.state().humor_index, 0);
        }
    }

    #[test]
    fn humor_cycles_across_episodes_and_wraps() {
        let mut tilt = machine();
        let mut lines = Vec::new();
        let mut now = 1_000;
        for _ in 0..12 {
            tilt.update(true, now);
            lines.push(tilt.contextual_response(Activity::Playing, now).unwrap_or(""));
            now += 200;
            tilt.update(false, now);
            now += 200;
        }
        assert_eq!(&lines[..10], &LIFTED_LINES[..]);
        assert_eq!(lines[10], LIFTED_LINES[0]);
        assert_eq!(lines[11], LIFTED_LINES[1]);

        tilt.reset_humor();
        tilt.update(true, now);
        assert_eq!(tilt.humor_response(now), Some(LIFTED_LINES[0]));
    }

    #[test]
    fn humor_response_shares_the_episode_gate() {
        let mut tilt = machine();
        tilt.update(true, 1_000);
        assert!(tilt.humor_response(1_000).is_some());
        assert_eq!(tilt.contextual_response(Activity::Studying, 1_050), None);
    }

    #[test]
    fn tilted_table_wraps_at_eight() {
        let mut humor = ResponseCycle::default();
        let lines: Vec<&str> = (0..9).map(|_| humor_line(&mut humor, false, true)).collect();
        assert_eq!(&lines[..8], &TILTED_LINES[..]);
        assert_eq!(lines[8], TILTED_LINES[0]);
        assert_eq!(humor_line(&mut humor, false, false), "");
    }

    #[test]
    fn shared_cursor_wraps_per_table() {
        let mut humor = ResponseCycle::default();
        for _ in 0..9 {
            humor.next_from(&LIFTED_LINES);
        }
        // Cursor 9 lands on the tilted table's second entry.
        assert_eq!(humor.next_from(&TILTED_LINES), TILTED_LINES[1]);
    }

    #[test]
    fn sustained_after_threshold() {
        let mut tilt = machine();
        tilt.update(true, 1_000);
        assert!(!tilt.is_sustained(1_500));
        assert!(tilt.is_sustained(1_501));
        tilt.update(false, 2_000);
        assert!(!tilt.is_sustained(5_000));
    }

    #[test]
    fn starting_disturbed_opens_no_episode() {
        let mut tilt = TiltEventStateMachine::new(DEBOUNCE, SUSTAIN, true);
        tilt.update(true, 10);
        assert_eq!(tilt.phase(), TiltPhase::Flat);
        assert_eq!(tilt.contextual_response(Activity::Idle, 10), None);
    }
}
