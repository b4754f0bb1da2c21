// Mentora: Sensor Events & Shared Types

use serde::Serialize;

/// Milliseconds on a monotonic clock, supplied by the caller.
pub type Timestamp = u64;

// ---------------------------------------------------------------------------
// Digital edges
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Rising,
    Falling,
}

// ---------------------------------------------------------------------------
// Touch gestures
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Gesture {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "TOUCH1")]
    Pad1,
    #[serde(rename = "TOUCH2")]
    Pad2,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pad1 => "TOUCH1",
            Self::Pad2 => "TOUCH2",
        }
    }

    /// Canned reply the device gives for the gesture.
    pub fn acknowledgment(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pad1 => "Reaction: Play fun animation",
            Self::Pad2 => "Toggle Study Mode",
        }
    }
}

/// A gesture together with the instant it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchEvent {
    pub gesture: Gesture,
    pub detected_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Declared activity
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    #[default]
    Idle,
    Studying,
    Chatting,
    Playing,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Studying => "studying",
            Self::Chatting => "chatting",
            Self::Playing => "playing",
        }
    }

    /// Activity after a study-mode toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Studying => Self::Idle,
            Self::Idle | Self::Chatting | Self::Playing => Self::Studying,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw samples handed over by the hardware layer each tick
// ---------------------------------------------------------------------------

/// Raw levels of both touch pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchLevels {
    pub pad1: bool,
    pub pad2: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// One photodetector sample plus the external beat detector's verdict on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseSample {
    pub ir: i64,
    pub beat: bool,
}

/// Everything sampled during one polling tick. `None` means the channel
/// produced no new sample this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorFrame {
    pub touch: Option<TouchLevels>,
    pub tilt: Option<bool>,
    pub lux: Option<f32>,
    pub climate: Option<ClimateReading>,
    pub pulse: Option<PulseSample>,
}
