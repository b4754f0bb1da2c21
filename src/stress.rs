// Mentora: Stress Tracker
//
// Integer stress score driven by heart rate with one-step hysteresis.  The
// score only climbs while the heart rate stays above the rise threshold and
// decays everywhere at or below the neutral band, so a pulse between the band
// ceiling and the rise threshold holds the score where it is.

use serde::Serialize;

use crate::config::StressConfig;
use crate::events::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressState {
    pub score: u8,
    pub smoothed_heart_rate: f32,
    pub stressed: bool,
}

impl StressState {
    pub fn description(&self) -> &'static str {
        match self.score {
            0 => "Very Relaxed",
            1 => "Relaxed",
            2 => "Normal",
            3 => "Slightly Stressed",
            4 => "Stressed",
            _ => "Very Stressed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StressTracker {
    config: StressConfig,
    state: StressState,
    last_update: Option<Timestamp>,
}

impl StressTracker {
    pub fn new(config: StressConfig) -> Self {
        Self {
            config,
            state: StressState::default(),
            last_update: None,
        }
    }

    /// Fold one valid heart-rate sample into the score and the smoothed rate.
    pub fn update(&mut self, heart_rate: f32, now: Timestamp) -> StressState {
        let c = &self.config;
        let before = self.state.score;

        let in_neutral_band = (c.relax_below_bpm..=c.neutral_ceiling_bpm).contains(&heart_rate);
        if heart_rate > c.rise_above_bpm {
            self.state.score = before.saturating_add(1).min(c.max_score);
        } else if heart_rate < c.relax_below_bpm || in_neutral_band {
            self.state.score = before.saturating_sub(1);
        }
        self.state.stressed = self.state.score >= c.stressed_at;
        self.state.smoothed_heart_rate =
            self.state.smoothed_heart_rate * (1.0 - c.smoothing) + heart_rate * c.smoothing;
        self.last_update = Some(now);

        if self.state.score != before {
            log::debug!(
                "stress score {} -> {} at {:.1} BPM",
                before,
                self.state.score,
                heart_rate
            );
        }
        self.state
    }

    pub fn state(&self) -> StressState {
        self.state
    }

    pub fn is_stressed(&self) -> bool {
        self.state.stressed
    }

    pub fn last_update(&self) -> Option<Timestamp> {
        self.last_update
    }
}
