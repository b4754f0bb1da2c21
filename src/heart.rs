// Mentora: Heart Rate Estimation
//
// The MAX30102 front end and its beat detector live outside this crate; what
// arrives here is one IR amplitude per poll plus a flag saying whether the
// detector saw a pulse edge in it.  Inter-beat intervals become instantaneous
// BPM, implausible values are dropped, and a short rolling window gives the
// reported rate, which in turn feeds the stress tracker.

use serde::Serialize;

use crate::config::{
    FusionConfig, BEAT_HISTORY_LEN, WELLNESS_ELEVATED_BPM, WELLNESS_VERY_RELAXED_BPM,
};
use crate::events::{PulseSample, Timestamp};
use crate::stress::{StressState, StressTracker};

// ---------------------------------------------------------------------------
// Rolling window
// ---------------------------------------------------------------------------

/// Last few accepted BPM values.  Slots start at zero and the mean is always
/// taken over the whole window, so the first few readings ramp up.
#[derive(Debug, Clone, Default)]
pub struct BeatHistory {
    rates: [u32; BEAT_HISTORY_LEN],
    cursor: usize,
}

impl BeatHistory {
    pub fn push(&mut self, bpm: u32) -> f32 {
        self.rates[self.cursor] = bpm;
        self.cursor = (self.cursor + 1) % BEAT_HISTORY_LEN;
        self.mean()
    }

    pub fn mean(&self) -> f32 {
        let total: u32 = self.rates.iter().sum();
        total as f32 / BEAT_HISTORY_LEN as f32
    }

    pub fn rates(&self) -> &[u32; BEAT_HISTORY_LEN] {
        &self.rates
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartReading {
    pub instant_bpm: u32,
    pub average_bpm: f32,
    pub at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct HeartRateEstimator {
    bpm_min: u32,
    bpm_max: u32,
    history: BeatHistory,
    last_beat: Option<Timestamp>,
    latest: Option<HeartReading>,
}

impl HeartRateEstimator {
    /// Accepts instantaneous rates strictly inside `(bpm_min, bpm_max)`.
    pub fn new(bpm_min: u32, bpm_max: u32) -> Self {
        Self {
            bpm_min,
            bpm_max,
            history: BeatHistory::default(),
            last_beat: None,
            latest: None,
        }
    }

    /// Called once per detected pulse edge.  Every beat restarts the interval,
    /// including beats whose rate gets rejected.
    pub fn on_beat_detected(&mut self, now: Timestamp) -> Option<HeartReading> {
        let previous = self.last_beat.replace(now)?;
        let delta_ms = now.checked_sub(previous).filter(|&d| d > 0)?;
        let bpm = 60_000 / delta_ms;

        if bpm <= u64::from(self.bpm_min) || bpm >= u64::from(self.bpm_max) {
            log::trace!("dropping implausible beat: {} BPM after {} ms", bpm, delta_ms);
            return None;
        }

        let instant_bpm = bpm as u32;
        let reading = HeartReading {
            instant_bpm,
            average_bpm: self.history.push(instant_bpm),
            at: now,
        };
        self.latest = Some(reading);
        Some(reading)
    }

    /// Latest accepted reading, however old.
    pub fn latest(&self) -> Option<HeartReading> {
        self.latest
    }

    pub fn history(&self) -> &BeatHistory {
        &self.history
    }
}

// ---------------------------------------------------------------------------
// Wellness advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WellnessAdvice {
    Stressed,
    Elevated,
    VeryRelaxed,
    Normal,
}

impl WellnessAdvice {
    pub fn assess(stressed: bool, heart_rate: f32) -> Self {
        if stressed {
            Self::Stressed
        } else if heart_rate > WELLNESS_ELEVATED_BPM {
            Self::Elevated
        } else if heart_rate < WELLNESS_VERY_RELAXED_BPM {
            Self::VeryRelaxed
        } else {
            Self::Normal
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Stressed => "You seem stressed! Try deep breathing for 1 minute.",
            Self::Elevated => "Heart rate elevated. Consider a short break.",
            Self::VeryRelaxed => "Very relaxed!",
            Self::Normal => "Heart rate normal.",
        }
    }

    /// Whether the advice asks the user to do something.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Stressed | Self::Elevated)
    }
}

// ---------------------------------------------------------------------------
// Pulse monitor
// ---------------------------------------------------------------------------

/// Estimator plus finger-presence tracking and the stress tracker it feeds.
///
/// Lifting the finger invalidates the current reading but keeps the rolling
/// window: when the finger comes back, averaging continues from the old
/// values instead of ramping up from zero again.
#[derive(Debug, Clone)]
pub struct PulseMonitor {
    estimator: HeartRateEstimator,
    stress: StressTracker,
    finger_ir_threshold: i64,
    finger_present: bool,
    valid: bool,
    ir: i64,
}

impl PulseMonitor {
    pub fn new(config: &FusionConfig) -> Self {
        Self {
            estimator: HeartRateEstimator::new(config.bpm_min, config.bpm_max),
            stress: StressTracker::new(config.stress),
            finger_ir_threshold: config.finger_ir_threshold,
            finger_present: false,
            valid: false,
            ir: 0,
        }
    }

    pub fn update(&mut self, sample: PulseSample, now: Timestamp) -> Option<HeartReading> {
        self.ir = sample.ir;

        if sample.beat {
            self.finger_present = true;
            let reading = self.estimator.on_beat_detected(now)?;
            self.valid = true;
            self.stress.update(reading.average_bpm, now);
            return Some(reading);
        }

        self.finger_present = sample.ir > self.finger_ir_threshold;
        if !self.finger_present {
            self.valid = false;
        }
        None
    }

    /// A reading exists and the finger is still on the sensor.
    pub fn has_valid_reading(&self) -> bool {
        self.valid && self.finger_present
    }

    /// Rolling average of the last accepted beats.
    pub fn heart_rate(&self) -> f32 {
        self.estimator.latest().map_or(0.0, |r| r.average_bpm)
    }

    pub fn bpm(&self) -> u32 {
        self.heart_rate() as u32
    }

    pub fn is_finger_present(&self) -> bool {
        self.finger_present
    }

    pub fn ir(&self) -> i64 {
        self.ir
    }

    pub fn stress(&self) -> StressState {
        self.stress.state()
    }

    pub fn is_stressed(&self) -> bool {
        self.stress.is_stressed()
    }

    pub fn wellness(&self) -> WellnessAdvice {
        WellnessAdvice::assess(self.is_stressed(), self.heart_rate())
    }

    pub fn estimator(&self) -> &HeartRateEstimator {
        &self.estimator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> HeartRateEstimator {
        HeartRateEstimator::new(20, 255)
    }

    fn beat(ir: i64) -> PulseSample {
        PulseSample { ir, beat: true }
    }

    fn no_beat(ir: i64) -> PulseSample {
        PulseSample { ir, beat: false }
    }

    #[test]
    fn one_second_apart_is_sixty_bpm() {
        let mut hr = estimator();
        assert_eq!(hr.on_beat_detected(5_000), None);
        let reading = hr.on_beat_detected(6_000).unwrap();
        assert_eq!(reading.instant_bpm, 60);
        assert_eq!(reading.at, 6_000);
    }

    #[test]
    fn six_hundred_bpm_is_rejected() {
        let mut hr = estimator();
        hr.on_beat_detected(1_000);
        for i in 1..20 {
            assert_eq!(hr.on_beat_detected(1_000 + i * 100), None);
        }
        assert_eq!(hr.history().rates(), &[0; BEAT_HISTORY_LEN]);
        assert_eq!(hr.latest(), None);
    }

    #[test]
    fn range_bounds_are_exclusive() {
        let mut hr = estimator();
        hr.on_beat_detected(0);
        // 60000 / 3000 = 20 BPM
        assert_eq!(hr.on_beat_detected(3_000), None);
        // 60000 / 2999 = 20 BPM after truncation
        assert_eq!(hr.on_beat_detected(5_999), None);
        // 60000 / 2857 = 21 BPM
        assert_eq!(hr.on_beat_detected(8_856).map(|r| r.instant_bpm), Some(21));
        // 60000 / 235 = 255 BPM
        assert_eq!(hr.on_beat_detected(9_091), None);
        // 60000 / 236 = 254 BPM
        assert_eq!(hr.on_beat_detected(9_327).map(|r| r.instant_bpm), Some(254));
    }

    #[test]
    fn rejected_beat_still_restarts_the_interval() {
        let mut hr = estimator();
        hr.on_beat_detected(0);
        assert_eq!(hr.on_beat_detected(100), None);
        assert_eq!(hr.on_beat_detected(1_100).map(|r| r.instant_bpm), Some(60));
    }

    #[test]
    fn repeated_timestamp_is_ignored() {
        let mut hr = estimator();
        hr.on_beat_detected(1_000);
        assert!(hr.on_beat_detected(2_000).is_some());
        assert_eq!(hr.on_beat_detected(2_000), None);
    }

    #[test]
    fn window_mean_ramps_over_four_beats() {
        let mut hr = estimator();
        let mut averages = Vec::new();
        for i in 0..6u64 {
            if let Some(r) = hr.on_beat_detected(i * 1_000) {
                averages.push(r.average_bpm);
            }
        }
        assert_eq!(averages, vec![15.0, 30.0, 45.0, 60.0, 60.0]);
    }

    #[test]
    fn window_replaces_oldest_sample() {
        let mut history = BeatHistory::default();
        for bpm in [60, 60, 60, 60] {
            history.push(bpm);
        }
        assert_eq!(history.push(100), 70.0);
        assert_eq!(history.rates(), &[100, 60, 60, 60]);
    }

    #[test]
    fn finger_removal_suppresses_but_keeps_the_window() {
        let mut pulse = PulseMonitor::new(&FusionConfig::default());
        for i in 0..5u64 {
            pulse.update(beat(90_000), i * 1_000);
        }
        assert!(pulse.has_valid_reading());
        assert_eq!(pulse.bpm(), 60);

        pulse.update(no_beat(1_200), 5_100);
        assert!(!pulse.is_finger_present());
        assert!(!pulse.has_valid_reading());
        // Stale value is still there.
        assert_eq!(pulse.heart_rate(), 60.0);
        assert_eq!(pulse.estimator().history().rates(), &[60; BEAT_HISTORY_LEN]);

        // Finger back: IR alone does not revalidate, the next accepted beat does.
        pulse.update(no_beat(80_000), 5_200);
        assert!(pulse.is_finger_present());
        assert!(!pulse.has_valid_reading());
        // First beat after the gap is far too slow and only restarts the interval.
        assert_eq!(pulse.update(beat(80_000), 12_000), None);
        let reading = pulse.update(beat(80_000), 12_750).unwrap();
        assert_eq!(reading.instant_bpm, 80);
        // Continuity: three old 60s plus the new 80.
        assert_eq!(reading.average_bpm, 65.0);
        assert!(pulse.has_valid_reading());
    }

    #[test]
    fn accepted_beats_drive_stress() {
        let mut pulse = PulseMonitor::new(&FusionConfig::default());
        // 500 ms apart = 120 BPM; window fills after four beats.
        for i in 0..15u64 {
            pulse.update(beat(90_000), i * 500);
        }
        assert!(pulse.is_stressed());
        assert_eq!(pulse.wellness(), WellnessAdvice::Stressed);
        assert!(pulse.wellness().needs_attention());
        assert!(pulse.stress().smoothed_heart_rate > 0.0);
    }

    #[test]
    fn wellness_priorities() {
        assert_eq!(WellnessAdvice::assess(true, 40.0), WellnessAdvice::Stressed);
        assert_eq!(WellnessAdvice::assess(false, 95.0), WellnessAdvice::Elevated);
        assert_eq!(WellnessAdvice::assess(false, 45.0), WellnessAdvice::VeryRelaxed);
        assert_eq!(WellnessAdvice::assess(false, 72.0), WellnessAdvice::Normal);
        assert!(!WellnessAdvice::Normal.needs_attention());
        assert!(!WellnessAdvice::VeryRelaxed.needs_attention());
    }
}
