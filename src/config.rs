// Mentora: Hardware & System Configuration
// Target: ESP32 DevKit (Xtensa), desk study-companion board

use anyhow::ensure;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_TOUCH_1: i32 = 32;    // TTP223 pad 1 (active HIGH)
pub const PIN_TOUCH_2: i32 = 33;    // TTP223 pad 2 (active HIGH)
pub const PIN_TILT: i32 = 27;       // SW-520D tilt switch (INPUT_PULLUP)
pub const PIN_I2C_SDA: i32 = 21;
pub const PIN_I2C_SCL: i32 = 22;

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_BH1750: u8 = 0x23;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_FUSION: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const FUSION_POLL_INTERVAL_MS: u64 = 10;    // 100 Hz input poll
pub const LIGHT_READ_INTERVAL_MS: u64 = 1000;
pub const STATUS_REPORT_INTERVAL_MS: u64 = 2000;
pub const TOUCH_DEBOUNCE_MS: u64 = 40;
pub const TILT_DEBOUNCE_MS: u64 = 100;
pub const TILT_SUSTAIN_MS: u64 = 500;           // "held up" rather than bumped

// ---------------------------------------------------------------------------
// Heart Rate (MAX30102)
// ---------------------------------------------------------------------------
pub const BEAT_HISTORY_LEN: usize = 4;
pub const BPM_MIN_EXCLUSIVE: u32 = 20;
pub const BPM_MAX_EXCLUSIVE: u32 = 255;
pub const FINGER_IR_THRESHOLD: i64 = 50_000;

// ---------------------------------------------------------------------------
// Stress Hysteresis
// ---------------------------------------------------------------------------
pub const STRESS_RISE_ABOVE_BPM: f32 = 100.0;
pub const STRESS_RELAX_BELOW_BPM: f32 = 60.0;
pub const STRESS_NEUTRAL_CEILING_BPM: f32 = 80.0;
pub const STRESS_MAX_SCORE: u8 = 5;
pub const STRESSED_AT_SCORE: u8 = 3;
pub const HEART_RATE_SMOOTHING: f32 = 0.1;
pub const WELLNESS_ELEVATED_BPM: f32 = 90.0;
pub const WELLNESS_VERY_RELAXED_BPM: f32 = 50.0;

// ---------------------------------------------------------------------------
// Light (BH1750)
// ---------------------------------------------------------------------------
/// Ascending upper bounds for VeryDark, Dark, Dim, Good, Bright.
pub const LUX_LEVEL_BOUNDS: [f32; 5] = [10.0, 50.0, 200.0, 500.0, 1000.0];
pub const LUX_STUDY_MIN: f32 = 300.0;
pub const LUX_STUDY_MAX: f32 = 750.0;
pub const LUX_DARK_BELOW: f32 = 100.0;
pub const LUX_BRIGHT_ABOVE: f32 = 1000.0;
pub const BH1750_COUNTS_PER_LUX: f32 = 1.2;

// ---------------------------------------------------------------------------
// Climate (DHT22)
// ---------------------------------------------------------------------------
pub const TEMP_COMFORT_MIN_C: f32 = 20.0;
pub const TEMP_COMFORT_MAX_C: f32 = 26.0;
pub const HUMIDITY_COMFORT_MIN: f32 = 30.0;
pub const HUMIDITY_COMFORT_MAX: f32 = 60.0;
pub const TEMP_TOO_HOT_C: f32 = 28.0;
pub const TEMP_TOO_COLD_C: f32 = 18.0;
pub const HUMIDITY_TOO_HUMID: f32 = 70.0;
pub const HUMIDITY_TOO_DRY: f32 = 25.0;

// ---------------------------------------------------------------------------
// Focus Score
// ---------------------------------------------------------------------------
pub const FOCUS_BASE: i32 = 50;
pub const FOCUS_GOOD_LIGHT_BONUS: i32 = 20;
pub const FOCUS_CALM_BONUS: i32 = 20;
pub const FOCUS_STUDYING_BONUS: i32 = 10;

// ---------------------------------------------------------------------------
// Runtime thresholds
// ---------------------------------------------------------------------------

/// Stress hysteresis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressConfig {
    /// Heart rates strictly above this raise the score.
    pub rise_above_bpm: f32,
    /// Heart rates strictly below this lower the score.
    pub relax_below_bpm: f32,
    /// Upper edge of the neutral band `[relax_below_bpm, neutral_ceiling_bpm]`,
    /// which also lowers the score.
    pub neutral_ceiling_bpm: f32,
    pub max_score: u8,
    pub stressed_at: u8,
    /// Weight of the newest sample in the smoothed heart rate.
    pub smoothing: f32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            rise_above_bpm: STRESS_RISE_ABOVE_BPM,
            relax_below_bpm: STRESS_RELAX_BELOW_BPM,
            neutral_ceiling_bpm: STRESS_NEUTRAL_CEILING_BPM,
            max_score: STRESS_MAX_SCORE,
            stressed_at: STRESSED_AT_SCORE,
            smoothing: HEART_RATE_SMOOTHING,
        }
    }
}

/// Every threshold the fusion core consults while ticking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionConfig {
    pub touch_debounce_ms: u64,
    pub tilt_debounce_ms: u64,
    pub tilt_sustain_ms: u64,
    /// Exclusive lower bound of an accepted instantaneous BPM.
    pub bpm_min: u32,
    /// Exclusive upper bound of an accepted instantaneous BPM.
    pub bpm_max: u32,
    pub finger_ir_threshold: i64,
    pub stress: StressConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            touch_debounce_ms: TOUCH_DEBOUNCE_MS,
            tilt_debounce_ms: TILT_DEBOUNCE_MS,
            tilt_sustain_ms: TILT_SUSTAIN_MS,
            bpm_min: BPM_MIN_EXCLUSIVE,
            bpm_max: BPM_MAX_EXCLUSIVE,
            finger_ir_threshold: FINGER_IR_THRESHOLD,
            stress: StressConfig::default(),
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.touch_debounce_ms > 0, "touch debounce must be non-zero");
        ensure!(self.tilt_debounce_ms > 0, "tilt debounce must be non-zero");
        ensure!(
            self.bpm_min.saturating_add(1) < self.bpm_max,
            "accepted BPM range ({}, {}) is empty",
            self.bpm_min,
            self.bpm_max
        );

        let s = &self.stress;
        ensure!(
            s.smoothing > 0.0 && s.smoothing <= 1.0,
            "heart-rate smoothing {} outside (0, 1]",
            s.smoothing
        );
        ensure!(
            s.relax_below_bpm <= s.neutral_ceiling_bpm,
            "neutral band [{}, {}] is inverted",
            s.relax_below_bpm,
            s.neutral_ceiling_bpm
        );
        ensure!(
            s.neutral_ceiling_bpm <= s.rise_above_bpm,
            "neutral band ceiling {} above stress rise threshold {}",
            s.neutral_ceiling_bpm,
            s.rise_above_bpm
        );
        ensure!(s.max_score > 0, "stress score ceiling must be non-zero");
        ensure!(
            s.stressed_at <= s.max_score,
            "stressed threshold {} above score ceiling {}",
            s.stressed_at,
            s.max_score
        );
        Ok(())
    }
}
