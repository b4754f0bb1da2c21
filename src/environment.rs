// Mentora: Environment Classifier
//
// Stateless lookups from BH1750 lux and DHT22 temperature/humidity to
// categories and advice.

use serde::Serialize;

use crate::config::*;
use crate::events::ClimateReading;

// ---------------------------------------------------------------------------
// Light
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LightLevel {
    VeryDark,
    Dark,
    Dim,
    Good,
    Bright,
    VeryBright,
}

impl LightLevel {
    pub fn from_lux(lux: f32) -> Self {
        const LEVELS: [LightLevel; 5] = [
            LightLevel::VeryDark,
            LightLevel::Dark,
            LightLevel::Dim,
            LightLevel::Good,
            LightLevel::Bright,
        ];
        LUX_LEVEL_BOUNDS
            .iter()
            .zip(LEVELS)
            .find(|(bound, _)| lux < **bound)
            .map_or(LightLevel::VeryBright, |(_, level)| level)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryDark => "Very Dark",
            Self::Dark => "Dark",
            Self::Dim => "Dim",
            Self::Good => "Good",
            Self::Bright => "Bright",
            Self::VeryBright => "Very Bright",
        }
    }
}

pub fn is_good_for_studying(lux: f32) -> bool {
    (LUX_STUDY_MIN..=LUX_STUDY_MAX).contains(&lux)
}

pub fn is_dark(lux: f32) -> bool {
    lux < LUX_DARK_BELOW
}

pub fn is_bright(lux: f32) -> bool {
    lux > LUX_BRIGHT_ABOVE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LightAdvice {
    TooDark,
    TooBright,
    Perfect,
    Okay,
}

impl LightAdvice {
    pub fn for_lux(lux: f32) -> Self {
        if is_dark(lux) {
            Self::TooDark
        } else if is_bright(lux) {
            Self::TooBright
        } else if is_good_for_studying(lux) {
            Self::Perfect
        } else {
            Self::Okay
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::TooDark => "Too dark for studying! Turn on more lights.",
            Self::TooBright => "Very bright! Consider reducing glare.",
            Self::Perfect => "Perfect lighting for studying!",
            Self::Okay => "Lighting is okay, but could be better.",
        }
    }
}

/// Everything derived from one lux value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightAssessment {
    pub lux: f32,
    pub level: LightLevel,
    pub good_for_study: bool,
    pub dark: bool,
    pub bright: bool,
    pub advice: LightAdvice,
}

pub fn assess_light(lux: f32) -> LightAssessment {
    LightAssessment {
        lux,
        level: LightLevel::from_lux(lux),
        good_for_study: is_good_for_studying(lux),
        dark: is_dark(lux),
        bright: is_bright(lux),
        advice: LightAdvice::for_lux(lux),
    }
}

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureStatus {
    VeryCold,
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
    VeryHot,
}

impl TemperatureStatus {
    pub fn from_celsius(t: f32) -> Self {
        if t < 18.0 {
            Self::VeryCold
        } else if t < 20.0 {
            Self::Cold
        } else if t < 22.0 {
            Self::Cool
        } else if t <= 26.0 {
            Self::Comfortable
        } else if t < 28.0 {
            Self::Warm
        } else if t < 30.0 {
            Self::Hot
        } else {
            Self::VeryHot
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HumidityStatus {
    VeryDry,
    Dry,
    Comfortable,
    Humid,
    VeryHumid,
    ExtremelyHumid,
}

impl HumidityStatus {
    pub fn from_percent(h: f32) -> Self {
        if h < 20.0 {
            Self::VeryDry
        } else if h < 30.0 {
            Self::Dry
        } else if h <= 60.0 {
            Self::Comfortable
        } else if h < 70.0 {
            Self::Humid
        } else if h < 80.0 {
            Self::VeryHumid
        } else {
            Self::ExtremelyHumid
        }
    }
}

/// Comfort advice, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComfortAdvice {
    TooHot,
    TooCold,
    TooHumid,
    TooDry,
    Comfortable,
    Neutral,
}

impl ComfortAdvice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooHot => "Too hot for optimal studying! Try cooling the room.",
            Self::TooCold => "Too cold! Consider warming up the room.",
            Self::TooHumid => "Very humid! Improve ventilation.",
            Self::TooDry => "Air is too dry. A humidifier could help.",
            Self::Comfortable => "Perfect temperature and humidity for studying!",
            Self::Neutral => "Environment is okay but could be optimized.",
        }
    }
}

impl ClimateReading {
    pub fn is_temperature_comfortable(&self) -> bool {
        (TEMP_COMFORT_MIN_C..=TEMP_COMFORT_MAX_C).contains(&self.temperature_c)
    }

    pub fn is_humidity_comfortable(&self) -> bool {
        (HUMIDITY_COMFORT_MIN..=HUMIDITY_COMFORT_MAX).contains(&self.humidity_pct)
    }

    pub fn is_comfortable(&self) -> bool {
        self.is_temperature_comfortable() && self.is_humidity_comfortable()
    }

    pub fn is_too_hot(&self) -> bool {
        self.temperature_c > TEMP_TOO_HOT_C
    }

    pub fn is_too_cold(&self) -> bool {
        self.temperature_c < TEMP_TOO_COLD_C
    }

    pub fn is_too_humid(&self) -> bool {
        self.humidity_pct > HUMIDITY_TOO_HUMID
    }

    pub fn is_too_dry(&self) -> bool {
        self.humidity_pct < HUMIDITY_TOO_DRY
    }

    pub fn advice(&self) -> ComfortAdvice {
        if self.is_too_hot() {
            ComfortAdvice::TooHot
        } else if self.is_too_cold() {
            ComfortAdvice::TooCold
        } else if self.is_too_humid() {
            ComfortAdvice::TooHumid
        } else if self.is_too_dry() {
            ComfortAdvice::TooDry
        } else if self.is_comfortable() {
            ComfortAdvice::Comfortable
        } else {
            ComfortAdvice::Neutral
        }
    }

    /// Apparent temperature in Celsius (NOAA: Steadman's short form, switching
    /// to the Rothfusz regression and its corrections above 79 F).
    pub fn heat_index_c(&self) -> f32 {
        let t = self.temperature_c * 1.8 + 32.0;
        let h = self.humidity_pct;

        let mut hi = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + h * 0.094);
        if hi > 79.0 {
            hi = -42.379 + 2.049_015_2 * t + 10.143_331 * h
                - 0.224_755_4 * t * h
                - 0.006_837_83 * t * t
                - 0.054_817_17 * h * h
                + 0.001_228_74 * t * t * h
                + 0.000_852_82 * t * h * h
                - 0.000_001_99 * t * t * h * h;

            if h < 13.0 && (80.0..=112.0).contains(&t) {
                hi -= (13.0 - h) * 0.25 * ((17.0 - (t - 95.0).abs()) * 0.058_82).sqrt();
            } else if h > 85.0 && (80.0..=87.0).contains(&t) {
                hi += (h - 85.0) * 0.1 * ((87.0 - t) * 0.2);
            }
        }
        (hi - 32.0) / 1.8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateAssessment {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub heat_index_c: f32,
    pub temperature_status: TemperatureStatus,
    pub humidity_status: HumidityStatus,
    pub temperature_comfortable: bool,
    pub humidity_comfortable: bool,
    pub comfortable: bool,
    pub advice: ComfortAdvice,
}

pub fn assess_climate(reading: ClimateReading) -> ClimateAssessment {
    ClimateAssessment {
        temperature_c: reading.temperature_c,
        humidity_pct: reading.humidity_pct,
        heat_index_c: reading.heat_index_c(),
        temperature_status: TemperatureStatus::from_celsius(reading.temperature_c),
        humidity_status: HumidityStatus::from_percent(reading.humidity_pct),
        temperature_comfortable: reading.is_temperature_comfortable(),
        humidity_comfortable: reading.is_humidity_comfortable(),
        comfortable: reading.is_comfortable(),
        advice: reading.advice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(temperature_c: f32, humidity_pct: f32) -> ClimateReading {
        ClimateReading { temperature_c, humidity_pct }
    }

    #[test]
    fn lux_levels_follow_ascending_bounds() {
        let cases = [
            (0.0, LightLevel::VeryDark),
            (9.9, LightLevel::VeryDark),
            (10.0, LightLevel::Dark),
            (49.0, LightLevel::Dark),
            (50.0, LightLevel::Dim),
            (199.0, LightLevel::Dim),
            (200.0, LightLevel::Good),
            (499.0, LightLevel::Good),
            (500.0, LightLevel::Bright),
            (999.0, LightLevel::Bright),
            (1000.0, LightLevel::VeryBright),
            (65535.0, LightLevel::VeryBright),
        ];
        for (lux, level) in cases {
            assert_eq!(LightLevel::from_lux(lux), level, "lux {}", lux);
        }
    }

    #[test]
    fn four_hundred_lux_is_good_for_studying() {
        let light = assess_light(400.0);
        assert_eq!(light.level, LightLevel::Good);
        assert_eq!(light.level.label(), "Good");
        assert!(light.good_for_study);
        assert_eq!(light.advice, LightAdvice::Perfect);
    }

    #[test]
    fn five_lux_is_very_dark_with_advice() {
        let light = assess_light(5.0);
        assert_eq!(light.level.label(), "Very Dark");
        assert!(light.dark);
        assert!(!light.good_for_study);
        assert_eq!(light.advice, LightAdvice::TooDark);
        assert!(!light.advice.message().is_empty());
    }

    #[test]
    fn study_band_is_inclusive() {
        assert!(is_good_for_studying(300.0));
        assert!(is_good_for_studying(750.0));
        assert!(!is_good_for_studying(299.9));
        assert!(!is_good_for_studying(750.1));
        // Bright level but still within the study band.
        assert_eq!(LightLevel::from_lux(600.0), LightLevel::Bright);
        assert!(is_good_for_studying(600.0));
    }

    #[test]
    fn light_advice_priorities() {
        assert_eq!(LightAdvice::for_lux(1200.0), LightAdvice::TooBright);
        assert_eq!(LightAdvice::for_lux(150.0), LightAdvice::Okay);
        assert_eq!(LightAdvice::for_lux(900.0), LightAdvice::Okay);
    }

    #[test]
    fn comfort_bands() {
        let room = climate(23.0, 45.0);
        assert!(room.is_comfortable());
        assert_eq!(room.advice(), ComfortAdvice::Comfortable);

        assert!(climate(20.0, 30.0).is_comfortable());
        assert!(climate(26.0, 60.0).is_comfortable());
        assert!(!climate(26.1, 45.0).is_temperature_comfortable());
        assert!(!climate(23.0, 29.0).is_humidity_comfortable());
    }

    #[test]
    fn comfort_advice_priority_order() {
        // Hot beats humid.
        assert_eq!(climate(30.0, 90.0).advice(), ComfortAdvice::TooHot);
        // Cold beats dry.
        assert_eq!(climate(15.0, 10.0).advice(), ComfortAdvice::TooCold);
        // Humid beats everything below it.
        assert_eq!(climate(23.0, 75.0).advice(), ComfortAdvice::TooHumid);
        assert_eq!(climate(23.0, 20.0).advice(), ComfortAdvice::TooDry);
        // Outside the comfort band but not extreme.
        assert_eq!(climate(27.0, 50.0).advice(), ComfortAdvice::Neutral);
        assert_eq!(climate(23.0, 65.0).advice(), ComfortAdvice::Neutral);
    }

    #[test]
    fn status_tables() {
        assert_eq!(TemperatureStatus::from_celsius(17.9), TemperatureStatus::VeryCold);
        assert_eq!(TemperatureStatus::from_celsius(21.0), TemperatureStatus::Cool);
        assert_eq!(TemperatureStatus::from_celsius(26.0), TemperatureStatus::Comfortable);
        assert_eq!(TemperatureStatus::from_celsius(29.0), TemperatureStatus::Hot);
        assert_eq!(TemperatureStatus::from_celsius(30.0), TemperatureStatus::VeryHot);
        assert_eq!(HumidityStatus::from_percent(25.0), HumidityStatus::Dry);
        assert_eq!(HumidityStatus::from_percent(60.0), HumidityStatus::Comfortable);
        assert_eq!(HumidityStatus::from_percent(75.0), HumidityStatus::VeryHumid);
        assert_eq!(HumidityStatus::from_percent(95.0), HumidityStatus::ExtremelyHumid);
    }

    #[test]
    fn heat_index_tracks_air_temperature_when_mild() {
        // Simple formula region: 20 C / 50 % comes out within a degree.
        let mild = climate(20.0, 50.0).heat_index_c();
        assert!((mild - 20.0).abs() < 1.0, "{}", mild);
    }

    #[test]
    fn heat_index_rises_in_humid_heat() {
        // NOAA table: 32 C (90 F) at 70 % feels like about 41 C (106 F).
        let muggy = climate(32.0, 70.0).heat_index_c();
        assert!((muggy - 41.0).abs() < 1.5, "{}", muggy);
    }
}
