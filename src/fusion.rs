// Mentora: Sensor Fusion Engine
//
// Owns every per-sensor component and folds one polling tick's raw samples
// into a `FusionSnapshot`.  Components never see each other: the tilt machine
// gets the current activity as an argument, and the snapshot is built only
// after every component has been updated.

use serde::Serialize;

use crate::clock::Clock;
use crate::config::*;
use crate::environment::{assess_climate, assess_light, ClimateAssessment, ComfortAdvice, LightAssessment};
use crate::events::{Activity, ClimateReading, Gesture, SensorFrame, Timestamp, TouchEvent, TouchLevels};
use crate::heart::{PulseMonitor, WellnessAdvice};
use crate::tilt::{TiltEventStateMachine, TiltPhase};
use crate::touch::TouchPatternDetector;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSection {
    #[serde(flatten)]
    pub assessment: LightAssessment,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateSection {
    #[serde(flatten)]
    pub assessment: ClimateAssessment,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSection {
    pub pad1: bool,
    pub pad2: bool,
    /// Latest gesture, however old; `detected_at` tells how stale it is.
    pub last: Option<TouchEvent>,
    pub response: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartSection {
    pub bpm: u32,
    pub heart_rate: f32,
    pub valid: bool,
    pub finger_present: bool,
    pub ir: i64,
    pub stress_level: u8,
    pub stressed: bool,
    pub smoothed_heart_rate: f32,
    pub stress_description: &'static str,
    pub wellness: WellnessAdvice,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltSection {
    pub phase: TiltPhase,
    pub tilted: bool,
    pub lifted: bool,
    pub sustained: bool,
    /// Announcement made during this tick, if any.
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FocusMode {
    Deep,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mood {
    Concerned,
    Encouraging,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMetrics {
    pub actively_studying: bool,
    pub focus_mode: FocusMode,
    pub attention_level: u8,
    pub needs_break: bool,
    pub total_study_ms: u64,
}

/// Fused view of one tick.  A section is `None` when its sensor is not wired
/// or has not produced a reading yet; that means "unknown", not zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionSnapshot {
    pub at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<LightSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<ClimateSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch: Option<TouchSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart: Option<HeartSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<TiltSection>,
    pub activity: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_session_start: Option<Timestamp>,
    pub focus_score: u8,
    pub recommendation: String,
    pub mood: Mood,
    pub metrics: StudyMetrics,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Latest value of a stateless sensor the engine may or may not be wired to.
#[derive(Debug, Clone)]
enum Channel<T> {
    Unwired,
    Awaiting,
    Reading(T),
}

impl<T: Copy> Channel<T> {
    fn record(&mut self, sample: Option<T>) {
        if matches!(self, Channel::Unwired) {
            return;
        }
        if let Some(value) = sample {
            *self = Channel::Reading(value);
        }
    }

    fn latest(&self) -> Option<T> {
        match self {
            Channel::Reading(value) => Some(*value),
            Channel::Unwired | Channel::Awaiting => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SensorFusion {
    config: FusionConfig,
    touch: Option<TouchPatternDetector>,
    tilt: Option<TiltEventStateMachine>,
    pulse: Option<PulseMonitor>,
    light: Channel<f32>,
    climate: Channel<ClimateReading>,
    activity: Activity,
    study_session_start: Option<Timestamp>,
}

impl SensorFusion {
    /// Engine with no sensors attached; wire them with the `with_*` methods.
    pub fn new(config: FusionConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            touch: None,
            tilt: None,
            pulse: None,
            light: Channel::Unwired,
            climate: Channel::Unwired,
            activity: Activity::Idle,
            study_session_start: None,
        })
    }

    /// Engine with every sensor attached, all digital inputs starting low.
    pub fn fully_wired(config: FusionConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config)?
            .with_touch(TouchLevels::default())
            .with_tilt(false)
            .with_pulse()
            .with_light()
            .with_climate())
    }

    pub fn with_touch(mut self, initial: TouchLevels) -> Self {
        self.touch = Some(TouchPatternDetector::new(self.config.touch_debounce_ms, initial));
        self
    }

    pub fn with_tilt(mut self, initial_level: bool) -> Self {
        self.tilt = Some(TiltEventStateMachine::new(
            self.config.tilt_debounce_ms,
            self.config.tilt_sustain_ms,
            initial_level,
        ));
        self
    }

    pub fn with_pulse(mut self) -> Self {
        self.pulse = Some(PulseMonitor::new(&self.config));
        self
    }

    pub fn with_light(mut self) -> Self {
        self.light = Channel::Awaiting;
        self
    }

    pub fn with_climate(mut self) -> Self {
        self.climate = Channel::Awaiting;
        self
    }

    /// Run one fusion tick at `now`.
    pub fn tick(&mut self, now: Timestamp, frame: &SensorFrame) -> FusionSnapshot {
        let gesture = match (self.touch.as_mut(), frame.touch) {
            (Some(touch), Some(levels)) => touch.update(levels, now),
            _ => Gesture::None,
        };
        if gesture == Gesture::Pad2 {
            self.set_activity(self.activity.toggled(), now);
        }

        let activity = self.activity;
        let tilt_message = self.tilt.as_mut().and_then(|tilt| {
            if let Some(raw) = frame.tilt {
                tilt.update(raw, now);
            }
            tilt.contextual_response(activity, now)
        });

        if let (Some(pulse), Some(sample)) = (self.pulse.as_mut(), frame.pulse) {
            pulse.update(sample, now);
        }

        self.light.record(frame.lux);
        self.climate.record(frame.climate);

        self.snapshot(now, tilt_message)
    }

    /// `tick` with the time taken from `clock`.
    pub fn poll(&mut self, clock: &impl Clock, frame: &SensorFrame) -> FusionSnapshot {
        self.tick(clock.now_ms(), frame)
    }

    /// Declare what the user is doing.  Entering `Studying` starts a new study
    /// session; leaving it ends the session.
    pub fn set_activity(&mut self, activity: Activity, now: Timestamp) {
        if activity == self.activity {
            return;
        }
        self.study_session_start = match activity {
            Activity::Studying => Some(now),
            Activity::Idle | Activity::Chatting | Activity::Playing => None,
        };
        log::info!("activity {} -> {}", self.activity.label(), activity.label());
        self.activity = activity;
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn touch(&self) -> Option<&TouchPatternDetector> {
        self.touch.as_ref()
    }

    pub fn tilt(&self) -> Option<&TiltEventStateMachine> {
        self.tilt.as_ref()
    }

    pub fn pulse(&self) -> Option<&PulseMonitor> {
        self.pulse.as_ref()
    }

    fn snapshot(&self, now: Timestamp, tilt_message: Option<&'static str>) -> FusionSnapshot {
        let light = self.light.latest().map(|lux| {
            let assessment = assess_light(lux);
            LightSection {
                assessment,
                recommendation: assessment.advice.message(),
            }
        });

        let climate = self.climate.latest().map(|reading| {
            let assessment = assess_climate(reading);
            ClimateSection {
                assessment,
                recommendation: assessment.advice.message(),
            }
        });

        let touch = self.touch.as_ref().map(|touch| {
            let levels = touch.levels();
            TouchSection {
                pad1: levels.pad1,
                pad2: levels.pad2,
                last: touch.last_gesture(),
                response: touch.response(),
            }
        });

        let heart = self.pulse.as_ref().map(|pulse| {
            let stress = pulse.stress();
            let wellness = pulse.wellness();
            HeartSection {
                bpm: pulse.bpm(),
                heart_rate: pulse.heart_rate(),
                valid: pulse.has_valid_reading(),
                finger_present: pulse.is_finger_present(),
                ir: pulse.ir(),
                stress_level: stress.score,
                stressed: stress.stressed,
                smoothed_heart_rate: stress.smoothed_heart_rate,
                stress_description: stress.description(),
                wellness,
                recommendation: wellness.message(),
            }
        });

        let tilt = self.tilt.as_ref().map(|tilt| TiltSection {
            phase: tilt.phase(),
            tilted: tilt.is_tilted(),
            lifted: tilt.is_lifted(),
            sustained: tilt.is_sustained(now),
            message: tilt_message,
        });

        let good_light = light.as_ref().is_some_and(|l| l.assessment.good_for_study);
        let stressed = heart.as_ref().is_some_and(|h| h.stressed);
        let focus_score = self.focus_score(good_light, heart.is_some() && !stressed);
        let recommendation = recommendation(light.as_ref(), climate.as_ref(), heart.as_ref());

        let mood = if stressed {
            Mood::Concerned
        } else if good_light {
            Mood::Encouraging
        } else {
            Mood::Neutral
        };

        let studying = self.activity == Activity::Studying;
        let metrics = StudyMetrics {
            actively_studying: studying,
            focus_mode: if studying { FocusMode::Deep } else { FocusMode::Idle },
            attention_level: focus_score,
            needs_break: stressed,
            total_study_ms: self
                .study_session_start
                .map_or(0, |start| now.saturating_sub(start)),
        };

        FusionSnapshot {
            at: now,
            light,
            climate,
            touch,
            heart,
            tilt,
            activity: self.activity,
            study_session_start: self.study_session_start,
            focus_score,
            recommendation,
            mood,
            metrics,
        }
    }

    fn focus_score(&self, good_light: bool, calm: bool) -> u8 {
        let mut score = FOCUS_BASE;
        if good_light {
            score += FOCUS_GOOD_LIGHT_BONUS;
        }
        if calm {
            score += FOCUS_CALM_BONUS;
        }
        if self.activity == Activity::Studying {
            score += FOCUS_STUDYING_BONUS;
        }
        score.clamp(0, 100) as u8
    }
}

/// Advice from every section that is currently off, each followed by a space.
fn recommendation(
    light: Option<&LightSection>,
    climate: Option<&ClimateSection>,
    heart: Option<&HeartSection>,
) -> String {
    let mut out = String::new();
    let mut append = |message: &str| {
        out.push_str(message);
        out.push(' ');
    };

    if let Some(light) = light.filter(|l| !l.assessment.good_for_study) {
        append(light.recommendation);
    }
    if let Some(climate) = climate.filter(|c| c.assessment.advice != ComfortAdvice::Comfortable) {
        append(climate.recommendation);
    }
    if let Some(heart) = heart.filter(|h| h.valid && h.wellness.needs_attention()) {
        append(heart.recommendation);
    }
    out
}
