//! Mentora study-companion firmware core.
//!
//! Hardware-independent signal processing and sensor fusion: debounced touch
//! and tilt inputs, heart-rate estimation with stress tracking, light and
//! climate classification, and the engine that fuses them once per polling
//! tick.  Everything here runs on the host; the ESP-IDF bring-up lives in the
//! firmware binary.

pub mod clock;
pub mod config;
pub mod environment;
pub mod events;
pub mod fusion;
pub mod heart;
pub mod input;
pub mod stress;
pub mod tilt;
pub mod touch;

pub use clock::{Clock, MonotonicClock};
pub use config::{FusionConfig, StressConfig};
pub use events::{Activity, ClimateReading, Gesture, PulseSample, SensorFrame, Timestamp, TouchLevels};
pub use fusion::{FusionSnapshot, SensorFusion};
