// Mentora: Fusion Task
//
// Single polling loop: samples the touch pads and the tilt switch every tick,
// reads the light sensor once a second, and runs one fusion tick.  Tilt
// announcements are logged as they happen; a status line goes out every few
// seconds.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, Input, PinDriver};

use mentora::config::*;
use mentora::events::{SensorFrame, TouchLevels};
use mentora::fusion::FusionSnapshot;
use mentora::{Clock, MonotonicClock, SensorFusion};

use crate::drivers::light::{Bh1750, SharedBus};

pub struct FusionPins {
    pub touch1: PinDriver<'static, AnyInputPin, Input>,
    pub touch2: PinDriver<'static, AnyInputPin, Input>,
    pub tilt: PinDriver<'static, AnyIOPin, Input>,
}

impl FusionPins {
    fn touch_levels(&self) -> TouchLevels {
        TouchLevels {
            pad1: self.touch1.is_high(),
            pad2: self.touch2.is_high(),
        }
    }
}

pub fn fusion_task(bus: SharedBus, pins: FusionPins) {
    log::info!("Fusion task started");

    let light = Bh1750::new(bus);
    let light_ok = match light.init() {
        Ok(()) => true,
        Err(e) => {
            log::error!("BH1750 init failed, running without light sensing: {}", e);
            false
        }
    };

    let clock = MonotonicClock::new();
    // TODO: attach the climate and pulse channels once the DHT22 single-wire
    // reader and the MAX30102 beat detector are ported.
    let mut fusion = match SensorFusion::new(FusionConfig::default()) {
        Ok(engine) => engine
            .with_touch(pins.touch_levels())
            .with_tilt(pins.tilt.is_high()),
        Err(e) => {
            log::error!("Fusion config rejected: {:#}", e);
            return;
        }
    };
    if light_ok {
        fusion = fusion.with_light();
    }

    let interval = Duration::from_millis(FUSION_POLL_INTERVAL_MS);
    let mut last_light_read: Option<u64> = None;
    let mut last_report = 0u64;

    loop {
        let now = clock.now_ms();

        let lux_due = light_ok
            && last_light_read.map_or(true, |t| now.saturating_sub(t) >= LIGHT_READ_INTERVAL_MS);
        let lux = if lux_due {
            last_light_read = Some(now);
            match light.read_lux() {
                Ok(lux) => Some(lux),
                Err(e) => {
                    log::warn!("BH1750 read error: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let frame = SensorFrame {
            touch: Some(pins.touch_levels()),
            tilt: Some(pins.tilt.is_high()),
            lux,
            ..SensorFrame::default()
        };
        let snapshot = fusion.tick(now, &frame);

        if let Some(message) = snapshot.tilt.as_ref().and_then(|t| t.message) {
            log::info!("Mentora says: {}", message);
        }
        if now.saturating_sub(last_report) >= STATUS_REPORT_INTERVAL_MS {
            last_report = now;
            report(&snapshot);
        }

        let elapsed = Duration::from_millis(clock.now_ms().saturating_sub(now));
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

fn report(snapshot: &FusionSnapshot) {
    let lux = snapshot.light.as_ref().map(|l| l.assessment.lux);
    log::info!(
        "activity={} focus={} mood={:?} lux={:?} study_ms={}",
        snapshot.activity.label(),
        snapshot.focus_score,
        snapshot.mood,
        lux,
        snapshot.metrics.total_study_ms,
    );
    if !snapshot.recommendation.is_empty() {
        log::info!("Recommendation: {}", snapshot.recommendation.trim_end());
    }
}
