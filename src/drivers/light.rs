// Mentora: BH1750 Ambient Light Driver
//
// Register-less command interface over the shared I2C bus.

use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use esp_idf_hal::i2c::I2cDriver;

use mentora::config::*;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

// BH1750 opcodes
const CMD_POWER_ON: u8 = 0x01;
const CMD_RESET: u8 = 0x07;
const CMD_CONTINUOUS_H_RES: u8 = 0x10; // 1 lx resolution, ~120 ms per conversion

pub struct Bh1750 {
    bus: SharedBus,
}

impl Bh1750 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'static, I2cDriver<'static>>> {
        self.bus.lock().map_err(|_| anyhow!("I2C bus mutex poisoned"))
    }

    /// Power up, clear the data register and start continuous measurement.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self.lock()?;
        bus.write(I2C_ADDR_BH1750, &[CMD_POWER_ON], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_BH1750, &[CMD_RESET], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_BH1750, &[CMD_CONTINUOUS_H_RES], I2C_TIMEOUT_TICKS)?;
        log::info!("BH1750 initialised (continuous, high resolution)");
        Ok(())
    }

    /// Latest conversion in lux.
    pub fn read_lux(&self) -> anyhow::Result<f32> {
        let mut bus = self.lock()?;
        let mut raw = [0u8; 2];
        bus.read(I2C_ADDR_BH1750, &mut raw, I2C_TIMEOUT_TICKS)?;
        Ok(u16::from_be_bytes(raw) as f32 / BH1750_COUNTS_PER_LUX)
    }
}
