// Mentora: Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and take the peripherals.
//   2. Configure the two touch pads and the tilt switch (pull-up).
//   3. Bring up the shared I2C bus for the BH1750 light sensor.
//   4. Spawn the fusion task; the main thread parks.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{IOPin, InputPin, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use mentora::config::*;

    use crate::tasks::fusion::FusionPins;

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Mentora firmware starting");

    let peripherals = Peripherals::take()?;

    // ---- Digital inputs ---------------------------------------------------
    let touch1 = PinDriver::input(peripherals.pins.gpio32.downgrade_input())?;
    let touch2 = PinDriver::input(peripherals.pins.gpio33.downgrade_input())?;
    let mut tilt = PinDriver::input(peripherals.pins.gpio27.downgrade())?;
    tilt.set_pull(Pull::Up)?;
    log::info!(
        "Touch pads on GPIO{}/GPIO{}, tilt switch on GPIO{}",
        PIN_TOUCH_1,
        PIN_TOUCH_2,
        PIN_TILT
    );

    let pins = FusionPins { touch1, touch2, tilt };

    // ---- I2C bus ----------------------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21, // SDA
        peripherals.pins.gpio22, // SCL
        &i2c_config,
    )?;
    log::info!("I2C bus up (SDA GPIO{}, SCL GPIO{})", PIN_I2C_SDA, PIN_I2C_SCL);
    // SAFETY: the I2C peripheral is a singleton from `Peripherals::take()` and
    // lives for the whole programme.
    let i2c_bus: &'static Mutex<I2cDriver<'static>> =
        Box::leak(Box::new(Mutex::new(unsafe { core::mem::transmute(i2c) })));

    thread::Builder::new()
        .name("fusion".into())
        .stack_size(STACK_FUSION)
        .spawn(move || {
            tasks::fusion::fusion_task(i2c_bus, pins);
        })?;

    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("mentora firmware targets ESP-IDF; build with the xtensa-esp32-espidf target");
}
