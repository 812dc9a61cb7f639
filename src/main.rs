//! Useless-box Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single polling control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink   RandAdapter           │
//! │  (Servo+Sensor+Indicator  (EventSink)    (RandomPort)          │
//! │   +Clock)                                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  FSM · policy · UselessBox mechanism                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::{error, info};

use uselessbox::adapters::hardware::HardwareAdapter;
use uselessbox::adapters::log_sink::LogEventSink;
use uselessbox::adapters::random::RandAdapter;
use uselessbox::app::controller::Controller;
use uselessbox::config::BoxConfig;
use uselessbox::pins;

// ── Config ────────────────────────────────────────────────────

/// Defaults, or the JSON baked in through `USELESSBOX_CONFIG` at build
/// time.  A malformed override is fatal.
fn load_config() -> Result<BoxConfig> {
    match option_env!("USELESSBOX_CONFIG") {
        Some(json) => {
            let config = BoxConfig::from_json(json).context("USELESSBOX_CONFIG rejected")?;
            info!("Config: build-time override applied");
            Ok(config)
        }
        None => {
            let config = BoxConfig::default();
            config.validate().context("default config invalid")?;
            info!("Config: defaults");
            Ok(config)
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Useless Box v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (fail fast) ─────────────────────────────────
    let config = load_config()?;

    // ── 3. I2C bus ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c_config = I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz());
    // SDA/SCL match pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6,
        peripherals.pins.gpio7,
        &i2c_config,
    )?;

    // ── 4. Adapters (peripherals, servos, sensors) ────────────
    let mut hw = match HardwareAdapter::bring_up(i2c) {
        Ok(hw) => hw,
        Err(e) => {
            error!("Hardware bring-up failed: {}", e);
            return Err(e.into());
        }
    };
    let mut rng = RandAdapter::from_thread_rng();
    let mut sink = LogEventSink::new();

    // ── 5. Controller (resets the mechanism) ──────────────────
    let mut controller = Controller::new(config, &mut hw, &mut sink)?;

    info!("Entering control loop");
    controller.run(&mut hw, &mut rng, &mut sink)
}
