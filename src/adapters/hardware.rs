//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor and actuator drivers plus the clock, exposing them
//! through [`ServoPort`], [`SensorPort`], [`IndicatorPort`] and
//! [`ClockPort`] so the controller takes a single `&mut` borrow.  This is
//! the only module in the system that touches actual hardware.  On
//! non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{ClockPort, IndicatorPort, Joint, SensorPort, ServoPort};
use crate::drivers::hw_init;
use crate::drivers::indicator_led::IndicatorLed;
use crate::drivers::servo::ServoDriver;
use crate::error::{self, SensorError};
use crate::pins;
use crate::sensors::proximity::{DEFAULT_LOW_THRESHOLD, ProximitySensor};
use crate::sensors::toggle::ToggleSwitch;

/// Proximity reads between init retries while the sensor is down.
const PROXIMITY_RETRY_READS: u32 = 25;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C> {
    proximity: ProximitySensor<I2C>,
    /// Reads left before the next init retry.
    proximity_retry_in: u32,
    toggle: ToggleSwitch,
    lid_servo: ServoDriver,
    switch_servo: ServoDriver,
    led: IndicatorLed,
    clock: Esp32TimeAdapter,
}

impl<I2C: I2c> HardwareAdapter<I2C> {
    pub fn new(
        proximity: ProximitySensor<I2C>,
        toggle: ToggleSwitch,
        lid_servo: ServoDriver,
        switch_servo: ServoDriver,
        led: IndicatorLed,
        clock: Esp32TimeAdapter,
    ) -> Self {
        Self {
            proximity,
            proximity_retry_in: PROXIMITY_RETRY_READS,
            toggle,
            lid_servo,
            switch_servo,
            led,
            clock,
        }
    }

    /// Configure the peripherals and assemble the adapter on the board's
    /// standard pins.
    ///
    /// A proximity sensor that fails to initialise is tolerated: the box
    /// still defeats the switch, proximity reads report
    /// [`SensorError::NotReady`], and init is retried every
    /// `PROXIMITY_RETRY_READS` reads.
    pub fn bring_up(i2c: I2C) -> error::Result<Self> {
        hw_init::init_peripherals()?;

        let mut proximity = ProximitySensor::new(i2c);
        if let Err(e) = proximity.init(DEFAULT_LOW_THRESHOLD) {
            warn!("Proximity sensor init failed ({}), will retry", e);
        }

        info!("Hardware adapter ready");
        Ok(Self::new(
            proximity,
            ToggleSwitch::new(pins::TOGGLE_SWITCH_GPIO),
            ServoDriver::new(hw_init::LEDC_CH_LID_SERVO),
            ServoDriver::new(hw_init::LEDC_CH_SWITCH_SERVO),
            IndicatorLed::new(pins::INDICATOR_LED_GPIO, true),
            Esp32TimeAdapter::new(),
        ))
    }
}

// ── ServoPort implementation ──────────────────────────────────

impl<I2C: I2c> ServoPort for HardwareAdapter<I2C> {
    fn set_angle(&mut self, joint: Joint, degrees: f32) {
        match joint {
            Joint::Lid => self.lid_servo.set_angle(degrees),
            Joint::SwitchArm => self.switch_servo.set_angle(degrees),
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I2C: I2c> SensorPort for HardwareAdapter<I2C> {
    fn read_proximity_raw(&mut self) -> Result<u8, SensorError> {
        if !self.proximity.is_ready() {
            self.proximity_retry_in = self.proximity_retry_in.saturating_sub(1);
            if self.proximity_retry_in == 0 {
                self.proximity_retry_in = PROXIMITY_RETRY_READS;
                match self.proximity.init(DEFAULT_LOW_THRESHOLD) {
                    Ok(()) => info!("Proximity sensor back online"),
                    Err(e) => debug!("Proximity sensor init retry failed: {}", e),
                }
            }
        }
        self.proximity.read()
    }

    fn read_switch(&mut self) -> Result<bool, SensorError> {
        Ok(self.toggle.is_on())
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<I2C: I2c> IndicatorPort for HardwareAdapter<I2C> {
    fn set_indicator(&mut self, on: bool) {
        self.led.set(on);
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl<I2C: I2c> ClockPort for HardwareAdapter<I2C> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }
}
