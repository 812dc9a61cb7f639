//! Single indicator LED on a plain GPIO.
//!
//! The board LED is wired active-low; callers speak in lit/dark and the
//! driver picks the pin level.

use crate::drivers::hw_init;

pub struct IndicatorLed {
    gpio: i32,
    active_low: bool,
    lit: bool,
}

impl IndicatorLed {
    pub fn new(gpio: i32, active_low: bool) -> Self {
        Self {
            gpio,
            active_low,
            lit: false,
        }
    }

    pub fn set(&mut self, lit: bool) {
        hw_init::gpio_write(self.gpio, self.level_for(lit));
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Pin level that produces `lit`.
    pub fn level_for(&self, lit: bool) -> bool {
        lit != self.active_low
    }
}
