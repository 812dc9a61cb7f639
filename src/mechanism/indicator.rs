//! Logical indicator state.
//!
//! Tracks whether the indicator is logically on and only touches the
//! [`IndicatorPort`] when that changes.  Polarity lives in the driver.

use crate::app::ports::IndicatorPort;

#[derive(Debug, Clone, Default)]
pub struct Indicator {
    on: bool,
}

impl Indicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set(&mut self, hw: &mut impl IndicatorPort, on: bool) {
        if self.on != on {
            self.on = on;
            hw.set_indicator(on);
        }
    }

    pub fn toggle(&mut self, hw: &mut impl IndicatorPort) {
        self.set(hw, !self.on);
    }

    /// Drive the output off regardless of the cached state.
    pub fn force_off(&mut self, hw: &mut impl IndicatorPort) {
        self.on = false;
        hw.set_indicator(false);
    }
}
