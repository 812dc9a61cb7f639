//! Operator toggle switch.
//!
//! Digital input with the internal pull-down enabled.  The switch reads
//! "on" while the pin is LOW.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the GPIO level via hw_init helpers.
//! On host/test: reads a simulated level set with [`sim_set_switch`].

use core::sync::atomic::{AtomicBool, Ordering};

static SIM_SWITCH_ON: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_switch(on: bool) {
    SIM_SWITCH_ON.store(on, Ordering::Relaxed);
}

pub struct ToggleSwitch {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl ToggleSwitch {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    /// `true` when the operator has flipped the switch on.
    #[cfg(target_os = "espidf")]
    pub fn is_on(&self) -> bool {
        !crate::drivers::hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_on(&self) -> bool {
        SIM_SWITCH_ON.load(Ordering::Relaxed)
    }
}
