//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod indicator_led;
pub mod led_patterns;
pub mod servo;
