//! SG90 hobby-servo driver on an LEDC channel.
//!
//! The servo reads pulse width, not duty: 0.5 ms at 0° to ~2.4 ms at
//! 180° within a 20 ms frame.  Calibrated as duty 26..123 on a 10-bit
//! timer; the timer runs at [`LEDC_DUTY_BITS`](hw_init::LEDC_DUTY_BITS)
//! so the same pair is scaled up for finer steps.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init helpers.
//! On host/test: tracks the commanded duty in-memory only.

use log::debug;

use crate::drivers::hw_init;

const CAL_BITS: u32 = 10;
const CAL_DUTY_MIN: u32 = 26;
const CAL_DUTY_MAX: u32 = 123;

/// Duty count at 0°.
pub const DUTY_MIN: u32 = CAL_DUTY_MIN << (hw_init::LEDC_DUTY_BITS - CAL_BITS);
/// Duty count at 180°.
pub const DUTY_MAX: u32 = CAL_DUTY_MAX << (hw_init::LEDC_DUTY_BITS - CAL_BITS);

pub const MAX_ANGLE_DEG: f32 = 180.0;

/// Map an angle to a duty count.  Out-of-range (and NaN) angles clamp.
pub fn angle_to_duty(degrees: f32) -> u32 {
    let degrees = if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(0.0, MAX_ANGLE_DEG)
    };
    let span = (DUTY_MAX - DUTY_MIN) as f32;
    DUTY_MIN + (span * degrees / MAX_ANGLE_DEG).round() as u32
}

pub struct ServoDriver {
    channel: u32,
    duty: Option<u32>,
}

impl ServoDriver {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            duty: None,
        }
    }

    /// Command `degrees`.  Skips the register write when the duty count
    /// would not change.
    pub fn set_angle(&mut self, degrees: f32) {
        let duty = angle_to_duty(degrees);
        if self.duty == Some(duty) {
            return;
        }
        debug!("servo ch{}: {:.1}° -> duty {}", self.channel, degrees, duty);
        hw_init::ledc_set(self.channel, duty);
        self.duty = Some(duty);
    }

    /// Last duty written, `None` before the first command.
    pub fn duty(&self) -> Option<u32> {
        self.duty
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }
}
