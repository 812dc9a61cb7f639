//! Lid and switch-arm wrappers over [`Actuator`].
//!
//! Both arms speak in percentages.  "Closing by N %" and "retracting by
//! N %" are relative to the fully open / fully extended end, so
//! `close(100, ..)` and `retract(100, ..)` always land on the safe
//! home position.

use crate::app::ports::{ClockPort, Joint, ServoPort};
use crate::config::ArmCalibration;

use super::actuator::Actuator;

fn clamp_percent(percent: u8) -> f32 {
    f32::from(percent.min(100))
}

// ---------------------------------------------------------------------------
// Lid
// ---------------------------------------------------------------------------

/// The hinged lid.  Home = closed, away = fully open.
#[derive(Debug, Clone)]
pub struct LidArm {
    actuator: Actuator,
}

impl LidArm {
    pub fn new(calibration: ArmCalibration) -> Self {
        Self {
            actuator: Actuator::new(Joint::Lid, calibration),
        }
    }

    /// Open to `percent` of full travel.
    pub fn open(&mut self, hw: &mut (impl ServoPort + ClockPort), percent: u8, full_range_ms: u32) {
        self.actuator.move_to(hw, clamp_percent(percent), full_range_ms);
    }

    /// Close by `percent`: the lid ends at `100 - percent` % open.
    pub fn close(&mut self, hw: &mut (impl ServoPort + ClockPort), percent: u8, full_range_ms: u32) {
        let target = 100.0 - clamp_percent(percent);
        self.actuator.move_to(hw, target, full_range_ms);
    }

    /// True once the lid is past the midpoint toward open.
    pub fn is_open(&self) -> bool {
        self.actuator.position_percent() > 50.0
    }

    pub fn open_percent(&self) -> f32 {
        self.actuator.position_percent()
    }

    pub fn angle(&self) -> f32 {
        self.actuator.current_angle()
    }

    /// Snap shut with a single servo write.
    pub fn reset(&mut self, hw: &mut (impl ServoPort + ClockPort), settle_ms: u32) {
        self.actuator.set_instant(hw, 0.0, settle_ms);
    }
}

// ---------------------------------------------------------------------------
// Switch arm
// ---------------------------------------------------------------------------

/// The finger that flips the toggle back.  Home = retracted, away = fully
/// extended onto the switch lever.
#[derive(Debug, Clone)]
pub struct SwitchArm {
    actuator: Actuator,
}

impl SwitchArm {
    pub fn new(calibration: ArmCalibration) -> Self {
        Self {
            actuator: Actuator::new(Joint::SwitchArm, calibration),
        }
    }

    /// Extend to `percent` of full travel.
    pub fn extend(&mut self, hw: &mut (impl ServoPort + ClockPort), percent: u8, full_range_ms: u32) {
        self.actuator.move_to(hw, clamp_percent(percent), full_range_ms);
    }

    /// Retract by `percent`: the arm ends at `100 - percent` % extended.
    pub fn retract(
        &mut self,
        hw: &mut (impl ServoPort + ClockPort),
        percent: u8,
        full_range_ms: u32,
    ) {
        let target = 100.0 - clamp_percent(percent);
        self.actuator.move_to(hw, target, full_range_ms);
    }

    /// True when the arm sits at its home angle.
    pub fn is_retracted(&self) -> bool {
        self.extended_percent().abs() < 0.01
    }

    pub fn extended_percent(&self) -> f32 {
        self.actuator.position_percent()
    }

    pub fn angle(&self) -> f32 {
        self.actuator.current_angle()
    }

    /// Snap to fully retracted with a single servo write.
    pub fn reset(&mut self, hw: &mut (impl ServoPort + ClockPort), settle_ms: u32) {
        self.actuator.set_instant(hw, 0.0, settle_ms);
    }
}
