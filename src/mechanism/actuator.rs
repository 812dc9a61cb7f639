//! Servo motion engine.
//!
//! Converts a position expressed as a percentage of an arm's calibrated
//! travel into servo angles, either written at once (startup reset) or
//! interpolated over a duration.
//!
//! ```text
//!   percent ──▶ angle_for() ──▶ round to 0.01° ──▶ no-op guard
//!                                                      │
//!                      ServoPort::set_angle ◀── N interpolated steps
//! ```
//!
//! The duration passed to [`Actuator::move_to`] is the time for the arm's
//! *full* travel; a partial move is proportionally shorter.

use log::debug;

use crate::app::ports::{ClockPort, Joint, ServoPort};
use crate::config::ArmCalibration;

/// One servo-driven joint and its last commanded angle.
#[derive(Debug, Clone)]
pub struct Actuator {
    joint: Joint,
    calibration: ArmCalibration,
    /// Updated only after a move has fully completed.
    current_deg: f32,
}

impl Actuator {
    /// The actuator assumes it starts at home; call [`set_instant`](Self::set_instant)
    /// to make that true physically.
    pub fn new(joint: Joint, calibration: ArmCalibration) -> Self {
        Self {
            joint,
            calibration,
            current_deg: calibration.home_deg,
        }
    }

    /// Angle for `percent` of travel, clamped to the calibrated range.
    /// 0 % and 100 % map exactly onto the endpoints.
    pub fn angle_for(&self, percent: f32) -> f32 {
        let ArmCalibration {
            home_deg, away_deg, ..
        } = self.calibration;

        if percent.is_nan() || percent <= 0.0 {
            return home_deg;
        }
        if percent >= 100.0 {
            return away_deg;
        }
        let angle = home_deg + (away_deg - home_deg) * (percent / 100.0);
        angle.clamp(home_deg.min(away_deg), home_deg.max(away_deg))
    }

    pub fn current_angle(&self) -> f32 {
        self.current_deg
    }

    /// Current position as a percentage of travel (0 = home, 100 = away).
    pub fn position_percent(&self) -> f32 {
        let ArmCalibration {
            home_deg, away_deg, ..
        } = self.calibration;
        (self.current_deg - home_deg) / (away_deg - home_deg) * 100.0
    }

    /// Write the target angle in one command, then wait `settle_ms` for the
    /// horn to get there.  Always issues the write.
    pub fn set_instant(
        &mut self,
        hw: &mut (impl ServoPort + ClockPort),
        percent: f32,
        settle_ms: u32,
    ) {
        let target = round_centi(self.angle_for(percent));
        hw.set_angle(self.joint, target);
        if settle_ms > 0 {
            hw.delay_ms(settle_ms);
        }
        self.current_deg = target;
    }

    /// Move smoothly to `percent` of travel.
    ///
    /// `full_range_ms` is the duration of a move across the whole calibrated
    /// travel.  Blocks until the move is complete.  Returns `false` (and
    /// issues no servo command) if the rounded target equals the current
    /// angle.
    pub fn move_to(
        &mut self,
        hw: &mut (impl ServoPort + ClockPort),
        percent: f32,
        full_range_ms: u32,
    ) -> bool {
        let target = round_centi(self.angle_for(percent));
        let start = self.current_deg;
        if target == start {
            return false;
        }

        let ArmCalibration {
            home_deg,
            away_deg,
            steps,
        } = self.calibration;
        let span = (away_deg - home_deg).abs();
        let lo = home_deg.min(away_deg);
        let hi = home_deg.max(away_deg);

        let fraction = ((target - start).abs() / span).min(1.0);
        let duration_ms = full_range_ms as f32 * fraction;
        let steps = steps.max(1);
        let step_delay_ms = (duration_ms / f32::from(steps)).round() as u32;

        debug!(
            "{:?}: {:.2}° -> {:.2}° in {} steps ({:.0} ms)",
            self.joint, start, target, steps, duration_ms
        );

        for step in 1..=steps {
            let angle = if step == steps {
                target
            } else {
                let t = f32::from(step) / f32::from(steps);
                (start + (target - start) * t).clamp(lo, hi)
            };
            hw.set_angle(self.joint, angle);
            if step_delay_ms > 0 {
                hw.delay_ms(step_delay_ms);
            }
        }

        self.current_deg = target;
        true
    }
}

/// Round to two decimal places (0.01°).
fn round_centi(deg: f32) -> f32 {
    (deg * 100.0).round() / 100.0
}
