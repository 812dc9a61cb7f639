//! The physical box: two arms, two sensors and the indicator.
//!
//! [`UselessBox`] is the vocabulary the controller speaks.  It owns the
//! position state of both arms and the logical indicator state; all I/O
//! goes through the hardware ports passed into each call.
//!
//! ```text
//!   Controller ──▶ UselessBox ──▶ LidArm / SwitchArm ──▶ Actuator ──▶ ServoPort
//!                       │
//!                       ├──▶ SensorPort (proximity, toggle)
//!                       └──▶ Indicator ──▶ IndicatorPort
//! ```

pub mod actuator;
pub mod arms;
pub mod gestures;
pub mod indicator;
pub mod proximity;

use log::{info, warn};

use crate::app::ports::Hardware;
use crate::config::BoxConfig;
use crate::error::SensorError;

use arms::{LidArm, SwitchArm};
use gestures::{DefeatStyle, Gesture, MotionStep};
use indicator::Indicator;
use proximity::{ProximityClassifier, ProximityTier};

/// Full-range durations for the force-close sequence.
const RETREAT_ARM_MS: u32 = 300;
const RETREAT_LID_MS: u32 = 500;

/// Result of one switch-defeat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOffOutcome {
    /// Physical extend/retract cycles performed.
    pub attempts: u8,
    /// The toggle read off after the last attempt.
    pub switched_off: bool,
    /// The re-check after the last attempt failed; the switch state is unknown.
    pub fault: Option<SensorError>,
}

pub struct UselessBox {
    lid: LidArm,
    switch_arm: SwitchArm,
    indicator: Indicator,
    classifier: ProximityClassifier,
    settle_ms: u32,
}

impl UselessBox {
    pub fn new(config: &BoxConfig) -> Self {
        Self {
            lid: LidArm::new(config.lid),
            switch_arm: SwitchArm::new(config.switch_arm),
            indicator: Indicator::new(),
            classifier: ProximityClassifier::new(config.proximity),
            settle_ms: config.servo_settle_ms,
        }
    }

    /// Snap both arms to their safe positions and turn the indicator off.
    /// Must run once before the first sensor poll.
    pub fn reset(&mut self, hw: &mut impl Hardware) {
        self.switch_arm.reset(hw, self.settle_ms);
        self.lid.reset(hw, self.settle_ms);
        self.indicator.force_off(hw);
        info!("Mechanism reset: lid closed, switch arm retracted");
    }

    // ── Sensors ───────────────────────────────────────────────

    pub fn poll_switch(&self, hw: &mut impl Hardware) -> Result<bool, SensorError> {
        hw.read_switch()
    }

    /// Raw reading plus its tier.
    pub fn poll_proximity(
        &self,
        hw: &mut impl Hardware,
    ) -> Result<(u8, ProximityTier), SensorError> {
        let raw = hw.read_proximity_raw()?;
        Ok((raw, self.classifier.classify(raw)))
    }

    /// Toggle state with read failures treated as "off".
    pub fn get_switch_state(&self, hw: &mut impl Hardware) -> bool {
        self.poll_switch(hw).unwrap_or_else(|e| {
            warn!("Toggle switch read failed ({}), assuming off", e);
            false
        })
    }

    /// Proximity tier with read failures treated as [`ProximityTier::NoDetection`].
    pub fn get_proximity(&self, hw: &mut impl Hardware) -> ProximityTier {
        match self.poll_proximity(hw) {
            Ok((_, tier)) => tier,
            Err(e) => {
                warn!("Proximity read failed ({}), assuming no detection", e);
                ProximityTier::NoDetection
            }
        }
    }

    // ── Motion primitives ─────────────────────────────────────

    pub fn open_lid(&mut self, hw: &mut impl Hardware, percent: u8, full_range_ms: u32) {
        self.lid.open(hw, percent, full_range_ms);
    }

    pub fn close_lid(&mut self, hw: &mut impl Hardware, percent: u8, full_range_ms: u32) {
        self.lid.close(hw, percent, full_range_ms);
    }

    pub fn extend_arm(&mut self, hw: &mut impl Hardware, percent: u8, full_range_ms: u32) {
        self.switch_arm.extend(hw, percent, full_range_ms);
    }

    pub fn retract_arm(&mut self, hw: &mut impl Hardware, percent: u8, full_range_ms: u32) {
        self.switch_arm.retract(hw, percent, full_range_ms);
    }

    pub fn set_indicator(&mut self, hw: &mut impl Hardware, on: bool) {
        self.indicator.set(hw, on);
    }

    pub fn toggle_indicator(&mut self, hw: &mut impl Hardware) {
        self.indicator.toggle(hw);
    }

    // ── Sequences ─────────────────────────────────────────────

    /// Play `style`'s approach, push the toggle up to `max_attempts` times
    /// (re-reading it after each push), then close the lid whatever the
    /// outcome.  A failed re-read ends the attempts without claiming success.
    pub fn attempt_switch_off(
        &mut self,
        hw: &mut impl Hardware,
        style: DefeatStyle,
        max_attempts: u8,
    ) -> SwitchOffOutcome {
        info!("Switching off ({})", style.name());
        self.run_steps(hw, style.approach());

        let mut outcome = SwitchOffOutcome {
            attempts: 0,
            switched_off: false,
            fault: None,
        };
        for attempt in 1..=max_attempts.max(1) {
            info!("Switch-off attempt {}/{}", attempt, max_attempts);
            self.run_steps(hw, style.push());
            outcome.attempts = attempt;

            match self.poll_switch(hw) {
                Ok(false) => {
                    outcome.switched_off = true;
                    break;
                }
                Ok(true) => {}
                Err(e) => {
                    warn!("Toggle switch re-check failed ({}), stopping", e);
                    outcome.fault = Some(e);
                    break;
                }
            }
        }

        if !outcome.switched_off && outcome.fault.is_none() {
            warn!(
                "Switch still on after {} attempts, giving up until the next flip",
                outcome.attempts
            );
        }
        self.switch_arm.retract(hw, 100, RETREAT_ARM_MS);
        self.lid.close(hw, 100, style.close_ms());
        outcome
    }

    /// Retract the arm fully, then close the lid fully.
    pub fn close_all(&mut self, hw: &mut impl Hardware) {
        self.switch_arm.retract(hw, 100, RETREAT_ARM_MS);
        self.lid.close(hw, 100, RETREAT_LID_MS);
    }

    /// Run a canned gesture to completion.
    pub fn play(&mut self, hw: &mut impl Hardware, gesture: Gesture) {
        info!("Playing {}", gesture.name());
        self.run_steps(hw, gesture.steps());
    }

    fn run_steps(&mut self, hw: &mut impl Hardware, steps: &[MotionStep]) {
        for step in steps {
            match *step {
                MotionStep::Lid {
                    open_percent,
                    full_range_ms,
                } => self.lid.open(hw, open_percent, full_range_ms),
                MotionStep::Arm {
                    extend_percent,
                    full_range_ms,
                } => self.switch_arm.extend(hw, extend_percent, full_range_ms),
                MotionStep::Pause(ms) => hw.delay_ms(ms),
                MotionStep::ToggleIndicator => self.indicator.toggle(hw),
                MotionStep::Indicator(on) => self.indicator.set(hw, on),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn lid_is_open(&self) -> bool {
        self.lid.is_open()
    }

    pub fn lid_open_percent(&self) -> f32 {
        self.lid.open_percent()
    }

    pub fn switch_arm_retracted(&self) -> bool {
        self.switch_arm.is_retracted()
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator.is_on()
    }

    /// Lid closed and arm retracted.
    pub fn is_at_rest(&self) -> bool {
        self.lid.open_percent().abs() < 0.01 && self.switch_arm.is_retracted()
    }
}
