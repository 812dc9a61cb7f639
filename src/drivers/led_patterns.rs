//! Blink pattern engine for the single-colour indicator.
//!
//! The controller calls `tick()` once per loop with the elapsed time and
//! feeds the returned on/off level to the indicator.  Changing pattern
//! restarts the phase so a new cadence always begins with the LED on.
//! Both periods are whole multiples of the 200 ms control tick.
//!
//! | Pattern    | Description                   | Rate  |
//! |------------|-------------------------------|-------|
//! | Off        | Dark                          | -     |
//! | SlowBlink  | 50 % square wave              | 1 Hz  |
//! | FastBlink  | 50 % square wave              | 2.5 Hz|

use crate::mechanism::proximity::ProximityTier;

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    Off,
    SlowBlink,
    FastBlink,
}

impl PatternId {
    /// Indicator cadence for a proximity tier: the nearer the hand, the
    /// more frantic the blinking.
    pub fn for_tier(tier: ProximityTier) -> Self {
        match tier {
            ProximityTier::VeryClose => Self::FastBlink,
            ProximityTier::Close => Self::SlowBlink,
            ProximityTier::Far | ProximityTier::NoDetection => Self::Off,
        }
    }
}

/// Stack-allocated, no heap.
pub struct LedPatternEngine {
    phase_ms: u32,
    active: PatternId,
    requested: PatternId,
}

impl Default for LedPatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LedPatternEngine {
    pub fn new() -> Self {
        Self {
            phase_ms: 0,
            active: PatternId::Off,
            requested: PatternId::Off,
        }
    }

    pub fn set_pattern(&mut self, pattern: PatternId) {
        self.requested = pattern;
    }

    pub fn pattern(&self) -> PatternId {
        self.active
    }

    /// Advance the phase by `delta_ms` and return the LED level.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if self.requested == self.active {
            self.phase_ms = self.phase_ms.wrapping_add(delta_ms);
        } else {
            self.active = self.requested;
            self.phase_ms = 0;
        }
        self.level()
    }

    fn level(&self) -> bool {
        match self.active {
            PatternId::Off => false,
            PatternId::SlowBlink => (self.phase_ms % 1000) < 500,
            PatternId::FastBlink => (self.phase_ms % 400) < 200,
        }
    }
}
