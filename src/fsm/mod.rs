//! Behaviour state machine.
//!
//! ```text
//!          ┌──[hand close]──▶ TEASING ──[gesture done]──┐
//!          │                                            ▼
//!        IDLE ◀────────[far / hide / inactivity]───── LID_OPEN
//!        ▲  │                                            ▲
//!        │  └──────────[hand very close: threaten]───────┘
//!        │
//!        └──[defeat done]── SWITCH_OFF ◀──[switch on edge, any state]
//! ```
//!
//! Every transition into SWITCH_OFF or TEASING returns to IDLE within the
//! same tick once its motion sequence has finished.  LID_OPEN is the only
//! state that survives across ticks besides IDLE.
//!
//! The reaction logic lives in [`Controller`](crate::app::controller::Controller);
//! this module tracks which state is current and for how long.

pub mod context;
pub mod policy;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControllerState {
    Idle = 0,
    LidOpen = 1,
    Teasing = 2,
    SwitchOff = 3,
}

impl ControllerState {
    pub const COUNT: usize = 4;

    /// Convert an index back to `ControllerState`.  Panics on out-of-range
    /// in debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::LidOpen,
            2 => Self::Teasing,
            3 => Self::SwitchOff,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::LidOpen => "LidOpen",
            Self::Teasing => "Teasing",
            Self::SwitchOff => "SwitchOff",
        }
    }
}

// ---------------------------------------------------------------------------
// State tracker
// ---------------------------------------------------------------------------

/// Current state plus entry bookkeeping.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: ControllerState,
    entered_at_ms: u64,
    transitions: u32,
}

impl StateTracker {
    pub fn new(initial: ControllerState, now_ms: u64) -> Self {
        Self {
            current: initial,
            entered_at_ms: now_ms,
            transitions: 0,
        }
    }

    pub fn current(&self) -> ControllerState {
        self.current
    }

    /// Switch to `next`.  Returns the `(from, to)` pair when the state
    /// actually changed, `None` for a self-transition.
    pub fn enter(
        &mut self,
        next: ControllerState,
        now_ms: u64,
    ) -> Option<(ControllerState, ControllerState)> {
        if next == self.current {
            return None;
        }
        let from = self.current;
        self.current = next;
        self.entered_at_ms = now_ms;
        self.transitions = self.transitions.wrapping_add(1);
        Some((from, next))
    }

    pub fn ms_in_state(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at_ms)
    }

    pub fn transition_count(&self) -> u32 {
        self.transitions
    }
}
