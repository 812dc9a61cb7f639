//! Per-tick memory the controller carries between polls.
//!
//! The last sensor snapshot (for edge detection and change-only logging),
//! the inactivity timer, the switch recurrence counter, and per-sensor
//! fault streaks.

use crate::mechanism::proximity::ProximityTier;

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// What the controller saw on one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Toggle flipped on by the operator.
    pub switch_on: bool,
    pub tier: ProximityTier,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            switch_on: false,
            tier: ProximityTier::NoDetection,
        }
    }
}

impl SensorSnapshot {
    /// Off → on relative to `previous`.
    pub fn switch_rising_edge(&self, previous: &SensorSnapshot) -> bool {
        self.switch_on && !previous.switch_on
    }
}

// ---------------------------------------------------------------------------
// Inactivity timer
// ---------------------------------------------------------------------------

/// Time of the last recognized interaction.
#[derive(Debug, Clone, Copy)]
pub struct InactivityTimer {
    last_interaction_ms: u64,
}

impl InactivityTimer {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_interaction_ms: now_ms,
        }
    }

    pub fn touch(&mut self, now_ms: u64) {
        self.last_interaction_ms = now_ms;
    }

    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_interaction_ms)
    }

    /// Strictly more than `timeout_ms` without an interaction.
    pub fn expired(&self, now_ms: u64, timeout_ms: u32) -> bool {
        self.idle_ms(now_ms) > u64::from(timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// Switch recurrence counter
// ---------------------------------------------------------------------------

/// Counts switch-on edges that follow the previous switch handling within
/// a short window.  Reaching the threshold means the operator is
/// hammering the switch; the counter then resets.
#[derive(Debug, Clone)]
pub struct RecurrenceCounter {
    window_ms: u32,
    threshold: u8,
    count: u8,
    last_handled_ms: Option<u64>,
}

impl RecurrenceCounter {
    pub fn new(window_ms: u32, threshold: u8) -> Self {
        Self {
            window_ms,
            threshold,
            count: 0,
            last_handled_ms: None,
        }
    }

    /// Register a switch-on edge at `now_ms`.  Returns `true` when this
    /// edge reaches the panic threshold (the counter is reset).
    pub fn register_edge(&mut self, now_ms: u64) -> bool {
        let recurring = self
            .last_handled_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < u64::from(self.window_ms));

        self.count = if recurring {
            self.count.saturating_add(1)
        } else {
            1
        };

        if self.count >= self.threshold {
            self.count = 0;
            return true;
        }
        false
    }

    /// Mark the end of a switch handling sequence; the window for the next
    /// edge starts here.
    pub fn mark_handled(&mut self, now_ms: u64) {
        self.last_handled_ms = Some(now_ms);
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

// ---------------------------------------------------------------------------
// Fault streak
// ---------------------------------------------------------------------------

/// Consecutive read failures of one sensor.
///
/// A dead sensor fails on every tick; only the first failure of a run and
/// every [`REPORT_EVERY`](Self::REPORT_EVERY)-th one after it are reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultStreak {
    run: u32,
}

impl FaultStreak {
    /// About five seconds at the default tick interval.
    pub const REPORT_EVERY: u32 = 25;

    /// Count one failure.  Returns `true` when it should be reported.
    pub fn fail(&mut self) -> bool {
        let reported = self.run % Self::REPORT_EVERY == 0;
        self.run = self.run.saturating_add(1);
        reported
    }

    /// Count one good read.  Returns the length of the run it ended, if any.
    pub fn recover(&mut self) -> Option<u32> {
        let run = core::mem::take(&mut self.run);
        (run > 0).then_some(run)
    }

    pub fn run(&self) -> u32 {
        self.run
    }
}
