//! Outbound application events.
//!
//! The [`Controller`](super::controller::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, record in a test).

use crate::error::SensorError;
use crate::fsm::ControllerState;
use crate::mechanism::gestures::{DefeatStyle, Gesture};
use crate::mechanism::proximity::ProximityTier;

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has reset the mechanism and is about to poll.
    Started(ControllerState),

    /// The state machine moved between states.
    StateChanged {
        from: ControllerState,
        to: ControllerState,
    },

    /// The toggle switch reading changed.
    SwitchChanged { on: bool },

    /// The proximity tier changed.
    ProximityChanged {
        from: ProximityTier,
        to: ProximityTier,
    },

    /// A switch-defeat sequence finished.
    SwitchDefeat {
        style: DefeatStyle,
        attempts: u8,
        switched_off: bool,
        /// Preceded by the panic gesture instead of a reaction delay.
        escalated: bool,
    },

    /// A canned gesture was played.
    GesturePlayed(Gesture),

    /// A very close hand was noticed and deliberately ignored.
    HandIgnored,

    /// The lid was closed after sitting open without interaction.
    InactivityClose { idle_ms: u64 },

    /// A sensor read failed and the reading was replaced by a safe default.
    /// Repeated failures of the same sensor are reported sparsely.
    SensorFault(SensorError),

    /// Periodic status snapshot.
    Status(StatusReport),
}

/// A point-in-time summary suitable for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub state: ControllerState,
    /// Time spent in `state` so far.
    pub ms_in_state: u64,
    pub transitions: u32,
    pub uptime_ms: u64,
    pub ticks: u64,
    pub switch_defeats: u32,
    pub failed_defeats: u32,
    pub panics: u32,
    pub gestures: u32,
    pub sensor_faults: u32,
    pub lid_open_percent: f32,
}
