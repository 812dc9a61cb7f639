//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (servos, sensors, indicator, clock, randomness, event
//! sinks) implement these traits.  The [`Controller`](super::controller::Controller)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Reads are fallible and return typed [`SensorError`]s; writes are
//! infallible at this boundary (drivers log their own failures).

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Servo port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Which servo a command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Lid,
    SwitchArm,
}

/// Write-side port for the two hobby servos.
pub trait ServoPort {
    /// Command `joint` to `degrees` (0.0 – 180.0).
    fn set_angle(&mut self, joint: Joint, degrees: f32);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to poll its two inputs.
pub trait SensorPort {
    /// Raw proximity reading (0 = nothing, 255 = touching).
    fn read_proximity_raw(&mut self) -> Result<u8, SensorError>;

    /// Logical toggle state: `true` = flipped on by the operator.
    fn read_switch(&mut self) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port
// ───────────────────────────────────────────────────────────────

/// Binary indicator output.  `on` is the logical state; the adapter
/// handles physical polarity.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time and blocking delay.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Everything the mechanism needs to move, sense and wait.
///
/// Blanket-implemented, so any adapter providing the four ports can be
/// passed as a single `&mut` borrow.
pub trait Hardware: ServoPort + SensorPort + IndicatorPort + ClockPort {}

impl<T: ServoPort + SensorPort + IndicatorPort + ClockPort> Hardware for T {}

// ───────────────────────────────────────────────────────────────
// Random source
// ───────────────────────────────────────────────────────────────

/// Uniform random draws for the behaviour policy.
pub trait RandomPort {
    /// A value uniformly distributed in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
