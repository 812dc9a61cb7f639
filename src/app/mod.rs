//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the behaviour of the box: reacting to the
//! switch, to an approaching hand, and to inactivity.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod controller;
pub mod events;
pub mod ports;
