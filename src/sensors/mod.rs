//! Sensor drivers: the proximity sensor and the operator toggle.
//!
//! Both are read once per controller tick through
//! [`SensorPort`](crate::app::ports::SensorPort), implemented by the
//! hardware adapter.

pub mod proximity;
pub mod toggle;
