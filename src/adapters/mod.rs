//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                      |
//! |------------|---------------|----------------------------------|
//! | `hardware` | ServoPort     | ESP32 LEDC PWM                   |
//! |            | SensorPort    | APDS-9960 (I2C), toggle GPIO     |
//! |            | IndicatorPort | LED GPIO                         |
//! |            | ClockPort     | delegates to `time`              |
//! | `log_sink` | EventSink     | Serial log output                |
//! | `random`   | RandomPort    | `rand` generator                 |
//! | `time`     | ClockPort     | ESP32 system timer, FreeRTOS     |

pub mod hardware;
pub mod log_sink;
pub mod random;
pub mod time;
