//! GPIO / peripheral pin assignments for the useless-box board (ESP32-C3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Servos (SG90, LEDC PWM)
// ---------------------------------------------------------------------------

/// Switch-defeating arm servo signal.
pub const SWITCH_SERVO_GPIO: i32 = 0;
/// Lid servo signal.
pub const LID_SERVO_GPIO: i32 = 2;

/// Hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

// ---------------------------------------------------------------------------
// Proximity sensor (APDS-9960, I2C)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 6;
pub const I2C_SCL_GPIO: i32 = 7;
/// Standard-mode bus clock.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Operator toggle switch
// ---------------------------------------------------------------------------

/// Digital input with internal pull-down. LOW = switch flipped on.
pub const TOGGLE_SWITCH_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Indicator LED
// ---------------------------------------------------------------------------

/// On-board LED, active LOW.
pub const INDICATOR_LED_GPIO: i32 = 8;
