//! System configuration parameters
//!
//! All tunable parameters for the useless box: servo calibration, proximity
//! thresholds, behaviour probabilities and controller timing.
//! Defaults can be replaced at build time with a JSON document (see
//! [`BoxConfig::from_json`]).

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of rows in the reaction-delay table.
pub const MAX_DELAY_BUCKETS: usize = 8;

/// Calibrated travel of one servo-driven arm.
///
/// `home_deg` is 0 % of travel (the safe rest position), `away_deg` is 100 %.
/// The two may be in either numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmCalibration {
    /// Servo angle at 0 % travel (degrees).
    pub home_deg: f32,
    /// Servo angle at 100 % travel (degrees).
    pub away_deg: f32,
    /// Number of interpolation increments for a smooth move.
    pub steps: u16,
}

/// Raw-reading thresholds for proximity classification.
/// Must be strictly decreasing: `very_close > close > far`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProximityThresholds {
    pub very_close: u8,
    pub close: u8,
    pub far: u8,
}

/// Probabilities that drive the randomized reactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPolicy {
    /// Hand very close while idle: play peek-a-boo.
    pub peekaboo_probability: f32,
    /// Hand very close while idle: threaten with the switch arm.
    pub threaten_probability: f32,
    /// Hand very close while the lid is up: bold peek instead of hiding.
    pub bold_peekaboo_probability: f32,
    /// Hand close while idle: fake-out instead of a plain tease.
    pub fakeout_probability: f32,
}

/// One row of the weighted reaction-delay table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayBucket {
    /// Share of draws that land in this bucket (0.0 – 1.0).
    pub weight: f32,
    /// Delay applied when the bucket is drawn.
    pub delay_ms: u32,
}

/// Core box configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    // --- Mechanism ---
    /// Lid arm: home = closed, away = fully open.
    pub lid: ArmCalibration,
    /// Switch arm: home = retracted, away = fully extended onto the toggle.
    pub switch_arm: ArmCalibration,
    /// Settle time after an instant servo write (milliseconds)
    pub servo_settle_ms: u32,

    // --- Sensing ---
    pub proximity: ProximityThresholds,

    // --- Behaviour ---
    pub behavior: BehaviorPolicy,
    /// Reaction delay before defeating the switch, drawn by weight.
    pub reaction_delays: Vec<DelayBucket, MAX_DELAY_BUCKETS>,
    /// Physical extend/retract attempts per switch-on edge.
    pub switch_off_attempts: u8,
    /// Switch-on edges closer together than this count as a recurrence (milliseconds)
    pub recurrence_window_ms: u32,
    /// Consecutive recurrences that trigger the panic sequence.
    pub panic_threshold: u8,

    // --- Timing ---
    /// Lid left open without interaction for this long is closed (milliseconds)
    pub inactivity_timeout_ms: u32,
    /// Controller tick interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Status report interval (seconds)
    pub status_interval_secs: u32,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            // Mechanism
            lid: ArmCalibration {
                home_deg: 90.0,
                away_deg: 30.0,
                steps: 50,
            },
            switch_arm: ArmCalibration {
                home_deg: 40.0,
                away_deg: 175.0,
                steps: 100,
            },
            servo_settle_ms: 250,

            // Sensing
            proximity: ProximityThresholds {
                very_close: 200,
                close: 100,
                far: 50,
            },

            // Behaviour
            behavior: BehaviorPolicy {
                peekaboo_probability: 0.05,
                threaten_probability: 0.20,
                bold_peekaboo_probability: 0.01,
                fakeout_probability: 0.25,
            },
            reaction_delays: [
                (0.30, 500),
                (0.30, 1000),
                (0.20, 1500),
                (0.10, 2000),
                (0.05, 3000),
                (0.05, 5000),
            ]
            .into_iter()
            .map(|(weight, delay_ms)| DelayBucket { weight, delay_ms })
            .collect(),
            switch_off_attempts: 3,
            recurrence_window_ms: 3000,
            panic_threshold: 3,

            // Timing
            inactivity_timeout_ms: 5000,
            tick_interval_ms: 200, // 5 Hz
            status_interval_secs: 60,
        }
    }
}

impl BoxConfig {
    /// Parse a JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the controller cannot run safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_arm(&self.lid, LID_REJECTIONS)?;
        validate_arm(&self.switch_arm, SWITCH_ARM_REJECTIONS)?;

        let p = &self.proximity;
        if !(p.very_close > p.close && p.close > p.far) {
            return Err(ConfigError::ValidationFailed(
                "proximity thresholds must be strictly decreasing",
            ));
        }

        let b = &self.behavior;
        let probabilities = [
            b.peekaboo_probability,
            b.threaten_probability,
            b.bold_peekaboo_probability,
            b.fakeout_probability,
        ];
        if probabilities.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConfigError::ValidationFailed(
                "probabilities must lie in 0.0..=1.0",
            ));
        }
        if b.peekaboo_probability + b.threaten_probability > 1.0 {
            return Err(ConfigError::ValidationFailed(
                "peekaboo + threaten probability exceeds 1.0",
            ));
        }

        if self.reaction_delays.is_empty() {
            return Err(ConfigError::ValidationFailed("reaction delay table is empty"));
        }
        if self.reaction_delays.iter().any(|b| b.weight <= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "reaction delay weights must be positive",
            ));
        }
        let total: f32 = self.reaction_delays.iter().map(|b| b.weight).sum();
        if (total - 1.0).abs() > 0.001 {
            return Err(ConfigError::ValidationFailed(
                "reaction delay weights must sum to 1.0",
            ));
        }

        if self.switch_off_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "switch_off_attempts must be at least 1",
            ));
        }
        if self.panic_threshold < 2 {
            return Err(ConfigError::ValidationFailed(
                "panic_threshold must be at least 2",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        Ok(())
    }
}

/// Messages for the three ways an arm calibration can be rejected:
/// endpoints out of range, endpoints equal, zero steps.
type ArmRejections = [&'static str; 3];

const LID_REJECTIONS: ArmRejections = [
    "lid endpoints outside 0..=180 degrees",
    "lid endpoints are equal",
    "lid steps must be > 0",
];

const SWITCH_ARM_REJECTIONS: ArmRejections = [
    "switch arm endpoints outside 0..=180 degrees",
    "switch arm endpoints are equal",
    "switch arm steps must be > 0",
];

fn validate_arm(arm: &ArmCalibration, reasons: ArmRejections) -> Result<(), ConfigError> {
    let in_range = |deg: f32| (0.0..=180.0).contains(&deg);
    if !in_range(arm.home_deg) || !in_range(arm.away_deg) {
        return Err(ConfigError::ValidationFailed(reasons[0]));
    }
    if (arm.home_deg - arm.away_deg).abs() < f32::EPSILON {
        return Err(ConfigError::ValidationFailed(reasons[1]));
    }
    if arm.steps == 0 {
        return Err(ConfigError::ValidationFailed(reasons[2]));
    }
    Ok(())
}
