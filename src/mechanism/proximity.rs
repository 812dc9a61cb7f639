//! Proximity tiers and the raw-reading classifier.

use crate::config::ProximityThresholds;

/// Ordered distance tiers, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProximityTier {
    VeryClose,
    Close,
    Far,
    NoDetection,
}

impl ProximityTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryClose => "very close",
            Self::Close => "close",
            Self::Far => "far",
            Self::NoDetection => "no detection",
        }
    }
}

/// Maps raw sensor counts onto [`ProximityTier`]s.
///
/// Boundaries are inclusive: a reading exactly at a threshold belongs to
/// the nearer tier.
#[derive(Debug, Clone, Copy)]
pub struct ProximityClassifier {
    thresholds: ProximityThresholds,
}

impl ProximityClassifier {
    pub fn new(thresholds: ProximityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, raw: u8) -> ProximityTier {
        let t = &self.thresholds;
        if raw >= t.very_close {
            ProximityTier::VeryClose
        } else if raw >= t.close {
            ProximityTier::Close
        } else if raw >= t.far {
            ProximityTier::Far
        } else {
            ProximityTier::NoDetection
        }
    }
}
