//! Randomized decision policy.
//!
//! Pure functions from a uniform draw in `[0, 1)` to a reaction, so the
//! controller stays deterministic under a scripted [`RandomPort`](crate::app::ports::RandomPort).

use crate::config::{BehaviorPolicy, DelayBucket};
use crate::mechanism::gestures::DefeatStyle;

/// Reaction to a very close hand while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleApproach {
    PeekABoo,
    Threaten,
    Ignore,
}

/// Reaction to a very close hand while the lid is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseEncounter {
    /// Retract and shut.
    Hide,
    /// Blink, retract and peek anyway.
    BoldPeek,
}

/// One draw decides between peek-a-boo, threaten and ignoring the hand.
pub fn very_close_while_idle(policy: &BehaviorPolicy, draw: f32) -> IdleApproach {
    if draw < policy.peekaboo_probability {
        IdleApproach::PeekABoo
    } else if draw < policy.peekaboo_probability + policy.threaten_probability {
        IdleApproach::Threaten
    } else {
        IdleApproach::Ignore
    }
}

/// Close hand while idle: fake-out with its own probability, otherwise tease.
pub fn close_while_idle_is_fakeout(policy: &BehaviorPolicy, draw: f32) -> bool {
    draw < policy.fakeout_probability
}

pub fn very_close_while_active(policy: &BehaviorPolicy, draw: f32) -> CloseEncounter {
    if draw < policy.bold_peekaboo_probability {
        CloseEncounter::BoldPeek
    } else {
        CloseEncounter::Hide
    }
}

/// Uniform pick over every switch-defeat style.  Draws outside `[0, 1)`
/// clamp to the first or last style.
pub fn defeat_style(draw: f32) -> DefeatStyle {
    let n = DefeatStyle::ALL.len();
    let idx = if draw.is_nan() || draw <= 0.0 {
        0
    } else {
        ((draw * n as f32) as usize).min(n - 1)
    };
    DefeatStyle::ALL[idx]
}

/// Walk the cumulative weights and return the delay of the bucket `draw`
/// lands in.  Draws past the last cumulative weight (rounding) take the
/// last bucket.
pub fn reaction_delay_ms(buckets: &[DelayBucket], draw: f32) -> u32 {
    let mut cumulative = 0.0;
    for bucket in buckets {
        cumulative += bucket.weight;
        if draw < cumulative {
            return bucket.delay_ms;
        }
    }
    buckets.last().map_or(0, |b| b.delay_ms)
}
