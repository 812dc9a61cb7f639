//! Canned gestures.
//!
//! Every gesture is a fixed, non-branching list of [`MotionStep`]s held in
//! flash.  Lid and arm targets are absolute positions (percent of travel),
//! and the duration of each move is the full-range time (see
//! [`Actuator::move_to`](super::actuator::Actuator::move_to)).
//!
//! | Gesture  | Motion                                              |
//! |----------|-----------------------------------------------------|
//! | PeekABoo | lid half open, pause, lid closed                    |
//! | Tease    | lid flutters to 30 %, closed                        |
//! | Threaten | lid open, arm half way, hold, arm retracted         |
//! | Fakeout  | two quick shallow lid flicks                        |
//! | Panic    | four fast full lid cycles with the indicator toggling |
//!
//! A switch-defeat style is an approach program plus a push program.  The
//! approach opens the lid fully and never reaches the switch.  The push
//! drives the arm onto the switch exactly once and brings it home; the
//! mechanism repeats it between switch reads, then closes the lid at the
//! style's own speed.
//!
//! | Style         | Approach                              | Push                         |
//! |---------------|---------------------------------------|------------------------------|
//! | Standard      | lid open, hold                        | extend, hold, retract        |
//! | Rapid         | fast lid open                         | quick jab                    |
//! | Insistent     | lid open                              | jab, short rest              |
//! | SlowRetract   | lid open                              | slow extend, hold, crawl back|
//! | QuickThreat   | lid open, arm feint to 70 %           | fast push                    |
//! | DoubleFakeout | lid open, feints to 50 % then 80 %    | push                         |
//! | TripleFake    | lid open, three feints to 50 %        | push                         |
//! | SlowApproach  | slow lid open, arm creeps to 50 %     | push from half way           |

/// A single primitive in a gesture program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    /// Move the lid to `open_percent` % open.
    Lid { open_percent: u8, full_range_ms: u32 },
    /// Move the switch arm to `extend_percent` % extended.
    Arm { extend_percent: u8, full_range_ms: u32 },
    /// Hold still.
    Pause(u32),
    /// Flip the indicator.
    ToggleIndicator,
    /// Drive the indicator to a fixed state.
    Indicator(bool),
}

/// The closed set of canned gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    PeekABoo,
    Tease,
    Threaten,
    Fakeout,
    Panic,
}

use MotionStep::{Arm, Indicator, Lid, Pause, ToggleIndicator};

const PEEKABOO: &[MotionStep] = &[
    Lid { open_percent: 50, full_range_ms: 300 },
    Pause(500),
    Lid { open_percent: 0, full_range_ms: 300 },
];

const TEASE: &[MotionStep] = &[
    Lid { open_percent: 30, full_range_ms: 300 },
    Pause(300),
    Lid { open_percent: 0, full_range_ms: 300 },
];

// The lid step is a no-op when the lid is already open.
const THREATEN: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 500 },
    Arm { extend_percent: 50, full_range_ms: 300 },
    Pause(500),
    Arm { extend_percent: 0, full_range_ms: 300 },
];

const FAKEOUT: &[MotionStep] = &[
    Lid { open_percent: 20, full_range_ms: 150 },
    Lid { open_percent: 0, full_range_ms: 150 },
    Pause(200),
    Lid { open_percent: 20, full_range_ms: 150 },
    Lid { open_percent: 0, full_range_ms: 150 },
];

const PANIC: &[MotionStep] = &[
    ToggleIndicator,
    Lid { open_percent: 100, full_range_ms: 200 },
    Lid { open_percent: 0, full_range_ms: 200 },
    ToggleIndicator,
    Lid { open_percent: 100, full_range_ms: 200 },
    Lid { open_percent: 0, full_range_ms: 200 },
    ToggleIndicator,
    Lid { open_percent: 100, full_range_ms: 200 },
    Lid { open_percent: 0, full_range_ms: 200 },
    ToggleIndicator,
    Lid { open_percent: 100, full_range_ms: 200 },
    Lid { open_percent: 0, full_range_ms: 200 },
    Indicator(false),
];

/// The closed set of switch-defeat choreographies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefeatStyle {
    Standard,
    Rapid,
    Insistent,
    SlowRetract,
    QuickThreat,
    DoubleFakeout,
    TripleFake,
    SlowApproach,
}

const STANDARD_APPROACH: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 500 },
    Pause(500),
];
const STANDARD_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 500 },
    Pause(500),
    Arm { extend_percent: 0, full_range_ms: 500 },
];

const RAPID_APPROACH: &[MotionStep] = &[Lid { open_percent: 100, full_range_ms: 300 }];
const RAPID_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 200 },
    Arm { extend_percent: 0, full_range_ms: 100 },
];

const INSISTENT_APPROACH: &[MotionStep] = &[Lid { open_percent: 100, full_range_ms: 400 }];
const INSISTENT_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 200 },
    Arm { extend_percent: 0, full_range_ms: 200 },
    Pause(200),
];

const SLOW_RETRACT_APPROACH: &[MotionStep] = &[Lid { open_percent: 100, full_range_ms: 500 }];
const SLOW_RETRACT_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 1000 },
    Pause(500),
    Arm { extend_percent: 0, full_range_ms: 1200 },
];

const QUICK_THREAT_APPROACH: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 300 },
    Arm { extend_percent: 70, full_range_ms: 430 },
    Arm { extend_percent: 0, full_range_ms: 290 },
];
const QUICK_THREAT_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 300 },
    Arm { extend_percent: 0, full_range_ms: 300 },
];

const DOUBLE_FAKEOUT_APPROACH: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 400 },
    Arm { extend_percent: 50, full_range_ms: 400 },
    Arm { extend_percent: 0, full_range_ms: 400 },
    Pause(300),
    Arm { extend_percent: 80, full_range_ms: 375 },
    Arm { extend_percent: 0, full_range_ms: 375 },
];
const DOUBLE_FAKEOUT_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 500 },
    Arm { extend_percent: 0, full_range_ms: 400 },
];

const TRIPLE_FAKE_APPROACH: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 300 },
    Arm { extend_percent: 50, full_range_ms: 400 },
    Arm { extend_percent: 0, full_range_ms: 400 },
    Arm { extend_percent: 50, full_range_ms: 400 },
    Arm { extend_percent: 0, full_range_ms: 400 },
    Arm { extend_percent: 50, full_range_ms: 400 },
    Arm { extend_percent: 0, full_range_ms: 400 },
];
const TRIPLE_FAKE_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 300 },
    Arm { extend_percent: 0, full_range_ms: 300 },
];

const SLOW_APPROACH_APPROACH: &[MotionStep] = &[
    Lid { open_percent: 100, full_range_ms: 1000 },
    Arm { extend_percent: 50, full_range_ms: 2000 },
];
const SLOW_APPROACH_PUSH: &[MotionStep] = &[
    Arm { extend_percent: 100, full_range_ms: 1000 },
    Arm { extend_percent: 0, full_range_ms: 500 },
];

impl DefeatStyle {
    pub const ALL: [DefeatStyle; 8] = [
        DefeatStyle::Standard,
        DefeatStyle::Rapid,
        DefeatStyle::Insistent,
        DefeatStyle::SlowRetract,
        DefeatStyle::QuickThreat,
        DefeatStyle::DoubleFakeout,
        DefeatStyle::TripleFake,
        DefeatStyle::SlowApproach,
    ];

    /// Played once: opens the lid fully and may feint with the arm.
    pub fn approach(self) -> &'static [MotionStep] {
        match self {
            Self::Standard => STANDARD_APPROACH,
            Self::Rapid => RAPID_APPROACH,
            Self::Insistent => INSISTENT_APPROACH,
            Self::SlowRetract => SLOW_RETRACT_APPROACH,
            Self::QuickThreat => QUICK_THREAT_APPROACH,
            Self::DoubleFakeout => DOUBLE_FAKEOUT_APPROACH,
            Self::TripleFake => TRIPLE_FAKE_APPROACH,
            Self::SlowApproach => SLOW_APPROACH_APPROACH,
        }
    }

    /// Played once per attempt: one full extension, then home.
    pub fn push(self) -> &'static [MotionStep] {
        match self {
            Self::Standard => STANDARD_PUSH,
            Self::Rapid => RAPID_PUSH,
            Self::Insistent => INSISTENT_PUSH,
            Self::SlowRetract => SLOW_RETRACT_PUSH,
            Self::QuickThreat => QUICK_THREAT_PUSH,
            Self::DoubleFakeout => DOUBLE_FAKEOUT_PUSH,
            Self::TripleFake => TRIPLE_FAKE_PUSH,
            Self::SlowApproach => SLOW_APPROACH_PUSH,
        }
    }

    /// Full-range time for the final lid close.
    pub fn close_ms(self) -> u32 {
        match self {
            Self::Rapid => 300,
            Self::TripleFake => 400,
            Self::Standard | Self::Insistent | Self::QuickThreat => 500,
            Self::DoubleFakeout => 600,
            Self::SlowRetract | Self::SlowApproach => 700,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Rapid => "rapid",
            Self::Insistent => "insistent",
            Self::SlowRetract => "slow retract",
            Self::QuickThreat => "quick threat",
            Self::DoubleFakeout => "double fakeout",
            Self::TripleFake => "triple fake",
            Self::SlowApproach => "slow approach",
        }
    }
}

impl Gesture {
    pub const ALL: [Gesture; 5] = [
        Gesture::PeekABoo,
        Gesture::Tease,
        Gesture::Threaten,
        Gesture::Fakeout,
        Gesture::Panic,
    ];

    pub fn steps(self) -> &'static [MotionStep] {
        match self {
            Self::PeekABoo => PEEKABOO,
            Self::Tease => TEASE,
            Self::Threaten => THREATEN,
            Self::Fakeout => FAKEOUT,
            Self::Panic => PANIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PeekABoo => "peek-a-boo",
            Self::Tease => "tease",
            Self::Threaten => "threaten",
            Self::Fakeout => "fakeout",
            Self::Panic => "panic",
        }
    }

    /// Whether the gesture finishes with the lid still open.
    pub fn leaves_lid_open(self) -> bool {
        matches!(self, Self::Threaten)
    }
}
