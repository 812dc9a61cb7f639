//! Controller: the behavioural core.
//!
//! [`Controller`] owns the mechanism model, the state tracker and the
//! timers.  Each call to [`Controller::update`] is one polling tick; all
//! I/O flows through port traits passed in at the call site, so the whole
//! controller runs against mock adapters on the host.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Controller          │
//!  RandomPort ──▶ │  FSM · policy · UselessBox   │ ──▶ ServoPort / IndicatorPort
//!                 └──────────────────────────────┘
//! ```
//!
//! Per tick, in priority order:
//!
//! 1. poll switch and proximity (failures → safe defaults)
//! 2. switch on edge → defeat it in a randomly drawn style (panicking
//!    first when flipped repeatedly)
//! 3. very close + idle → peek-a-boo / threaten / ignore
//! 4. close + idle → tease or fake-out
//! 5. far + lid up → retreat
//! 6. very close + lid up → hide, or rarely a bold peek
//! 7. lid up too long → close
//! 8. indicator blink cadence from the proximity tier
//! 9. remember readings, sleep one tick interval

use log::{debug, info, warn};

use crate::config::BoxConfig;
use crate::drivers::led_patterns::{LedPatternEngine, PatternId};
use crate::error::{ConfigError, SensorError};
use crate::fsm::context::{FaultStreak, InactivityTimer, RecurrenceCounter, SensorSnapshot};
use crate::fsm::policy::{self, CloseEncounter, IdleApproach};
use crate::fsm::{ControllerState, StateTracker};
use crate::mechanism::UselessBox;
use crate::mechanism::gestures::Gesture;
use crate::mechanism::proximity::ProximityTier;

use super::events::{AppEvent, StatusReport};
use super::ports::{EventSink, Hardware, RandomPort};

/// Full-range duration used when pulling the arm back before a bold peek.
const BOLD_PEEK_RETRACT_MS: u32 = 300;

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    switch_defeats: u32,
    failed_defeats: u32,
    panics: u32,
    gestures: u32,
    sensor_faults: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Proximity,
}

impl Input {
    fn name(self) -> &'static str {
        match self {
            Self::Toggle => "toggle switch",
            Self::Proximity => "proximity",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller {
    config: BoxConfig,
    mechanism: UselessBox,
    state: StateTracker,
    last: SensorSnapshot,
    inactivity: InactivityTimer,
    recurrence: RecurrenceCounter,
    blink: LedPatternEngine,
    last_blink_ms: u64,
    counters: Counters,
    toggle_faults: FaultStreak,
    proximity_faults: FaultStreak,
    tick_count: u64,
    last_status_ms: u64,
}

impl Controller {
    /// Validate `config`, reset the mechanism to its safe position and
    /// start in `Idle`.
    pub fn new(
        config: BoxConfig,
        hw: &mut impl Hardware,
        sink: &mut impl EventSink,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut mechanism = UselessBox::new(&config);
        mechanism.reset(hw);

        let now = hw.now_ms();
        let recurrence = RecurrenceCounter::new(config.recurrence_window_ms, config.panic_threshold);
        let controller = Self {
            config,
            mechanism,
            state: StateTracker::new(ControllerState::Idle, now),
            last: SensorSnapshot::default(),
            inactivity: InactivityTimer::new(now),
            recurrence,
            blink: LedPatternEngine::new(),
            last_blink_ms: now,
            counters: Counters::default(),
            toggle_faults: FaultStreak::default(),
            proximity_faults: FaultStreak::default(),
            tick_count: 0,
            last_status_ms: now,
        };

        sink.emit(&AppEvent::Started(controller.state()));
        info!("Controller started in {:?}", controller.state());
        Ok(controller)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Tick forever.
    pub fn run(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) -> ! {
        loop {
            self.update(hw, rng, sink);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one polling tick, including the trailing tick-interval sleep.
    /// Motion sequences triggered here block until they finish.
    pub fn update(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        let snapshot = self.poll(hw, sink);
        self.report_changes(&snapshot, sink);

        if snapshot.switch_rising_edge(&self.last) {
            self.defeat_switch(hw, rng, sink);
        } else {
            match (snapshot.tier, self.state.current()) {
                (ProximityTier::VeryClose, ControllerState::Idle) => {
                    self.approach_while_idle(hw, rng, sink);
                }
                (ProximityTier::Close, ControllerState::Idle) => self.tease(hw, rng, sink),
                (ProximityTier::Far, state) if state != ControllerState::Idle => {
                    info!("Hand backed off, retreating");
                    self.retreat(hw, sink);
                }
                (ProximityTier::VeryClose, _) => self.close_encounter(hw, rng, sink),
                _ => {}
            }
        }

        self.check_inactivity(hw, sink);
        self.update_indicator(hw, snapshot.tier);

        self.last = snapshot;
        self.maybe_report_status(hw.now_ms(), sink);
        hw.delay_ms(self.config.tick_interval_ms);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.state.current()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn mechanism(&self) -> &UselessBox {
        &self.mechanism
    }

    /// Switch-on edges counted toward the panic threshold so far.
    pub fn recurrence_count(&self) -> u8 {
        self.recurrence.count()
    }

    pub fn status_report(&self, now_ms: u64) -> StatusReport {
        StatusReport {
            state: self.state.current(),
            ms_in_state: self.state.ms_in_state(now_ms),
            transitions: self.state.transition_count(),
            uptime_ms: now_ms,
            ticks: self.tick_count,
            switch_defeats: self.counters.switch_defeats,
            failed_defeats: self.counters.failed_defeats,
            panics: self.counters.panics,
            gestures: self.counters.gestures,
            sensor_faults: self.counters.sensor_faults,
            lid_open_percent: self.mechanism.lid_open_percent(),
        }
    }

    // ── Sensing ───────────────────────────────────────────────

    fn poll(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) -> SensorSnapshot {
        let switch_on = match self.mechanism.poll_switch(hw) {
            Ok(on) => {
                self.sensor_ok(Input::Toggle);
                on
            }
            Err(e) => {
                self.sensor_fault(e, Input::Toggle, sink);
                false
            }
        };
        let tier = match self.mechanism.poll_proximity(hw) {
            Ok((_, tier)) => {
                self.sensor_ok(Input::Proximity);
                tier
            }
            Err(e) => {
                self.sensor_fault(e, Input::Proximity, sink);
                ProximityTier::NoDetection
            }
        };
        SensorSnapshot { switch_on, tier }
    }

    fn streak(&mut self, input: Input) -> &mut FaultStreak {
        match input {
            Input::Toggle => &mut self.toggle_faults,
            Input::Proximity => &mut self.proximity_faults,
        }
    }

    fn sensor_ok(&mut self, input: Input) {
        if let Some(run) = self.streak(input).recover() {
            info!("{} readable again after {} failed reads", input.name(), run);
        }
    }

    /// Every failure is counted; a run of failures is reported on its first
    /// read and then every [`FaultStreak::REPORT_EVERY`] reads.
    fn sensor_fault(&mut self, error: SensorError, input: Input, sink: &mut impl EventSink) {
        self.counters.sensor_faults = self.counters.sensor_faults.wrapping_add(1);
        let streak = self.streak(input);
        if streak.fail() {
            warn!("{} read failed: {} ({} in a row)", input.name(), error, streak.run());
            sink.emit(&AppEvent::SensorFault(error));
        } else {
            debug!("{} read failed: {}", input.name(), error);
        }
    }

    fn report_changes(&self, snapshot: &SensorSnapshot, sink: &mut impl EventSink) {
        if snapshot.switch_on != self.last.switch_on {
            sink.emit(&AppEvent::SwitchChanged {
                on: snapshot.switch_on,
            });
        }
        if snapshot.tier != self.last.tier {
            sink.emit(&AppEvent::ProximityChanged {
                from: self.last.tier,
                to: snapshot.tier,
            });
        }
    }

    // ── Reactions ─────────────────────────────────────────────

    /// Switch went on: wait (or panic), push it back off in a drawn style,
    /// close up.
    fn defeat_switch(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) {
        let now = hw.now_ms();
        self.enter(ControllerState::SwitchOff, now, sink);
        self.mechanism.set_indicator(hw, true);

        let escalated = self.recurrence.register_edge(now);
        if escalated {
            warn!(
                "Switch flipped {} times in a row, panicking",
                self.config.panic_threshold
            );
            self.play(hw, Gesture::Panic, sink);
            self.counters.panics = self.counters.panics.wrapping_add(1);
            self.mechanism.set_indicator(hw, true);
        } else {
            let delay = policy::reaction_delay_ms(&self.config.reaction_delays, rng.next_unit());
            info!("Switch on, reacting in {} ms", delay);
            hw.delay_ms(delay);
        }

        let style = policy::defeat_style(rng.next_unit());
        let outcome = self
            .mechanism
            .attempt_switch_off(hw, style, self.config.switch_off_attempts);
        if let Some(e) = outcome.fault {
            self.sensor_fault(e, Input::Toggle, sink);
        }
        self.counters.switch_defeats = self.counters.switch_defeats.wrapping_add(1);
        if !outcome.switched_off {
            self.counters.failed_defeats = self.counters.failed_defeats.wrapping_add(1);
        }
        self.mechanism.set_indicator(hw, false);

        let done = hw.now_ms();
        self.recurrence.mark_handled(done);
        self.inactivity.touch(done);
        sink.emit(&AppEvent::SwitchDefeat {
            style,
            attempts: outcome.attempts,
            switched_off: outcome.switched_off,
            escalated,
        });
        self.enter(ControllerState::Idle, done, sink);
    }

    fn approach_while_idle(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) {
        match policy::very_close_while_idle(&self.config.behavior, rng.next_unit()) {
            IdleApproach::PeekABoo => {
                self.enter(ControllerState::LidOpen, hw.now_ms(), sink);
                self.play(hw, Gesture::PeekABoo, sink);
                self.inactivity.touch(hw.now_ms());
                self.enter(ControllerState::Idle, hw.now_ms(), sink);
            }
            IdleApproach::Threaten => {
                info!("Threatening to switch off");
                self.play(hw, Gesture::Threaten, sink);
                self.inactivity.touch(hw.now_ms());
                self.enter(ControllerState::LidOpen, hw.now_ms(), sink);
            }
            IdleApproach::Ignore => {
                info!("Hand very close, ignoring it this time");
                sink.emit(&AppEvent::HandIgnored);
            }
        }
    }

    fn tease(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) {
        self.enter(ControllerState::Teasing, hw.now_ms(), sink);
        let gesture = if policy::close_while_idle_is_fakeout(&self.config.behavior, rng.next_unit())
        {
            Gesture::Fakeout
        } else {
            Gesture::Tease
        };
        self.play(hw, gesture, sink);
        self.inactivity.touch(hw.now_ms());
        self.enter(ControllerState::Idle, hw.now_ms(), sink);
    }

    /// Arm in, lid shut, indicator off, back to idle.
    fn retreat(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) {
        self.mechanism.close_all(hw);
        self.mechanism.set_indicator(hw, false);
        self.inactivity.touch(hw.now_ms());
        self.enter(ControllerState::Idle, hw.now_ms(), sink);
    }

    fn close_encounter(
        &mut self,
        hw: &mut impl Hardware,
        rng: &mut impl RandomPort,
        sink: &mut impl EventSink,
    ) {
        match policy::very_close_while_active(&self.config.behavior, rng.next_unit()) {
            CloseEncounter::Hide => {
                info!("Hand too close, hiding");
                self.mechanism.close_all(hw);
                self.mechanism.set_indicator(hw, false);
                self.enter(ControllerState::Idle, hw.now_ms(), sink);
            }
            CloseEncounter::BoldPeek => {
                info!("Hand too close, peeking anyway");
                self.mechanism.toggle_indicator(hw);
                self.mechanism.retract_arm(hw, 100, BOLD_PEEK_RETRACT_MS);
                self.play(hw, Gesture::PeekABoo, sink);
                self.inactivity.touch(hw.now_ms());
                self.enter(ControllerState::Idle, hw.now_ms(), sink);
            }
        }
    }

    fn check_inactivity(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) {
        let now = hw.now_ms();
        if self.state.current() != ControllerState::LidOpen
            || !self
                .inactivity
                .expired(now, self.config.inactivity_timeout_ms)
        {
            return;
        }
        let idle_ms = self.inactivity.idle_ms(now);
        info!("No interaction for {} ms, closing the lid", idle_ms);
        self.mechanism.close_all(hw);
        sink.emit(&AppEvent::InactivityClose { idle_ms });
        self.enter(ControllerState::Idle, hw.now_ms(), sink);
    }

    // ── Internal ──────────────────────────────────────────────

    fn play(&mut self, hw: &mut impl Hardware, gesture: Gesture, sink: &mut impl EventSink) {
        self.mechanism.play(hw, gesture);
        self.counters.gestures = self.counters.gestures.wrapping_add(1);
        sink.emit(&AppEvent::GesturePlayed(gesture));
    }

    fn enter(&mut self, next: ControllerState, now_ms: u64, sink: &mut impl EventSink) {
        if let Some((from, to)) = self.state.enter(next, now_ms) {
            sink.emit(&AppEvent::StateChanged { from, to });
        }
    }

    fn update_indicator(&mut self, hw: &mut impl Hardware, tier: ProximityTier) {
        let now = hw.now_ms();
        let delta = u32::try_from(now.saturating_sub(self.last_blink_ms)).unwrap_or(u32::MAX);
        self.last_blink_ms = now;

        self.blink.set_pattern(PatternId::for_tier(tier));
        let level = self.blink.tick(delta);
        self.mechanism.set_indicator(hw, level);
    }

    fn maybe_report_status(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let interval_ms = u64::from(self.config.status_interval_secs) * 1000;
        if interval_ms == 0 || now_ms.saturating_sub(self.last_status_ms) < interval_ms {
            return;
        }
        self.last_status_ms = now_ms;
        sink.emit(&AppEvent::Status(self.status_report(now_ms)));
    }
}
