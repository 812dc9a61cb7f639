//! Integration tests for the Controller → UselessBox → ports pipeline.
//!
//! These run on the host (x86_64) against [`MockHardware`], a scripted
//! random source and a recording event sink.  Time only advances through
//! `delay_ms`, so every scenario is deterministic.

use crate::mock_hw::{MockHardware, RecordingSink, ScriptedRng};

use uselessbox::app::controller::Controller;
use uselessbox::app::events::AppEvent;
use uselessbox::app::ports::Joint;
use uselessbox::config::BoxConfig;
use uselessbox::error::{ConfigError, SensorError};
use uselessbox::fsm::ControllerState::{self, Idle, LidOpen, SwitchOff, Teasing};
use uselessbox::fsm::context::FaultStreak;
use uselessbox::mechanism::gestures::{DefeatStyle, Gesture};

const FAR: u8 = 60;
const CLOSE: u8 = 150;
const VERY_CLOSE: u8 = 220;

/// Reaction-delay draw that lands in the 500 ms bucket.
const SHORT_DELAY: f32 = 0.0;

fn boot() -> (Controller, MockHardware, RecordingSink) {
    boot_with(BoxConfig::default())
}

fn boot_with(config: BoxConfig) -> (Controller, MockHardware, RecordingSink) {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let controller = Controller::new(config, &mut hw, &mut sink).expect("valid config");
    (controller, hw, sink)
}

fn defeats(sink: &RecordingSink) -> Vec<(u8, bool, bool)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SwitchDefeat {
                attempts,
                switched_off,
                escalated,
                ..
            } => Some((*attempts, *switched_off, *escalated)),
            _ => None,
        })
        .collect()
}

fn defeat_styles(sink: &RecordingSink) -> Vec<DefeatStyle> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SwitchDefeat { style, .. } => Some(*style),
            _ => None,
        })
        .collect()
}

fn faults(sink: &RecordingSink) -> usize {
    sink.count(|e| matches!(e, AppEvent::SensorFault(_)))
}

fn gestures(sink: &RecordingSink) -> Vec<Gesture> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::GesturePlayed(g) => Some(*g),
            _ => None,
        })
        .collect()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn starts_idle_with_mechanism_at_rest() {
    let (ctrl, hw, sink) = boot();

    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
    assert_eq!(sink.events.first(), Some(&AppEvent::Started(Idle)));

    let config = BoxConfig::default();
    assert_eq!(hw.last_angle(Joint::SwitchArm), Some(config.switch_arm.home_deg));
    assert_eq!(hw.last_angle(Joint::Lid), Some(config.lid.home_deg));
    assert!(!hw.indicator());
}

#[test]
fn invalid_config_is_rejected_before_moving() {
    let mut config = BoxConfig::default();
    config.proximity.close = config.proximity.very_close;

    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let result = Controller::new(config, &mut hw, &mut sink);

    assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    assert!(hw.servo_log.is_empty(), "no servo may move on a bad config");
    assert!(sink.events.is_empty());
}

// ── Switch defeat ─────────────────────────────────────────────

#[test]
fn switch_flip_is_pushed_back_off() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    hw.switch_on = true;
    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert!(!hw.switch_on);
    assert_eq!(ctrl.state(), Idle);
    assert_eq!(sink.transitions(), vec![(Idle, SwitchOff), (SwitchOff, Idle)]);
    assert_eq!(defeats(&sink), vec![(1, true, false)]);
    assert!(hw.delays.contains(&500), "reaction delay from the 500 ms bucket");
    assert!(hw.indicator_log.contains(&true), "indicator lit while defeating");
    assert!(!ctrl.mechanism().indicator_on());
    assert!(ctrl.mechanism().is_at_rest());
}

#[test]
fn stuck_switch_gives_up_after_configured_attempts() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    hw.switch_on = true;
    hw.switch_stuck = true;
    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(hw.switch_pushes, 3);
    assert_eq!(defeats(&sink), vec![(3, false, false)]);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest(), "lid closes even on failure");

    // Still on, but no new edge: nothing happens until it is flipped again.
    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(hw.switch_pushes, 3);
    assert_eq!(defeats(&sink).len(), 1);
}

#[test]
fn each_draw_selects_its_defeat_style() {
    let n = DefeatStyle::ALL.len() as f32;
    for (i, expected) in DefeatStyle::ALL.iter().enumerate() {
        let (mut ctrl, mut hw, mut sink) = boot();
        // reaction delay, then the style draw
        let mut rng = ScriptedRng::new(&[SHORT_DELAY, (i as f32 + 0.5) / n], 0.9);

        hw.switch_on = true;
        ctrl.update(&mut hw, &mut rng, &mut sink);

        assert_eq!(defeat_styles(&sink), vec![*expected]);
        assert_eq!(defeats(&sink), vec![(1, true, false)], "{}", expected.name());
        assert_eq!(hw.switch_pushes, 1, "{} pushed more than once", expected.name());
        assert!(!hw.switch_on);
        assert!(ctrl.mechanism().is_at_rest(), "{}", expected.name());
    }
}

#[test]
fn stuck_switch_bounds_pushes_in_every_style() {
    let n = DefeatStyle::ALL.len() as f32;
    for i in 0..DefeatStyle::ALL.len() {
        let (mut ctrl, mut hw, mut sink) = boot();
        let mut rng = ScriptedRng::new(&[SHORT_DELAY, (i as f32 + 0.5) / n], 0.9);

        hw.switch_on = true;
        hw.switch_stuck = true;
        ctrl.update(&mut hw, &mut rng, &mut sink);

        assert_eq!(hw.switch_pushes, 3);
        assert_eq!(defeats(&sink), vec![(3, false, false)]);
        assert!(ctrl.mechanism().is_at_rest());
    }
}

#[test]
fn failed_recheck_is_a_fault_not_a_success() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);
    hw.switch_on = true;
    hw.switch_stuck = true;
    // The edge poll succeeds, the re-check after the first push fails.
    hw.switch_reads_before_failure = Some(1);

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(defeats(&sink), vec![(1, false, false)]);
    assert_eq!(faults(&sink), 1);
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SensorFault(SensorError::GpioReadFailed)))
            .count(),
        1
    );
    let status = ctrl.status_report(hw.now_ms);
    assert_eq!(status.sensor_faults, 1);
    assert_eq!(status.failed_defeats, 1);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
}

#[test]
fn switch_edge_takes_priority_over_a_close_hand() {
    let (mut ctrl, mut hw, mut sink) = boot();
    // Threaten first so the lid is up.
    let mut rng = ScriptedRng::new(&[0.10], SHORT_DELAY);
    hw.script_proximity(&[VERY_CLOSE]);
    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), LidOpen);

    hw.switch_on = true;
    hw.script_proximity(&[VERY_CLOSE]);
    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(ctrl.state(), Idle);
    assert_eq!(defeats(&sink), vec![(1, true, false)]);
    let transitions = sink.transitions();
    assert_eq!(&transitions[transitions.len() - 2..], &[(LidOpen, SwitchOff), (SwitchOff, Idle)]);
    assert!(ctrl.mechanism().is_at_rest());
}

#[test]
fn rapid_flips_panic_exactly_once() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    for _ in 0..3 {
        hw.switch_on = true;
        ctrl.update(&mut hw, &mut rng, &mut sink);
        // One poll with the switch back off before the next flip.
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }

    let panics = gestures(&sink)
        .into_iter()
        .filter(|g| *g == Gesture::Panic)
        .count();
    assert_eq!(panics, 1);
    assert_eq!(
        defeats(&sink),
        vec![(1, true, false), (1, true, false), (1, true, true)]
    );
    assert_eq!(ctrl.recurrence_count(), 0, "counter resets after panicking");
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
    assert!(!ctrl.mechanism().indicator_on());
}

#[test]
fn slow_flips_never_panic() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    for _ in 0..5 {
        hw.switch_on = true;
        ctrl.update(&mut hw, &mut rng, &mut sink);
        hw.now_ms += 5_000;
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }

    assert!(!gestures(&sink).contains(&Gesture::Panic));
    assert_eq!(defeats(&sink).len(), 5);
}

#[test]
fn switch_on_at_boot_is_defeated_on_first_tick() {
    let mut hw = MockHardware::new();
    hw.switch_on = true;
    let mut sink = RecordingSink::new();
    let mut ctrl = Controller::new(BoxConfig::default(), &mut hw, &mut sink).unwrap();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert!(!hw.switch_on);
    assert_eq!(defeats(&sink).len(), 1);
}

// ── Proximity reactions ───────────────────────────────────────

#[test]
fn approaching_hand_teases_threatens_then_box_retreats() {
    let (mut ctrl, mut hw, mut sink) = boot();
    // tease (no fake-out), then threaten
    let mut rng = ScriptedRng::new(&[0.5, 0.10], 0.9);
    hw.script_proximity(&[FAR, CLOSE, VERY_CLOSE, FAR]);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), Idle, "far hand is ignored while idle");

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), Idle);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), LidOpen);
    assert!(ctrl.mechanism().lid_is_open());
    assert!(ctrl.mechanism().switch_arm_retracted());

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());

    assert_eq!(gestures(&sink), vec![Gesture::Tease, Gesture::Threaten]);
    assert_eq!(
        sink.transitions(),
        vec![(Idle, Teasing), (Teasing, Idle), (Idle, LidOpen), (LidOpen, Idle)]
    );
    assert_eq!(hw.switch_pushes, 0, "threatening never touches the switch");
}

#[test]
fn close_hand_sometimes_gets_a_fakeout() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.1], 0.9);
    hw.script_proximity(&[CLOSE]);

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(gestures(&sink), vec![Gesture::Fakeout]);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
}

#[test]
fn peekaboo_opens_halfway_and_closes() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.0], 0.9);
    hw.script_proximity(&[VERY_CLOSE]);
    hw.clear_logs();

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(gestures(&sink), vec![Gesture::PeekABoo]);
    assert_eq!(sink.transitions(), vec![(Idle, LidOpen), (LidOpen, Idle)]);
    // 50 % of a 90° → 30° travel.
    assert_eq!(hw.min_angle(Joint::Lid), Some(60.0));
    assert_eq!(hw.last_angle(Joint::Lid), Some(90.0));
    assert_eq!(hw.writes_to(Joint::SwitchArm), 0);
}

#[test]
fn very_close_hand_can_be_ignored() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.9], 0.9);
    hw.script_proximity(&[VERY_CLOSE]);
    hw.clear_logs();

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(sink.count(|e| matches!(e, AppEvent::HandIgnored)), 1);
    assert!(hw.servo_log.is_empty());
    assert_eq!(ctrl.state(), Idle);
}

#[test]
fn very_close_hand_while_lid_up_makes_box_hide() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.10, 0.5], 0.9);
    hw.script_proximity(&[VERY_CLOSE, VERY_CLOSE]);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), LidOpen);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
    assert_eq!(gestures(&sink), vec![Gesture::Threaten]);
}

#[test]
fn bold_peek_when_lid_up() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.10, 0.001], 0.9);
    hw.script_proximity(&[VERY_CLOSE, VERY_CLOSE]);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert_eq!(gestures(&sink), vec![Gesture::Threaten, Gesture::PeekABoo]);
    assert_eq!(ctrl.state(), Idle);
    assert!(ctrl.mechanism().is_at_rest());
}

// ── Inactivity ────────────────────────────────────────────────

#[test]
fn lid_left_open_closes_after_inactivity_timeout() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.10], 0.9);
    hw.script_proximity(&[VERY_CLOSE]);

    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), LidOpen);

    let timeout = u64::from(BoxConfig::default().inactivity_timeout_ms);
    let tick = u64::from(BoxConfig::default().tick_interval_ms);
    let mut ticks = 0u64;
    while ctrl.state() == LidOpen && ticks < 100 {
        ctrl.update(&mut hw, &mut rng, &mut sink);
        ticks += 1;
    }

    assert_eq!(ctrl.state(), Idle);
    assert!(ticks * tick >= timeout, "closed too early after {} ticks", ticks);
    assert!(ctrl.mechanism().is_at_rest());

    let closes: Vec<u64> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::InactivityClose { idle_ms } => Some(*idle_ms),
            _ => None,
        })
        .collect();
    assert_eq!(closes.len(), 1);
    assert!(closes[0] > timeout);
}

// ── Degraded sensing ──────────────────────────────────────────

#[test]
fn sensor_faults_degrade_to_safe_defaults() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(0.0);
    hw.fail_proximity = true;
    hw.fail_switch = true;
    hw.clear_logs();

    for _ in 0..5 {
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }

    assert_eq!(ctrl.state(), Idle);
    assert!(hw.servo_log.is_empty(), "no motion on faulted sensors");
    assert_eq!(rng.taken, 0);
    assert_eq!(faults(&sink), 2, "one report per failing sensor");
    assert_eq!(ctrl.status_report(hw.now_ms).sensor_faults, 10);
    assert_eq!(ctrl.tick_count(), 5);
}

#[test]
fn dead_sensor_is_reported_sparsely_and_again_after_recovery() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(0.9);
    hw.fail_proximity = true;

    let ticks = FaultStreak::REPORT_EVERY * 2;
    for _ in 0..ticks {
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }
    assert_eq!(faults(&sink), 2);
    assert_eq!(ctrl.status_report(hw.now_ms).sensor_faults, ticks);

    hw.fail_proximity = false;
    ctrl.update(&mut hw, &mut rng, &mut sink);
    hw.fail_proximity = true;
    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(faults(&sink), 3);
}

#[test]
fn proximity_fault_does_not_block_switch_defeat() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);
    hw.fail_proximity = true;
    hw.switch_on = true;

    ctrl.update(&mut hw, &mut rng, &mut sink);

    assert!(!hw.switch_on);
    assert_eq!(defeats(&sink), vec![(1, true, false)]);
}

// ── Indicator / status ────────────────────────────────────────

#[test]
fn indicator_blinks_slowly_for_a_close_hand_with_lid_up() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::new(&[0.10], 0.9);
    hw.script_proximity(&[VERY_CLOSE, CLOSE, CLOSE, CLOSE, CLOSE, CLOSE, CLOSE]);
    ctrl.update(&mut hw, &mut rng, &mut sink);
    assert_eq!(ctrl.state(), LidOpen);

    let mut levels = Vec::new();
    for _ in 0..6 {
        ctrl.update(&mut hw, &mut rng, &mut sink);
        levels.push(ctrl.mechanism().indicator_on());
    }

    assert_eq!(ctrl.state(), LidOpen, "a close hand does not close the lid");
    assert_eq!(levels, vec![true, true, true, false, false, true]);
}

#[test]
fn only_changes_are_reported() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(0.9);
    hw.script_proximity(&[FAR, FAR, FAR, 0, 0]);

    for _ in 0..5 {
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }

    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ProximityChanged { .. })),
        2
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SwitchChanged { .. })), 0);
}

#[test]
fn status_report_is_emitted_periodically() {
    let mut config = BoxConfig::default();
    config.status_interval_secs = 1;
    let (mut ctrl, mut hw, mut sink) = boot_with(config);
    let mut rng = ScriptedRng::constant(0.9);

    for _ in 0..12 {
        ctrl.update(&mut hw, &mut rng, &mut sink);
    }

    let reports: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Status(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].state, ControllerState::Idle);
    assert!(reports[0].ticks > 0);
    assert!(reports[1].uptime_ms > reports[0].uptime_ms);
    assert_eq!(reports[1].transitions, 0);
    assert_eq!(
        reports[1].ms_in_state - reports[0].ms_in_state,
        reports[1].uptime_ms - reports[0].uptime_ms,
        "idle since boot"
    );
}

#[test]
fn status_tracks_transitions_and_time_in_state() {
    let (mut ctrl, mut hw, mut sink) = boot();
    let mut rng = ScriptedRng::constant(SHORT_DELAY);

    hw.switch_on = true;
    ctrl.update(&mut hw, &mut rng, &mut sink);
    let idle_since = hw.now_ms - u64::from(BoxConfig::default().tick_interval_ms);
    hw.now_ms += 1_000;

    let status = ctrl.status_report(hw.now_ms);
    assert_eq!(status.transitions, 2);
    assert_eq!(status.ms_in_state, hw.now_ms - idle_since);
}
