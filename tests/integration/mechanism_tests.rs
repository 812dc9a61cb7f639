//! Integration tests for the UselessBox mechanism against mock hardware.
//!
//! Exercises motion sequencing, timing and the switch-defeat loop without
//! the controller on top.

use crate::mock_hw::MockHardware;

use uselessbox::app::ports::Joint;
use uselessbox::config::BoxConfig;
use uselessbox::mechanism::UselessBox;
use uselessbox::error::SensorError;
use uselessbox::mechanism::gestures::{DefeatStyle, Gesture};

fn rested() -> (UselessBox, MockHardware) {
    let mut hw = MockHardware::new();
    let mut mech = UselessBox::new(&BoxConfig::default());
    mech.reset(&mut hw);
    hw.clear_logs();
    (mech, hw)
}

#[test]
fn reset_retracts_arm_before_closing_lid() {
    let mut hw = MockHardware::new();
    let mut mech = UselessBox::new(&BoxConfig::default());
    mech.reset(&mut hw);

    let joints: Vec<Joint> = hw.servo_log.iter().map(|(j, _)| *j).collect();
    assert_eq!(joints, vec![Joint::SwitchArm, Joint::Lid]);
    assert_eq!(hw.indicator_log, vec![false]);
    assert!(mech.is_at_rest());
}

#[test]
fn full_move_takes_full_range_time() {
    let (mut mech, mut hw) = rested();

    mech.open_lid(&mut hw, 100, 500);

    assert_eq!(hw.delays.iter().sum::<u32>(), 500);
    assert_eq!(hw.writes_to(Joint::Lid), 50);
    assert_eq!(hw.last_angle(Joint::Lid), Some(30.0));
    assert!(mech.lid_is_open());
}

#[test]
fn partial_move_is_proportionally_shorter() {
    let (mut mech, mut hw) = rested();

    mech.open_lid(&mut hw, 50, 500);

    assert_eq!(hw.delays.iter().sum::<u32>(), 250);
    assert_eq!(hw.last_angle(Joint::Lid), Some(60.0));
    assert!(!mech.lid_is_open(), "exactly half open is not open");
}

#[test]
fn move_to_current_position_issues_nothing() {
    let (mut mech, mut hw) = rested();

    mech.close_lid(&mut hw, 100, 500);
    mech.retract_arm(&mut hw, 100, 500);

    assert!(hw.servo_log.is_empty());
    assert!(hw.delays.is_empty());
}

#[test]
fn close_lid_by_percent_is_relative_to_fully_closed() {
    let (mut mech, mut hw) = rested();
    mech.open_lid(&mut hw, 100, 100);

    mech.close_lid(&mut hw, 25, 100);

    assert!((mech.lid_open_percent() - 75.0).abs() < 0.1);
}

#[test]
fn switch_off_stops_after_first_successful_push() {
    let (mut mech, mut hw) = rested();
    hw.switch_on = true;

    let outcome = mech.attempt_switch_off(&mut hw, DefeatStyle::Standard, 3);

    assert_eq!(outcome.attempts, 1);
    assert!(outcome.switched_off);
    assert_eq!(outcome.fault, None);
    assert_eq!(hw.switch_pushes, 1);
    assert!(mech.is_at_rest());
    assert_eq!(hw.last_angle(Joint::Lid), Some(90.0));
}

#[test]
fn switch_off_never_exceeds_max_attempts() {
    let (mut mech, mut hw) = rested();
    hw.switch_on = true;
    hw.switch_stuck = true;

    let outcome = mech.attempt_switch_off(&mut hw, DefeatStyle::Standard, 3);

    assert_eq!(outcome.attempts, 3);
    assert!(!outcome.switched_off);
    assert_eq!(hw.switch_pushes, 3);
    assert!(mech.is_at_rest(), "lid closed even though the switch won");
}

#[test]
fn switch_arm_only_moves_with_lid_fully_open() {
    for style in DefeatStyle::ALL {
        let (mut mech, mut hw) = rested();
        hw.switch_on = true;
        hw.switch_stuck = true;

        mech.attempt_switch_off(&mut hw, style, 3);

        let mut lid_deg = 90.0;
        for (joint, deg) in &hw.servo_log {
            match joint {
                Joint::Lid => lid_deg = *deg,
                Joint::SwitchArm => assert_eq!(
                    lid_deg, 30.0,
                    "{}: arm moved with lid at {}°",
                    style.name(),
                    lid_deg
                ),
            }
        }
        assert!(mech.is_at_rest(), "{}", style.name());
    }
}

#[test]
fn styles_differ_in_pacing() {
    let mut totals = Vec::new();
    for style in DefeatStyle::ALL {
        let (mut mech, mut hw) = rested();
        hw.switch_on = true;
        mech.attempt_switch_off(&mut hw, style, 3);
        totals.push(hw.delays.iter().sum::<u32>());
    }
    let rapid = totals[1];
    let slow_retract = totals[3];
    assert!(rapid < totals[0], "rapid is quicker than standard");
    assert!(slow_retract > totals[0], "slow retract is slower than standard");
}

#[test]
fn failed_recheck_stops_without_claiming_success() {
    let (mut mech, mut hw) = rested();
    hw.switch_on = true;
    hw.switch_stuck = true;
    hw.switch_reads_before_failure = Some(0);

    let outcome = mech.attempt_switch_off(&mut hw, DefeatStyle::Standard, 3);

    assert_eq!(outcome.attempts, 1);
    assert!(!outcome.switched_off);
    assert_eq!(outcome.fault, Some(SensorError::GpioReadFailed));
    assert_eq!(hw.switch_pushes, 1);
    assert!(mech.is_at_rest(), "lid still closes after a failed re-check");
}

#[test]
fn close_all_retracts_arm_first() {
    let (mut mech, mut hw) = rested();
    mech.open_lid(&mut hw, 100, 100);
    mech.extend_arm(&mut hw, 60, 100);
    hw.clear_logs();

    mech.close_all(&mut hw);

    let first_lid = hw
        .servo_log
        .iter()
        .position(|(j, _)| *j == Joint::Lid)
        .unwrap();
    let last_arm = hw
        .servo_log
        .iter()
        .rposition(|(j, _)| *j == Joint::SwitchArm)
        .unwrap();
    assert!(last_arm < first_lid);
    assert!(mech.is_at_rest());
}

#[test]
fn no_gesture_pushes_the_switch_or_leaves_the_arm_out() {
    for gesture in Gesture::ALL {
        let (mut mech, mut hw) = rested();
        mech.play(&mut hw, gesture);

        assert_eq!(hw.switch_pushes, 0, "{} touched the switch", gesture.name());
        assert!(mech.switch_arm_retracted(), "{} left the arm out", gesture.name());
        assert_eq!(mech.lid_is_open(), gesture.leaves_lid_open(), "{}", gesture.name());
    }
}

#[test]
fn panic_ends_with_indicator_off() {
    let (mut mech, mut hw) = rested();
    mech.play(&mut hw, Gesture::Panic);

    assert!(!mech.indicator_on());
    assert!(hw.indicator_log.len() >= 4, "panic flashes the indicator");
    assert!(mech.is_at_rest());
}

#[test]
fn read_failures_become_safe_defaults() {
    use uselessbox::mechanism::proximity::ProximityTier;

    let (mech, mut hw) = rested();
    hw.switch_on = true;
    hw.fail_switch = true;
    hw.fail_proximity = true;

    assert!(!mech.get_switch_state(&mut hw));
    assert_eq!(mech.get_proximity(&mut hw), ProximityTier::NoDetection);
}
