//! Integration test: homing and pen handling.
//!
//! Validates: a homing pass lands on the same reference frame from any
//! start position, and pen lower/raise are idempotent re-probes.

use super::{machine, machine_with};
use eggbot_common::config::EggbotConfig;
use eggbot_common::control_unit::state::PenState;
use eggbot_common::hal::types::Axis;
use eggbot_control_unit::homing::{HomingController, HomingPhase};
use eggbot_control_unit::pen::PenController;
use eggbot_control_unit::sequencer::PatternSequencer;

// ── Homing ──────────────────────────────────────────────────────────

#[test]
fn home_zeroes_traverse_and_lift() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let mut homing = HomingController::new(config.homing.clone());

    let frame = homing.home(&mut machine).unwrap();

    assert_eq!(homing.phase(), HomingPhase::Complete);
    assert_eq!(machine.traverse.angle(), 0.0);
    assert_eq!(machine.lift.angle(), 0.0);
    assert_eq!(frame.back_off, -35.0);

    let traverse = handles.journal(Axis::Traverse).last().unwrap();
    let lift = handles.journal(Axis::Lift).last().unwrap();
    // back-off measured from the far stop at +120
    assert_eq!(traverse.position, 120.0 + frame.back_off);
    assert_eq!(lift.position, -90.0);
}

#[test]
fn home_is_independent_of_start_position() {
    let mut config = EggbotConfig::default();
    config.simulation.traverse.initial_position = -100.0;
    config.simulation.lift.initial_position = -5.0;
    let (mut far, far_handles) = machine_with(&config);
    let (mut near, near_handles) = machine();

    let mut homing = HomingController::new(config.homing.clone());
    let far_frame = homing.home(&mut far).unwrap();
    let near_frame = homing.home(&mut near).unwrap();

    assert_eq!(far_frame.traverse_travel, 220.0);
    assert_eq!(near_frame.traverse_travel, 110.0);
    for axis in [Axis::Traverse, Axis::Lift] {
        assert_eq!(
            far_handles.journal(axis).last().unwrap().position,
            near_handles.journal(axis).last().unwrap().position
        );
    }
    assert_eq!(homing.passes(), 2);
}

#[test]
fn calibrated_back_off_is_applied() {
    let mut config = EggbotConfig::default();
    config.homing.back_off = 42.5;
    let (mut machine, handles) = machine_with(&config);
    let mut seq = PatternSequencer::new(&config);

    seq.home(&mut machine).unwrap();

    let traverse = handles.journal(Axis::Traverse).last().unwrap();
    assert_eq!(traverse.position, 120.0 - 42.5);
    assert_eq!(seq.calibration().unwrap().back_off, -42.5);
    assert_eq!(seq.pen().state(), PenState::Up);
}

// ── Pen ─────────────────────────────────────────────────────────────

#[test]
fn pen_state_follows_last_command() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let mut pen = PenController::new(config.pen.clone());
    assert_eq!(pen.state(), PenState::Up);

    pen.lower(machine.lift.as_mut()).unwrap();
    pen.lower(machine.lift.as_mut()).unwrap();
    assert_eq!(pen.state(), PenState::Down);
    assert_eq!(handles.journal(Axis::Lift).last().unwrap().position, 0.0);

    pen.raise(machine.lift.as_mut()).unwrap();
    pen.raise(machine.lift.as_mut()).unwrap();
    assert_eq!(pen.state(), PenState::Up);
    assert_eq!(handles.journal(Axis::Lift).last().unwrap().position, -90.0);

    pen.lower(machine.lift.as_mut()).unwrap();
    assert_eq!(pen.state(), PenState::Down);
    assert_eq!(pen.contacts(), 3);
    assert_eq!(pen.retractions(), 2);
}

#[test]
fn lower_zeroes_lift_at_contact() {
    let config = EggbotConfig::default();
    let (mut machine, _handles) = machine();
    let mut pen = PenController::new(config.pen.clone());

    pen.lower(machine.lift.as_mut()).unwrap();
    assert_eq!(machine.lift.angle(), 0.0);
    pen.raise(machine.lift.as_mut()).unwrap();
    assert_eq!(machine.lift.angle(), -90.0);
}
