//! Integration test: drawing primitives and curved patterns.
//!
//! Validates: rotation bookkeeping of lines, dot placement, wave velocity
//! law, line-fan composition and pen recovery when an actuator fails in the
//! middle of a stroke.

use super::{FailingAxis, Mark, machine, timeline};
use eggbot_common::config::EggbotConfig;
use eggbot_common::control_unit::pattern::Step;
use eggbot_common::control_unit::state::PenState;
use eggbot_common::hal::driver::HalError;
use eggbot_common::hal::types::Axis;
use eggbot_control_unit::error::ControlError;
use eggbot_control_unit::pen::PenController;
use eggbot_control_unit::primitives::DrawingPrimitives;
use eggbot_control_unit::sequencer::PatternSequencer;
use eggbot_control_unit::sequencer::designs::LineFan;
use eggbot_control_unit::trajectory::TrajectoryGenerator;
use eggbot_hal::drivers::simulation::AxisEvent;

fn parts(config: &EggbotConfig) -> (PenController, DrawingPrimitives, TrajectoryGenerator) {
    (
        PenController::new(config.pen.clone()),
        DrawingPrimitives::new(config.primitives.clone()),
        TrajectoryGenerator::new(config.trajectory.clone()),
    )
}

// ── Lines ───────────────────────────────────────────────────────────

#[test]
fn line_resets_rotation_around_sweep() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let (mut pen, prims, _) = parts(&config);
    machine.rotation.reset_angle(123.0);

    prims.line(&mut machine, &mut pen).unwrap();

    let events = handles.journal(Axis::Rotation).events();
    assert_eq!(
        &events[1..4],
        &[
            AxisEvent::ResetAngle(0.0),
            AxisEvent::MoveByAngle {
                velocity: 100.0,
                degrees: 365.0
            },
            AxisEvent::ResetAngle(0.0),
        ]
    );
    assert_eq!(machine.rotation.angle(), 0.0);
}

#[test]
fn thick_line_sweeps_eight_turns() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let (mut pen, prims, _) = parts(&config);

    prims.thick_line(&mut machine, &mut pen).unwrap();

    let sweep = handles
        .journal(Axis::Rotation)
        .records()
        .into_iter()
        .find(|r| matches!(r.event, AxisEvent::MoveByAngle { .. }))
        .unwrap();
    assert_eq!(
        sweep.event,
        AxisEvent::MoveByAngle {
            velocity: 400.0,
            degrees: 2880.0
        }
    );
    assert_eq!(sweep.angle, 2880.0);
    assert_eq!(machine.rotation.angle(), 0.0);
    assert_eq!(pen.state(), PenState::Up);
    assert_eq!(pen.contacts(), 1);
}

// ── Dots ────────────────────────────────────────────────────────────

#[test]
fn four_dots_land_on_quarter_turns() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let (mut pen, prims, _) = parts(&config);

    prims.dotted_line(&mut machine, &mut pen, 4).unwrap();

    let expected: Vec<Mark> = [90.0, 180.0, 270.0, 360.0]
        .into_iter()
        .flat_map(|angle| [Mark::Advance(angle), Mark::Lower, Mark::Raise])
        .collect();
    assert_eq!(timeline(&handles), expected);
    assert_eq!(pen.state(), PenState::Up);
}

#[test]
fn dotted_line_advances_sum_to_one_revolution() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let (mut pen, prims, _) = parts(&config);

    prims.dotted_line(&mut machine, &mut pen, 30).unwrap();

    let total: f64 = handles
        .journal(Axis::Rotation)
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AxisEvent::MoveByAngle { degrees, .. } => Some(degrees),
            _ => None,
        })
        .sum();
    assert!((total - 360.0).abs() < 1e-9);
    assert_eq!(pen.contacts(), 30);
    assert_eq!(pen.retractions(), 30);
}

// ── Waves ───────────────────────────────────────────────────────────

#[test]
fn wave_samples_follow_cosine_law() {
    let config = EggbotConfig::default();
    let (mut machine, _handles) = machine();
    let (mut pen, _, traj) = parts(&config);
    let (amplitude, frequency) = (75.0, 14.0);

    let report = traj
        .wave(&mut machine, &mut pen, amplitude, frequency)
        .unwrap();

    assert!(!report.samples.is_empty());
    for sample in &report.samples {
        assert!((0.0..360.0).contains(&sample.angle));
        let expected = amplitude * (frequency * sample.angle.to_radians()).cos();
        assert!((sample.traverse_velocity - expected).abs() < 1e-9);
        assert!(sample.traverse_velocity.abs() <= amplitude);
    }
    assert!(report.final_angle >= 360.0);
    assert_eq!(pen.state(), PenState::Up);
}

#[test]
fn failure_mid_wave_leaves_pen_up() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let (mut pen, _, traj) = parts(&config);
    machine.traverse = FailingAxis::wrap(machine.traverse, 25);

    let err = traj
        .wave(&mut machine, &mut pen, 120.0, 10.0)
        .unwrap_err();

    assert!(matches!(
        err,
        ControlError::Hal(HalError::CommunicationError(_))
    ));
    assert_eq!(pen.state(), PenState::Up);
    assert_eq!(timeline(&handles).last(), Some(&Mark::Raise));
    let lift = handles.journal(Axis::Lift).last().unwrap();
    assert_eq!(lift.position, -90.0);
    assert_eq!(
        handles.journal(Axis::Traverse).last().unwrap().event,
        AxisEvent::Stop
    );
}

#[test]
fn failure_mid_circle_leaves_pen_up() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    machine.rotation = FailingAxis::wrap(machine.rotation, 0);
    let mut seq = PatternSequencer::new(&config);

    let err = seq
        .execute_step(&mut machine, &Step::Circle { radius: 8.0 })
        .unwrap_err();

    assert!(matches!(err, ControlError::Hal(_)));
    assert_eq!(seq.pen().state(), PenState::Up);
    assert_eq!(timeline(&handles), vec![Mark::Lower, Mark::Raise]);
}

// ── Composition ─────────────────────────────────────────────────────

#[test]
fn five_line_fan_draws_five_offset_sweeps() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let mut seq = PatternSequencer::new(&config);
    let fan = LineFan {
        count: 5,
        start_offset: 30.0,
        spacing: -15.0,
    }
    .pattern();
    assert_eq!(fan.checkpoints(), 0);

    let report = seq.run(&mut machine, &fan).unwrap();

    assert_eq!(report.steps, 11);
    assert_eq!(report.checkpoints, 0);
    let thick_sweeps = handles.journal(Axis::Rotation).count(|e| {
        *e == AxisEvent::MoveByAngle {
            velocity: 400.0,
            degrees: 2880.0,
        }
    });
    assert_eq!(thick_sweeps, 5);

    let marks = timeline(&handles);
    let offsets: Vec<f64> = marks
        .iter()
        .filter_map(|m| match m {
            Mark::Offset(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![30.0, -15.0, -15.0, -15.0, -15.0, -15.0]);

    // each sweep is preceded by an offset, then a lower
    for (i, mark) in marks.iter().enumerate() {
        if matches!(mark, Mark::Advance(_)) {
            assert_eq!(marks[i - 1], Mark::Lower);
            assert!(matches!(marks[i - 2], Mark::Offset(_)));
        }
    }
}
