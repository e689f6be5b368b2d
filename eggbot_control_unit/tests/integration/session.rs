//! Integration test: full sessions.
//!
//! Validates: beep → home → settle → pattern → beep against the simulated
//! clock, checkpoint blocking on the button, pattern files, and the
//! transition to `Fault` when an actuator fails.

use super::{FailingAxis, machine, machine_with};
use eggbot_common::config::EggbotConfig;
use eggbot_common::control_unit::pattern::{Pattern, Step};
use eggbot_common::control_unit::state::{PenState, SessionState};
use eggbot_common::hal::driver::HalError;
use eggbot_control_unit::config::load_pattern;
use eggbot_control_unit::error::ControlError;
use eggbot_control_unit::sequencer::designs::Design;
use eggbot_control_unit::session::Session;
use std::path::PathBuf;
use std::time::Duration;

fn workspace_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(relative)
}

#[test]
fn session_beeps_twice_and_waits_for_settle() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let mut session = Session::new(&config);
    let pattern = Pattern::new("one-line").then(Step::Line);

    let report = session.run(&mut machine, &pattern).unwrap();

    assert_eq!(handles.beeps(), 2);
    assert_eq!(session.state(), SessionState::Complete);
    assert!(report.elapsed >= Duration::from_millis(4000));
    assert_eq!(report.sequence.steps, 1);
    assert_eq!(report.contacts, 1);
    assert_eq!(session.sequencer().pen().state(), PenState::Up);
}

#[test]
fn checkpoint_blocks_until_button() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let mut session = Session::new(&config);
    let pattern = Pattern::new("pause").then(Step::Checkpoint);

    let report = session.run(&mut machine, &pattern).unwrap();

    assert_eq!(report.sequence.checkpoints, 1);
    assert_eq!(handles.button_presses(), 1);
    assert_eq!(
        handles.screen_lines(),
        vec![config.session.checkpoint_message.clone()]
    );
    // the simulated button presses 500 ms after polling starts
    assert!(report.elapsed >= Duration::from_millis(4500));
}

#[test]
fn no_confirm_skips_checkpoints() {
    let mut config = EggbotConfig::default();
    config.session.confirm_checkpoints = false;
    config.simulation.button_press_after_ms = None;
    let (mut machine, handles) = machine_with(&config);
    let mut session = Session::new(&config);

    let report = session
        .run(&mut machine, &Design::ColorBands.pattern())
        .unwrap();

    assert_eq!(report.sequence.checkpoints, 0);
    assert_eq!(report.sequence.skipped_checkpoints, 8);
    assert_eq!(report.sequence.home_passes, 8);
    assert_eq!(report.contacts, 8);
    assert_eq!(handles.button_presses(), 0);
}

#[test]
fn shipped_pattern_file_runs() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    let pattern = load_pattern(&workspace_file("config/patterns/two_tone_waves.toml")).unwrap();
    let mut session = Session::new(&config);

    let report = session.run(&mut machine, &pattern).unwrap();

    assert_eq!(report.pattern, "two-tone-waves");
    assert_eq!(report.sequence.trajectories, 2);
    assert_eq!(report.sequence.checkpoints, 1);
    assert_eq!(report.contacts, 4);
    assert_eq!(handles.beeps(), 2);
}

#[test]
fn wave_between_lines_design_completes() {
    let config = EggbotConfig::default();
    let (mut machine, _handles) = machine();
    let mut session = Session::new(&config);

    let report = session
        .run(&mut machine, &Design::WaveBetweenLines.pattern())
        .unwrap();

    assert_eq!(report.sequence.trajectories, 1);
    assert_eq!(report.sequence.home_passes, 1);
    assert_eq!(report.contacts, 3);
    assert_eq!(session.sequencer().homing().passes(), 2);
}

#[test]
fn actuator_failure_faults_session() {
    let config = EggbotConfig::default();
    let (mut machine, handles) = machine();
    machine.traverse = FailingAxis::wrap(machine.traverse, 10);
    let mut session = Session::new(&config);
    let pattern = Pattern::new("doomed").then(Step::Wave {
        amplitude: 120.0,
        frequency: 10.0,
    });

    let err = session.run(&mut machine, &pattern).unwrap_err();

    assert!(matches!(
        err,
        ControlError::Hal(HalError::CommunicationError(_))
    ));
    assert_eq!(session.state(), SessionState::Fault);
    assert_eq!(session.sequencer().pen().state(), PenState::Up);
    assert_eq!(handles.beeps(), 1);
}
