//! One run of the machine.
//!
//! ```text
//! beep ─► home + raise ─► wait out settle delay ─► pattern ─► beep
//! ```
//!
//! The settle delay is measured from the start beep, so homing time counts
//! toward it. Progress is tracked by the session state machine; an actuator
//! error moves it to `Fault` and is returned unchanged.

use crate::error::ControlError;
use crate::sequencer::{PatternSequencer, SequenceReport, StepPhase};
use crate::state::TransitionResult;
use crate::state::session::{SessionEvent, SessionStateMachine};
use eggbot_common::config::EggbotConfig;
use eggbot_common::control_unit::config::SessionConfig;
use eggbot_common::control_unit::pattern::{Pattern, Step};
use eggbot_common::control_unit::state::SessionState;
use eggbot_common::hal::driver::Machine;
use std::time::Duration;
use tracing::{error, info, warn};

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub pattern: String,
    pub sequence: SequenceReport,
    /// Pen lowers during the session, homing excluded.
    pub contacts: u32,
    /// Simulated or real time from start beep to completion beep.
    pub elapsed: Duration,
}

/// Session runner.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    sequencer: PatternSequencer,
    state: SessionStateMachine,
}

impl Session {
    pub fn new(config: &EggbotConfig) -> Self {
        Self {
            config: config.session.clone(),
            sequencer: PatternSequencer::new(config),
            state: SessionStateMachine::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state.state()
    }

    pub fn sequencer(&self) -> &PatternSequencer {
        &self.sequencer
    }

    /// Run `pattern` from power-on to completion beep.
    ///
    /// A session that already ended is reset first.
    pub fn run(
        &mut self,
        machine: &mut Machine,
        pattern: &Pattern,
    ) -> Result<SessionReport, ControlError> {
        if self.state().is_terminal() {
            self.transition(SessionEvent::Reset);
        }
        let contacts_before = self.sequencer.pen().contacts();

        match self.execute(machine, pattern) {
            Ok((sequence, elapsed)) => {
                let report = SessionReport {
                    pattern: pattern.name.clone(),
                    sequence,
                    contacts: self.sequencer.pen().contacts() - contacts_before,
                    elapsed,
                };
                info!(
                    pattern = %report.pattern,
                    steps = report.sequence.steps,
                    checkpoints = report.sequence.checkpoints,
                    contacts = report.contacts,
                    elapsed = ?report.elapsed,
                    "Session complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(state = ?self.state(), error = %e, "Session aborted");
                self.transition(SessionEvent::Fault);
                Err(e)
            }
        }
    }

    fn execute(
        &mut self,
        machine: &mut Machine,
        pattern: &Pattern,
    ) -> Result<(SequenceReport, Duration), ControlError> {
        machine.speaker.beep();
        let start = machine.clock.now();
        self.transition(SessionEvent::Start);
        info!(pattern = %pattern.name, "Session started");

        self.sequencer.home(machine)?;
        self.transition(SessionEvent::Homed);

        let settle = self.config.settle_delay();
        loop {
            let elapsed = machine.clock.elapsed_since(start);
            if elapsed >= settle {
                break;
            }
            machine.clock.sleep(settle - elapsed);
        }
        self.transition(SessionEvent::Settled);

        let state = &mut self.state;
        let report = self
            .sequencer
            .run_with(machine, pattern, |phase| match phase {
                StepPhase::Starting(Step::Checkpoint) => {
                    apply(state, SessionEvent::CheckpointReached)
                }
                StepPhase::Finished(Step::Checkpoint, _) => apply(state, SessionEvent::Confirmed),
                _ => {}
            })?;

        machine.speaker.beep();
        self.transition(SessionEvent::Finished);
        Ok((report, machine.clock.elapsed_since(start)))
    }

    fn transition(&mut self, event: SessionEvent) {
        apply(&mut self.state, event);
    }
}

fn apply(state: &mut SessionStateMachine, event: SessionEvent) {
    if let TransitionResult::Rejected(reason) = state.handle_event(event) {
        warn!(?event, state = ?state.state(), reason, "session transition rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eggbot_common::hal::driver::HalError;
    use eggbot_hal::SimulationDriver;

    #[test]
    fn empty_pattern_waits_out_settle_delay() {
        let config = EggbotConfig::default();
        let (mut machine, handles) = SimulationDriver::build(&config).unwrap();
        let mut session = Session::new(&config);

        let report = session.run(&mut machine, &Pattern::new("nothing")).unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(handles.beeps(), 2);
        assert!(report.elapsed >= config.session.settle_delay());
        assert_eq!(report.contacts, 0);
    }

    #[test]
    fn homing_failure_faults_session() {
        let mut config = EggbotConfig::default();
        config.simulation.lift.min_stop = None;
        let (mut machine, handles) = SimulationDriver::build(&config).unwrap();
        let mut session = Session::new(&config);

        let err = session.run(&mut machine, &Pattern::new("nothing")).unwrap_err();
        assert!(matches!(err, ControlError::Hal(HalError::StallTimeout { .. })));
        assert_eq!(session.state(), SessionState::Fault);
        assert_eq!(handles.beeps(), 1);
    }

    #[test]
    fn finished_session_can_run_again() {
        let config = EggbotConfig::default();
        let (mut machine, _handles) = SimulationDriver::build(&config).unwrap();
        let mut session = Session::new(&config);

        session.run(&mut machine, &Pattern::new("first")).unwrap();
        session.run(&mut machine, &Pattern::new("second")).unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.sequencer().homing().passes(), 2);
    }
}
