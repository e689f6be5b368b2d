//! Pattern sequencer.
//!
//! Owns the controllers and executes [`Pattern`] steps against a
//! [`Machine`]. A `Home` step re-establishes the calibration frame and makes
//! sure the pen is Up. A `Checkpoint` shows the configured message and
//! spin-polls the button; with `confirm_checkpoints = false` it is skipped.

pub mod designs;

use crate::error::ControlError;
use crate::homing::{CalibrationFrame, HomingController};
use crate::pen::PenController;
use crate::primitives::DrawingPrimitives;
use crate::trajectory::{TrajectoryGenerator, TrajectoryReport};
use eggbot_common::config::EggbotConfig;
use eggbot_common::control_unit::config::SessionConfig;
use eggbot_common::control_unit::pattern::{Pattern, Step};
use eggbot_common::hal::driver::Machine;
use tracing::{debug, info};

/// What one step did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Position-controlled primitive or offset finished.
    Completed,
    /// Curved pattern finished.
    Traced(TrajectoryReport),
    /// New calibration frame.
    Homed(CalibrationFrame),
    /// Button pressed at a checkpoint.
    Confirmed,
    /// Checkpoint skipped by configuration.
    Skipped,
}

/// Where a step stands, as seen by a [`PatternSequencer::run_with`] hook.
#[derive(Debug, Clone, Copy)]
pub enum StepPhase<'a> {
    /// About to execute the step.
    Starting(&'a Step),
    /// The step finished with the given outcome.
    Finished(&'a Step, &'a StepOutcome),
}

/// Summary of one pattern run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub steps: usize,
    pub checkpoints: usize,
    pub skipped_checkpoints: usize,
    pub home_passes: usize,
    pub trajectories: usize,
}

impl SequenceReport {
    fn record(&mut self, outcome: &StepOutcome) {
        self.steps += 1;
        match outcome {
            StepOutcome::Completed => {}
            StepOutcome::Traced(_) => self.trajectories += 1,
            StepOutcome::Homed(_) => self.home_passes += 1,
            StepOutcome::Confirmed => self.checkpoints += 1,
            StepOutcome::Skipped => self.skipped_checkpoints += 1,
        }
    }
}

/// Step executor holding every controller.
#[derive(Debug, Clone)]
pub struct PatternSequencer {
    homing: HomingController,
    pen: PenController,
    primitives: DrawingPrimitives,
    trajectory: TrajectoryGenerator,
    session: SessionConfig,
    calibration: Option<CalibrationFrame>,
}

impl PatternSequencer {
    pub fn new(config: &EggbotConfig) -> Self {
        Self {
            homing: HomingController::new(config.homing.clone()),
            pen: PenController::new(config.pen.clone()),
            primitives: DrawingPrimitives::new(config.primitives.clone()),
            trajectory: TrajectoryGenerator::new(config.trajectory.clone()),
            session: config.session.clone(),
            calibration: None,
        }
    }

    pub fn pen(&self) -> &PenController {
        &self.pen
    }

    pub fn homing(&self) -> &HomingController {
        &self.homing
    }

    /// Frame of the most recent successful homing pass.
    pub fn calibration(&self) -> Option<&CalibrationFrame> {
        self.calibration.as_ref()
    }

    /// Home, then make sure the pen is Up.
    pub fn home(&mut self, machine: &mut Machine) -> Result<CalibrationFrame, ControlError> {
        let frame = self.homing.home(machine)?;
        self.pen.raise(machine.lift.as_mut())?;
        self.calibration = Some(frame);
        Ok(frame)
    }

    /// Show the checkpoint message and block until the button is pressed.
    ///
    /// Never returns if the button is never pressed.
    pub fn await_confirmation(&mut self, machine: &mut Machine) -> StepOutcome {
        if !self.session.confirm_checkpoints {
            debug!("checkpoint skipped");
            return StepOutcome::Skipped;
        }
        machine.screen.show(&self.session.checkpoint_message);
        let started = machine.clock.now();
        let poll = self.session.checkpoint_poll();
        while !machine.button.is_pressed() {
            machine.clock.sleep(poll);
        }
        info!(
            waited = ?machine.clock.elapsed_since(started),
            "Checkpoint confirmed"
        );
        StepOutcome::Confirmed
    }

    /// Execute one step.
    pub fn execute_step(
        &mut self,
        machine: &mut Machine,
        step: &Step,
    ) -> Result<StepOutcome, ControlError> {
        debug!(step = step.name(), "step");
        let prims = &self.primitives;
        let pen = &mut self.pen;
        let outcome = match *step {
            Step::SetAngle { offset } => {
                prims.set_angle(machine, offset)?;
                StepOutcome::Completed
            }
            Step::Rotate { degrees } => {
                prims.rotate(machine, degrees)?;
                StepOutcome::Completed
            }
            Step::Line => {
                prims.line(machine, pen)?;
                StepOutcome::Completed
            }
            Step::ThickLine => {
                prims.thick_line(machine, pen)?;
                StepOutcome::Completed
            }
            Step::DottedLine { dots } => {
                prims.dotted_line(machine, pen, dots)?;
                StepOutcome::Completed
            }
            Step::YLine { strokes } => {
                prims.y_line(machine, pen, strokes)?;
                StepOutcome::Completed
            }
            Step::Wave {
                amplitude,
                frequency,
            } => StepOutcome::Traced(self.trajectory.wave(machine, pen, amplitude, frequency)?),
            Step::Circle { radius } => {
                StepOutcome::Traced(self.trajectory.circle(machine, pen, radius)?)
            }
            Step::Home => StepOutcome::Homed(self.home(machine)?),
            Step::Checkpoint => self.await_confirmation(machine),
        };
        Ok(outcome)
    }

    /// Execute every step of `pattern` in order.
    ///
    /// Stops at the first failing step.
    pub fn run(
        &mut self,
        machine: &mut Machine,
        pattern: &Pattern,
    ) -> Result<SequenceReport, ControlError> {
        self.run_with(machine, pattern, |_| {})
    }

    /// As [`run`](Self::run), calling `hook` before and after every step.
    pub fn run_with(
        &mut self,
        machine: &mut Machine,
        pattern: &Pattern,
        mut hook: impl FnMut(StepPhase<'_>),
    ) -> Result<SequenceReport, ControlError> {
        info!(
            pattern = %pattern.name,
            steps = pattern.steps.len(),
            "Pattern started"
        );
        let mut report = SequenceReport::default();
        for step in &pattern.steps {
            hook(StepPhase::Starting(step));
            let outcome = self.execute_step(machine, step)?;
            hook(StepPhase::Finished(step, &outcome));
            report.record(&outcome);
        }
        info!(pattern = %pattern.name, steps = report.steps, "Pattern finished");
        Ok(report)
    }
}
