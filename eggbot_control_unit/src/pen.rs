//! Pen controller.
//!
//! Lowering drives the lift toward the egg at a reduced duty limit until
//! the stall signals contact, then zeroes the lift reference at the contact
//! point. Raising drives the other way until the retracted stop. Both are
//! idempotent: repeating one re-probes the same stop.
//!
//! [`PenController::draw`] wraps a surface-contacting stroke: pen down on
//! entry, axes stopped and pen up on exit, also when the stroke fails.

use crate::error::ControlError;
use crate::state::pen::{PenEvent, PenStateMachine};
use eggbot_common::control_unit::config::PenConfig;
use eggbot_common::control_unit::state::PenState;
use eggbot_common::hal::driver::{AxisActuator, Machine};
use tracing::{debug, warn};

/// Owner of the pen state.
#[derive(Debug, Clone)]
pub struct PenController {
    config: PenConfig,
    state: PenStateMachine,
}

impl PenController {
    /// Controller with the pen assumed Up.
    pub fn new(config: PenConfig) -> Self {
        Self {
            config,
            state: PenStateMachine::new(),
        }
    }

    /// Current pen state.
    #[inline]
    pub fn state(&self) -> PenState {
        self.state.state()
    }

    /// Successful lowers so far.
    #[inline]
    pub fn contacts(&self) -> u32 {
        self.state.contacts()
    }

    /// Successful raises so far.
    #[inline]
    pub fn retractions(&self) -> u32 {
        self.state.retractions()
    }

    /// Bring the pen into contact with the shell.
    pub fn lower(&mut self, lift: &mut dyn AxisActuator) -> Result<(), ControlError> {
        let travel =
            lift.run_until_stalled(self.config.lower_velocity(), self.config.lower_duty_limit)?;
        lift.reset_angle(0.0);
        self.state.handle_event(PenEvent::Lower);
        debug!(travel, "pen down");
        Ok(())
    }

    /// Retract the pen fully.
    pub fn raise(&mut self, lift: &mut dyn AxisActuator) -> Result<(), ControlError> {
        let travel =
            lift.run_until_stalled(self.config.raise_velocity(), self.config.raise_duty_limit)?;
        self.state.handle_event(PenEvent::Raise);
        debug!(travel, "pen up");
        Ok(())
    }

    /// Run `stroke` with the pen down.
    ///
    /// Whatever `stroke` returns, the traverse and rotation axes are stopped
    /// and the pen is raised before returning. The stroke's own error wins
    /// over a cleanup error.
    pub fn draw<T>(
        &mut self,
        machine: &mut Machine,
        stroke: impl FnOnce(&mut Machine) -> Result<T, ControlError>,
    ) -> Result<T, ControlError> {
        let result = match self.lower(machine.lift.as_mut()) {
            Ok(()) => stroke(machine),
            Err(e) => Err(e),
        };
        let cleanup = self.lift_clear(machine);

        match (result, cleanup) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup)) => {
                warn!(%cleanup, "cleanup after failed stroke also failed");
                Err(e)
            }
        }
    }

    /// Stop the drawing axes and raise the pen, attempting both.
    pub fn lift_clear(&mut self, machine: &mut Machine) -> Result<(), ControlError> {
        let stopped = machine.stop_drawing_axes();
        let raised = self.raise(machine.lift.as_mut());
        stopped?;
        raised
    }
}
