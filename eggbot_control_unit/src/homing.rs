//! Hard-stop homing.
//!
//! ## Procedure
//!
//! 1. **RetractLift** - lift runs against its retracted stop (pen clear of
//!    the egg).
//! 2. **SeekTraverse** - traverse runs against the stop at the far end of
//!    its travel; the reference is zeroed there.
//! 3. **BackOff** - traverse moves back by the configured back-off to the
//!    working start point.
//! 4. Lift and traverse references are zeroed at their resting positions.
//!
//! The result does not depend on where the axes started. A stop that is
//! never reached surfaces as the actuator's `StallTimeout`; there is no
//! retry.

use crate::error::ControlError;
use eggbot_common::control_unit::homing::HomingConfig;
use eggbot_common::hal::driver::Machine;
use tracing::{debug, info, warn};

// ─── Homing Phases ──────────────────────────────────────────────────

/// Phase of the most recent homing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingPhase {
    /// Never homed.
    Idle,
    /// Driving the lift to its retracted stop.
    RetractLift,
    /// Driving the traverse to its far stop.
    SeekTraverse,
    /// Moving the traverse to the working start point.
    BackOff,
    /// Calibration frame established.
    Complete,
    /// An actuator error ended the pass.
    Failed,
}

// ─── Calibration Frame ──────────────────────────────────────────────

/// Zero reference recorded by a homing pass.
///
/// All drawing angles after homing are relative to this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationFrame {
    /// Lift travel until the retracted stall [deg].
    pub lift_travel: f64,
    /// Traverse travel until the far-end stall [deg].
    pub traverse_travel: f64,
    /// Signed back-off applied after the traverse stall [deg].
    pub back_off: f64,
}

// ─── Homing Controller ──────────────────────────────────────────────

/// Establishes the calibration frame.
#[derive(Debug, Clone)]
pub struct HomingController {
    config: HomingConfig,
    phase: HomingPhase,
    passes: u32,
}

impl HomingController {
    /// Controller that has not homed yet.
    pub fn new(config: HomingConfig) -> Self {
        Self {
            config,
            phase: HomingPhase::Idle,
            passes: 0,
        }
    }

    /// Phase of the current or last pass.
    #[inline]
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Completed passes.
    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Home lift and traverse.
    ///
    /// # Errors
    /// `ControlError::Hal` if an axis fails or never stalls; the phase is
    /// left at `Failed`.
    pub fn home(&mut self, machine: &mut Machine) -> Result<CalibrationFrame, ControlError> {
        match self.run(machine) {
            Ok(frame) => {
                self.phase = HomingPhase::Complete;
                self.passes += 1;
                info!(
                    pass = self.passes,
                    lift_travel = frame.lift_travel,
                    traverse_travel = frame.traverse_travel,
                    back_off = frame.back_off,
                    "Homing complete"
                );
                Ok(frame)
            }
            Err(e) => {
                warn!(phase = ?self.phase, error = %e, "Homing failed");
                self.phase = HomingPhase::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self, machine: &mut Machine) -> Result<CalibrationFrame, ControlError> {
        let cfg = &self.config;

        self.phase = HomingPhase::RetractLift;
        let lift_travel = machine
            .lift
            .run_until_stalled(cfg.lift_velocity(), cfg.lift_duty_limit)?;
        debug!(lift_travel, "lift at retracted stop");

        self.phase = HomingPhase::SeekTraverse;
        let traverse_travel = machine
            .traverse
            .run_until_stalled(cfg.traverse_velocity(), cfg.traverse_duty_limit)?;
        machine.traverse.reset_angle(0.0);
        debug!(traverse_travel, "traverse at far stop");

        self.phase = HomingPhase::BackOff;
        let back_off = cfg.back_off_angle();
        machine.traverse.move_by_angle(cfg.back_off_speed, back_off)?;

        machine.lift.reset_angle(0.0);
        machine.traverse.reset_angle(0.0);

        Ok(CalibrationFrame {
            lift_travel,
            traverse_travel,
            back_off,
        })
    }
}
