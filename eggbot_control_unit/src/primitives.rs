//! Position-controlled drawing primitives.
//!
//! Every primitive that touches the shell goes through
//! [`PenController::draw`]: it sees the pen Down on entry and leaves it Up,
//! including when an actuator fails part-way.

use crate::error::ControlError;
use crate::pen::PenController;
use eggbot_common::consts::FULL_REVOLUTION;
use eggbot_common::control_unit::config::PrimitiveConfig;
use eggbot_common::hal::driver::Machine;
use tracing::{debug, warn};

/// Lines, dots, strokes and pen-up offsets.
#[derive(Debug, Clone)]
pub struct DrawingPrimitives {
    config: PrimitiveConfig,
}

impl DrawingPrimitives {
    pub fn new(config: PrimitiveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrimitiveConfig {
        &self.config
    }

    /// One circumferential line: a full revolution plus overrun.
    ///
    /// Rotation reads 0 immediately before and after the sweep.
    pub fn line(&self, machine: &mut Machine, pen: &mut PenController) -> Result<(), ControlError> {
        let degrees = FULL_REVOLUTION + self.config.line_overrun;
        debug!(degrees, "line");
        self.sweep(machine, pen, self.config.line_velocity, degrees)
    }

    /// Several revolutions at high speed for a heavier line.
    pub fn thick_line(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
    ) -> Result<(), ControlError> {
        let degrees = FULL_REVOLUTION * f64::from(self.config.thick_line_revolutions);
        debug!(degrees, "thick line");
        self.sweep(machine, pen, self.config.thick_line_velocity, degrees)
    }

    fn sweep(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        velocity: f64,
        degrees: f64,
    ) -> Result<(), ControlError> {
        pen.draw(machine, |m| {
            m.rotation.reset_angle(0.0);
            m.rotation.move_by_angle(velocity, degrees)?;
            m.rotation.reset_angle(0.0);
            Ok(())
        })
    }

    /// `dots` dots evenly spaced around one revolution.
    ///
    /// Each dot advances the rotation by `360 / dots` with the pen up, then
    /// touches down and lifts.
    ///
    /// # Errors
    /// `InvalidParameter` for `dots == 0`.
    pub fn dotted_line(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        dots: u32,
    ) -> Result<(), ControlError> {
        if dots == 0 {
            return Err(ControlError::invalid(
                "dotted_line",
                "at least one dot required",
            ));
        }
        let spacing = FULL_REVOLUTION / f64::from(dots);
        debug!(dots, spacing, "dotted line");

        for _ in 0..dots {
            if let Err(e) = self.dot(machine, pen, spacing) {
                Self::abandon(machine, pen);
                return Err(e);
            }
        }
        Ok(())
    }

    fn dot(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        spacing: f64,
    ) -> Result<(), ControlError> {
        machine
            .rotation
            .move_by_angle(self.config.dot_velocity, spacing)?;
        pen.lower(machine.lift.as_mut())?;
        pen.raise(machine.lift.as_mut())
    }

    /// `strokes` longitudinal strokes evenly spaced around the egg.
    ///
    /// The first stroke is drawn where the rotation stands, with a lead-in:
    /// out by `y_line_lead_in`, back by `y_line_stroke`. Each further stroke
    /// advances the rotation by `360 / strokes` and sweeps the traverse out
    /// and back by `y_line_stroke`.
    ///
    /// # Errors
    /// `InvalidParameter` for `strokes == 0`.
    pub fn y_line(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        strokes: u32,
    ) -> Result<(), ControlError> {
        if strokes == 0 {
            return Err(ControlError::invalid(
                "y_line",
                "at least one stroke required",
            ));
        }
        let cfg = &self.config;
        let spacing = FULL_REVOLUTION / f64::from(strokes);
        debug!(strokes, spacing, "y-line");

        pen.draw(machine, |m| {
            m.traverse.move_by_angle(cfg.y_line_velocity, cfg.y_line_lead_in)?;
            m.traverse.move_by_angle(cfg.y_line_velocity, -cfg.y_line_stroke)?;
            Ok(())
        })?;

        for _ in 1..strokes {
            if let Err(e) = machine.rotation.move_by_angle(cfg.rotate_velocity, spacing) {
                Self::abandon(machine, pen);
                return Err(e.into());
            }
            pen.draw(machine, |m| {
                m.traverse.move_by_angle(cfg.y_line_velocity, cfg.y_line_stroke)?;
                m.traverse.move_by_angle(cfg.y_line_velocity, -cfg.y_line_stroke)?;
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Move the traverse by `offset` degrees with the pen up.
    pub fn set_angle(&self, machine: &mut Machine, offset: f64) -> Result<(), ControlError> {
        if !offset.is_finite() {
            return Err(ControlError::invalid("set_angle", "offset must be finite"));
        }
        debug!(offset, "set angle");
        machine
            .traverse
            .move_by_angle(self.config.offset_velocity, offset)?;
        Ok(())
    }

    /// Advance the rotation by `degrees` with the pen up.
    pub fn rotate(&self, machine: &mut Machine, degrees: f64) -> Result<(), ControlError> {
        if !degrees.is_finite() {
            return Err(ControlError::invalid("rotate", "degrees must be finite"));
        }
        debug!(degrees, "rotate");
        machine
            .rotation
            .move_by_angle(self.config.rotate_velocity, degrees)?;
        Ok(())
    }

    /// Best-effort stop and raise after a failure outside `draw`.
    fn abandon(machine: &mut Machine, pen: &mut PenController) {
        if let Err(e) = pen.lift_clear(machine) {
            warn!(error = %e, "could not clear the pen after a failed primitive");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eggbot_common::config::EggbotConfig;
    use eggbot_common::control_unit::config::PenConfig;
    use eggbot_common::control_unit::state::PenState;
    use eggbot_common::hal::types::Axis;
    use eggbot_hal::drivers::simulation::AxisEvent;
    use eggbot_hal::{SimulationDriver, SimulationHandles};

    fn setup() -> (Machine, SimulationHandles, PenController, DrawingPrimitives) {
        let (machine, handles) = SimulationDriver::build(&EggbotConfig::default()).unwrap();
        (
            machine,
            handles,
            PenController::new(PenConfig::default()),
            DrawingPrimitives::new(PrimitiveConfig::default()),
        )
    }

    #[test]
    fn line_sweeps_revolution_plus_overrun() {
        let (mut machine, handles, mut pen, prims) = setup();
        prims.line(&mut machine, &mut pen).unwrap();

        let moves: Vec<_> = handles
            .journal(Axis::Rotation)
            .events()
            .into_iter()
            .filter(|e| matches!(e, AxisEvent::MoveByAngle { .. }))
            .collect();
        assert_eq!(
            moves,
            vec![AxisEvent::MoveByAngle {
                velocity: 100.0,
                degrees: 365.0
            }]
        );
        assert_eq!(machine.rotation.angle(), 0.0);
        assert_eq!(pen.state(), PenState::Up);
    }

    #[test]
    fn zero_counts_rejected() {
        let (mut machine, handles, mut pen, prims) = setup();
        assert!(matches!(
            prims.dotted_line(&mut machine, &mut pen, 0),
            Err(ControlError::InvalidParameter { .. })
        ));
        assert!(matches!(
            prims.y_line(&mut machine, &mut pen, 0),
            Err(ControlError::InvalidParameter { .. })
        ));
        assert!(handles.journal(Axis::Lift).is_empty());
    }

    #[test]
    fn y_line_draws_each_stroke() {
        let (mut machine, handles, mut pen, prims) = setup();
        machine.traverse.reset_angle(0.0);
        prims.y_line(&mut machine, &mut pen, 4).unwrap();

        assert_eq!(pen.contacts(), 4);
        assert_eq!(pen.state(), PenState::Up);
        let advances = handles
            .journal(Axis::Rotation)
            .count(|e| matches!(e, AxisEvent::MoveByAngle { degrees, .. } if *degrees == 90.0));
        assert_eq!(advances, 3);
        // lead-in leaves the traverse one stroke short of where it started
        assert_eq!(machine.traverse.angle(), -30.0);
    }

    #[test]
    fn offsets_move_pen_up() {
        let (mut machine, _handles, pen, prims) = setup();
        machine.traverse.reset_angle(0.0);
        prims.set_angle(&mut machine, -12.0).unwrap();
        prims.rotate(&mut machine, 45.0).unwrap();
        assert_eq!(machine.traverse.angle(), -12.0);
        assert_eq!(machine.rotation.angle(), 45.0);
        assert_eq!(pen.contacts(), 0);
        assert!(prims.set_angle(&mut machine, f64::NAN).is_err());
    }
}
