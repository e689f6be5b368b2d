//! Trajectory generator for curved patterns.
//!
//! Waves and circles are not precomputed paths. Each sample reads the live
//! axis angles, evaluates the pattern function and commands new velocities,
//! then sleeps `sample_interval` on the machine clock. The loop ends on the
//! pattern's own exit condition, or with `SweepIncomplete` once
//! `max_samples` is exhausted.
//!
//! Both patterns run inside [`PenController::draw`], so the axes are stopped
//! and the pen is raised whatever happens in the loop.

pub mod circle;
pub mod wave;

use crate::error::ControlError;
use crate::pen::PenController;
use circle::{CircleGeometry, fixed_sweep_amplitude, fixed_sweep_command, unwrap_delta};
use eggbot_common::consts::{FIXED_SWEEP_SAMPLES, FULL_REVOLUTION};
use eggbot_common::control_unit::config::{CircleMode, TrajectoryConfig};
use eggbot_common::hal::driver::Machine;
use std::f64::consts::TAU;
use tracing::{debug, trace};
use wave::{soft_start_duty, wave_velocity};

/// Rotation command issued at a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationCommand {
    /// Left as it was.
    Unchanged,
    /// Open-loop duty [%].
    Duty(f64),
    /// Velocity [deg/s].
    Velocity(f64),
}

/// One control sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    /// Rotation angle read at the sample [deg].
    pub angle: f64,
    pub rotation: RotationCommand,
    /// Traverse velocity commanded [deg/s].
    pub traverse_velocity: f64,
}

/// Outcome of one curved pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryReport {
    pub samples: Vec<TrajectorySample>,
    /// Rotation angle when the loop exited; may overshoot the target.
    pub final_angle: f64,
    /// Sweep parameter covered [deg]: rotation for waves, ring phase for circles.
    pub swept: f64,
}

/// Wave and circle synthesis.
#[derive(Debug, Clone)]
pub struct TrajectoryGenerator {
    config: TrajectoryConfig,
}

impl TrajectoryGenerator {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// One revolution with traverse velocity `amplitude · cos(frequency · θ)`.
    ///
    /// # Errors
    /// `InvalidParameter` for a negative or non-finite amplitude or a
    /// non-finite frequency; `SweepIncomplete` when `max_samples` runs out;
    /// `Hal` on actuator failure. The pen is Up after every outcome the lift
    /// allows.
    pub fn wave(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        amplitude: f64,
        frequency: f64,
    ) -> Result<TrajectoryReport, ControlError> {
        if !(amplitude.is_finite() && amplitude >= 0.0) {
            return Err(ControlError::invalid(
                "wave",
                format!("amplitude {amplitude} must be finite and non-negative"),
            ));
        }
        if !frequency.is_finite() {
            return Err(ControlError::invalid("wave", "frequency must be finite"));
        }
        debug!(amplitude, frequency, "wave");
        pen.draw(machine, |m| self.sweep_wave(m, amplitude, frequency))
    }

    fn sweep_wave(
        &self,
        machine: &mut Machine,
        amplitude: f64,
        frequency: f64,
    ) -> Result<TrajectoryReport, ControlError> {
        let cfg = &self.config;
        machine.rotation.reset_angle(0.0);
        machine.rotation.set_duty(cfg.start_duty)?;

        let mut samples = Vec::new();
        let final_angle = loop {
            let angle = machine.rotation.angle();
            if angle >= FULL_REVOLUTION {
                break angle;
            }
            self.check_budget("wave", samples.len(), angle)?;

            let rotation = match soft_start_duty(angle, cfg.start_duty, cfg.top_duty) {
                Some(duty) => {
                    machine.rotation.set_duty(duty)?;
                    RotationCommand::Duty(duty)
                }
                None => RotationCommand::Unchanged,
            };
            let traverse_velocity = wave_velocity(amplitude, frequency, angle);
            machine.traverse.set_velocity(traverse_velocity)?;
            trace!(angle, traverse_velocity, "wave sample");

            samples.push(TrajectorySample {
                angle,
                rotation,
                traverse_velocity,
            });
            machine.clock.sleep(cfg.sample_interval());
        };

        debug!(samples = samples.len(), final_angle, "wave done");
        Ok(TrajectoryReport {
            samples,
            final_angle,
            swept: final_angle,
        })
    }

    /// A closed ring of `radius` degrees, by the configured circle mode.
    ///
    /// # Errors
    /// `InvalidParameter` for a non-positive radius, otherwise as
    /// [`wave`](Self::wave).
    pub fn circle(
        &self,
        machine: &mut Machine,
        pen: &mut PenController,
        radius: f64,
    ) -> Result<TrajectoryReport, ControlError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ControlError::invalid(
                "circle",
                format!("radius {radius} must be positive"),
            ));
        }
        debug!(radius, mode = ?self.config.circle_mode, "circle");
        match self.config.circle_mode {
            CircleMode::Feedback => pen.draw(machine, |m| self.sweep_circle(m, radius)),
            CircleMode::FixedSweep => pen.draw(machine, |m| self.fixed_circle(m, radius)),
        }
    }

    fn sweep_circle(
        &self,
        machine: &mut Machine,
        radius: f64,
    ) -> Result<TrajectoryReport, ControlError> {
        let cfg = &self.config;
        let ring = CircleGeometry::starting_at(
            machine.rotation.angle(),
            machine.traverse.angle(),
            radius,
            cfg.circle_rotation_scale,
        );

        let mut samples = Vec::new();
        let mut previous = 0.0;
        let mut swept = 0.0;
        loop {
            let angle = machine.rotation.angle();
            let cmd = ring.command(
                angle,
                machine.traverse.angle(),
                cfg.circle_speed,
                cfg.circle_correction_gain,
            );
            swept += unwrap_delta(cmd.phase - previous);
            previous = cmd.phase;
            if swept >= TAU {
                break;
            }
            self.check_budget("circle", samples.len(), swept.to_degrees())?;

            machine.rotation.set_velocity(cmd.rotation_velocity)?;
            machine.traverse.set_velocity(cmd.traverse_velocity)?;
            trace!(
                angle,
                phase = cmd.phase,
                radial = cmd.radial,
                "circle sample"
            );

            samples.push(TrajectorySample {
                angle,
                rotation: RotationCommand::Velocity(cmd.rotation_velocity),
                traverse_velocity: cmd.traverse_velocity,
            });
            machine.clock.sleep(cfg.sample_interval());
        }

        let final_angle = machine.rotation.angle();
        debug!(samples = samples.len(), final_angle, "circle closed");
        Ok(TrajectoryReport {
            samples,
            final_angle,
            swept: swept.to_degrees(),
        })
    }

    fn fixed_circle(
        &self,
        machine: &mut Machine,
        radius: f64,
    ) -> Result<TrajectoryReport, ControlError> {
        let cfg = &self.config;
        let delay = cfg.fixed_sweep_delay();
        let amplitude = fixed_sweep_amplitude(radius, delay);

        let mut samples = Vec::with_capacity(FIXED_SWEEP_SAMPLES as usize);
        for step in 0..FIXED_SWEEP_SAMPLES {
            let degrees = f64::from(step);
            self.check_budget("circle", samples.len(), degrees)?;

            let (rotation_velocity, traverse_velocity) =
                fixed_sweep_command(amplitude, cfg.circle_rotation_scale, degrees);
            machine.rotation.set_velocity(rotation_velocity)?;
            machine.traverse.set_velocity(traverse_velocity)?;

            samples.push(TrajectorySample {
                angle: machine.rotation.angle(),
                rotation: RotationCommand::Velocity(rotation_velocity),
                traverse_velocity,
            });
            machine.clock.sleep(delay);
        }

        Ok(TrajectoryReport {
            samples,
            final_angle: machine.rotation.angle(),
            swept: FULL_REVOLUTION,
        })
    }

    fn check_budget(
        &self,
        operation: &'static str,
        samples: usize,
        swept: f64,
    ) -> Result<(), ControlError> {
        match self.config.max_samples {
            Some(max) if samples as u64 >= max => Err(ControlError::SweepIncomplete {
                operation,
                samples,
                swept,
            }),
            _ => Ok(()),
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
    use eggbot_hal::SimulationDriver;
    use eggbot_hal::drivers::simulation::AxisEvent;

    fn setup(config: &EggbotConfig) -> (Machine, PenController, TrajectoryGenerator) {
        let (machine, _handles) = SimulationDriver::build(config).unwrap();
        (
            machine,
            PenController::new(PenConfig::default()),
            TrajectoryGenerator::new(config.trajectory.clone()),
        )
    }

    #[test]
    fn wave_covers_one_revolution() {
        let (mut machine, mut pen, traj) = setup(&EggbotConfig::default());
        let report = traj.wave(&mut machine, &mut pen, 120.0, 10.0).unwrap();

        assert!(report.final_angle >= 360.0);
        assert!(report.samples.iter().all(|s| s.angle < 360.0));
        assert_eq!(report.samples[0].angle, 0.0);
        assert_eq!(report.samples[0].rotation, RotationCommand::Duty(10.0));
        assert_eq!(pen.state(), PenState::Up);
    }

    #[test]
    fn wave_rejects_negative_amplitude() {
        let (mut machine, mut pen, traj) = setup(&EggbotConfig::default());
        let err = traj.wave(&mut machine, &mut pen, -1.0, 10.0).unwrap_err();
        assert!(matches!(err, ControlError::InvalidParameter { operation: "wave", .. }));
        assert_eq!(pen.contacts(), 0);
    }

    #[test]
    fn wave_sample_bound() {
        let mut config = EggbotConfig::default();
        config.trajectory.max_samples = Some(50);
        let (mut machine, mut pen, traj) = setup(&config);

        let err = traj.wave(&mut machine, &mut pen, 120.0, 10.0).unwrap_err();
        assert!(matches!(err, ControlError::SweepIncomplete { samples: 50, .. }));
        assert_eq!(pen.state(), PenState::Up);
    }

    #[test]
    fn feedback_circle_closes() {
        let (mut machine, mut pen, traj) = setup(&EggbotConfig::default());
        let report = traj.circle(&mut machine, &mut pen, 8.0).unwrap();

        assert!(report.swept >= 360.0);
        assert!(report.swept < 370.0);
        assert!(report.samples.len() > 100);
        assert_eq!(pen.state(), PenState::Up);
    }

    #[test]
    fn feedback_circle_stays_on_ring_and_closes() {
        let config = EggbotConfig::default();
        let (mut machine, handles) = SimulationDriver::build(&config).unwrap();
        let mut pen = PenController::new(PenConfig::default());
        let traj = TrajectoryGenerator::new(config.trajectory.clone());
        let (start_rotation, start_traverse) = (machine.rotation.angle(), machine.traverse.angle());
        let ring = CircleGeometry::starting_at(
            start_rotation,
            start_traverse,
            8.0,
            config.trajectory.circle_rotation_scale,
        );

        traj.circle(&mut machine, &mut pen, 8.0).unwrap();

        let commanded = |axis| {
            handles
                .journal(axis)
                .records()
                .into_iter()
                .filter(|r| matches!(r.event, AxisEvent::SetVelocity(_)))
                .map(|r| r.angle)
                .collect::<Vec<_>>()
        };
        let rotation = commanded(Axis::Rotation);
        let traverse = commanded(Axis::Traverse);
        assert_eq!(rotation.len(), traverse.len());
        for (r, t) in rotation.iter().zip(&traverse) {
            let (u, w) = ring.normalise(*r, *t);
            assert!((u.hypot(w) - 1.0).abs() < 0.03, "off ring at ({r}, {t})");
        }
        assert!((machine.rotation.angle() - start_rotation).abs() < 0.25);
        assert!((machine.traverse.angle() - start_traverse).abs() < 0.25);
    }

    #[test]
    fn fixed_circle_takes_360_samples() {
        let mut config = EggbotConfig::default();
        config.trajectory.circle_mode = CircleMode::FixedSweep;
        let (mut machine, mut pen, traj) = setup(&config);

        let start = machine.clock.now();
        let report = traj.circle(&mut machine, &mut pen, 8.0).unwrap();
        assert_eq!(report.samples.len(), 360);
        assert_eq!(report.swept, 360.0);
        assert!(machine.clock.elapsed_since(start) >= std::time::Duration::from_millis(360));
    }

    #[test]
    fn circle_rejects_zero_radius() {
        let (mut machine, mut pen, traj) = setup(&EggbotConfig::default());
        assert!(traj.circle(&mut machine, &mut pen, 0.0).is_err());
    }
}
