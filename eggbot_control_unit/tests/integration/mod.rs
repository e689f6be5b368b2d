//! Shared fixtures for the integration tests.

mod homing;
mod patterns;
mod session;

use eggbot_common::config::EggbotConfig;
use eggbot_common::hal::driver::{AxisActuator, HalError, Machine};
use eggbot_common::hal::types::Axis;
use eggbot_hal::drivers::simulation::{AxisEvent, AxisRecord};
use eggbot_hal::{SimulationDriver, SimulationHandles};

/// Simulated machine with default configuration.
pub fn machine() -> (Machine, SimulationHandles) {
    machine_with(&EggbotConfig::default())
}

pub fn machine_with(config: &EggbotConfig) -> (Machine, SimulationHandles) {
    SimulationDriver::build(config).expect("simulation config is valid")
}

/// Coarse command timeline across all three axes.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Rotation position move, with the angle it ended on.
    Advance(f64),
    /// Traverse position move by the given offset.
    Offset(f64),
    /// Lift stall-limited move toward the shell.
    Lower,
    /// Lift stall-limited move away from the shell.
    Raise,
}

/// Merge the journals into one timeline of [`Mark`]s, ordered by time.
pub fn timeline(handles: &SimulationHandles) -> Vec<Mark> {
    let mut records: Vec<(Axis, AxisRecord)> = [Axis::Rotation, Axis::Traverse, Axis::Lift]
        .into_iter()
        .flat_map(|axis| {
            handles
                .journal(axis)
                .records()
                .into_iter()
                .map(move |r| (axis, r))
        })
        .collect();
    records.sort_by_key(|(_, r)| r.at);

    records
        .into_iter()
        .filter_map(|(axis, r)| match (axis, r.event) {
            (Axis::Rotation, AxisEvent::MoveByAngle { .. }) => Some(Mark::Advance(r.angle)),
            (Axis::Traverse, AxisEvent::MoveByAngle { degrees, .. }) => {
                Some(Mark::Offset(degrees))
            }
            (Axis::Lift, AxisEvent::RunUntilStalled { velocity, .. }) if velocity > 0.0 => {
                Some(Mark::Lower)
            }
            (Axis::Lift, AxisEvent::RunUntilStalled { .. }) => Some(Mark::Raise),
            _ => None,
        })
        .collect()
}

/// Actuator wrapper that starts failing velocity commands after a budget.
pub struct FailingAxis {
    inner: Box<dyn AxisActuator>,
    velocity_budget: usize,
}

impl FailingAxis {
    pub fn wrap(inner: Box<dyn AxisActuator>, velocity_budget: usize) -> Box<dyn AxisActuator> {
        Box::new(Self {
            inner,
            velocity_budget,
        })
    }
}

impl AxisActuator for FailingAxis {
    fn axis(&self) -> Axis {
        self.inner.axis()
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), HalError> {
        if self.velocity_budget == 0 {
            return Err(HalError::CommunicationError("motor port lost".to_string()));
        }
        self.velocity_budget -= 1;
        self.inner.set_velocity(velocity)
    }

    fn set_duty(&mut self, duty: f64) -> Result<(), HalError> {
        self.inner.set_duty(duty)
    }

    fn move_by_angle(&mut self, velocity: f64, degrees: f64) -> Result<(), HalError> {
        self.inner.move_by_angle(velocity, degrees)
    }

    fn run_until_stalled(&mut self, velocity: f64, duty_limit: f64) -> Result<f64, HalError> {
        self.inner.run_until_stalled(velocity, duty_limit)
    }

    fn angle(&self) -> f64 {
        self.inner.angle()
    }

    fn reset_angle(&mut self, value: f64) {
        self.inner.reset_angle(value);
    }

    fn stop(&mut self) -> Result<(), HalError> {
        self.inner.stop()
    }
}
