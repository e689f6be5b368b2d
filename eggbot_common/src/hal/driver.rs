//! HAL capability traits and error types.
//!
//! This module defines:
//! - `AxisActuator` - Motion interface for one physical axis
//! - `ButtonSensor`, `Speaker`, `Screen`, `Clock` - Thin I/O capabilities
//! - `Machine` - The full set of capabilities handed to the drawing engine
//! - `HalDriver` trait + `DriverFactory` - Pluggable driver backends
//! - `HalError` enum - Error types for HAL operations

use crate::config::EggbotConfig;
use crate::hal::types::Axis;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error types for HAL operations.
///
/// A stall is not an error: it is the expected end of a stall-limited move.
/// `StallTimeout` is raised only when the stall never happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// A stall-limited move never met a mechanical limit.
    #[error("{axis} axis did not stall within {timeout:?}")]
    StallTimeout {
        /// Axis that kept moving
        axis: Axis,
        /// Actuator's stall-detection timeout
        timeout: Duration,
    },

    /// The actuator rejected a command.
    #[error("Invalid command for {axis} axis: {reason}")]
    InvalidCommand {
        /// Axis that rejected the command
        axis: Axis,
        /// Human-readable reason
        reason: String,
    },
}

/// Motion interface for one physical axis.
///
/// Angles are in degrees relative to the last `reset_angle()`, velocities in
/// degrees per second, duties in percent.
///
/// # Call shapes
///
/// | Operation | Blocking | Returns when |
/// |-----------|----------|--------------|
/// | `set_velocity()` / `set_duty()` | no | immediately, axis keeps moving |
/// | `move_by_angle()` | yes | target angle reached |
/// | `run_until_stalled()` | yes | stall detected (or stall timeout) |
/// | `stop()` | no | immediately |
pub trait AxisActuator: Send {
    /// Which axis this actuator drives.
    fn axis(&self) -> Axis;

    /// Run at a constant velocity until stopped or overridden.
    fn set_velocity(&mut self, velocity: f64) -> Result<(), HalError>;

    /// Run open-loop at the given duty until stopped or overridden.
    fn set_duty(&mut self, duty: f64) -> Result<(), HalError>;

    /// Move by `degrees` (signed) at `|velocity|`, blocking until done.
    fn move_by_angle(&mut self, velocity: f64, degrees: f64) -> Result<(), HalError>;

    /// Run at `velocity` with drive intensity capped at `duty_limit` until
    /// the motor stalls. Returns the signed angle traveled.
    fn run_until_stalled(&mut self, velocity: f64, duty_limit: f64) -> Result<f64, HalError>;

    /// Current angle relative to the last reference reset.
    fn angle(&self) -> f64;

    /// Redefine the current position as `value`.
    fn reset_angle(&mut self, value: f64);

    /// Stop the motor.
    fn stop(&mut self) -> Result<(), HalError>;
}

/// Touch sensor gating manual checkpoints.
pub trait ButtonSensor: Send {
    /// Whether the button is currently pressed.
    fn is_pressed(&mut self) -> bool;
}

/// Audible signal at session start and end.
pub trait Speaker: Send {
    /// Emit a short beep.
    fn beep(&mut self);
}

/// Optional status display.
pub trait Screen: Send {
    /// Print one status line.
    fn show(&mut self, line: &str);
}

/// Time source for settle delays, checkpoint polling and trajectory sampling.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Wait for `duration`.
    fn sleep(&self, duration: Duration);

    /// Time elapsed since `since`.
    fn elapsed_since(&self, since: Duration) -> Duration {
        self.now().saturating_sub(since)
    }
}

/// All capabilities of one machine, owned by the drawing engine.
///
/// Each axis is reachable only through `&mut` access to this struct, so no
/// two controllers can command the same axis at the same time.
pub struct Machine {
    /// Egg rotation axis
    pub rotation: Box<dyn AxisActuator>,
    /// Pen traverse axis
    pub traverse: Box<dyn AxisActuator>,
    /// Pen lift axis
    pub lift: Box<dyn AxisActuator>,
    /// Confirmation button
    pub button: Box<dyn ButtonSensor>,
    /// Speaker
    pub speaker: Box<dyn Speaker>,
    /// Status screen
    pub screen: Box<dyn Screen>,
    /// Shared time source
    pub clock: Arc<dyn Clock>,
}

impl Machine {
    /// Stop the two drawing axes (traverse first, then rotation).
    pub fn stop_drawing_axes(&mut self) -> Result<(), HalError> {
        self.traverse.stop()?;
        self.rotation.stop()
    }
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn HalDriver>;

/// Trait defining the interface for HAL drivers.
///
/// A driver turns configuration into a ready-to-use [`Machine`].
pub trait HalDriver {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Build the machine capabilities.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` if the hardware cannot be brought up.
    fn init(&mut self, config: &EggbotConfig) -> Result<Machine, HalError>;
}
