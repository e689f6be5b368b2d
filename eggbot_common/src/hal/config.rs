//! Simulation driver configuration.
//!
//! This module contains the `[simulation]` section of `eggbot.toml`:
//! - `SimulationConfig` - Clock, stall timeout and button behaviour
//! - `SimAxisConfig` - Mechanical stops and drive scaling per axis
//!
//! Positions here are absolute mechanical degrees. The engine never sees
//! them; it only reads angles relative to its own reference resets.

use crate::hal::driver::HalError;
use crate::hal::types::Axis;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default function for sample_latency_us
fn default_sample_latency_us() -> u64 {
    1000
}

/// Default function for stall_timeout_ms
fn default_stall_timeout_ms() -> u64 {
    10_000
}

/// Default function for button_press_after_ms
fn default_button_press_after_ms() -> Option<u64> {
    Some(500)
}

/// Default function for duty_to_velocity
fn default_duty_to_velocity() -> f64 {
    6.0
}

/// Default function for max_velocity
fn default_max_velocity() -> f64 {
    1000.0
}

/// `[simulation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated time consumed by one zero-length sleep (sampling latency).
    #[serde(default = "default_sample_latency_us")]
    pub sample_latency_us: u64,

    /// Actuator stall-detection timeout.
    #[serde(default = "default_stall_timeout_ms")]
    pub stall_timeout_ms: u64,

    /// Delay after which a polled button reports a press.
    /// `None` means the button is never pressed.
    #[serde(default = "default_button_press_after_ms")]
    pub button_press_after_ms: Option<u64>,

    /// Egg rotation axis.
    #[serde(default = "SimAxisConfig::rotation")]
    pub rotation: SimAxisConfig,

    /// Pen traverse axis.
    #[serde(default = "SimAxisConfig::traverse")]
    pub traverse: SimAxisConfig,

    /// Pen lift axis.
    #[serde(default = "SimAxisConfig::lift")]
    pub lift: SimAxisConfig,
}

impl SimulationConfig {
    /// Sampling latency as Duration.
    pub fn sample_latency(&self) -> Duration {
        Duration::from_micros(self.sample_latency_us)
    }

    /// Stall timeout as Duration.
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_millis(self.stall_timeout_ms)
    }

    /// Configuration of one axis.
    pub fn axis(&self, axis: Axis) -> &SimAxisConfig {
        match axis {
            Axis::Rotation => &self.rotation,
            Axis::Traverse => &self.traverse,
            Axis::Lift => &self.lift,
        }
    }

    /// Validate the simulation configuration.
    ///
    /// # Validation Rules
    /// 1. `sample_latency_us` > 0 (a busy-poll loop must advance simulated time)
    /// 2. `stall_timeout_ms` > 0
    /// 3. Every axis passes [`SimAxisConfig::validate`]
    pub fn validate(&self) -> Result<(), HalError> {
        if self.sample_latency_us == 0 {
            return Err(HalError::ConfigError(
                "sample_latency_us must be greater than 0".to_string(),
            ));
        }
        if self.stall_timeout_ms == 0 {
            return Err(HalError::ConfigError(
                "stall_timeout_ms must be greater than 0".to_string(),
            ));
        }
        for axis in Axis::ALL {
            self.axis(axis).validate(axis)?;
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sample_latency_us: default_sample_latency_us(),
            stall_timeout_ms: default_stall_timeout_ms(),
            button_press_after_ms: default_button_press_after_ms(),
            rotation: SimAxisConfig::rotation(),
            traverse: SimAxisConfig::traverse(),
            lift: SimAxisConfig::lift(),
        }
    }
}

/// Per-axis simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimAxisConfig {
    /// Mechanical stop in the negative direction, if any.
    #[serde(default)]
    pub min_stop: Option<f64>,

    /// Mechanical stop in the positive direction, if any.
    #[serde(default)]
    pub max_stop: Option<f64>,

    /// Position at power-on.
    #[serde(default)]
    pub initial_position: f64,

    /// Open-loop speed per percent of duty [deg/s / %].
    #[serde(default = "default_duty_to_velocity")]
    pub duty_to_velocity: f64,

    /// Fastest commanded speed the motor can follow [deg/s].
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
}

impl SimAxisConfig {
    /// Continuous rotation, no stops.
    pub fn rotation() -> Self {
        Self {
            min_stop: None,
            max_stop: None,
            initial_position: 0.0,
            duty_to_velocity: default_duty_to_velocity(),
            max_velocity: default_max_velocity(),
        }
    }

    /// Traverse rail with stops at both ends.
    pub fn traverse() -> Self {
        Self {
            min_stop: Some(-120.0),
            max_stop: Some(120.0),
            initial_position: 10.0,
            duty_to_velocity: default_duty_to_velocity(),
            max_velocity: default_max_velocity(),
        }
    }

    /// Pen lift: fully retracted at `min_stop`, egg surface at `max_stop`.
    pub fn lift() -> Self {
        Self {
            min_stop: Some(-90.0),
            max_stop: Some(0.0),
            initial_position: -30.0,
            duty_to_velocity: default_duty_to_velocity(),
            max_velocity: default_max_velocity(),
        }
    }

    /// Validate one axis.
    pub fn validate(&self, axis: Axis) -> Result<(), HalError> {
        if let (Some(min), Some(max)) = (self.min_stop, self.max_stop) {
            if min >= max {
                return Err(HalError::ConfigError(format!(
                    "{axis}: min_stop ({min}) must be below max_stop ({max})"
                )));
            }
        }
        if self.min_stop.is_some_and(|min| self.initial_position < min)
            || self.max_stop.is_some_and(|max| self.initial_position > max)
        {
            return Err(HalError::ConfigError(format!(
                "{axis}: initial_position {} lies outside the mechanical stops",
                self.initial_position
            )));
        }
        if self.duty_to_velocity <= 0.0 {
            return Err(HalError::ConfigError(format!(
                "{axis}: duty_to_velocity must be positive"
            )));
        }
        if self.max_velocity <= 0.0 {
            return Err(HalError::ConfigError(format!(
                "{axis}: max_velocity must be positive"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_stops_rejected() {
        let mut config = SimulationConfig::default();
        config.traverse.min_stop = Some(50.0);
        config.traverse.max_stop = Some(-50.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("traverse"));
    }

    #[test]
    fn initial_position_outside_stops_rejected() {
        let mut config = SimulationConfig::default();
        config.lift.initial_position = 5.0;
        assert!(matches!(config.validate(), Err(HalError::ConfigError(_))));
    }

    #[test]
    fn zero_stall_timeout_rejected() {
        let config = SimulationConfig {
            stall_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_sample_latency_rejected() {
        let config = SimulationConfig {
            sample_latency_us: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_axis_section_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
[traverse]
min_stop = -60.0
max_stop = 60.0
"#,
        )
        .unwrap();
        assert_eq!(config.traverse.max_stop, Some(60.0));
        assert_eq!(config.traverse.duty_to_velocity, 6.0);
        assert_eq!(config.lift, SimAxisConfig::lift());
        assert_eq!(config.button_press_after_ms, Some(500));
    }
}
