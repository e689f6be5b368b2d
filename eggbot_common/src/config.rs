//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the eggbot crates, and the top-level [`EggbotConfig`] that gathers
//! every section of `eggbot.toml`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use eggbot_common::config::{ConfigError, ConfigLoader, EggbotConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = EggbotConfig::load(Path::new("config/eggbot.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::control_unit::config::{PenConfig, PrimitiveConfig, SessionConfig, TrajectoryConfig};
use crate::control_unit::homing::HomingConfig;
use crate::hal::config::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Represents the verbosity level of logging output.
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, per-sample trajectory data.
    Trace,
    /// Primitive and controller steps.
    Debug,
    /// Session and design milestones.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_service_name() -> String {
    "eggbot".to_string()
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "eggbot-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Machine instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Full contents of `eggbot.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EggbotConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub homing: HomingConfig,
    #[serde(default)]
    pub pen: PenConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub primitives: PrimitiveConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl EggbotConfig {
    /// Parse from TOML text (no validation).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate every section and the cross-section rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` prefixed with the section name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn section(name: &str, result: Result<(), &'static str>) -> Result<(), ConfigError> {
            result.map_err(|e| ConfigError::ValidationError(format!("[{name}] {e}")))
        }

        self.shared.validate()?;
        section("homing", self.homing.validate())?;
        section("pen", self.pen.validate())?;
        section("trajectory", self.trajectory.validate())?;
        section("primitives", self.primitives.validate())?;
        section("session", self.session.validate())?;
        self.simulation
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("[simulation] {e}")))?;

        // Homing retracts the lift; it must drive away from the egg.
        if self.homing.lift_direction == self.pen.contact_direction {
            return Err(ConfigError::ValidationError(
                "[homing] lift_direction must be opposite to [pen] contact_direction".to_string(),
            ));
        }
        Ok(())
    }
}
