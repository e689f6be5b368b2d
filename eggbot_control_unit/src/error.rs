//! Engine error type.
//!
//! Stall detection is the normal way a stall-limited move ends, so it never
//! shows up here. What does: actuator failures from the HAL, rejected
//! parameters, sweeps that hit their sample bound, and configuration
//! problems.

use eggbot_common::config::ConfigError;
use eggbot_common::hal::driver::HalError;
use thiserror::Error;

/// Error returned by every engine operation.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// Actuator or driver failure.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// An operation was called with a parameter it cannot execute.
    #[error("Invalid parameter for {operation}: {reason}")]
    InvalidParameter {
        operation: &'static str,
        reason: String,
    },

    /// A trajectory sweep reached `max_samples` before closing.
    #[error("{operation} sweep incomplete after {samples} samples ({swept:.1}° swept)")]
    SweepIncomplete {
        operation: &'static str,
        samples: usize,
        swept: f64,
    },

    /// No built-in design with this name.
    #[error("Unknown design '{0}'")]
    UnknownDesign(String),

    /// Configuration or pattern file problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ControlError {
    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            operation,
            reason: reason.into(),
        }
    }
}
