//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use eggbot_common::prelude::*;` and get
//! the most important types without listing individual paths.

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, EggbotConfig, SharedConfig};

// ─── Machine Constants ──────────────────────────────────────────────
pub use crate::consts::{FULL_REVOLUTION, MAX_DUTY};

// ─── Capabilities ───────────────────────────────────────────────────
pub use crate::hal::driver::{
    AxisActuator, ButtonSensor, Clock, HalError, Machine, Screen, Speaker,
};
pub use crate::hal::types::Axis;

// ─── Engine Types ───────────────────────────────────────────────────
pub use crate::control_unit::pattern::{Pattern, Step};
pub use crate::control_unit::state::{PenState, SessionState};
