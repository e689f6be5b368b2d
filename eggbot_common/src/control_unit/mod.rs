//! Drawing engine shared types.
//!
//! Configuration sections, state enums and the declarative pattern model
//! consumed by `eggbot_control_unit`.

pub mod config;
pub mod homing;
pub mod pattern;
pub mod state;
