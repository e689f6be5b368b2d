//! Eggbot Common Library
//!
//! This crate provides the types shared by every eggbot crate: the
//! capability traits the drawing engine drives, the configuration loader and
//! the declarative pattern model.
//!
//! # Module Structure
//!
//! - [`hal`] - Actuator/sensor capability traits, `HalError`, simulation config
//! - [`control_unit`] - Engine configuration, state enums and pattern steps
//! - [`config`] - Configuration loading traits and the top-level `EggbotConfig`
//! - [`consts`] - Machine-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use eggbot_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod prelude;
