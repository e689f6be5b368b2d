//! Hardware abstraction layer capabilities and configuration.
//!
//! This module contains the capability traits the drawing engine drives
//! and the configuration of the simulation driver.

pub mod config;
pub mod driver;
pub mod types;
