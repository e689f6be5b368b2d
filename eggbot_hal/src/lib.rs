//! # Eggbot HAL Library
//!
//! Hardware abstraction layer with pluggable driver architecture.
//!
//! Drivers implement the `HalDriver` trait defined in
//! `eggbot_common::hal::driver` and hand the drawing engine a fully wired
//! [`Machine`](eggbot_common::hal::driver::Machine).
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - HAL driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      eggbot_hal                           │
//! │  ┌──────────────────┐          ┌───────────────────────┐  │
//! │  │ Driver Registry  │─create──►│  HalDriver            │  │
//! │  │ (name → factory) │          │  (trait object)       │  │
//! │  └──────────────────┘          └──────────┬────────────┘  │
//! │                                           │ init(config)  │
//! │                                           ▼               │
//! │                                 ┌───────────────────────┐ │
//! │                                 │ Machine               │ │
//! │                                 │ 3 axes, button,       │ │
//! │                                 │ speaker, screen, clock│ │
//! │                                 └───────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod driver_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::driver_registry::DriverRegistry;
pub use crate::drivers::simulation::{SimulationDriver, SimulationHandles};
