//! Physics simulation module.
//!
//! Axis motion over simulated time, mechanical stops, stall detection and
//! the per-axis command journal.

mod axis;

pub use axis::{AxisEvent, AxisJournal, AxisRecord, SimulatedAxis};
