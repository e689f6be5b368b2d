//! Simulation driver module.
//!
//! Software model of the machine for development and testing without
//! physical hardware. All parts share one [`SimClock`]; nothing in the
//! simulation reads wall-clock time.

mod clock;
mod driver;
mod io;
mod physics;

pub use clock::SimClock;
pub use driver::{SimulationDriver, SimulationHandles};
pub use io::{SimButton, SimScreen, SimSpeaker};
pub use physics::{AxisEvent, AxisJournal, AxisRecord, SimulatedAxis};

use eggbot_common::hal::driver::HalDriver;

/// Registry name of the simulation driver.
pub const DRIVER_NAME: &str = "simulation";

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn HalDriver> {
    Box::new(SimulationDriver::new())
}
