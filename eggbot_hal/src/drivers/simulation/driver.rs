//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `HalDriver` trait by wiring three
//! [`SimulatedAxis`] instances, the simulated button, speaker and screen to
//! one shared [`SimClock`].

use super::clock::SimClock;
use super::io::{SimButton, SimScreen, SimSpeaker};
use super::physics::{AxisJournal, SimulatedAxis};
use eggbot_common::config::EggbotConfig;
use eggbot_common::hal::driver::{HalDriver, HalError, Machine};
use eggbot_common::hal::types::Axis;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::info;

/// Observation side of a simulated machine.
///
/// Holds shared handles to everything the machine records, so a test can
/// inspect the run after the `Machine` has been consumed.
#[derive(Clone)]
pub struct SimulationHandles {
    /// Shared simulated clock.
    pub clock: Arc<SimClock>,
    rotation: AxisJournal,
    traverse: AxisJournal,
    lift: AxisJournal,
    beeps: Arc<AtomicU32>,
    presses: Arc<AtomicU32>,
    screen: Arc<Mutex<Vec<String>>>,
}

impl SimulationHandles {
    /// Command journal of one axis.
    pub fn journal(&self, axis: Axis) -> &AxisJournal {
        match axis {
            Axis::Rotation => &self.rotation,
            Axis::Traverse => &self.traverse,
            Axis::Lift => &self.lift,
        }
    }

    /// Beeps emitted so far.
    pub fn beeps(&self) -> u32 {
        self.beeps.load(Ordering::Relaxed)
    }

    /// Button presses reported so far.
    pub fn button_presses(&self) -> u32 {
        self.presses.load(Ordering::Relaxed)
    }

    /// Every line shown on the screen.
    pub fn screen_lines(&self) -> Vec<String> {
        self.screen.lock().clone()
    }

    /// Clear all axis journals.
    pub fn clear_journals(&self) {
        for axis in Axis::ALL {
            self.journal(axis).clear();
        }
    }
}

/// Simulation driver implementing the HalDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Handles of the most recently initialized machine
    handles: Option<SimulationHandles>,
}

impl SimulationDriver {
    /// Create a new simulation driver instance.
    pub fn new() -> Self {
        Self {
            name: super::DRIVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            handles: None,
        }
    }

    /// Build a simulated machine and its observation handles.
    ///
    /// # Errors
    /// Returns `HalError::ConfigError` if the `[simulation]` section is invalid.
    pub fn build(config: &EggbotConfig) -> Result<(Machine, SimulationHandles), HalError> {
        let sim = &config.simulation;
        sim.validate()?;

        let clock = Arc::new(SimClock::new(sim.sample_latency()));
        let stall_timeout = sim.stall_timeout();
        let make_axis = |axis: Axis, journal: &AxisJournal| -> SimulatedAxis {
            SimulatedAxis::new(
                axis,
                sim.axis(axis).clone(),
                clock.clone(),
                stall_timeout,
                journal.clone(),
            )
        };

        let handles = SimulationHandles {
            clock: clock.clone(),
            rotation: AxisJournal::new(),
            traverse: AxisJournal::new(),
            lift: AxisJournal::new(),
            beeps: Arc::new(AtomicU32::new(0)),
            presses: Arc::new(AtomicU32::new(0)),
            screen: Arc::new(Mutex::new(Vec::new())),
        };

        let machine = Machine {
            rotation: Box::new(make_axis(Axis::Rotation, &handles.rotation)),
            traverse: Box::new(make_axis(Axis::Traverse, &handles.traverse)),
            lift: Box::new(make_axis(Axis::Lift, &handles.lift)),
            button: Box::new(SimButton::new(
                clock.clone(),
                sim.button_press_after_ms.map(Duration::from_millis),
                handles.presses.clone(),
            )),
            speaker: Box::new(SimSpeaker::new(handles.beeps.clone())),
            screen: Box::new(SimScreen::new(handles.screen.clone())),
            clock: clock.clone(),
        };

        info!(
            sample_latency = ?sim.sample_latency(),
            stall_timeout = ?stall_timeout,
            button_press_after_ms = ?sim.button_press_after_ms,
            "Simulated machine ready"
        );
        Ok((machine, handles))
    }

    /// Handles of the machine returned by the last successful `init`.
    pub fn handles(&self) -> Option<&SimulationHandles> {
        self.handles.as_ref()
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HalDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &EggbotConfig) -> Result<Machine, HalError> {
        info!("Initializing simulation driver");
        let (machine, handles) = Self::build(config)?;
        self.handles = Some(handles);
        Ok(machine)
    }
}
