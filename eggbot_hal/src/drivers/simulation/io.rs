//! Simulated brick I/O: button, speaker and screen.
//!
//! Each device shares its observable output with the [`SimulationHandles`]
//! through an `Arc`, so tests can inspect beeps, screen lines and presses
//! after the devices have been boxed into a `Machine`.
//!
//! [`SimulationHandles`]: super::SimulationHandles

use crate::drivers::simulation::clock::SimClock;
use eggbot_common::hal::driver::{ButtonSensor, Clock, Screen, Speaker};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Button that presses itself a fixed time after polling starts.
///
/// A wait episode begins at the first poll after the previous press. Once
/// `press_after` has elapsed the next poll reports a press and the episode
/// ends.
pub struct SimButton {
    clock: Arc<SimClock>,
    press_after: Option<Duration>,
    waiting_since: Option<Duration>,
    presses: Arc<AtomicU32>,
}

impl SimButton {
    /// `press_after = None` gives a button that is never pressed.
    pub fn new(clock: Arc<SimClock>, press_after: Option<Duration>, presses: Arc<AtomicU32>) -> Self {
        Self {
            clock,
            press_after,
            waiting_since: None,
            presses,
        }
    }
}

impl ButtonSensor for SimButton {
    fn is_pressed(&mut self) -> bool {
        let Some(delay) = self.press_after else {
            return false;
        };
        let now = self.clock.now();
        let started = *self.waiting_since.get_or_insert(now);
        if now.saturating_sub(started) >= delay {
            self.waiting_since = None;
            let count = self.presses.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(count, "sim button pressed");
            true
        } else {
            false
        }
    }
}

/// Speaker that counts beeps.
pub struct SimSpeaker {
    beeps: Arc<AtomicU32>,
}

impl SimSpeaker {
    /// Speaker counting into `beeps`.
    pub fn new(beeps: Arc<AtomicU32>) -> Self {
        Self { beeps }
    }
}

impl Speaker for SimSpeaker {
    fn beep(&mut self) {
        let count = self.beeps.fetch_add(1, Ordering::Relaxed) + 1;
        info!(count, "beep");
    }
}

/// Screen that keeps every line shown.
pub struct SimScreen {
    lines: Arc<Mutex<Vec<String>>>,
}

impl SimScreen {
    /// Screen appending to `lines`.
    pub fn new(lines: Arc<Mutex<Vec<String>>>) -> Self {
        Self { lines }
    }
}

impl Screen for SimScreen {
    fn show(&mut self, line: &str) {
        info!(line, "screen");
        self.lines.lock().push(line.to_string());
    }
}
