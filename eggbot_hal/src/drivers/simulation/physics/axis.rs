//! Axis physics simulator.
//!
//! A `SimulatedAxis` models one motor with an optional mechanical stop at
//! each end of travel. Its position is evaluated lazily from the shared
//! [`SimClock`]:
//!
//! ```text
//! position(t) = clamp(base + velocity · (t − since), min_stop, max_stop)
//! ```
//!
//! Velocity and duty commands only change `velocity` and return. Position
//! moves and stall-limited moves block: they advance the clock by the travel
//! time, so axes still running at a commanded velocity keep moving while a
//! sibling axis performs a blocking move.
//!
//! Running into a stop during a stall-limited move is the stall signal. A
//! stall-limited move toward an open end never stalls and times out.

use crate::drivers::simulation::clock::SimClock;
use eggbot_common::hal::config::SimAxisConfig;
use eggbot_common::hal::driver::{AxisActuator, Clock, HalError};
use eggbot_common::hal::types::Axis;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// One command received by a simulated axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisEvent {
    /// `set_velocity` (after clamping to the motor's maximum).
    SetVelocity(f64),
    /// `set_duty` in percent.
    SetDuty(f64),
    /// `move_by_angle` as commanded.
    MoveByAngle { velocity: f64, degrees: f64 },
    /// `run_until_stalled`; `traveled` is `None` when it timed out.
    RunUntilStalled {
        velocity: f64,
        duty_limit: f64,
        traveled: Option<f64>,
    },
    /// `reset_angle` to the given value.
    ResetAngle(f64),
    /// `stop`.
    Stop,
}

/// Journal entry: the event plus the axis state right after it.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisRecord {
    /// Simulated time the command finished.
    pub at: Duration,
    /// Angle relative to the last reference reset.
    pub angle: f64,
    /// Absolute mechanical position.
    pub position: f64,
    /// The command.
    pub event: AxisEvent,
}

/// Ordered record of every command an axis received.
///
/// Cloning yields another handle to the same journal.
#[derive(Debug, Clone, Default)]
pub struct AxisJournal {
    records: Arc<Mutex<Vec<AxisRecord>>>,
}

impl AxisJournal {
    /// Empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, record: AxisRecord) {
        self.records.lock().push(record);
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<AxisRecord> {
        self.records.lock().clone()
    }

    /// Snapshot of all events, without state.
    pub fn events(&self) -> Vec<AxisEvent> {
        self.records.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<AxisRecord> {
        self.records.lock().last().cloned()
    }

    /// Number of events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&AxisEvent) -> bool) -> usize {
        self.records.lock().iter().filter(|r| predicate(&r.event)).count()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

/// Simulated motor for one axis.
pub struct SimulatedAxis {
    axis: Axis,
    config: SimAxisConfig,
    clock: Arc<SimClock>,
    stall_timeout: Duration,
    /// Absolute position at `since`.
    base: f64,
    /// Commanded velocity since `since` [deg/s].
    velocity: f64,
    since: Duration,
    /// Absolute position that reads as angle 0.
    reference: f64,
    journal: AxisJournal,
}

impl SimulatedAxis {
    /// Create an axis at its configured power-on position.
    pub fn new(
        axis: Axis,
        config: SimAxisConfig,
        clock: Arc<SimClock>,
        stall_timeout: Duration,
        journal: AxisJournal,
    ) -> Self {
        let since = clock.now();
        Self {
            axis,
            base: config.initial_position,
            reference: 0.0,
            velocity: 0.0,
            since,
            config,
            clock,
            stall_timeout,
            journal,
        }
    }

    /// Absolute mechanical position now.
    pub fn position(&self) -> f64 {
        self.position_at(self.clock.now())
    }

    /// Velocity currently commanded [deg/s].
    pub fn commanded_velocity(&self) -> f64 {
        self.velocity
    }

    /// Handle to this axis's journal.
    pub fn journal(&self) -> AxisJournal {
        self.journal.clone()
    }

    fn position_at(&self, now: Duration) -> f64 {
        let dt = now.saturating_sub(self.since).as_secs_f64();
        self.clamp(self.base + self.velocity * dt)
    }

    fn clamp(&self, position: f64) -> f64 {
        let lower = self.config.min_stop.unwrap_or(f64::NEG_INFINITY);
        let upper = self.config.max_stop.unwrap_or(f64::INFINITY);
        position.clamp(lower, upper)
    }

    /// Fold elapsed motion into `base` so the velocity can change.
    fn settle(&mut self) {
        let now = self.clock.now();
        self.base = self.position_at(now);
        self.since = now;
    }

    /// Block for the travel to `target` at `speed` and land on it.
    ///
    /// Fails without moving when the travel time is not representable.
    fn travel_to(&mut self, target: f64, speed: f64) -> Result<(), HalError> {
        let travel = (target - self.base).abs();
        let duration = Duration::try_from_secs_f64(travel / speed).map_err(|_| {
            self.invalid(format!("travel of {travel}° at {speed} deg/s takes too long"))
        })?;
        self.clock.advance(duration);
        self.base = target;
        self.velocity = 0.0;
        self.since = self.clock.now();
        Ok(())
    }

    fn record(&self, event: AxisEvent) {
        let position = self.position();
        self.journal.push(AxisRecord {
            at: self.clock.now(),
            angle: position - self.reference,
            position,
            event,
        });
    }

    fn invalid(&self, reason: impl Into<String>) -> HalError {
        HalError::InvalidCommand {
            axis: self.axis,
            reason: reason.into(),
        }
    }

    fn limit_speed(&self, velocity: f64) -> f64 {
        velocity.clamp(-self.config.max_velocity, self.config.max_velocity)
    }
}

impl AxisActuator for SimulatedAxis {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), HalError> {
        if !velocity.is_finite() {
            return Err(self.invalid("velocity must be finite"));
        }
        self.settle();
        self.velocity = self.limit_speed(velocity);
        trace!(axis = %self.axis, velocity = self.velocity, "set velocity");
        self.record(AxisEvent::SetVelocity(self.velocity));
        Ok(())
    }

    fn set_duty(&mut self, duty: f64) -> Result<(), HalError> {
        if !duty.is_finite() || duty.abs() > eggbot_common::consts::MAX_DUTY {
            return Err(self.invalid(format!("duty {duty} outside ±100 %")));
        }
        self.settle();
        self.velocity = self.limit_speed(duty * self.config.duty_to_velocity);
        debug!(axis = %self.axis, duty, velocity = self.velocity, "set duty");
        self.record(AxisEvent::SetDuty(duty));
        Ok(())
    }

    fn move_by_angle(&mut self, velocity: f64, degrees: f64) -> Result<(), HalError> {
        if velocity == 0.0 || !velocity.is_finite() || !degrees.is_finite() {
            return Err(self.invalid(format!(
                "cannot move {degrees}° at {velocity} deg/s"
            )));
        }
        self.settle();
        let speed = velocity.abs().min(self.config.max_velocity);
        let target = self.base + degrees;
        let reached = self.clamp(target);
        if reached != target {
            warn!(
                axis = %self.axis,
                target,
                reached,
                "position move blocked by mechanical stop"
            );
        }
        self.travel_to(reached, speed)?;
        debug!(axis = %self.axis, degrees, velocity, "move by angle");
        self.record(AxisEvent::MoveByAngle { velocity, degrees });
        Ok(())
    }

    fn run_until_stalled(&mut self, velocity: f64, duty_limit: f64) -> Result<f64, HalError> {
        if velocity == 0.0 || !velocity.is_finite() {
            return Err(self.invalid("stall-limited move needs a non-zero velocity"));
        }
        if !(duty_limit > 0.0 && duty_limit <= eggbot_common::consts::MAX_DUTY) {
            return Err(self.invalid(format!("duty limit {duty_limit} outside (0, 100]")));
        }
        self.settle();
        let speed = velocity.abs().min(self.config.max_velocity);
        let stop = if velocity > 0.0 {
            self.config.max_stop
        } else {
            self.config.min_stop
        };

        match stop {
            Some(stop) => {
                let start = self.base;
                self.travel_to(stop, speed)?;
                let traveled = stop - start;
                debug!(axis = %self.axis, velocity, duty_limit, traveled, "stalled");
                self.record(AxisEvent::RunUntilStalled {
                    velocity,
                    duty_limit,
                    traveled: Some(traveled),
                });
                Ok(traveled)
            }
            None => {
                self.clock.advance(self.stall_timeout);
                self.base += velocity.signum() * speed * self.stall_timeout.as_secs_f64();
                self.velocity = 0.0;
                self.since = self.clock.now();
                warn!(axis = %self.axis, velocity, "no stall before timeout");
                self.record(AxisEvent::RunUntilStalled {
                    velocity,
                    duty_limit,
                    traveled: None,
                });
                Err(HalError::StallTimeout {
                    axis: self.axis,
                    timeout: self.stall_timeout,
                })
            }
        }
    }

    fn angle(&self) -> f64 {
        self.position() - self.reference
    }

    fn reset_angle(&mut self, value: f64) {
        self.settle();
        self.reference = self.base - value;
        trace!(axis = %self.axis, value, "reset angle");
        self.record(AxisEvent::ResetAngle(value));
    }

    fn stop(&mut self) -> Result<(), HalError> {
        self.settle();
        self.velocity = 0.0;
        self.record(AxisEvent::Stop);
        Ok(())
    }
}
