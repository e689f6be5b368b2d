//! Pen state machine.
//!
//! Up → Down on `Lower`, Down → Up on `Raise`. Both events are accepted in
//! either state: a repeated lower or raise is a re-probe against the stop
//! and leaves the state unchanged. The machine is owned by one
//! `PenController`, so transitions never race.

use super::TransitionResult;
use eggbot_common::control_unit::state::PenState;

/// Pen event, raised after the corresponding lift move succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenEvent {
    /// Contact with the shell was detected.
    Lower,
    /// The lift reached its retracted stop.
    Raise,
}

/// Pen state plus contact/retraction counters.
#[derive(Debug, Clone, Default)]
pub struct PenStateMachine {
    state: PenState,
    contacts: u32,
    retractions: u32,
}

impl PenStateMachine {
    /// New machine, pen Up.
    pub const fn new() -> Self {
        Self {
            state: PenState::Up,
            contacts: 0,
            retractions: 0,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> PenState {
        self.state
    }

    /// Lower events seen.
    #[inline]
    pub const fn contacts(&self) -> u32 {
        self.contacts
    }

    /// Raise events seen.
    #[inline]
    pub const fn retractions(&self) -> u32 {
        self.retractions
    }

    /// Apply an event.
    pub fn handle_event(&mut self, event: PenEvent) -> TransitionResult<PenState> {
        let next = match event {
            PenEvent::Lower => {
                self.contacts += 1;
                PenState::Down
            }
            PenEvent::Raise => {
                self.retractions += 1;
                PenState::Up
            }
        };
        self.state = next;
        TransitionResult::Ok(next)
    }
}
