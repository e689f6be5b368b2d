//! Session lifecycle state machine.
//!
//! Idle → Homing → Settling → Drawing ⇄ AwaitingConfirmation → Complete.
//! `Fault` is reachable from every non-terminal state. Terminal sessions
//! return to Idle only through `Reset`.

use super::TransitionResult;
use eggbot_common::control_unit::state::SessionState;

/// Session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Start beep given, homing begins.
    Start,
    /// Calibration frame established.
    Homed,
    /// Settle delay elapsed.
    Settled,
    /// A checkpoint step is blocking on the button.
    CheckpointReached,
    /// The button was pressed (or the checkpoint skipped).
    Confirmed,
    /// Last step done, completion beep given.
    Finished,
    /// An actuator error aborted the run.
    Fault,
    /// Prepare for the next run.
    Reset,
}

/// Session state holder.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    state: SessionState,
}

impl SessionStateMachine {
    /// New machine in Idle.
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: SessionEvent) -> TransitionResult<SessionState> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self.state, event) {
            (S::Idle, E::Start) => S::Homing,
            (S::Homing, E::Homed) => S::Settling,
            (S::Settling, E::Settled) => S::Drawing,
            (S::Drawing, E::CheckpointReached) => S::AwaitingConfirmation,
            (S::AwaitingConfirmation, E::Confirmed) => S::Drawing,
            (S::Drawing, E::Finished) => S::Complete,

            (state, E::Fault) if !state.is_terminal() => S::Fault,

            (S::Complete | S::Fault, E::Reset) => S::Idle,

            (state, event) => {
                return TransitionResult::Rejected(invalid_transition_reason(state, event));
            }
        };

        self.state = next;
        TransitionResult::Ok(next)
    }
}

fn invalid_transition_reason(state: SessionState, event: SessionEvent) -> &'static str {
    match (state, event) {
        (SessionState::Idle, _) => "session not started",
        (_, SessionEvent::Start) => "session already running",
        (SessionState::Complete, _) => "session already complete",
        (SessionState::Fault, _) => "session faulted; reset first",
        (_, SessionEvent::Reset) => "cannot reset a running session",
        _ => "event not valid in current session state",
    }
}
