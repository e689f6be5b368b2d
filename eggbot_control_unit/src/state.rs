//! State machine module root.
//!
//! - [`pen`] - Up/Down pen machine with contact counters
//! - [`session`] - lifecycle of one machine run

pub mod pen;
pub mod session;

/// Result of a state transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult<S> {
    /// Transition succeeded - new state.
    Ok(S),
    /// Transition rejected - reason.
    Rejected(&'static str),
}

impl<S> TransitionResult<S> {
    /// Whether the transition was accepted.
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}
