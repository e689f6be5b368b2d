//! State enums for the drawing engine.
//!
//! `PenState` is the two-state pen machine; `SessionState` tracks the
//! lifecycle of one machine run. Both use `#[repr(u8)]` so they can be logged
//! and reported as compact codes.

use serde::{Deserialize, Serialize};

/// Pen position (Up = retracted, Down = in contact with the shell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PenState {
    /// Retracted, no surface contact.
    #[default]
    Up = 0,
    /// Lowered onto the egg.
    Down = 1,
}

impl PenState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            _ => None,
        }
    }
}

/// Lifecycle of one session.
///
/// `Fault` exits only by starting a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum SessionState {
    /// Created, nothing commanded yet.
    #[default]
    Idle = 0,
    /// Establishing the calibration frame.
    Homing = 1,
    /// Waiting out the settle delay.
    Settling = 2,
    /// Executing pattern steps.
    Drawing = 3,
    /// Blocked on a manual-confirmation checkpoint.
    AwaitingConfirmation = 4,
    /// Pattern finished, completion signalled.
    Complete = 5,
    /// An actuator error aborted the session.
    Fault = 6,
}

impl SessionState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Homing),
            2 => Some(Self::Settling),
            3 => Some(Self::Drawing),
            4 => Some(Self::AwaitingConfirmation),
            5 => Some(Self::Complete),
            6 => Some(Self::Fault),
            _ => None,
        }
    }

    /// Whether the session has ended (successfully or not).
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Fault)
    }
}
