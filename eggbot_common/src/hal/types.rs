//! HAL axis identification types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently actuated degree of freedom of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Axis {
    /// Spins the egg around its long axis.
    Rotation = 0,
    /// Sweeps the pen lengthwise along the egg.
    Traverse = 1,
    /// Raises and lowers the pen.
    Lift = 2,
}

impl Axis {
    /// All axes in port order.
    pub const ALL: [Axis; 3] = [Axis::Rotation, Axis::Traverse, Axis::Lift];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Rotation),
            1 => Some(Self::Traverse),
            2 => Some(Self::Lift),
            _ => None,
        }
    }

    /// Lowercase axis name, as used in config sections and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::Traverse => "traverse",
            Self::Lift => "lift",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
