//! Homing types for the drawing engine.
//!
//! Defines `HomingDirection` and `HomingConfig`. Homing on this machine is
//! always hard-stop homing: each axis runs into a mechanical stop and the
//! actuator's stall detection ends the move.

use serde::{Deserialize, Serialize};

/// Homing approach direction.
///
/// Determines which mechanical stop an axis is driven into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HomingDirection {
    /// Approach in +direction.
    Positive = 0,
    /// Approach in -direction.
    Negative = 1,
}

impl HomingDirection {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Positive),
            1 => Some(Self::Negative),
            _ => None,
        }
    }

    /// Returns the sign multiplier for approach direction.
    #[inline]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    /// The opposite direction.
    #[inline]
    pub const fn reversed(&self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

fn default_lift_direction() -> HomingDirection {
    HomingDirection::Negative
}
fn default_lift_speed() -> f64 {
    70.0
}
fn default_lift_duty_limit() -> f64 {
    50.0
}
fn default_traverse_direction() -> HomingDirection {
    HomingDirection::Positive
}
fn default_traverse_speed() -> f64 {
    100.0
}
fn default_traverse_duty_limit() -> f64 {
    40.0
}
fn default_back_off() -> f64 {
    35.0
}
fn default_back_off_speed() -> f64 {
    50.0
}

/// `[homing]` section.
///
/// Speeds are magnitudes [deg/s]; the sign comes from the direction fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomingConfig {
    /// Direction of the lift's fully-retracted stop.
    #[serde(default = "default_lift_direction")]
    pub lift_direction: HomingDirection,
    /// Lift homing speed [deg/s].
    #[serde(default = "default_lift_speed")]
    pub lift_speed: f64,
    /// Lift duty limit during homing [%].
    #[serde(default = "default_lift_duty_limit")]
    pub lift_duty_limit: f64,
    /// Direction of the traverse far-end stop.
    #[serde(default = "default_traverse_direction")]
    pub traverse_direction: HomingDirection,
    /// Traverse homing speed [deg/s].
    #[serde(default = "default_traverse_speed")]
    pub traverse_speed: f64,
    /// Traverse duty limit during homing [%].
    #[serde(default = "default_traverse_duty_limit")]
    pub traverse_duty_limit: f64,
    /// Distance backed off the traverse stop to the working start point [deg].
    #[serde(default = "default_back_off")]
    pub back_off: f64,
    /// Back-off speed [deg/s].
    #[serde(default = "default_back_off_speed")]
    pub back_off_speed: f64,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            lift_direction: default_lift_direction(),
            lift_speed: default_lift_speed(),
            lift_duty_limit: default_lift_duty_limit(),
            traverse_direction: default_traverse_direction(),
            traverse_speed: default_traverse_speed(),
            traverse_duty_limit: default_traverse_duty_limit(),
            back_off: default_back_off(),
            back_off_speed: default_back_off_speed(),
        }
    }
}

impl HomingConfig {
    /// Signed lift homing velocity.
    #[inline]
    pub fn lift_velocity(&self) -> f64 {
        self.lift_direction.sign() * self.lift_speed
    }

    /// Signed traverse homing velocity.
    #[inline]
    pub fn traverse_velocity(&self) -> f64 {
        self.traverse_direction.sign() * self.traverse_speed
    }

    /// Signed back-off move, always away from the traverse stop.
    #[inline]
    pub fn back_off_angle(&self) -> f64 {
        self.traverse_direction.reversed().sign() * self.back_off
    }

    /// Validates speeds, duty limits and back-off distance.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.lift_speed <= 0.0 || self.traverse_speed <= 0.0 || self.back_off_speed <= 0.0 {
            return Err("homing speeds must be positive");
        }
        if !valid_duty(self.lift_duty_limit) || !valid_duty(self.traverse_duty_limit) {
            return Err("homing duty limits must be in (0, 100]");
        }
        if self.back_off < 0.0 {
            return Err("homing back_off must not be negative");
        }
        Ok(())
    }
}

/// Whether `duty` is a usable duty limit in percent.
#[inline]
pub(crate) fn valid_duty(duty: f64) -> bool {
    duty > 0.0 && duty <= crate::consts::MAX_DUTY
}
