//! Drawing engine configuration sections.
//!
//! `[pen]`, `[trajectory]`, `[primitives]` and `[session]` of `eggbot.toml`.
//! Every default is the tuning of the machine the patterns were designed on;
//! other machines override them as calibration data.

use crate::control_unit::homing::{HomingDirection, valid_duty};
use crate::consts::DEFAULT_SETTLE_DELAY_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ─── Pen ────────────────────────────────────────────────────────────

fn default_contact_direction() -> HomingDirection {
    HomingDirection::Positive
}
fn default_lower_speed() -> f64 {
    25.0
}
fn default_lower_duty_limit() -> f64 {
    45.0
}
fn default_raise_speed() -> f64 {
    25.0
}
fn default_raise_duty_limit() -> f64 {
    40.0
}

/// `[pen]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PenConfig {
    /// Lift direction that moves the pen toward the egg.
    #[serde(default = "default_contact_direction")]
    pub contact_direction: HomingDirection,
    /// Lowering speed [deg/s].
    #[serde(default = "default_lower_speed")]
    pub lower_speed: f64,
    /// Duty limit while probing for contact [%]. Bounds the force on the shell.
    #[serde(default = "default_lower_duty_limit")]
    pub lower_duty_limit: f64,
    /// Raising speed [deg/s].
    #[serde(default = "default_raise_speed")]
    pub raise_speed: f64,
    /// Duty limit while retracting [%].
    #[serde(default = "default_raise_duty_limit")]
    pub raise_duty_limit: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            contact_direction: default_contact_direction(),
            lower_speed: default_lower_speed(),
            lower_duty_limit: default_lower_duty_limit(),
            raise_speed: default_raise_speed(),
            raise_duty_limit: default_raise_duty_limit(),
        }
    }
}

impl PenConfig {
    /// Signed lift velocity for lowering.
    #[inline]
    pub fn lower_velocity(&self) -> f64 {
        self.contact_direction.sign() * self.lower_speed
    }

    /// Signed lift velocity for raising.
    #[inline]
    pub fn raise_velocity(&self) -> f64 {
        self.contact_direction.reversed().sign() * self.raise_speed
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.lower_speed <= 0.0 || self.raise_speed <= 0.0 {
            return Err("pen speeds must be positive");
        }
        if !valid_duty(self.lower_duty_limit) || !valid_duty(self.raise_duty_limit) {
            return Err("pen duty limits must be in (0, 100]");
        }
        Ok(())
    }
}

// ─── Trajectory ─────────────────────────────────────────────────────

/// Which circle generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CircleMode {
    /// Sweep keyed off live axis positions; adapts to actual axis speed.
    #[default]
    Feedback,
    /// 360 fixed samples with a delay between them.
    FixedSweep,
}

fn default_start_duty() -> f64 {
    10.0
}
fn default_top_duty() -> f64 {
    15.0
}
fn default_circle_speed() -> f64 {
    100.0
}
fn default_circle_rotation_scale() -> f64 {
    1.5
}
fn default_circle_correction_gain() -> f64 {
    1.0
}
fn default_fixed_sweep_delay_ms() -> u64 {
    1
}

/// `[trajectory]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryConfig {
    /// Rotation duty at the start of a wave [%].
    #[serde(default = "default_start_duty")]
    pub start_duty: f64,
    /// Rotation duty the wave soft-start ramps up to [%].
    #[serde(default = "default_top_duty")]
    pub top_duty: f64,
    /// Pause between samples [µs]. Zero busy-polls.
    #[serde(default)]
    pub sample_interval_us: u64,
    /// Abort a sweep that has not completed after this many samples.
    #[serde(default)]
    pub max_samples: Option<u64>,
    /// Circle generator.
    #[serde(default)]
    pub circle_mode: CircleMode,
    /// Tangential speed of the feedback circle [deg/s, traverse scale].
    #[serde(default = "default_circle_speed")]
    pub circle_speed: f64,
    /// Rotation degrees per traverse degree on the egg surface.
    #[serde(default = "default_circle_rotation_scale")]
    pub circle_rotation_scale: f64,
    /// Radial correction gain of the feedback circle.
    #[serde(default = "default_circle_correction_gain")]
    pub circle_correction_gain: f64,
    /// Delay between fixed-sweep samples [ms].
    #[serde(default = "default_fixed_sweep_delay_ms")]
    pub fixed_sweep_delay_ms: u64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            start_duty: default_start_duty(),
            top_duty: default_top_duty(),
            sample_interval_us: 0,
            max_samples: None,
            circle_mode: CircleMode::default(),
            circle_speed: default_circle_speed(),
            circle_rotation_scale: default_circle_rotation_scale(),
            circle_correction_gain: default_circle_correction_gain(),
            fixed_sweep_delay_ms: default_fixed_sweep_delay_ms(),
        }
    }
}

impl TrajectoryConfig {
    /// Pause between samples.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_micros(self.sample_interval_us)
    }

    /// Delay between fixed-sweep samples.
    pub fn fixed_sweep_delay(&self) -> Duration {
        Duration::from_millis(self.fixed_sweep_delay_ms)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !valid_duty(self.start_duty) || !valid_duty(self.top_duty) {
            return Err("trajectory duties must be in (0, 100]");
        }
        if self.top_duty < self.start_duty {
            return Err("trajectory top_duty must not be below start_duty");
        }
        if self.circle_speed <= 0.0 || self.circle_rotation_scale <= 0.0 {
            return Err("circle speed and rotation scale must be positive");
        }
        if self.circle_correction_gain < 0.0 {
            return Err("circle correction gain must not be negative");
        }
        if self.fixed_sweep_delay_ms == 0 {
            return Err("fixed_sweep_delay_ms must be greater than 0");
        }
        if self.max_samples == Some(0) {
            return Err("max_samples must be greater than 0");
        }
        Ok(())
    }
}

// ─── Primitives ─────────────────────────────────────────────────────

fn default_line_velocity() -> f64 {
    100.0
}
fn default_line_overrun() -> f64 {
    5.0
}
fn default_thick_line_velocity() -> f64 {
    400.0
}
fn default_thick_line_revolutions() -> u32 {
    8
}
fn default_y_line_lead_in() -> f64 {
    20.0
}
fn default_y_line_stroke() -> f64 {
    50.0
}

/// `[primitives]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveConfig {
    /// Rotation speed of a single line [deg/s].
    #[serde(default = "default_line_velocity")]
    pub line_velocity: f64,
    /// Extra rotation past one revolution, compensating backlash [deg].
    #[serde(default = "default_line_overrun")]
    pub line_overrun: f64,
    /// Rotation speed of a thick line [deg/s].
    #[serde(default = "default_thick_line_velocity")]
    pub thick_line_velocity: f64,
    /// Full revolutions per thick line.
    #[serde(default = "default_thick_line_revolutions")]
    pub thick_line_revolutions: u32,
    /// Rotation speed between dots [deg/s].
    #[serde(default = "default_line_velocity")]
    pub dot_velocity: f64,
    /// Speed of Y-line strokes and advances [deg/s].
    #[serde(default = "default_line_velocity")]
    pub y_line_velocity: f64,
    /// Outward travel of the first Y-line stroke [deg].
    #[serde(default = "default_y_line_lead_in")]
    pub y_line_lead_in: f64,
    /// Length of a Y-line stroke [deg].
    #[serde(default = "default_y_line_stroke")]
    pub y_line_stroke: f64,
    /// Speed of traverse offset moves [deg/s].
    #[serde(default = "default_line_velocity")]
    pub offset_velocity: f64,
    /// Speed of pen-up rotation advances [deg/s].
    #[serde(default = "default_line_velocity")]
    pub rotate_velocity: f64,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            line_velocity: default_line_velocity(),
            line_overrun: default_line_overrun(),
            thick_line_velocity: default_thick_line_velocity(),
            thick_line_revolutions: default_thick_line_revolutions(),
            dot_velocity: default_line_velocity(),
            y_line_velocity: default_line_velocity(),
            y_line_lead_in: default_y_line_lead_in(),
            y_line_stroke: default_y_line_stroke(),
            offset_velocity: default_line_velocity(),
            rotate_velocity: default_line_velocity(),
        }
    }
}

impl PrimitiveConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        let speeds = [
            self.line_velocity,
            self.thick_line_velocity,
            self.dot_velocity,
            self.y_line_velocity,
            self.offset_velocity,
            self.rotate_velocity,
        ];
        if speeds.iter().any(|v| *v <= 0.0) {
            return Err("primitive velocities must be positive");
        }
        if self.thick_line_revolutions == 0 {
            return Err("thick_line_revolutions must be at least 1");
        }
        if self.line_overrun < 0.0 || self.y_line_stroke <= 0.0 || self.y_line_lead_in < 0.0 {
            return Err("line overrun, y-line stroke and lead-in must not be negative");
        }
        Ok(())
    }
}

// ─── Session ────────────────────────────────────────────────────────

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}
fn default_checkpoint_poll_ms() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_checkpoint_message() -> String {
    "Press the button to continue".to_string()
}

/// `[session]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Minimum time between session start and the first primitive [ms].
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Button polling period at checkpoints [ms].
    #[serde(default = "default_checkpoint_poll_ms")]
    pub checkpoint_poll_ms: u64,
    /// Whether checkpoints wait for the button.
    #[serde(default = "default_true")]
    pub confirm_checkpoints: bool,
    /// Screen text shown while waiting at a checkpoint.
    #[serde(default = "default_checkpoint_message")]
    pub checkpoint_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            checkpoint_poll_ms: default_checkpoint_poll_ms(),
            confirm_checkpoints: true,
            checkpoint_message: default_checkpoint_message(),
        }
    }
}

impl SessionConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn checkpoint_poll(&self) -> Duration {
        Duration::from_millis(self.checkpoint_poll_ms)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.checkpoint_poll_ms == 0 {
            return Err("checkpoint_poll_ms must be greater than 0");
        }
        Ok(())
    }
}
