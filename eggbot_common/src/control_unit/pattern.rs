//! Declarative pattern model.
//!
//! A [`Pattern`] is an ordered list of [`Step`]s. Named designs are built in
//! code by the sequencer; custom patterns load from TOML:
//!
//! ```toml
//! name = "two-lines"
//!
//! [[steps]]
//! op = "set_angle"
//! offset = 10.0
//!
//! [[steps]]
//! op = "thick_line"
//!
//! [[steps]]
//! op = "checkpoint"
//! ```

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// One step of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Move the traverse by `offset` degrees (pen up).
    SetAngle { offset: f64 },
    /// Advance the rotation by `degrees` (pen up).
    Rotate { degrees: f64 },
    /// One revolution plus overrun.
    Line,
    /// Several revolutions at scaled velocity.
    ThickLine,
    /// `dots` evenly spaced dots around one revolution.
    DottedLine { dots: u32 },
    /// `strokes` longitudinal strokes evenly spaced around the egg.
    YLine { strokes: u32 },
    /// One revolution with traverse velocity `amplitude·cos(frequency·θ)`.
    Wave { amplitude: f64, frequency: f64 },
    /// A closed ring.
    Circle { radius: f64 },
    /// Re-establish the calibration frame.
    Home,
    /// Wait for manual confirmation (e.g. a pen-colour change).
    Checkpoint,
}

impl Step {
    /// Whether the step puts the pen on the egg.
    pub const fn contacts_surface(&self) -> bool {
        matches!(
            self,
            Self::Line
                | Self::ThickLine
                | Self::DottedLine { .. }
                | Self::YLine { .. }
                | Self::Wave { .. }
                | Self::Circle { .. }
        )
    }

    /// Short name used in logs and reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetAngle { .. } => "set_angle",
            Self::Rotate { .. } => "rotate",
            Self::Line => "line",
            Self::ThickLine => "thick_line",
            Self::DottedLine { .. } => "dotted_line",
            Self::YLine { .. } => "y_line",
            Self::Wave { .. } => "wave",
            Self::Circle { .. } => "circle",
            Self::Home => "home",
            Self::Checkpoint => "checkpoint",
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        match *self {
            Self::SetAngle { offset } if !offset.is_finite() => Err("offset must be finite"),
            Self::Rotate { degrees } if !degrees.is_finite() => Err("degrees must be finite"),
            Self::DottedLine { dots: 0 } => Err("dotted line needs at least one dot"),
            Self::YLine { strokes: 0 } => Err("y-line needs at least one stroke"),
            Self::Wave {
                amplitude,
                frequency,
            } if !(amplitude.is_finite() && amplitude >= 0.0 && frequency.is_finite()) => {
                Err("wave amplitude must be finite and non-negative, frequency finite")
            }
            Self::Circle { radius } if !(radius.is_finite() && radius > 0.0) => {
                Err("circle radius must be positive")
            }
            _ => Ok(()),
        }
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pattern {
    /// Design name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Pattern {
    /// Empty pattern.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Builder: set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: append one step.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Builder: append `times` repetitions of `steps`.
    pub fn repeat(mut self, times: usize, steps: &[Step]) -> Self {
        for _ in 0..times {
            self.steps.extend_from_slice(steps);
        }
        self
    }

    /// Number of steps matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Step) -> bool) -> usize {
        self.steps.iter().filter(|s| predicate(s)).count()
    }

    /// Number of manual checkpoints.
    pub fn checkpoints(&self) -> usize {
        self.count(|s| matches!(s, Step::Checkpoint))
    }

    /// Parse a pattern from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let pattern: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Validate every step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` naming the first invalid step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "pattern name cannot be empty".to_string(),
            ));
        }
        for (index, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|reason| {
                ConfigError::ValidationError(format!(
                    "pattern '{}' step {index} ({}): {reason}",
                    self.name,
                    step.name()
                ))
            })?;
        }
        Ok(())
    }
}
