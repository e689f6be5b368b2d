//! Built-in designs.
//!
//! Each design is a fixed step list. Traverse offsets are relative moves,
//! so a design that re-homes between bands measures each offset from the
//! homed start point, while one that does not accumulates them.

use crate::error::ControlError;
use eggbot_common::control_unit::pattern::{Pattern, Step};
use std::fmt;
use std::str::FromStr;

/// Radius of each ring in `circle-ring` [deg of traverse].
pub const CIRCLE_RING_RADIUS: f64 = 8.5;

/// Rings in `circle-ring`, evenly spaced around the egg.
pub const CIRCLE_RING_COUNT: usize = 8;

/// Parameters of a line fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFan {
    /// Thick lines drawn.
    pub count: usize,
    /// Traverse offset before the first line.
    pub start_offset: f64,
    /// Traverse offset after each line.
    pub spacing: f64,
}

impl Default for LineFan {
    fn default() -> Self {
        Self {
            count: 5,
            start_offset: 24.0,
            spacing: -12.0,
        }
    }
}

impl LineFan {
    /// `set(start_offset)`, then `count × (thick, set(spacing))`.
    pub fn pattern(&self) -> Pattern {
        Pattern::new("line-fan")
            .describe(format!(
                "{} thick lines {}° apart",
                self.count,
                self.spacing.abs()
            ))
            .then(Step::SetAngle {
                offset: self.start_offset,
            })
            .repeat(
                self.count,
                &[
                    Step::ThickLine,
                    Step::SetAngle {
                        offset: self.spacing,
                    },
                ],
            )
    }
}

/// Named designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Design {
    WaveBetweenLines,
    LineFan,
    WavesAndLines,
    ColorBands,
    Grid,
    Stripe,
    DenseBand,
    CircleRing,
}

impl Design {
    /// Every design, in listing order.
    pub const ALL: [Design; 8] = [
        Design::WaveBetweenLines,
        Design::LineFan,
        Design::WavesAndLines,
        Design::ColorBands,
        Design::Grid,
        Design::Stripe,
        Design::DenseBand,
        Design::CircleRing,
    ];

    /// Name used on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WaveBetweenLines => "wave-between-lines",
            Self::LineFan => "line-fan",
            Self::WavesAndLines => "waves-and-lines",
            Self::ColorBands => "color-bands",
            Self::Grid => "grid",
            Self::Stripe => "stripe",
            Self::DenseBand => "dense-band",
            Self::CircleRing => "circle-ring",
        }
    }

    /// One-line description.
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::WaveBetweenLines => "A wave, then a thick line on either side of it",
            Self::LineFan => "Five thick lines fanning down from the top",
            Self::WavesAndLines => "Alternating thick lines and waves, pen change between each",
            Self::ColorBands => "Eight thick bands, pen change after each",
            Self::Grid => "Eight bands crossed by 24 longitudinal strokes",
            Self::Stripe => "Two pairs of thick lines around a dotted line",
            Self::DenseBand => "48 thick lines one degree apart",
            Self::CircleRing => "Eight circles around the equator",
        }
    }

    /// Build the step list.
    pub fn pattern(&self) -> Pattern {
        let base = Pattern::new(self.name()).describe(self.summary());
        match self {
            Self::WaveBetweenLines => base
                .then(Step::Wave {
                    amplitude: 120.0,
                    frequency: 10.0,
                })
                .then(Step::Checkpoint)
                .then(Step::Home)
                .then(Step::SetAngle { offset: -25.0 })
                .then(Step::ThickLine)
                .then(Step::SetAngle { offset: 50.0 })
                .then(Step::ThickLine),

            Self::LineFan => LineFan::default().pattern().describe(self.summary()),

            Self::WavesAndLines => {
                let wave = Step::Wave {
                    amplitude: 75.0,
                    frequency: 14.0,
                };
                let bands = [
                    (3.0, Step::ThickLine),
                    (-3.0, Step::ThickLine),
                    (-13.0, wave.clone()),
                    (-18.0, Step::ThickLine),
                    (5.0, wave),
                    (20.0, Step::ThickLine),
                ];
                let last = bands.len() - 1;
                bands
                    .into_iter()
                    .enumerate()
                    .fold(base, |pattern, (i, (offset, step))| {
                        let pattern = pattern.then(Step::SetAngle { offset }).then(step);
                        if i == last {
                            pattern
                        } else {
                            pattern.then(Step::Checkpoint).then(Step::Home)
                        }
                    })
            }

            Self::ColorBands => (0..8).fold(base, |pattern, i| {
                pattern
                    .then(Step::SetAngle {
                        offset: band_offset(i),
                    })
                    .then(Step::ThickLine)
                    .then(Step::Checkpoint)
                    .then(Step::Home)
            }),

            Self::Grid => (0..8)
                .fold(base, |pattern, i| {
                    pattern
                        .then(Step::SetAngle {
                            offset: band_offset(i),
                        })
                        .then(Step::ThickLine)
                        .then(Step::Home)
                })
                .then(Step::Checkpoint)
                .then(Step::YLine { strokes: 24 }),

            Self::Stripe => {
                let pair = [Step::ThickLine, Step::SetAngle { offset: -10.0 }];
                base.then(Step::SetAngle { offset: 20.0 })
                    .repeat(2, &pair)
                    .then(Step::DottedLine { dots: 30 })
                    .then(Step::SetAngle { offset: -10.0 })
                    .repeat(2, &pair)
            }

            Self::DenseBand => base.then(Step::SetAngle { offset: 24.0 }).repeat(
                48,
                &[Step::ThickLine, Step::SetAngle { offset: -1.0 }],
            ),

            Self::CircleRing => base.repeat(
                CIRCLE_RING_COUNT,
                &[
                    Step::Circle {
                        radius: CIRCLE_RING_RADIUS,
                    },
                    Step::Home,
                    Step::Rotate {
                        degrees: 360.0 / CIRCLE_RING_COUNT as f64,
                    },
                ],
            ),
        }
    }
}

/// Offset of band `i` (0-based) measured from the homed start point.
fn band_offset(i: u32) -> f64 {
    24.0 - 8.0 * f64::from(i)
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Design {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ControlError::UnknownDesign(s.to_string()))
    }
}
