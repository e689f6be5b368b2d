//! Circle synthesis.
//!
//! The ring lives in the (rotation, traverse) angle plane. Rotation degrees
//! are stretched by `scale` so the drawn shape comes out round on the egg.
//! In normalised coordinates
//!
//! ```text
//! u = (rotation − cx) / (scale · R)      w = (traverse − cy) / R
//! ```
//!
//! the ring is the unit circle, and the pen at phase φ sits at
//! `(u, w) = (−cos φ, sin φ)`. The ring is anchored so the starting position
//! is φ = 0.

use std::f64::consts::PI;
use std::time::Duration;

/// Radial distance below which no correction direction exists.
const MIN_RADIAL: f64 = 1e-9;

/// Velocities for one feedback sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleCommand {
    /// Phase of the measured position [rad], in (−π, π].
    pub phase: f64,
    /// Normalised distance from the centre (1.0 on the ring).
    pub radial: f64,
    pub rotation_velocity: f64,
    pub traverse_velocity: f64,
}

/// Ring anchored at a starting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleGeometry {
    centre_rotation: f64,
    centre_traverse: f64,
    radius: f64,
    scale: f64,
}

impl CircleGeometry {
    /// Ring of `radius` whose φ = 0 point is the given position.
    pub fn starting_at(rotation: f64, traverse: f64, radius: f64, scale: f64) -> Self {
        Self {
            centre_rotation: rotation + scale * radius,
            centre_traverse: traverse,
            radius,
            scale,
        }
    }

    /// Normalised coordinates of a measured position.
    #[inline]
    pub fn normalise(&self, rotation: f64, traverse: f64) -> (f64, f64) {
        (
            (rotation - self.centre_rotation) / (self.scale * self.radius),
            (traverse - self.centre_traverse) / self.radius,
        )
    }

    /// Tangential command at `speed` plus a radial pull back to the ring.
    pub fn command(&self, rotation: f64, traverse: f64, speed: f64, gain: f64) -> CircleCommand {
        let (u, w) = self.normalise(rotation, traverse);
        let phase = w.atan2(-u);
        let radial = u.hypot(w);

        let mut rotation_velocity = self.scale * speed * phase.sin();
        let mut traverse_velocity = speed * phase.cos();
        if radial > MIN_RADIAL {
            let pull = gain * speed * (1.0 - radial) / radial;
            rotation_velocity += self.scale * pull * u;
            traverse_velocity += pull * w;
        }

        CircleCommand {
            phase,
            radial,
            rotation_velocity,
            traverse_velocity,
        }
    }
}

/// Phase difference folded into (−π, π].
#[inline]
pub fn unwrap_delta(delta: f64) -> f64 {
    let mut d = delta;
    while d > PI {
        d -= 2.0 * PI;
    }
    while d <= -PI {
        d += 2.0 * PI;
    }
    d
}

/// Traverse velocity amplitude of the fixed sweep.
///
/// The sweep advances one degree of phase per `delay`, so a velocity
/// amplitude of `R · (π/180) / delay` traces a ring of radius `R`.
pub fn fixed_sweep_amplitude(radius: f64, delay: Duration) -> f64 {
    radius * (PI / 180.0) / delay.as_secs_f64()
}

/// (rotation, traverse) velocities of fixed-sweep sample `step_deg`.
#[inline]
pub fn fixed_sweep_command(amplitude: f64, scale: f64, step_deg: f64) -> (f64, f64) {
    let theta = step_deg.to_radians();
    (scale * amplitude * theta.sin(), amplitude * theta.cos())
}
