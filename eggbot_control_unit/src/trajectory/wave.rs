//! Wave synthesis.
//!
//! The traverse velocity follows `amplitude · cos(frequency · θ)` where θ is
//! the live rotation angle. Rotation runs open-loop at a low duty that is
//! ramped up over the first degrees so the egg starts turning smoothly.

/// Traverse velocity for rotation angle `angle_deg`.
#[inline]
pub fn wave_velocity(amplitude: f64, frequency: f64, angle_deg: f64) -> f64 {
    amplitude * (frequency * angle_deg.to_radians()).cos()
}

/// Rotation duty during the soft start, `None` once the ramp is over.
#[inline]
pub fn soft_start_duty(angle_deg: f64, start_duty: f64, top_duty: f64) -> Option<f64> {
    let duty = angle_deg + start_duty;
    (duty < top_duty).then_some(duty)
}
