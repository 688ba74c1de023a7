//! Small numeric helpers shared by the component models.

use serde::{Deserialize, Serialize};

/// Machine epsilon for `f32`, used as the "effectively zero" threshold.
pub const EPSILON: f32 = f32::EPSILON;

/// Angular velocity in radians per second.
pub type AngularVelocity = f32;

/// Planar vector in vehicle (ISO 8855) coordinates: x forward, y left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Rotate counter-clockwise by `angle` radians.
    pub fn rotate(self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Explicit Euler step: the change produced by `rate` over `dt`.
#[inline]
pub fn integrate(rate: f32, dt: f32) -> f32 {
    rate * dt
}

/// Sign of `v` including the sign of zero (`-0.0` maps to `-1.0`).
#[inline]
pub fn signum(v: f32) -> f32 {
    1.0_f32.copysign(v)
}

#[inline]
pub fn rpm_to_rads(rpm: f32) -> AngularVelocity {
    rpm * std::f32::consts::TAU / 60.0
}

#[inline]
pub fn rads_to_rpm(rads: AngularVelocity) -> f32 {
    rads * 60.0 / std::f32::consts::TAU
}

/// Replace NaN and infinities with zero.
#[inline]
pub(crate) fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
