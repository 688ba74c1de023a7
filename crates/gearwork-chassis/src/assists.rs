//! Driver assists.

use serde::{Deserialize, Serialize};

/// Anti-lock braking: releases a wheel's brake pressure while it locks up.
///
/// Slip ratios follow the wheel convention, so a wheel turning slower than
/// the road (braking) has a positive slip ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Abs {
    pub enabled: bool,
    /// Largest braking slip ratio tolerated before pressure is released.
    pub desired_slip_ratio: f32,
    /// Below this vehicle speed (m/s) the wheels are allowed to lock.
    pub min_velocity: f32,
}

impl Abs {
    /// An enabled controller.
    pub fn new(desired_slip_ratio: f32, min_velocity: f32) -> Self {
        Self {
            enabled: true,
            desired_slip_ratio,
            min_velocity,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Brake pressure to apply to a wheel with `slip_ratio` on a vehicle
    /// moving at `velocity`.
    pub fn pressure(&self, pressure: f32, velocity: f32, slip_ratio: f32) -> f32 {
        let locking = slip_ratio > self.desired_slip_ratio;
        if self.enabled && locking && velocity.abs() >= self.min_velocity {
            0.0
        } else {
            pressure
        }
    }
}

impl Default for Abs {
    fn default() -> Self {
        Self::new(0.1, 2.0)
    }
}
