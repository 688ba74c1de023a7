//! Friction clutch with a stick/slip transition.

use crate::math::AngularVelocity;
use serde::{Deserialize, Serialize};

/// Whether the two clutch shafts currently turn as one.
///
/// This is a consequence of the last torque evaluation, not a command:
/// it is recomputed on every [`Clutch::torque_out`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClutchState {
    Locked,
    #[default]
    Slipping,
}

/// Result of one clutch torque evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClutchTransfer {
    /// Torque left on the input (engine) side.
    pub torque_left: f32,
    /// Torque delivered to the output side.
    pub torque_right: f32,
    pub state: ClutchState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clutch {
    pub static_coefficient: f32,
    pub kinetic_coefficient: f32,
    /// Largest shaft speed difference (rad/s) at which the clutch can lock.
    pub velocity_threshold: f32,
    /// Speed difference scale of the smoothed friction curve.
    pub torque_sensitivity: f32,
    /// Clamping force at full engagement.
    pub max_normal_force: f32,
    /// Clamping force currently applied.
    pub normal_force: f32,
    pub state: ClutchState,
}

impl Clutch {
    /// A disengaged clutch with the given friction characteristics.
    pub fn new(
        static_coefficient: f32,
        kinetic_coefficient: f32,
        velocity_threshold: f32,
        torque_sensitivity: f32,
        max_normal_force: f32,
    ) -> Self {
        Self {
            static_coefficient,
            kinetic_coefficient,
            velocity_threshold,
            torque_sensitivity,
            max_normal_force,
            normal_force: 0.0,
            state: ClutchState::Slipping,
        }
    }

    /// Build a clutch from the torque it can hold and the torque it
    /// transmits while slipping, both at full engagement.
    ///
    /// The friction radius is folded into the normal force, so the static
    /// coefficient is 1 and the maximum normal force equals
    /// `max_static_torque`.
    pub fn with_torque(max_static_torque: f32, max_kinetic_torque: f32) -> Self {
        Self::new(
            1.0,
            max_kinetic_torque / max_static_torque,
            1.0,
            2.0,
            max_static_torque,
        )
    }

    /// Set the clamping force as a fraction of the maximum (pedal released
    /// is 1.0). Values outside `[0, 1]` are clamped.
    pub fn engage(&mut self, fraction: f32) {
        self.normal_force = self.max_normal_force * fraction.clamp(0.0, 1.0);
    }

    pub fn is_locked(&self) -> bool {
        self.state == ClutchState::Locked
    }

    /// Split `torque_in` between the two shafts.
    ///
    /// Pure: the caller stores `state` from the returned transfer.
    pub fn torque_out(
        &self,
        torque_in: f32,
        normal_force: f32,
        left_velocity: AngularVelocity,
        right_velocity: AngularVelocity,
    ) -> ClutchTransfer {
        let vel_diff = left_velocity - right_velocity;
        let static_capacity = self.static_coefficient * normal_force;

        if vel_diff.abs() < self.velocity_threshold && torque_in.abs() <= static_capacity {
            return ClutchTransfer {
                torque_left: torque_in,
                torque_right: torque_in,
                state: ClutchState::Locked,
            };
        }

        let kinetic_capacity = self.kinetic_coefficient * normal_force;
        let friction = kinetic_capacity * (2.0 * vel_diff / self.torque_sensitivity).tanh();
        ClutchTransfer {
            torque_left: torque_in - friction,
            torque_right: friction,
            state: ClutchState::Slipping,
        }
    }
}
