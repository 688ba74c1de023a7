//! Differential splitting one input shaft into two output shafts.

use crate::math::AngularVelocity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffType {
    /// Equal torque to both sides; the sides turn independently.
    #[default]
    Open,
    /// Both sides forced to the same speed (spool).
    Locked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Differential {
    /// Final drive ratio.
    pub ratio: f32,
    pub inertia: f32,
    pub ty: DiffType,
}

impl Differential {
    pub fn new(ratio: f32, inertia: f32, ty: DiffType) -> Self {
        Self { ratio, inertia, ty }
    }

    /// Output torques `(left, right)` for `torque_in` at the input shaft.
    ///
    /// A locked differential shifts torque toward the side whose reaction
    /// resists more; the sum always equals `torque_in * ratio`.
    pub fn torque(&self, torque_in: f32, reaction_left: f32, reaction_right: f32) -> (f32, f32) {
        let half = torque_in * self.ratio * 0.5;
        match self.ty {
            DiffType::Open => (half, half),
            DiffType::Locked => {
                let bias = (reaction_right - reaction_left) * 0.5;
                (half + bias, half - bias)
            }
        }
    }

    /// Input shaft speed for the given output speeds.
    pub fn velocity(&self, left: AngularVelocity, right: AngularVelocity) -> AngularVelocity {
        (left + right) * 0.5 * self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::wheel::Wheel;

    #[test]
    fn open_split_ignores_reactions() {
        let diff = Differential::new(2.4, 0.18, DiffType::Open);
        assert_eq!(diff.torque(500.0, -1000.0, -500.0), (600.0, 600.0));
        assert_eq!(diff.torque(500.0, 0.0, 0.0), (600.0, 600.0));
    }

    #[test]
    fn locked_split_biases_toward_resistance() {
        let diff = Differential::new(2.0, 0.18, DiffType::Locked);
        let (left, right) = diff.torque(100.0, -300.0, -100.0);
        assert_eq!(left, 200.0);
        assert_eq!(right, 0.0);
        assert_eq!(left + right, 200.0);
    }

    #[test]
    fn velocity_is_scaled_mean() {
        let diff = Differential::new(2.0, 0.18, DiffType::Open);
        assert_eq!(diff.velocity(10.0, 20.0), 30.0);
    }

    #[test]
    fn locked_keeps_wheels_together_open_does_not() {
        let dt = 1.0 / 100.0;
        let yaw = 3.0;
        let velocity = Vec2::new(10.0, 0.0);

        let make = || {
            let mut wl = Wheel::new(0.5, 0.344, Vec2::new(1.0, 0.0), 0.01);
            let mut wr = Wheel::new(0.5, 0.344, Vec2::new(-1.0, 0.0), 0.01);
            wl.reaction_torque = -1000.0;
            wr.reaction_torque = -500.0;
            wl.external_torque = -500.0;
            wr.external_torque = -100.0;
            (wl, wr)
        };

        let open = Differential::new(2.4, 0.18, DiffType::Open);
        let (mut wl, mut wr) = make();
        let (tl, tr) = open.torque(500.0, wl.reaction_torque, wr.reaction_torque);
        wl.update(velocity, yaw, 0.0, tl, dt);
        wr.update(velocity, yaw, 0.0, tr, dt);
        assert_ne!(wl.angular_velocity, wr.angular_velocity);

        let locked = Differential::new(2.4, 0.18, DiffType::Locked);
        let (mut wl, mut wr) = make();
        wl.angular_velocity = 0.0;
        wr.angular_velocity = 0.0;
        let (tl, tr) = locked.torque(
            500.0,
            wl.reaction_torque + wl.external_torque,
            wr.reaction_torque + wr.external_torque,
        );
        wl.update(velocity, yaw, 0.0, tl, dt);
        wr.update(velocity, yaw, 0.0, tr, dt);
        assert!((wl.angular_velocity - wr.angular_velocity).abs() < 1e-4);
    }
}
