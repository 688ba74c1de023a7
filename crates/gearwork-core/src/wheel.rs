//! Wheel: the leaf of every drivetrain branch.
//!
//! A wheel integrates its own spin from the torque delivered by the graph,
//! the tire reaction of the previous force evaluation and any external
//! (brake) torque. Near standstill both the hub speed and the spin are held
//! at `min_speed` in the current travel direction so the slip ratio stays
//! well defined.

use crate::math::{AngularVelocity, EPSILON, Vec2, finite_or_zero, integrate};
use crate::tire::TireModel;
use serde::{Deserialize, Serialize};

/// Direction of travel the standstill floor is held in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelDirection {
    #[default]
    Forward,
    Reverse,
}

impl WheelDirection {
    pub fn sign(self) -> f32 {
        match self {
            WheelDirection::Forward => 1.0,
            WheelDirection::Reverse => -1.0,
        }
    }
}

/// Longitudinal and lateral slip of a wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Slip {
    pub ratio: f32,
    /// Radians.
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wheel {
    pub inertia: f32,
    pub effective_radius: f32,
    /// Offset from the vehicle's centre of gravity.
    pub position: Vec2,
    pub min_speed: f32,
    /// Steer angle in radians.
    pub angle: f32,
    pub angular_velocity: AngularVelocity,
    pub hub_velocity: Vec2,
    /// Drivetrain torque received on the last update.
    pub input_torque: f32,
    /// Tire reaction from the last force evaluation.
    pub reaction_torque: f32,
    /// Torque not coming from the drivetrain, e.g. brakes.
    pub external_torque: f32,
    direction: WheelDirection,
}

impl Wheel {
    /// A wheel resting at the forward standstill floor.
    pub fn new(inertia: f32, effective_radius: f32, position: Vec2, min_speed: f32) -> Self {
        Self {
            inertia,
            effective_radius,
            position,
            min_speed,
            angle: 0.0,
            angular_velocity: min_speed / effective_radius,
            hub_velocity: Vec2::new(min_speed, 0.0),
            input_torque: 0.0,
            reaction_torque: 0.0,
            external_torque: 0.0,
            direction: WheelDirection::Forward,
        }
    }

    pub fn direction(&self) -> WheelDirection {
        self.direction
    }

    /// Flip the held direction unconditionally and reset to the standstill
    /// floor on the new side.
    pub fn change_direction(&mut self, direction: WheelDirection) {
        self.direction = direction;
        self.hub_velocity.x = direction.sign() * self.min_speed;
        self.angular_velocity = direction.sign() * self.min_speed / self.effective_radius;
    }

    /// Change direction only when the wheel sits at the standstill floor.
    /// Returns whether the change happened.
    pub fn try_change_direction(&mut self, direction: WheelDirection) -> bool {
        if !self.at_standstill() {
            return false;
        }
        self.change_direction(direction);
        true
    }

    /// Both the hub and the tread are at the floor speed.
    pub fn at_standstill(&self) -> bool {
        let tread = self.angular_velocity * self.effective_radius;
        approx(self.hub_velocity.x.abs(), self.min_speed) && approx(tread.abs(), self.min_speed)
    }

    /// Advance the wheel by one step.
    ///
    /// `external_inertia` is the rotating mass the drivetrain couples to this
    /// wheel and `torque` the drivetrain torque delivered to it.
    pub fn update(
        &mut self,
        velocity_cog: Vec2,
        yaw_velocity: f32,
        external_inertia: f32,
        torque: f32,
        dt: f32,
    ) {
        self.hub_velocity = translate_velocity(velocity_cog, yaw_velocity, self.position);
        let sign = self.direction.sign();
        let floored = self.hub_velocity.x * sign <= self.min_speed;
        if floored {
            self.hub_velocity.x = sign * self.min_speed;
        }

        self.input_torque = torque;
        let total = torque + self.reaction_torque + self.external_torque;
        let acceleration = finite_or_zero(total / (external_inertia + self.inertia));
        self.angular_velocity += integrate(acceleration, dt);

        let floor = if floored {
            self.min_speed / self.effective_radius
        } else {
            0.0
        };
        self.angular_velocity = match self.direction {
            WheelDirection::Forward => self.angular_velocity.max(floor),
            WheelDirection::Reverse => self.angular_velocity.min(-floor),
        };
    }

    pub fn slip(&self) -> Slip {
        Slip {
            ratio: slip_ratio(self.hub_velocity, self.angular_velocity, self.effective_radius),
            angle: slip_angle(self.hub_velocity, self.angle),
        }
    }

    /// Tire force in the wheel frame. Stores the resulting reaction torque,
    /// which feeds into the next [`Wheel::update`].
    pub fn force(&mut self, model: &TireModel, normal_force: f32, friction_coefficient: f32) -> Vec2 {
        let slip = self.slip();
        let force = model.force(normal_force, slip.ratio, slip.angle, friction_coefficient);
        self.reaction_torque = -force.x * self.effective_radius;
        force
    }
}

/// Velocity of a point at `position` on a rigid body moving with
/// `velocity_cog` and yawing at `yaw_velocity`.
pub fn translate_velocity(velocity_cog: Vec2, yaw_velocity: f32, position: Vec2) -> Vec2 {
    Vec2::new(
        velocity_cog.x - yaw_velocity * position.y,
        velocity_cog.y + yaw_velocity * position.x,
    )
}

pub fn slip_ratio(hub_velocity: Vec2, angular_velocity: AngularVelocity, radius: f32) -> f32 {
    let tread = angular_velocity * radius;
    finite_or_zero((hub_velocity.x - tread) / hub_velocity.x.abs().max(tread.abs()))
}

pub fn slip_angle(hub_velocity: Vec2, steer_angle: f32) -> f32 {
    finite_or_zero((hub_velocity.y / hub_velocity.x).atan() - steer_angle)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}
