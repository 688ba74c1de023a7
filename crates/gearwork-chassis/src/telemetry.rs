//! Per-tick snapshot of the vehicle state.
//!
//! Everything here is plain serde data so a host can stream it to disk or a
//! plotting tool in whatever format it likes.

use gearwork_core::math::Vec2;
use gearwork_core::wheel::{Slip, Wheel, WheelDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelTelemetry {
    pub angular_velocity: f32,
    pub hub_velocity: Vec2,
    /// Steer angle, radians.
    pub angle: f32,
    pub direction: WheelDirection,
    pub input_torque: f32,
    pub reaction_torque: f32,
    pub external_torque: f32,
    pub slip: Slip,
    pub normal_force: f32,
    /// Tire force in the body frame.
    pub force: Vec2,
}

impl WheelTelemetry {
    pub fn new(wheel: &Wheel, normal_force: f32, force: Vec2) -> Self {
        Self {
            angular_velocity: wheel.angular_velocity,
            hub_velocity: wheel.hub_velocity,
            angle: wheel.angle,
            direction: wheel.direction(),
            input_torque: wheel.input_torque,
            reaction_torque: wheel.reaction_torque,
            external_torque: wheel.external_torque,
            slip: wheel.slip(),
            normal_force,
            force,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub tick: u64,
    /// Simulated seconds since the vehicle was built.
    pub time: f32,
    /// Body-frame velocity of the centre of gravity.
    pub velocity: Vec2,
    pub yaw_velocity: f32,
    pub engine_rpm: f32,
    /// Torque the engine was asked to produce this tick.
    pub engine_torque: f32,
    /// Throttle after the rev limiter.
    pub throttle: f32,
    pub gear: i32,
    pub clutch_locked: bool,
    /// Front left, front right, rear left, rear right.
    pub wheels: [WheelTelemetry; 4],
}

impl Telemetry {
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
