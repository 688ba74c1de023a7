//! Hydraulic brakes: master cylinder, calipers and discs.

use gearwork_core::math::{EPSILON, signum};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BrakeError {
    #[error("a caliper needs pads on both sides of the disc, got {0} pads")]
    OddPadCount(u8),
    #[error("front brake ratio must be within [0, 1], got {0}")]
    RatioOutOfRange(f32),
}

/// A hydraulic piston bore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// m².
    pub area: f32,
}

impl Cylinder {
    pub fn from_diameter(diameter: f32) -> Self {
        Self {
            area: PI * 0.25 * diameter * diameter,
        }
    }

    pub fn force_to_pressure(&self, force: f32) -> f32 {
        force / self.area
    }

    pub fn pressure_to_force(&self, pressure: f32) -> f32 {
        pressure * self.area
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasterCylinder {
    /// Pa at full pedal.
    pub max_pressure: f32,
    /// Share of the pressure sent to the front circuit.
    pub front_ratio: f32,
}

impl MasterCylinder {
    pub fn new(max_pressure: f32, front_ratio: f32) -> Result<Self, BrakeError> {
        if !(0.0..=1.0).contains(&front_ratio) {
            return Err(BrakeError::RatioOutOfRange(front_ratio));
        }
        Ok(Self {
            max_pressure,
            front_ratio,
        })
    }

    /// Split `pressure` into `(front, rear)` circuit pressures.
    pub fn pressure(&self, pressure: f32) -> (f32, f32) {
        let front = self.front_ratio * pressure;
        (front, pressure - front)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrakeDisc {
    pub static_friction: f32,
    pub kinetic_friction: f32,
}

impl BrakeDisc {
    pub fn new(static_friction: f32, kinetic_friction: f32) -> Self {
        Self {
            static_friction,
            kinetic_friction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Caliper {
    pub cylinder: Cylinder,
    /// Pad radius measured from the disc centre.
    pub effective_radius: f32,
    num_pads: u8,
}

impl Caliper {
    /// `num_pads` counts both sides of the disc and must be even.
    pub fn new(cylinder: Cylinder, effective_radius: f32, num_pads: u8) -> Result<Self, BrakeError> {
        if num_pads % 2 != 0 {
            return Err(BrakeError::OddPadCount(num_pads));
        }
        Ok(Self {
            cylinder,
            effective_radius,
            num_pads,
        })
    }

    pub fn num_pads(&self) -> u8 {
        self.num_pads
    }
}

/// Braking torque on a wheel turning at `angular_velocity`, always opposing
/// the rotation.
///
/// Static friction applies while the disc is effectively still. The wheel's
/// standstill floor keeps the disc from ever being exactly still, so no
/// stick state is tracked here.
pub fn brake_torque(disc: &BrakeDisc, caliper: &Caliper, pressure: f32, angular_velocity: f32) -> f32 {
    let normal_force = caliper.cylinder.pressure_to_force(pressure);
    let friction = if angular_velocity.abs() < EPSILON {
        disc.static_friction
    } else {
        disc.kinetic_friction
    };
    normal_force * friction * caliper.effective_radius * f32::from(caliper.num_pads)
        * -signum(angular_velocity)
}

/// Everything needed to turn pedal travel into wheel torque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrakeSystem {
    pub master_cylinder: MasterCylinder,
    pub disc: BrakeDisc,
    pub front_caliper: Caliper,
    pub rear_caliper: Caliper,
}

impl BrakeSystem {
    /// `(front, rear)` circuit pressures for a pedal position in `[0, 1]`.
    pub fn circuit_pressures(&self, pedal: f32) -> (f32, f32) {
        let pressure = self.master_cylinder.max_pressure * pedal.clamp(0.0, 1.0);
        self.master_cylinder.pressure(pressure)
    }
}
