//! Serde structs for on-disk vehicle descriptions.
//!
//! Values are in the units a manufacturer data sheet uses (rpm, Nm, metres,
//! Pa). The builder converts them into the model types and validates anything
//! the type system cannot, such as enum-like strings and positive quantities.

use gearwork_chassis::assists::Abs;
use gearwork_core::tire::TireModel;
use serde::{Deserialize, Serialize};

/// A complete vehicle description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    #[serde(default)]
    pub name: String,
    /// kg.
    pub mass: f32,
    #[serde(default = "default_yaw_inertia")]
    pub yaw_inertia: f32,
    /// `"rear_wheel_drive"` or `"front_wheel_drive"`.
    #[serde(default = "default_layout")]
    pub layout: String,
    pub engine: EngineData,
    pub clutch: ClutchData,
    pub gearbox: GearboxData,
    pub differential: DifferentialData,
    pub wheels: WheelData,
    #[serde(default)]
    pub tire: TireModel,
    pub body: BodyData,
    pub brakes: BrakeData,
    #[serde(default)]
    pub abs: Abs,
    #[serde(default)]
    pub environment: EnvironmentData,
}

fn default_yaw_inertia() -> f32 {
    2500.0
}

fn default_layout() -> String {
    "rear_wheel_drive".to_string()
}

// ===========================================================================
// Drivetrain
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineData {
    pub max_rpm: f32,
    /// Nm. Curve torques are scaled against this.
    pub max_torque: f32,
    pub inertia: f32,
    #[serde(default = "default_idle_rpm")]
    pub idle_rpm: f32,
    /// Defaults to just under `max_rpm`.
    #[serde(default)]
    pub rev_limiter: Option<RevLimiterData>,
    pub torque_curve: TorqueCurveData,
}

fn default_idle_rpm() -> f32 {
    900.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevLimiterData {
    pub activation_rpm: f32,
    pub deactivation_rpm: f32,
}

/// Torque at closed and wide-open throttle sampled at ascending engine
/// speeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueCurveData {
    pub rpm: Vec<f32>,
    pub closed_throttle: Vec<f32>,
    pub wide_open_throttle: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClutchData {
    /// Nm the clutch holds before slipping.
    pub max_static_torque: f32,
    /// Nm transmitted while slipping.
    pub max_kinetic_torque: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearData {
    pub ratio: f32,
    pub inertia: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearboxData {
    /// Ratio is stored negative; a positive value is negated when built.
    pub reverse: GearData,
    /// First gear first.
    pub gears: Vec<GearData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialData {
    pub ratio: f32,
    pub inertia: f32,
    /// `"open"` or `"locked"`.
    #[serde(default = "default_differential_kind")]
    pub kind: String,
}

fn default_differential_kind() -> String {
    "open".to_string()
}

// ===========================================================================
// Chassis
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelData {
    pub inertia: f32,
    pub radius: f32,
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
}

fn default_min_speed() -> f32 {
    0.01
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyData {
    pub drag_coefficient: f32,
    pub frontal_area: f32,
    pub wheelbase: f32,
    pub front_track_width: f32,
    pub rear_track_width: f32,
    /// Share of the weight on the front axle.
    pub front_weight_ratio: f32,
    pub cog_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaliperData {
    pub piston_diameter: f32,
    pub effective_radius: f32,
    #[serde(default = "default_pads")]
    pub pads: u8,
}

fn default_pads() -> u8 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrakeData {
    /// Pa at full pedal.
    pub max_pressure: f32,
    pub front_ratio: f32,
    pub disc_static_friction: f32,
    pub disc_kinetic_friction: f32,
    pub front: CaliperData,
    pub rear: CaliperData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentData {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_air_density")]
    pub air_density: f32,
    #[serde(default = "default_friction")]
    pub friction_coefficient: f32,
}

fn default_gravity() -> f32 {
    9.806
}

fn default_air_density() -> f32 {
    1.2041
}

fn default_friction() -> f32 {
    1.0
}

impl Default for EnvironmentData {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            air_density: default_air_density(),
            friction_coefficient: default_friction(),
        }
    }
}
