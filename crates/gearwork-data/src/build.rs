//! Resolve a [`VehicleData`] description into a ready [`Vehicle`].

use crate::loader::{DataLoadError, load_vehicle_data};
use crate::schema::{
    BodyData, BrakeData, CaliperData, EngineData, GearboxData, VehicleData,
};
use gearwork_chassis::body::{Body, Cog};
use gearwork_chassis::brake::{BrakeDisc, BrakeSystem, Caliper, Cylinder, MasterCylinder};
use gearwork_chassis::vehicle::{
    DriveLayout, Vehicle, VehicleError, VehicleParams, VehicleParts, WheelSpec,
};
use gearwork_core::clutch::Clutch;
use gearwork_core::differential::{DiffType, Differential};
use gearwork_core::engine::{Engine, RevLimiter};
use gearwork_core::gearbox::Gearbox;
use gearwork_core::math::rpm_to_rads;
use gearwork_core::table::Table;
use std::path::Path;

/// Rev limiter window used when a description leaves it out, in rpm below
/// the red line.
const LIMITER_ACTIVATION_MARGIN: f32 = 200.0;
const LIMITER_DEACTIVATION_MARGIN: f32 = 500.0;

/// Load and build the vehicle described by the file at `path`.
pub fn load_vehicle(path: &Path) -> Result<Vehicle, DataLoadError> {
    build_vehicle(&load_vehicle_data(path)?)
}

pub fn build_vehicle(data: &VehicleData) -> Result<Vehicle, DataLoadError> {
    require_positive("mass", data.mass)?;
    require_positive("yaw_inertia", data.yaw_inertia)?;
    require_positive("wheels.radius", data.wheels.radius)?;
    require_positive("wheels.inertia", data.wheels.inertia)?;
    require_positive("wheels.min_speed", data.wheels.min_speed)?;
    require_positive("clutch.max_static_torque", data.clutch.max_static_torque)?;
    require_positive("clutch.max_kinetic_torque", data.clutch.max_kinetic_torque)?;

    let layout = parse_layout(&data.layout)?;
    let engine = build_engine(&data.engine)?;
    let rev_limiter = build_rev_limiter(&data.engine)?;
    let differential = Differential::new(
        data.differential.ratio,
        data.differential.inertia,
        parse_differential(&data.differential.kind)?,
    );
    let (body, cog) = build_body(&data.body)?;

    let parts = VehicleParts {
        engine,
        rev_limiter,
        clutch: Clutch::with_torque(data.clutch.max_static_torque, data.clutch.max_kinetic_torque),
        gearbox: build_gearbox(&data.gearbox)?,
        differential,
        layout,
        wheel: WheelSpec {
            inertia: data.wheels.inertia,
            radius: data.wheels.radius,
            min_speed: data.wheels.min_speed,
        },
        tire_model: data.tire,
        body,
        cog,
        brakes: build_brakes(&data.brakes)?,
        abs: data.abs,
        params: VehicleParams {
            mass: data.mass,
            gravity: data.environment.gravity,
            air_density: data.environment.air_density,
            yaw_inertia: data.yaw_inertia,
            friction_coefficient: data.environment.friction_coefficient,
            idle_velocity: rpm_to_rads(data.engine.idle_rpm),
        },
    };
    Ok(Vehicle::new(parts)?)
}

fn require_positive(field: &str, value: f32) -> Result<(), DataLoadError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(DataLoadError::Invalid(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

pub fn parse_layout(layout: &str) -> Result<DriveLayout, DataLoadError> {
    match layout {
        "rear_wheel_drive" => Ok(DriveLayout::RearWheelDrive),
        "front_wheel_drive" => Ok(DriveLayout::FrontWheelDrive),
        other => Err(DataLoadError::Invalid(format!(
            "unknown drivetrain layout '{other}'"
        ))),
    }
}

pub fn parse_differential(kind: &str) -> Result<DiffType, DataLoadError> {
    match kind {
        "open" => Ok(DiffType::Open),
        "locked" => Ok(DiffType::Locked),
        other => Err(DataLoadError::Invalid(format!(
            "unknown differential kind '{other}'"
        ))),
    }
}

// ===========================================================================
// Drivetrain
// ===========================================================================

/// Normalise the torque curve against the red line and peak torque.
fn build_engine(data: &EngineData) -> Result<Engine, DataLoadError> {
    require_positive("engine.max_rpm", data.max_rpm)?;
    require_positive("engine.max_torque", data.max_torque)?;
    require_positive("engine.inertia", data.inertia)?;

    let max_angular_velocity = rpm_to_rads(data.max_rpm);
    let curve = &data.torque_curve;
    let speeds = curve
        .rpm
        .iter()
        .map(|&rpm| rpm_to_rads(rpm) / max_angular_velocity)
        .collect();
    let scale = |row: &[f32]| row.iter().map(|t| t / data.max_torque).collect();
    let map = Table::new(
        vec![0.0, 1.0],
        speeds,
        vec![scale(&curve.closed_throttle), scale(&curve.wide_open_throttle)],
    )?;

    Ok(Engine::new(
        map,
        data.inertia,
        max_angular_velocity,
        data.max_torque,
    ))
}

fn build_rev_limiter(data: &EngineData) -> Result<RevLimiter, DataLoadError> {
    let (activation, deactivation) = match data.rev_limiter {
        Some(limiter) => (limiter.activation_rpm, limiter.deactivation_rpm),
        None => (
            data.max_rpm - LIMITER_ACTIVATION_MARGIN,
            data.max_rpm - LIMITER_DEACTIVATION_MARGIN,
        ),
    };
    if deactivation >= activation {
        return Err(DataLoadError::Invalid(format!(
            "rev limiter releases at {deactivation} rpm, at or above its {activation} rpm cut"
        )));
    }
    Ok(RevLimiter::new(rpm_to_rads(activation), rpm_to_rads(deactivation)))
}

/// Reverse goes first in the gear tables, stored with a negative ratio.
fn build_gearbox(data: &GearboxData) -> Result<Gearbox, DataLoadError> {
    let ratios = std::iter::once(-data.reverse.ratio.abs())
        .chain(data.gears.iter().map(|g| g.ratio))
        .collect();
    let inertias = std::iter::once(data.reverse.inertia)
        .chain(data.gears.iter().map(|g| g.inertia))
        .collect();
    Ok(Gearbox::new(ratios, inertias)?)
}

// ===========================================================================
// Chassis
// ===========================================================================

fn build_body(data: &BodyData) -> Result<(Body, Cog), DataLoadError> {
    require_positive("body.wheelbase", data.wheelbase)?;
    let body = Body::new(
        data.drag_coefficient,
        data.frontal_area,
        data.wheelbase,
        data.front_track_width,
        data.rear_track_width,
    );
    let cog = Cog::from_distribution(data.front_weight_ratio, data.cog_height, data.wheelbase)
        .map_err(VehicleError::from)?;
    Ok((body, cog))
}

fn build_caliper(data: &CaliperData) -> Result<Caliper, DataLoadError> {
    let cylinder = Cylinder::from_diameter(data.piston_diameter);
    Ok(Caliper::new(cylinder, data.effective_radius, data.pads).map_err(VehicleError::from)?)
}

fn build_brakes(data: &BrakeData) -> Result<BrakeSystem, DataLoadError> {
    let master_cylinder =
        MasterCylinder::new(data.max_pressure, data.front_ratio).map_err(VehicleError::from)?;
    Ok(BrakeSystem {
        master_cylinder,
        disc: BrakeDisc::new(data.disc_static_friction, data.disc_kinetic_friction),
        front_caliper: build_caliper(&data.front)?,
        rear_caliper: build_caliper(&data.rear)?,
    })
}
