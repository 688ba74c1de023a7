//! Reference fixed-timestep vehicle loop.
//!
//! A [`Vehicle`] owns a four-wheel drivetrain graph and advances it one step
//! at a time from a [`ControlInput`]. Each step runs the two-phase tick of
//! the drivetrain and integrates a planar rigid body on top of it:
//!
//! 1. Controls: gear, clutch pedal, steering, travel direction and
//!    ABS-filtered brake torque on every wheel.
//! 2. Engine torque: rev limiter, torque map, idle control.
//! 3. Torque pass from every system root.
//! 4. Tire forces from the static load on each wheel, rotated into the body
//!    frame and summed with aerodynamic drag.
//! 5. Body velocity and yaw rate integration.
//! 6. Velocity pass from every system root.

use crate::assists::Abs;
use crate::body::{Body, BodyError, Cog};
use crate::brake::{BrakeError, BrakeSystem, brake_torque};
use crate::telemetry::{Telemetry, WheelTelemetry};
use gearwork_core::clutch::Clutch;
use gearwork_core::differential::Differential;
use gearwork_core::engine::{Engine, RevLimiter};
use gearwork_core::event::DrivetrainEvent;
use gearwork_core::gearbox::Gearbox;
use gearwork_core::graph::{DrivetrainGraph, GraphError, Velocities};
use gearwork_core::id::NodeId;
use gearwork_core::math::{Vec2, rads_to_rpm, rpm_to_rads};
use gearwork_core::system::PowertrainSystem;
use gearwork_core::tire::TireModel;
use gearwork_core::wheel::{Wheel, WheelDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    #[error("drivetrain graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("body error: {0}")]
    Body(#[from] BodyError),
    #[error("brake error: {0}")]
    Brake(#[from] BrakeError),
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which axle the differential drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveLayout {
    #[default]
    RearWheelDrive,
    FrontWheelDrive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelSlot {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelSlot {
    pub const ALL: [WheelSlot; 4] = [
        WheelSlot::FrontLeft,
        WheelSlot::FrontRight,
        WheelSlot::RearLeft,
        WheelSlot::RearRight,
    ];

    pub fn index(self) -> usize {
        match self {
            WheelSlot::FrontLeft => 0,
            WheelSlot::FrontRight => 1,
            WheelSlot::RearLeft => 2,
            WheelSlot::RearRight => 3,
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelSlot::FrontLeft | WheelSlot::FrontRight)
    }
}

// ---------------------------------------------------------------------------
// Construction parameters
// ---------------------------------------------------------------------------

/// Shared by all four wheels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelSpec {
    pub inertia: f32,
    pub radius: f32,
    /// Standstill floor, m/s.
    pub min_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// kg.
    pub mass: f32,
    pub gravity: f32,
    /// kg/m³.
    pub air_density: f32,
    /// Moment of inertia about the vertical axis, kg·m².
    pub yaw_inertia: f32,
    /// Road friction coefficient.
    pub friction_coefficient: f32,
    /// Engine speed held by idle control while decoupled, rad/s.
    pub idle_velocity: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass: 1580.0,
            gravity: 9.806,
            air_density: 1.2041,
            yaw_inertia: 2500.0,
            friction_coefficient: 1.0,
            idle_velocity: rpm_to_rads(900.0),
        }
    }
}

/// Everything [`Vehicle::new`] assembles into a vehicle.
#[derive(Debug, Clone)]
pub struct VehicleParts {
    pub engine: Engine,
    pub rev_limiter: RevLimiter,
    pub clutch: Clutch,
    pub gearbox: Gearbox,
    pub differential: Differential,
    pub layout: DriveLayout,
    pub wheel: WheelSpec,
    pub tire_model: TireModel,
    pub body: Body,
    pub cog: Cog,
    pub brakes: BrakeSystem,
    pub abs: Abs,
    pub params: VehicleParams,
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    Hold,
    Up,
    Down,
    /// Select a gear directly; `0` is neutral, `-1` reverse.
    Gear(i32),
}

/// Driver inputs for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// `[0, 1]`.
    pub throttle: f32,
    /// Brake pedal, `[0, 1]`.
    pub brake: f32,
    /// Clutch engagement, `1.0` with the pedal released.
    pub clutch: f32,
    /// Front wheel steer angle, radians, positive to the left.
    pub steering: f32,
    pub shift: Shift,
    /// Requested travel direction. Only honoured at standstill.
    pub direction: Option<WheelDirection>,
}

impl Default for ControlInput {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            brake: 0.0,
            clutch: 1.0,
            steering: 0.0,
            shift: Shift::Hold,
            direction: None,
        }
    }
}

/// Outcome of one [`Vehicle::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<DrivetrainEvent>,
    pub telemetry: Telemetry,
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Vehicle {
    graph: DrivetrainGraph,
    system: PowertrainSystem,
    engine: NodeId,
    clutch: NodeId,
    gearbox: NodeId,
    differential: NodeId,
    /// Indexed by [`WheelSlot::index`].
    wheels: [NodeId; 4],
    normal_forces: [f32; 4],
    layout: DriveLayout,
    tire_model: TireModel,
    body: Body,
    cog: Cog,
    brakes: BrakeSystem,
    abs: Abs,
    rev_limiter: RevLimiter,
    params: VehicleParams,
    velocity: Vec2,
    yaw_velocity: f32,
    tick: u64,
    time: f32,
}

impl Vehicle {
    /// Wire the drivetrain and place the vehicle at rest with the engine
    /// idling, in neutral.
    pub fn new(parts: VehicleParts) -> Result<Self, VehicleError> {
        let VehicleParts {
            mut engine,
            rev_limiter,
            clutch,
            gearbox,
            differential,
            layout,
            wheel,
            tire_model,
            body,
            cog,
            brakes,
            abs,
            params,
        } = parts;

        engine.set_angular_velocity(params.idle_velocity);
        let positions = body.wheel_positions(&cog);

        let mut graph = DrivetrainGraph::new();
        let engine = graph.add(engine);
        let clutch = graph.add(clutch);
        let gearbox = graph.add(gearbox);
        let differential = graph.add(differential);
        let wheels = [
            positions.front_left,
            positions.front_right,
            positions.rear_left,
            positions.rear_right,
        ]
        .map(|position| {
            graph.add(Wheel::new(
                wheel.inertia,
                wheel.radius,
                position,
                wheel.min_speed,
            ))
        });

        let (driven, undriven) = match layout {
            DriveLayout::RearWheelDrive => ([wheels[2], wheels[3]], [wheels[0], wheels[1]]),
            DriveLayout::FrontWheelDrive => ([wheels[0], wheels[1]], [wheels[2], wheels[3]]),
        };
        graph.link(engine, clutch)?;
        graph.link(clutch, gearbox)?;
        graph.link(gearbox, differential)?;
        graph.link_left(differential, driven[0])?;
        graph.link_right(differential, driven[1])?;

        let system = PowertrainSystem::new(vec![engine, undriven[0], undriven[1]]);

        let weight = params.mass * params.gravity;
        let front = cog.front_load_fraction(body.wheelbase);
        let front_wheel = weight * front * 0.5;
        let rear_wheel = weight * (1.0 - front) * 0.5;

        Ok(Self {
            graph,
            system,
            engine,
            clutch,
            gearbox,
            differential,
            wheels,
            normal_forces: [front_wheel, front_wheel, rear_wheel, rear_wheel],
            layout,
            tire_model,
            body,
            cog,
            brakes,
            abs,
            rev_limiter,
            params,
            velocity: Vec2::ZERO,
            yaw_velocity: 0.0,
            tick: 0,
            time: 0.0,
        })
    }

    /// Advance the vehicle by `dt` seconds.
    pub fn step(&mut self, input: &ControlInput, dt: f32) -> Result<TickReport, VehicleError> {
        self.apply_controls(input)?;
        self.apply_brakes(input.brake);

        let (throttle, engine_torque, mut events) = self.engine_torque(input.throttle, dt);

        let velocities = Velocities {
            velocity_cog: self.velocity,
            yaw_velocity: self.yaw_velocity,
        };
        for &root in self.system.roots() {
            let torque = if root == self.engine { engine_torque } else { 0.0 };
            self.graph.send_torque(root, torque, velocities, dt);
        }

        let forces = self.tire_forces();
        self.integrate_body(&forces, dt);
        self.system.update(&mut self.graph);

        self.tick += 1;
        self.time += dt;

        let mut drained = self.graph.take_events();
        drained.append(&mut events);
        Ok(TickReport {
            events: drained,
            telemetry: self.telemetry(&forces, engine_torque, throttle),
        })
    }

    fn apply_controls(&mut self, input: &ControlInput) -> Result<(), VehicleError> {
        match input.shift {
            Shift::Hold => {}
            Shift::Up => {
                self.graph.upshift(self.gearbox)?;
            }
            Shift::Down => {
                self.graph.downshift(self.gearbox)?;
            }
            Shift::Gear(gear) => {
                self.graph.shift(self.gearbox, gear)?;
            }
        }

        // In neutral the gearbox input shaft spins free and loads the clutch
        // with nothing.
        let engagement = if self.gear() == 0 { 0.0 } else { input.clutch };
        if let Some(clutch) = self.graph.clutch_mut(self.clutch) {
            clutch.engage(engagement);
        }

        if let Some(direction) = input.direction
            && self.at_standstill()
        {
            for wheel in self.wheels {
                self.graph.try_change_wheel_direction(wheel, direction)?;
            }
        }

        for slot in [WheelSlot::FrontLeft, WheelSlot::FrontRight] {
            if let Some(wheel) = self.graph.wheel_mut(self.wheels[slot.index()]) {
                wheel.angle = input.steering;
            }
        }
        Ok(())
    }

    fn apply_brakes(&mut self, pedal: f32) {
        let (front, rear) = self.brakes.circuit_pressures(pedal);
        let speed = self.velocity.x;
        for slot in WheelSlot::ALL {
            let (pressure, caliper) = if slot.is_front() {
                (front, &self.brakes.front_caliper)
            } else {
                (rear, &self.brakes.rear_caliper)
            };
            let Some(wheel) = self.graph.wheel_mut(self.wheels[slot.index()]) else {
                continue;
            };
            let pressure = self.abs.pressure(pressure, speed, wheel.slip().ratio);
            wheel.external_torque =
                brake_torque(&self.brakes.disc, caliper, pressure, wheel.angular_velocity);
        }
    }

    /// Returns the throttle after the rev limiter, the engine torque and any
    /// limiter transition.
    fn engine_torque(&mut self, throttle: f32, dt: f32) -> (f32, f32, Vec<DrivetrainEvent>) {
        let mut events = Vec::new();
        let decoupled = self.graph.is_decoupled(self.engine);
        let Some(engine) = self.graph.engine(self.engine) else {
            return (0.0, 0.0, events);
        };

        let was_active = self.rev_limiter.is_active();
        let throttle = self.rev_limiter.limit(engine.angular_velocity, throttle.clamp(0.0, 1.0));
        match (was_active, self.rev_limiter.is_active()) {
            (false, true) => events.push(DrivetrainEvent::RevLimiterEngaged),
            (true, false) => events.push(DrivetrainEvent::RevLimiterReleased),
            _ => {}
        }

        let torque = engine.idle_torque(
            self.params.idle_velocity,
            engine.torque(throttle),
            decoupled,
            dt,
        );
        (throttle, torque, events)
    }

    /// Body-frame tire force of every wheel.
    fn tire_forces(&mut self) -> [Vec2; 4] {
        let mut forces = [Vec2::ZERO; 4];
        for slot in WheelSlot::ALL {
            let i = slot.index();
            if let Some(wheel) = self.graph.wheel_mut(self.wheels[i]) {
                let force = wheel.force(
                    &self.tire_model,
                    self.normal_forces[i],
                    self.params.friction_coefficient,
                );
                forces[i] = force.rotate(wheel.angle);
            }
        }
        forces
    }

    fn integrate_body(&mut self, forces: &[Vec2; 4], dt: f32) {
        let mut total = Vec2::new(
            self.body
                .air_resistance(self.params.air_density, self.velocity.x),
            0.0,
        );
        let mut yaw_torque = 0.0;
        for slot in WheelSlot::ALL {
            let i = slot.index();
            let force = forces[i];
            total += force;
            if let Some(wheel) = self.graph.wheel(self.wheels[i]) {
                yaw_torque += wheel.position.x * force.y - wheel.position.y * force.x;
            }
        }

        self.velocity += total * (dt / self.params.mass);
        self.yaw_velocity += yaw_torque / self.params.yaw_inertia * dt;

        // The body never rolls against the travel direction the wheels hold.
        match self.direction() {
            WheelDirection::Forward => self.velocity.x = self.velocity.x.max(0.0),
            WheelDirection::Reverse => self.velocity.x = self.velocity.x.min(0.0),
        }
    }

    fn telemetry(&self, forces: &[Vec2; 4], engine_torque: f32, throttle: f32) -> Telemetry {
        let wheels = std::array::from_fn(|i| {
            self.graph
                .wheel(self.wheels[i])
                .map(|w| WheelTelemetry::new(w, self.normal_forces[i], forces[i]))
                .unwrap_or_default()
        });
        Telemetry {
            tick: self.tick,
            time: self.time,
            velocity: self.velocity,
            yaw_velocity: self.yaw_velocity,
            engine_rpm: rads_to_rpm(self.engine_angular_velocity()),
            engine_torque,
            throttle,
            gear: self.gear(),
            clutch_locked: self.graph.clutch(self.clutch).is_some_and(Clutch::is_locked),
            wheels,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &DrivetrainGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DrivetrainGraph {
        &mut self.graph
    }

    pub fn system(&self) -> &PowertrainSystem {
        &self.system
    }

    pub fn engine(&self) -> NodeId {
        self.engine
    }

    pub fn clutch(&self) -> NodeId {
        self.clutch
    }

    pub fn gearbox(&self) -> NodeId {
        self.gearbox
    }

    pub fn differential(&self) -> NodeId {
        self.differential
    }

    pub fn wheel(&self, slot: WheelSlot) -> NodeId {
        self.wheels[slot.index()]
    }

    pub fn layout(&self) -> DriveLayout {
        self.layout
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn cog(&self) -> &Cog {
        &self.cog
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Static load on a wheel, N.
    pub fn normal_force(&self, slot: WheelSlot) -> f32 {
        self.normal_forces[slot.index()]
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn yaw_velocity(&self) -> f32 {
        self.yaw_velocity
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn engine_angular_velocity(&self) -> f32 {
        self.graph.angular_velocity(self.engine)
    }

    /// Currently selected gear; `0` is neutral.
    pub fn gear(&self) -> i32 {
        self.graph.gearbox(self.gearbox).map_or(0, Gearbox::gear)
    }

    /// Travel direction held by the wheels.
    pub fn direction(&self) -> WheelDirection {
        self.graph
            .wheel(self.wheels[0])
            .map_or(WheelDirection::Forward, Wheel::direction)
    }

    /// Every wheel sits at its standstill floor.
    pub fn at_standstill(&self) -> bool {
        self.wheels
            .iter()
            .all(|&w| self.graph.wheel(w).is_some_and(Wheel::at_standstill))
    }
}
