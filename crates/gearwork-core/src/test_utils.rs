//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so other crates
//! reach them through the `test-utils` feature.

use crate::clutch::Clutch;
use crate::differential::{DiffType, Differential};
use crate::engine::Engine;
use crate::gearbox::Gearbox;
use crate::graph::DrivetrainGraph;
use crate::id::NodeId;
use crate::math::Vec2;
use crate::table::Table;
use crate::tire::TireModel;
use crate::wheel::Wheel;

// ===========================================================================
// Components
// ===========================================================================

pub const MAX_ANGULAR_VELOCITY: f32 = 628.318_5;
pub const MAX_TORQUE: f32 = 150.0;
pub const MIN_SPEED: f32 = 0.01;

/// Vehicle mass used by the fixtures, kg.
pub const MASS: f32 = 1580.0;
pub const GRAVITY: f32 = 9.806;

/// Static load on one wheel of a four-wheel vehicle.
pub fn wheel_load() -> f32 {
    MASS * GRAVITY / 4.0
}

/// Torque curve of a small petrol engine: drag at closed throttle, a
/// 150 Nm peak at 3000 rpm and a 6000 rpm red line.
pub fn test_torque_map() -> Table {
    let speeds = [
        0.0, 52.359_88, 52.359_88, 104.719_76, 157.079_63, 209.439_51, 261.799_39, 314.159_27,
        366.519_14, 418.879_02, 471.238_9, 523.598_8, 575.958_65, 628.318_5,
    ];
    let closed = [
        -50.0, -53.141_6, -53.141_6, -56.283_2, -59.424_78, -62.566_37, -65.707_96, -68.849_56,
        -71.991_15, -75.132_74, -78.274_33, -81.415_93, -84.557_52, -87.699_11,
    ];
    let open = [
        -50.0, -53.141_6, 15.0, 60.0, 90.0, 120.0, 142.5, 150.0, 148.5, 139.5, 127.5, 112.5, 90.0,
        60.0,
    ];

    let y = speeds.iter().map(|s| s / MAX_ANGULAR_VELOCITY).collect();
    let z = [closed, open]
        .iter()
        .map(|row| row.iter().map(|t| t / MAX_TORQUE).collect())
        .collect();
    match Table::new(vec![0.0, 1.0], y, z) {
        Ok(table) => table,
        Err(err) => panic!("test torque map is malformed: {err}"),
    }
}

/// The test engine, stopped.
pub fn test_engine() -> Engine {
    Engine::new(test_torque_map(), 0.5, MAX_ANGULAR_VELOCITY, MAX_TORQUE)
}

/// Six forward gears and reverse, in neutral.
pub fn test_gearbox() -> Gearbox {
    match Gearbox::new(
        vec![-3.6, 3.2, 2.31, 1.82, 1.52, 1.3, 1.0],
        vec![0.3, 0.2, 0.18, 0.16, 0.15, 0.14, 0.1],
    ) {
        Ok(gearbox) => gearbox,
        Err(err) => panic!("test gearbox is malformed: {err}"),
    }
}

/// A clutch holding 400 Nm, slipping at 300 Nm, fully engaged.
pub fn test_clutch() -> Clutch {
    let mut clutch = Clutch::with_torque(400.0, 300.0);
    clutch.engage(1.0);
    clutch
}

pub fn test_wheel(position: Vec2) -> Wheel {
    Wheel::new(0.6, 0.344, position, MIN_SPEED)
}

pub fn test_tire_model() -> TireModel {
    TireModel::default()
}

// ===========================================================================
// Drivetrains
// ===========================================================================

/// Handles into a rear-wheel-drive drivetrain built by [`rwd_drivetrain`].
#[derive(Debug)]
pub struct Drivetrain {
    pub graph: DrivetrainGraph,
    pub engine: NodeId,
    pub clutch: NodeId,
    pub gearbox: NodeId,
    pub differential: NodeId,
    pub left: NodeId,
    pub right: NodeId,
}

/// engine → clutch → gearbox (neutral) → differential → two rear wheels.
pub fn rwd_drivetrain(diff_type: DiffType) -> Drivetrain {
    let mut graph = DrivetrainGraph::new();
    let engine = graph.add(test_engine());
    let clutch = graph.add(test_clutch());
    let gearbox = graph.add(test_gearbox());
    let differential = graph.add(Differential::new(2.4, 0.18, diff_type));
    let left = graph.add(test_wheel(Vec2::new(-1.4, 0.74)));
    let right = graph.add(test_wheel(Vec2::new(-1.4, -0.74)));

    let wired = graph
        .link(engine, clutch)
        .and_then(|_| graph.link(clutch, gearbox))
        .and_then(|_| graph.link(gearbox, differential))
        .and_then(|_| graph.link_left(differential, left))
        .and_then(|_| graph.link_right(differential, right));
    if let Err(err) = wired {
        panic!("test drivetrain failed to link: {err}");
    }

    Drivetrain {
        graph,
        engine,
        clutch,
        gearbox,
        differential,
        left,
        right,
    }
}
