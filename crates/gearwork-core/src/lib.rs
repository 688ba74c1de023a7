//! Gearwork Core -- drivetrain composition graph and the rotating-component
//! models hosted in it.
//!
//! An engine, clutch, gearbox, differential and wheels are wired into a tree
//! stored in a [`graph::DrivetrainGraph`]. Every node answers the same set of
//! operations, dispatched on the [`component::Component`] enum:
//!
//! - **inertia** -- effective rotational inertia seen from a neighbour,
//!   looking toward the root or toward the leaves.
//! - **angular_velocity** -- current shaft speed.
//! - **send_torque** -- inject torque and push it toward the wheels.
//! - **update_angular_velocity** -- reconcile shaft speeds from the wheels up.
//! - **external_torque** -- tire reaction and brake torque visible past a node.
//!
//! # Two-Phase Tick
//!
//! 1. The vehicle loop writes brake torque onto each wheel and calls
//!    `send_torque` on every drive root. Wheels integrate their spin.
//! 2. Tire forces are evaluated from the new wheel state (this also stores
//!    each wheel's reaction torque for the next tick).
//! 3. [`system::PowertrainSystem::update`] calls `update_angular_velocity`
//!    on every root so upstream shafts follow the wheels.
//!
//! # Key Types
//!
//! - [`graph::DrivetrainGraph`] -- arena of nodes with parent back-links and
//!   cycle-safe linking.
//! - [`tire::TireModel`] -- combined-slip Pacejka curve.
//! - [`clutch::Clutch`] -- stick/slip coupling, pure `torque_out`.
//! - [`table::Table`] -- bilinear lookup used for engine torque maps.
//! - [`event::DrivetrainEvent`] -- state transitions (clutch lock, gear
//!   change, wheel direction).

pub mod clutch;
pub mod component;
pub mod differential;
pub mod engine;
pub mod event;
pub mod gearbox;
pub mod graph;
pub mod id;
pub mod math;
pub mod system;
pub mod table;
pub mod tire;
pub mod wheel;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
