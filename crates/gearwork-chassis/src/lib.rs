//! Gearwork Chassis -- the vehicle around a drivetrain.
//!
//! [`vehicle::Vehicle`] is a reference fixed-timestep loop: it owns a
//! four-wheel [`gearwork_core::graph::DrivetrainGraph`], applies brakes and
//! steering, evaluates tire forces under a static load split and integrates
//! a planar rigid body. Every step returns a [`vehicle::TickReport`] with the
//! drained drivetrain events and a [`telemetry::Telemetry`] snapshot.
//!
//! The supporting models are usable on their own:
//!
//! - [`body`] -- centre of gravity, wheel placement, aerodynamic drag.
//! - [`brake`] -- master cylinder, calipers, discs and brake torque.
//! - [`assists`] -- anti-lock braking.

pub mod assists;
pub mod body;
pub mod brake;
pub mod telemetry;
pub mod vehicle;
