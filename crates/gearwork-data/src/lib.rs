//! Gearwork Data -- vehicle descriptions on disk.
//!
//! A vehicle is described in a single RON, TOML or JSON file (format picked
//! by extension) matching [`schema::VehicleData`]. [`build::load_vehicle`]
//! reads, validates and assembles it into a ready
//! [`gearwork_chassis::vehicle::Vehicle`].

pub mod build;
pub mod loader;
pub mod schema;

pub use build::{build_vehicle, load_vehicle};
pub use loader::{DataLoadError, Format};
