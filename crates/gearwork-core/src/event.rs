//! Drivetrain state transitions.
//!
//! Events are only recorded when something changes, never once per tick.
//! The graph buffers the events raised by its own operations until they are
//! drained with [`crate::graph::DrivetrainGraph::take_events`].

use crate::id::NodeId;
use crate::wheel::WheelDirection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivetrainEvent {
    /// A clutch went from slipping to locked.
    ClutchLocked { node: NodeId },
    /// A clutch went from locked to slipping.
    ClutchSlipping { node: NodeId },
    GearChanged { node: NodeId, from: i32, to: i32 },
    WheelDirectionChanged {
        node: NodeId,
        direction: WheelDirection,
    },
    /// The rev limiter cut the throttle.
    RevLimiterEngaged,
    /// The rev limiter restored the throttle.
    RevLimiterReleased,
}
