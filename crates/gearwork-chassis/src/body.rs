//! Vehicle body: centre of gravity, wheel placement and aerodynamic drag.

use gearwork_core::math::{Vec2, signum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    #[error("front weight distribution must be within [0, 1], got {0}")]
    DistributionOutOfRange(f32),
}

/// Centre of gravity measured from the rear axle centre line: `x` forward
/// along the wheelbase, `y` to the left of the centre line, `z` up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cog {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Cog {
    /// Place the centre of gravity between the axles so that the front axle
    /// carries `ratio_front` of the weight.
    pub fn from_distribution(ratio_front: f32, height: f32, wheelbase: f32) -> Result<Self, BodyError> {
        if !(0.0..=1.0).contains(&ratio_front) {
            return Err(BodyError::DistributionOutOfRange(ratio_front));
        }
        Ok(Self {
            x: ratio_front * wheelbase,
            y: 0.0,
            z: height,
        })
    }

    pub fn distance_to_front(&self) -> f32 {
        self.x
    }

    /// Negative: the rear axle is behind the centre of gravity.
    pub fn distance_to_rear(&self, wheelbase: f32) -> f32 {
        self.x - wheelbase
    }

    pub fn distance_to_left(&self, track_width: f32) -> f32 {
        track_width * 0.5 - self.y
    }

    /// Negative: the right side is at negative `y`.
    pub fn distance_to_right(&self, track_width: f32) -> f32 {
        self.y - track_width * 0.5
    }

    /// Share of the static weight carried by the front axle.
    pub fn front_load_fraction(&self, wheelbase: f32) -> f32 {
        self.x / wheelbase
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub c_drag: f32,
    /// m².
    pub frontal_area: f32,
    pub wheelbase: f32,
    pub front_track_width: f32,
    pub rear_track_width: f32,
}

/// Offsets of the four wheels from the centre of gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelPositions {
    pub front_left: Vec2,
    pub front_right: Vec2,
    pub rear_left: Vec2,
    pub rear_right: Vec2,
}

impl Body {
    pub fn new(
        c_drag: f32,
        frontal_area: f32,
        wheelbase: f32,
        front_track_width: f32,
        rear_track_width: f32,
    ) -> Self {
        Self {
            c_drag,
            frontal_area,
            wheelbase,
            front_track_width,
            rear_track_width,
        }
    }

    /// Drag force along the body's x axis, always opposing the motion.
    pub fn air_resistance(&self, air_density: f32, longitudinal_velocity: f32) -> f32 {
        let half_cd_a = 0.5 * self.c_drag * self.frontal_area;
        -(air_density * half_cd_a * longitudinal_velocity * longitudinal_velocity)
            * signum(longitudinal_velocity)
    }

    pub fn wheel_positions(&self, cog: &Cog) -> WheelPositions {
        let front = cog.distance_to_front();
        let rear = cog.distance_to_rear(self.wheelbase);
        WheelPositions {
            front_left: Vec2::new(front, cog.distance_to_left(self.front_track_width)),
            front_right: Vec2::new(front, cog.distance_to_right(self.front_track_width)),
            rear_left: Vec2::new(rear, cog.distance_to_left(self.rear_track_width)),
            rear_right: Vec2::new(rear, cog.distance_to_right(self.rear_track_width)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Body {
        Body::new(0.36, 1.9, 3.6, 1.47, 1.475)
    }

    #[test]
    fn wheels_land_in_their_quadrants() {
        let body = body();
        let cog = Cog::from_distribution(0.55, 0.4, body.wheelbase).unwrap();
        let p = body.wheel_positions(&cog);

        assert!(p.front_left.x > 0.0 && p.front_left.y > 0.0);
        assert!(p.front_right.x > 0.0 && p.front_right.y < 0.0);
        assert!(p.rear_left.x < 0.0 && p.rear_left.y > 0.0);
        assert!(p.rear_right.x < 0.0 && p.rear_right.y < 0.0);
        assert!((p.front_left.x - p.rear_left.x - body.wheelbase).abs() < 1e-6);
    }

    #[test]
    fn distribution_is_validated() {
        assert_eq!(
            Cog::from_distribution(1.2, 0.4, 3.6),
            Err(BodyError::DistributionOutOfRange(1.2))
        );
        let cog = Cog::from_distribution(0.55, 0.4, 3.6).unwrap();
        assert!((cog.front_load_fraction(3.6) - 0.55).abs() < 1e-6);
        assert_eq!(cog.z, 0.4);
    }

    #[test]
    fn drag_opposes_motion_and_grows_quadratically() {
        let body = body();
        let at_10 = body.air_resistance(1.2041, 10.0);
        let at_20 = body.air_resistance(1.2041, 20.0);
        assert!(at_10 < 0.0);
        assert!((at_20 / at_10 - 4.0).abs() < 1e-4);
        assert!(body.air_resistance(1.2041, -10.0) > 0.0);
    }
}
