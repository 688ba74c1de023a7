//! Engine: the root torque source of a drivetrain, plus the rev limiter
//! and idle controller that shape its throttle and torque.

use crate::math::{AngularVelocity, finite_or_zero, integrate};
use crate::table::Table;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Combustion engine described by a normalised torque map.
///
/// The map's x axis is throttle in `[0, 1]`, its y axis engine speed as a
/// fraction of `max_angular_velocity`, and its values torque as a fraction
/// of `max_torque`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    pub torque_map: Table,
    pub angular_velocity: AngularVelocity,
    pub inertia: f32,
    pub max_angular_velocity: AngularVelocity,
    pub max_torque: f32,
}

impl Engine {
    /// A stopped engine.
    pub fn new(
        torque_map: Table,
        inertia: f32,
        max_angular_velocity: AngularVelocity,
        max_torque: f32,
    ) -> Self {
        Self {
            torque_map,
            angular_velocity: 0.0,
            inertia,
            max_angular_velocity,
            max_torque,
        }
    }

    /// Torque produced at the current speed for a throttle position.
    pub fn torque(&self, throttle: f32) -> f32 {
        let speed = self.angular_velocity / self.max_angular_velocity;
        self.torque_map.lookup(throttle, speed) * self.max_torque
    }

    /// The engine never turns backwards.
    pub fn set_angular_velocity(&mut self, angular_velocity: AngularVelocity) {
        self.angular_velocity = angular_velocity.max(0.0);
    }

    /// Torque needed to reach `desired` within one step, limited to what the
    /// engine can produce between closed and wide-open throttle.
    pub fn demanded_torque(&self, desired: AngularVelocity, external_inertia: f32, dt: f32) -> f32 {
        let torque = (desired - self.angular_velocity) / dt * (self.inertia + external_inertia);
        torque.min(self.torque(1.0)).max(self.torque(0.0))
    }

    /// Keep a decoupled engine from dropping below `idle_velocity`.
    ///
    /// Returns `user_torque` unless the engine is decoupled, below idle and
    /// the idle demand asks for more.
    pub fn idle_torque(
        &self,
        idle_velocity: AngularVelocity,
        user_torque: f32,
        is_decoupled: bool,
        dt: f32,
    ) -> f32 {
        if is_decoupled && self.angular_velocity < idle_velocity {
            user_torque.max(self.demanded_torque(idle_velocity, 0.0, dt))
        } else {
            user_torque
        }
    }

    /// Spin the engine alone with `torque` for one step.
    pub fn receive_torque(&mut self, torque: f32, dt: f32) {
        let acceleration = finite_or_zero(torque / self.inertia);
        self.set_angular_velocity(self.angular_velocity + integrate(acceleration, dt));
    }
}

// ---------------------------------------------------------------------------
// Rev limiter
// ---------------------------------------------------------------------------

/// Hard rev limiter with hysteresis: cuts the throttle at `activation` and
/// restores it only once the engine falls below `deactivation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevLimiter {
    pub activation: AngularVelocity,
    pub deactivation: AngularVelocity,
    is_active: bool,
}

impl RevLimiter {
    pub fn new(activation: AngularVelocity, deactivation: AngularVelocity) -> Self {
        Self {
            activation,
            deactivation,
            is_active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Throttle to apply at `angular_velocity` for a requested `throttle`.
    pub fn limit(&mut self, angular_velocity: AngularVelocity, throttle: f32) -> f32 {
        if self.is_active && angular_velocity < self.deactivation {
            self.is_active = false;
        } else if !self.is_active && angular_velocity >= self.activation {
            self.is_active = true;
        }

        if self.is_active { 0.0 } else { throttle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rpm_to_rads;
    use crate::test_utils;

    #[test]
    fn torque_follows_map_and_speed() {
        let mut engine = test_utils::test_engine();
        engine.angular_velocity = rpm_to_rads(3000.0);
        let wot = engine.torque(1.0);
        assert!((wot - 150.0).abs() < 1e-2, "peak torque at 3000 rpm, got {wot}");
        assert!(engine.torque(0.0) < 0.0, "closed throttle drags");
        let half = engine.torque(0.5);
        assert!(half > engine.torque(0.0) && half < wot);
    }

    #[test]
    fn velocity_is_never_negative() {
        let mut engine = test_utils::test_engine();
        engine.set_angular_velocity(-10.0);
        assert_eq!(engine.angular_velocity, 0.0);

        engine.angular_velocity = 1.0;
        engine.receive_torque(-100.0, 0.1);
        assert_eq!(engine.angular_velocity, 0.0);
    }

    #[test]
    fn receive_torque_integrates_own_inertia() {
        let mut engine = test_utils::test_engine();
        engine.angular_velocity = 100.0;
        engine.receive_torque(50.0, 0.01);
        // 50 Nm on 0.5 kg·m² for 10 ms.
        assert!((engine.angular_velocity - 101.0).abs() < 1e-4);
    }

    #[test]
    fn demanded_torque_is_clamped() {
        let mut engine = test_utils::test_engine();
        engine.angular_velocity = rpm_to_rads(2000.0);
        let max = engine.torque(1.0);
        let min = engine.torque(0.0);
        assert_eq!(engine.demanded_torque(rpm_to_rads(6000.0), 0.0, 0.01), max);
        assert_eq!(engine.demanded_torque(0.0, 0.0, 0.01), min);

        let gentle = engine.demanded_torque(engine.angular_velocity + 0.1, 0.0, 0.01);
        assert!((gentle - 5.0).abs() < 0.1);
    }

    // -----------------------------------------------------------------------
    // Idle control
    // -----------------------------------------------------------------------
    #[test]
    fn idle_control_only_helps_when_decoupled() {
        let mut engine = test_utils::test_engine();
        engine.angular_velocity = rpm_to_rads(800.0);
        let max = engine.torque(1.0);
        let min = engine.torque(0.0);
        let idle = rpm_to_rads(900.0);
        let dt = 1.0 / 60.0;

        assert_eq!(engine.idle_torque(idle, max, false, dt), max);
        assert_eq!(engine.idle_torque(idle, max, true, dt), max);
        assert_eq!(engine.idle_torque(idle, min, false, dt), min);
        assert!(engine.idle_torque(idle, min, true, dt) > min);
    }

    #[test]
    fn idle_control_inactive_above_idle() {
        let mut engine = test_utils::test_engine();
        engine.angular_velocity = rpm_to_rads(1500.0);
        let min = engine.torque(0.0);
        assert_eq!(engine.idle_torque(rpm_to_rads(900.0), min, true, 0.01), min);
    }

    // -----------------------------------------------------------------------
    // Rev limiter
    // -----------------------------------------------------------------------
    #[test]
    fn rev_limiter_hysteresis() {
        let mut limiter = RevLimiter::new(rpm_to_rads(1000.0), rpm_to_rads(500.0));

        assert_eq!(limiter.limit(rpm_to_rads(600.0), 1.0), 1.0);
        assert!(!limiter.is_active());

        assert_eq!(limiter.limit(rpm_to_rads(1200.0), 1.0), 0.0);
        assert!(limiter.is_active());

        assert_eq!(limiter.limit(rpm_to_rads(600.0), 1.0), 0.0);
        assert!(limiter.is_active());

        assert_eq!(limiter.limit(rpm_to_rads(400.0), 1.0), 1.0);
        assert!(!limiter.is_active());

        assert_eq!(limiter.limit(rpm_to_rads(600.0), 1.0), 1.0);
    }

    #[test]
    fn rev_limiter_engages_exactly_at_activation() {
        let mut limiter = RevLimiter::new(100.0, 50.0);
        assert_eq!(limiter.limit(100.0, 0.7), 0.0);
        assert_eq!(limiter.limit(50.0, 0.7), 0.0);
        assert_eq!(limiter.limit(49.9, 0.7), 0.7);
    }
}
