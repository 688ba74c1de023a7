//! Combined-slip tire force curve.
//!
//! The model is a plain value type with no state. One instance is usually
//! shared by every wheel of a vehicle.

use crate::math::{EPSILON, Vec2};
use serde::{Deserialize, Serialize};

/// Coefficients of a Pacejka "magic formula" curve per axis.
///
/// `*x` fields describe the longitudinal curve (input: slip ratio), `*y`
/// fields the lateral curve (input: slip angle in radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TireModel {
    /// Stiffness factor.
    pub bx: f32,
    /// Shape factor.
    pub cx: f32,
    /// Peak factor, scaled by normal force and friction coefficient.
    pub dx: f32,
    /// Curvature factor.
    pub ex: f32,
    /// Horizontal offset.
    pub vhx: f32,
    /// Vertical offset.
    pub vvx: f32,

    pub by: f32,
    pub cy: f32,
    pub dy: f32,
    pub ey: f32,
    pub vhy: f32,
    pub vvy: f32,

    /// Slip ratio at which the longitudinal curve peaks.
    pub peak_slip_x: f32,
    /// Slip angle (radians) at which the lateral curve peaks.
    pub peak_slip_y: f32,
}

impl Default for TireModel {
    fn default() -> Self {
        Self {
            bx: 1.9,
            cx: 1.65,
            dx: 1.1,
            ex: -1.0,
            vhx: 0.0,
            vvx: 0.0,
            by: 9.0,
            cy: 1.36,
            dy: 1.0,
            ey: 0.96,
            vhy: 0.0,
            vvy: 0.0,
            peak_slip_x: 0.4,
            peak_slip_y: 20.0_f32.to_radians(),
        }
    }
}

/// `D·sin(C·atan(B₁ − E·(B₁ − atan(B₁)))) + Vv` with `B₁ = B·(slip + Vh)`.
pub fn pacejka(b: f32, c: f32, d: f32, e: f32, vh: f32, vv: f32, slip: f32) -> f32 {
    let b1 = b * (slip + vh);
    d * (c * (b1 - e * (b1 - b1.atan())).atan()).sin() + vv
}

impl TireModel {
    fn longitudinal(&self, peak: f32, slip: f32) -> f32 {
        pacejka(self.bx, self.cx, peak, self.ex, self.vhx, self.vvx, slip)
    }

    fn lateral(&self, peak: f32, slip: f32) -> f32 {
        pacejka(self.by, self.cy, peak, self.ey, self.vhy, self.vvy, slip)
    }

    /// Contact-patch force in the wheel frame for the given slip state.
    ///
    /// Both components oppose the slip velocity: a wheel spinning faster
    /// than the ground (negative slip ratio) is pushed forward.
    pub fn force(
        &self,
        normal_force: f32,
        slip_ratio: f32,
        slip_angle: f32,
        friction_coefficient: f32,
    ) -> Vec2 {
        let peak_x = self.dx * normal_force * friction_coefficient;
        let peak_y = self.dy * normal_force * friction_coefficient;

        let (fx, fy) = if slip_ratio.abs() < EPSILON && slip_angle.abs() < EPSILON {
            (
                self.longitudinal(peak_x, slip_ratio),
                self.lateral(peak_y, slip_angle),
            )
        } else {
            // Friction ellipse: one curve evaluation at the combined slip,
            // shared out by each axis's part of the normalised slip.
            let norm_x = slip_ratio / self.peak_slip_x;
            let norm_y = slip_angle / self.peak_slip_y;
            let norm = (norm_x * norm_x + norm_y * norm_y).sqrt();

            let fx0 = self.longitudinal(peak_x, norm);
            let fy0 = self.lateral(peak_y, norm);
            (norm_x / norm * fx0, norm_y / norm * fy0)
        };

        Vec2::new(-fx, -fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOAD: f32 = 1580.0 * 9.806 / 4.0;

    #[test]
    fn pure_rolling_produces_no_force() {
        let model = TireModel::default();
        let f = model.force(LOAD, 0.0, 0.0, 1.0);
        assert_eq!(f.x, 0.0);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn pacejka_is_odd_without_offsets() {
        let m = TireModel::default();
        for slip in [0.05_f32, 0.2, 0.7, 1.5] {
            let pos = pacejka(m.bx, m.cx, m.dx, m.ex, 0.0, 0.0, slip);
            let neg = pacejka(m.bx, m.cx, m.dx, m.ex, 0.0, 0.0, -slip);
            assert!((pos + neg).abs() < 1e-6);
        }
    }

    #[test]
    fn force_opposes_longitudinal_slip() {
        let model = TireModel::default();
        // Wheel spinning faster than the ground: negative slip ratio.
        let drive = model.force(LOAD, -0.2, 0.0, 1.0);
        assert!(drive.x > 0.0);
        assert!(drive.y.abs() < 1e-3);

        // Locked-up wheel: positive slip ratio pushes backward.
        let brake = model.force(LOAD, 0.2, 0.0, 1.0);
        assert!(brake.x < 0.0);
    }

    #[test]
    fn force_opposes_lateral_slip() {
        let model = TireModel::default();
        let f = model.force(LOAD, 0.0, 0.1, 1.0);
        assert!(f.y < 0.0);
        assert!(f.x.abs() < 1e-3);
    }

    #[test]
    fn force_scales_with_friction_and_load() {
        let model = TireModel::default();
        let full = model.force(LOAD, -0.1, 0.0, 1.0);
        let half_mu = model.force(LOAD, -0.1, 0.0, 0.5);
        let half_load = model.force(LOAD / 2.0, -0.1, 0.0, 1.0);
        assert!((full.x - 2.0 * half_mu.x).abs() < 1e-2);
        assert!((full.x - 2.0 * half_load.x).abs() < 1e-2);
    }

    #[test]
    fn combined_slip_stays_within_peak() {
        let model = TireModel::default();
        let peak_x = model.dx * LOAD;
        let peak_y = model.dy * LOAD;
        for &(sr, sa) in &[(-0.3_f32, 0.1_f32), (0.5, -0.2), (-1.0, 0.35), (0.05, 0.05)] {
            let f = model.force(LOAD, sr, sa, 1.0);
            assert!(f.x.abs() <= peak_x + 1e-2, "fx {} beyond peak", f.x);
            assert!(f.y.abs() <= peak_y + 1e-2, "fy {} beyond peak", f.y);
        }
    }
}
