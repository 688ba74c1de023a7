//! Manual gearbox with a reverse gear, neutral and forward gears.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GearboxError {
    #[error("ratio table has {ratios} entries but inertia table has {inertias}")]
    LengthMismatch { ratios: usize, inertias: usize },
    #[error("gearbox needs a reverse gear and at least one forward gear, got {0} entries")]
    TooFewGears(usize),
    #[error("gear {gear} is outside -1..={top}")]
    GearOutOfRange { gear: i32, top: i32 },
}

/// Serialized form, checked on the way in.
#[derive(Deserialize)]
struct RawGearbox {
    ratios: Vec<f32>,
    inertias: Vec<f32>,
    curr_gear: i32,
    input_angular_velocity: f32,
}

impl TryFrom<RawGearbox> for Gearbox {
    type Error = GearboxError;

    fn try_from(raw: RawGearbox) -> Result<Self, Self::Error> {
        let mut gearbox = Gearbox::new(raw.ratios, raw.inertias)?;
        let top = gearbox.top_gear();
        if !(-1..=top).contains(&raw.curr_gear) {
            return Err(GearboxError::GearOutOfRange {
                gear: raw.curr_gear,
                top,
            });
        }
        gearbox.curr_gear = raw.curr_gear;
        gearbox.input_angular_velocity = raw.input_angular_velocity;
        Ok(gearbox)
    }
}

/// Gear tables are indexed by gear: entry 0 is reverse, entry `g` is
/// forward gear `g`. `curr_gear` is negative for reverse, 0 for neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGearbox")]
pub struct Gearbox {
    ratios: Vec<f32>,
    inertias: Vec<f32>,
    curr_gear: i32,
    /// Cached input shaft velocity, kept while in neutral.
    pub input_angular_velocity: f32,
}

impl Gearbox {
    /// A gearbox in neutral.
    pub fn new(ratios: Vec<f32>, inertias: Vec<f32>) -> Result<Self, GearboxError> {
        if ratios.len() != inertias.len() {
            return Err(GearboxError::LengthMismatch {
                ratios: ratios.len(),
                inertias: inertias.len(),
            });
        }
        if ratios.len() < 2 {
            return Err(GearboxError::TooFewGears(ratios.len()));
        }
        Ok(Self {
            ratios,
            inertias,
            curr_gear: 0,
            input_angular_velocity: 0.0,
        })
    }

    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }

    pub fn inertias(&self) -> &[f32] {
        &self.inertias
    }

    pub fn gear(&self) -> i32 {
        self.curr_gear
    }

    /// Highest forward gear.
    pub fn top_gear(&self) -> i32 {
        (self.ratios.len() - 1) as i32
    }

    /// Select a gear, clamped to `[-1, top_gear]`.
    pub fn set_gear(&mut self, gear: i32) {
        self.curr_gear = gear.clamp(-1, self.top_gear());
    }

    pub fn upshift(&mut self) {
        self.set_gear(self.curr_gear + 1);
    }

    pub fn downshift(&mut self) {
        self.set_gear(self.curr_gear - 1);
    }

    pub fn is_neutral(&self) -> bool {
        self.curr_gear == 0
    }

    fn select(&self, table: &[f32]) -> f32 {
        match self.curr_gear {
            g if g < 0 => table[0],
            0 => 0.0,
            g => table[g as usize],
        }
    }

    pub fn ratio(&self) -> f32 {
        self.select(&self.ratios)
    }

    pub fn inertia(&self) -> f32 {
        self.select(&self.inertias)
    }

    pub fn torque_out(&self, torque_in: f32) -> f32 {
        self.ratio() * torque_in
    }

    /// Input shaft speed for a given output speed, without touching the
    /// cache. Neutral reports the cached value.
    pub fn input_velocity(&self, angular_velocity_out: f32) -> f32 {
        if self.is_neutral() {
            self.input_angular_velocity
        } else {
            self.ratio() * angular_velocity_out
        }
    }

    /// Like [`Gearbox::input_velocity`] but refreshes the cache when in gear.
    pub fn angular_velocity_in(&mut self, angular_velocity_out: f32) -> f32 {
        self.input_angular_velocity = self.input_velocity(angular_velocity_out);
        self.input_angular_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gearbox() -> Gearbox {
        Gearbox::new(
            vec![-3.6, 3.2, 2.31, 1.82, 1.52, 1.3, 1.0],
            vec![0.3, 0.2, 0.18, 0.16, 0.15, 0.14, 0.1],
        )
        .unwrap()
    }

    #[test]
    fn neutral_has_no_coupling() {
        let gb = gearbox();
        assert_eq!(gb.gear(), 0);
        assert_eq!(gb.ratio(), 0.0);
        assert_eq!(gb.inertia(), 0.0);
        assert_eq!(gb.torque_out(250.0), 0.0);
    }

    #[test]
    fn selects_ratio_and_inertia_by_gear() {
        let mut gb = gearbox();
        gb.set_gear(-1);
        assert_eq!(gb.ratio(), -3.6);
        assert_eq!(gb.inertia(), 0.3);
        gb.set_gear(3);
        assert_eq!(gb.ratio(), 1.82);
        assert_eq!(gb.inertia(), 0.16);
        assert!((gb.torque_out(10.0) - 18.2).abs() < 1e-5);
    }

    #[test]
    fn shifting_is_bounded() {
        let mut gb = gearbox();
        for expected in 1..=6 {
            gb.upshift();
            assert_eq!(gb.gear(), expected);
        }
        gb.upshift();
        assert_eq!(gb.gear(), 6);

        for expected in (-1..=5).rev() {
            gb.downshift();
            assert_eq!(gb.gear(), expected);
        }
        gb.downshift();
        assert_eq!(gb.gear(), -1);
    }

    #[test]
    fn neutral_keeps_cached_input_velocity() {
        let mut gb = gearbox();
        gb.set_gear(1);
        assert_eq!(gb.angular_velocity_in(10.0), 32.0);
        gb.set_gear(0);
        assert_eq!(gb.angular_velocity_in(50.0), 32.0);
        assert_eq!(gb.input_velocity(80.0), 32.0);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            Gearbox::new(vec![-3.0, 3.0], vec![0.1]).unwrap_err(),
            GearboxError::LengthMismatch { ratios: 2, inertias: 1 }
        );
        assert_eq!(
            Gearbox::new(vec![-3.0], vec![0.1]).unwrap_err(),
            GearboxError::TooFewGears(1)
        );
    }

    #[test]
    fn deserialize_keeps_selected_gear() {
        let mut gb = gearbox();
        gb.set_gear(2);
        let json = serde_json::to_string(&gb).unwrap();
        let back: Gearbox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gb);
        assert_eq!(back.ratio(), 2.31);
    }

    #[test]
    fn deserialize_rejects_gear_past_the_table() {
        let json = r#"{"ratios":[-3.0,3.0],"inertias":[0.1,0.1],"curr_gear":5,"input_angular_velocity":0.0}"#;
        let err = serde_json::from_str::<Gearbox>(json).unwrap_err();
        assert!(err.to_string().contains("gear 5 is outside -1..=1"), "{err}");

        let json = r#"{"ratios":[-3.0,3.0],"inertias":[0.1],"curr_gear":1,"input_angular_velocity":0.0}"#;
        assert!(serde_json::from_str::<Gearbox>(json).is_err());
    }
}
