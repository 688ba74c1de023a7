//! Two-dimensional lookup table with bilinear interpolation.
//!
//! Queries outside the sampled range keep following the slope of the
//! outermost segment instead of clamping to the edge value.

use serde::{Deserialize, Serialize};

/// Errors raised when building a [`Table`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("{axis} axis needs at least two samples, got {len}")]
    TooFewSamples { axis: &'static str, len: usize },
    #[error("{axis} axis is not sorted at index {index}")]
    Unsorted { axis: &'static str, index: usize },
    #[error("z grid is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// A grid of `z` values sampled at every (`x[i]`, `y[j]`) pair.
///
/// `z[i][j]` is the value at `x[i]`, `y[j]`. Both axes are sorted in
/// non-decreasing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    x: Vec<f32>,
    y: Vec<f32>,
    z: Vec<Vec<f32>>,
}

impl Table {
    pub fn new(x: Vec<f32>, y: Vec<f32>, z: Vec<Vec<f32>>) -> Result<Self, TableError> {
        check_axis("x", &x)?;
        check_axis("y", &y)?;

        let cols = z.first().map_or(0, Vec::len);
        if z.len() != x.len() || z.iter().any(|row| row.len() != y.len()) {
            return Err(TableError::ShapeMismatch {
                rows: z.len(),
                cols,
                expected_rows: x.len(),
                expected_cols: y.len(),
            });
        }

        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn y(&self) -> &[f32] {
        &self.y
    }

    pub fn z(&self) -> &[Vec<f32>] {
        &self.z
    }

    /// Bilinear lookup at (`x`, `y`).
    pub fn lookup(&self, x: f32, y: f32) -> f32 {
        let (x0, x1) = bracket(x, &self.x);
        let (y0, y1) = bracket(y, &self.y);

        let lower = lerp(self.y[y0], y, self.y[y1], self.z[x0][y0], self.z[x0][y1]);
        let upper = lerp(self.y[y0], y, self.y[y1], self.z[x1][y0], self.z[x1][y1]);

        lerp(self.x[x0], x, self.x[x1], lower, upper)
    }
}

fn check_axis(axis: &'static str, samples: &[f32]) -> Result<(), TableError> {
    if samples.len() < 2 {
        return Err(TableError::TooFewSamples {
            axis,
            len: samples.len(),
        });
    }
    // `!(a <= b)` also rejects NaN samples.
    if let Some(index) = samples.windows(2).position(|w| !(w[0] <= w[1])) {
        return Err(TableError::Unsorted {
            axis,
            index: index + 1,
        });
    }
    Ok(())
}

/// Indices of the samples enclosing `value`: the first sample `>= value`
/// and its predecessor. Past the end the last two samples are reused.
fn bracket(value: f32, samples: &[f32]) -> (usize, usize) {
    match samples.iter().position(|&s| s >= value) {
        Some(0) => (0, 1),
        Some(i) => (i - 1, i),
        None => (samples.len() - 2, samples.len() - 1),
    }
}

/// Linear interpolation of `x` between (`x0`, `y0`) and (`x1`, `y1`).
/// A zero-width segment yields `y0`.
fn lerp(x0: f32, x: f32, x1: f32, y0: f32, y1: f32) -> f32 {
    let span = x1 - x0;
    if span == 0.0 {
        return y0;
    }
    (x - x0) * (y1 - y0) / span + y0
}
