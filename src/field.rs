//! Regular 2D grids of scalar values
//!
//! Shared by the regression surface and the Lagrangian landscape: both
//! sample a function over `xs × ys` and hand the grid to the renderer.

/// `n` evenly spaced values from `lo` to `hi` inclusive.
///
/// `n == 1` yields `[lo]`; `n == 0` yields nothing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|k| step.mul_add(k as f64, lo)).collect();
            values[n - 1] = hi;
            values
        }
    }
}

/// Values sampled on `xs × ys`, stored row-major (one row per `y`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl ScalarField {
    /// Sample `f(x, y)` at every grid point.
    pub fn from_fn(xs: Vec<f64>, ys: Vec<f64>, f: impl Fn(f64, f64) -> f64) -> Self {
        let values = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self { xs, ys, values }
    }

    /// Grid coordinates along x.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Grid coordinates along y.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// `(columns, rows)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// Value at column `i`, row `j`.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.xs.len() + i]
    }

    /// Smallest and largest finite value, or `None` if there is none.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        crate::record::min_max(self.values.iter().copied().filter(|v| v.is_finite()))
    }

    /// Bilinear interpolation at `(x, y)`; `None` outside the grid.
    #[must_use]
    pub fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        let (i0, i1, tx) = bracket(&self.xs, x)?;
        let (j0, j1, ty) = bracket(&self.ys, y)?;
        let bottom = (self.value(i1, j0) - self.value(i0, j0)).mul_add(tx, self.value(i0, j0));
        let top = (self.value(i1, j1) - self.value(i0, j1)).mul_add(tx, self.value(i0, j1));
        Some((top - bottom).mul_add(ty, bottom))
    }
}

/// Neighbouring indices around `v` and its fractional position between them.
fn bracket(axis: &[f64], v: f64) -> Option<(usize, usize, f64)> {
    let (&lo, &hi) = (axis.first()?, axis.last()?);
    if v < lo || v > hi {
        return None;
    }
    if axis.len() == 1 {
        return Some((0, 0, 0.0));
    }
    let i0 = axis
        .partition_point(|&a| a <= v)
        .saturating_sub(1)
        .min(axis.len() - 2);
    let i1 = i0 + 1;
    let span = axis[i1] - axis[i0];
    let t = if span > 0.0 { (v - axis[i0]) / span } else { 0.0 };
    Some((i0, i1, t))
}
