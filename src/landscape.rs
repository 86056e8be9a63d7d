//! Constrained-optimization landscape
//!
//! Samples the Lagrangian of the penalised Rosenbrock problem
//!
//! ```text
//! minimise   (1 - x)² + 50·(y - x²)²
//! subject to y + x² = 0
//!
//! L(x, y, λ) = (1 - x)² + 50·(y - x²)² + λ·(y + x²)
//! ```
//!
//! on a regular grid, together with the constraint curve `y = -x²` that is
//! drawn over the filled contours.

use crate::field::{linspace, ScalarField};
use crate::{Error, Result};

/// Grid points per axis when none is configured.
pub const DEFAULT_LANDSCAPE_RESOLUTION: usize = 300;

/// Axis-aligned plotting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub x_min: f64,
    /// Right edge
    pub x_max: f64,
    /// Bottom edge
    pub y_min: f64,
    /// Top edge
    pub y_max: f64,
}

impl Bounds {
    /// Validated window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if a bound is not finite or an axis is empty.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(Error::Usage("bounds must be finite numbers".to_string()));
        }
        if x_min >= x_max || y_min >= y_max {
            return Err(Error::Usage(format!(
                "need x_min < x_max and y_min < y_max, got x [{x_min}, {x_max}], y [{y_min}, {y_max}]"
            )));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// Lagrangian with a fixed multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lagrangian {
    lambda: f64,
}

impl Lagrangian {
    /// Lagrangian for multiplier `lambda`.
    #[must_use]
    pub const fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// The multiplier.
    #[must_use]
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// `L(x, y, λ)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let x2 = x * x;
        let valley = y - x2;
        (1.0 - x).powi(2) + 50.0 * valley * valley + self.lambda * (y + x2)
    }

    /// Sample `L` over `bounds` with `resolution` points per axis.
    #[must_use]
    pub fn sample(&self, bounds: Bounds, resolution: usize) -> ScalarField {
        ScalarField::from_fn(
            linspace(bounds.x_min, bounds.x_max, resolution),
            linspace(bounds.y_min, bounds.y_max, resolution),
            |x, y| self.value(x, y),
        )
    }

    /// Constraint curve `y = -x²` at the given abscissae.
    #[must_use]
    pub fn constraint_curve(xs: &[f64]) -> Vec<(f64, f64)> {
        xs.iter().map(|&x| (x, -x * x)).collect()
    }
}
