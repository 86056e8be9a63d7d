//! Regression dataset and fitted plane

use serde::{Deserialize, Serialize};

/// One observed `(x1, x2, y)` triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// First regressor
    pub x1: f64,
    /// Second regressor
    pub x2: f64,
    /// Observed response
    pub y: f64,
}

impl Observation {
    /// Create a new observation.
    #[must_use]
    pub const fn new(x1: f64, x2: f64, y: f64) -> Self {
        Self { x1, x2, y }
    }
}

/// Coefficients of the plane `y ≈ beta0·x1 + beta1·x2` (no intercept).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlaneFit {
    /// Coefficient of `x1`
    pub beta0: f64,
    /// Coefficient of `x2`
    pub beta1: f64,
}

impl PlaneFit {
    /// Create a plane from its two coefficients.
    #[must_use]
    pub const fn new(beta0: f64, beta1: f64) -> Self {
        Self { beta0, beta1 }
    }

    /// Predicted response at `(x1, x2)`.
    #[must_use]
    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        self.beta0.mul_add(x1, self.beta1 * x2)
    }
}

/// Observed triples of a regression problem, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegressionDataset {
    observations: Vec<Observation>,
}

impl RegressionDataset {
    /// Wrap a list of observations.
    #[must_use]
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// All observations in file order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// `(min, max)` of `x1`, or `None` when empty.
    #[must_use]
    pub fn x1_range(&self) -> Option<(f64, f64)> {
        min_max(self.observations.iter().map(|o| o.x1))
    }

    /// `(min, max)` of `x2`, or `None` when empty.
    #[must_use]
    pub fn x2_range(&self) -> Option<(f64, f64)> {
        min_max(self.observations.iter().map(|o| o.x2))
    }
}

pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_predict() {
        let fit = PlaneFit::new(2.0, -1.0);
        assert!((fit.predict(3.0, 4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_dataset_ranges() {
        let data = RegressionDataset::new(vec![
            Observation::new(1.0, 5.0, 0.0),
            Observation::new(-2.0, 7.0, 3.0),
        ]);
        assert_eq!(data.x1_range(), Some((-2.0, 1.0)));
        assert_eq!(data.x2_range(), Some((5.0, 7.0)));
    }

    #[test]
    fn test_empty_dataset_has_no_range() {
        let data = RegressionDataset::default();
        assert!(data.is_empty());
        assert!(data.x1_range().is_none());
    }
}
