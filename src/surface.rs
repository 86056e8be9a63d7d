//! Regression surface reconstruction
//!
//! The fitted plane `y = beta0·x1 + beta1·x2` is sampled on a `G×G` grid
//! spanning the observed `x1` and `x2` ranges.

use crate::field::{linspace, ScalarField};
use crate::record::{PlaneFit, RegressionDataset};
use crate::{Error, Result};

/// Grid points per axis when none is configured.
pub const DEFAULT_SURFACE_RESOLUTION: usize = 30;

/// Builds prediction surfaces over the observed input ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceReconstructor {
    resolution: usize,
}

impl Default for SurfaceReconstructor {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_SURFACE_RESOLUTION,
        }
    }
}

impl SurfaceReconstructor {
    /// Reconstructor with `resolution` points per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `resolution < 2`.
    pub fn new(resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(Error::Config(format!(
                "surface resolution must be at least 2, got {resolution}"
            )));
        }
        Ok(Self { resolution })
    }

    /// Points per axis.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sample `fit` over the dataset's `x1 × x2` bounding box. The returned
    /// field has `x1` along x and `x2` along y.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] if there are no observations.
    pub fn reconstruct(&self, data: &RegressionDataset, fit: PlaneFit) -> Result<ScalarField> {
        let (Some((x1_lo, x1_hi)), Some((x2_lo, x2_hi))) = (data.x1_range(), data.x2_range())
        else {
            return Err(Error::EmptyDataset(
                "no observations to span a regression surface".to_string(),
            ));
        };

        Ok(ScalarField::from_fn(
            linspace(x1_lo, x1_hi, self.resolution),
            linspace(x2_lo, x2_hi, self.resolution),
            |x1, x2| fit.predict(x1, x2),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Observation;

    fn dataset() -> RegressionDataset {
        RegressionDataset::new(vec![
            Observation::new(0.0, -1.0, 0.5),
            Observation::new(4.0, 3.0, 2.0),
            Observation::new(1.0, 1.0, 1.0),
        ])
    }

    #[test]
    fn test_grid_spans_observed_ranges() {
        let field = SurfaceReconstructor::default()
            .reconstruct(&dataset(), PlaneFit::new(1.0, 2.0))
            .unwrap();
        assert_eq!(field.shape(), (30, 30));
        assert_eq!(field.xs().first(), Some(&0.0));
        assert_eq!(field.xs().last(), Some(&4.0));
        assert_eq!(field.ys().first(), Some(&-1.0));
        assert_eq!(field.ys().last(), Some(&3.0));
    }

    #[test]
    fn test_corner_prediction() {
        let fit = PlaneFit::new(0.5, -2.0);
        let field = SurfaceReconstructor::default().reconstruct(&dataset(), fit).unwrap();
        assert!((field.value(29, 29) - fit.predict(4.0, 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_prediction() {
        let fit = PlaneFit::new(1.25, 0.75);
        let field = SurfaceReconstructor::default().reconstruct(&dataset(), fit).unwrap();
        let (x1, x2) = (2.0, 1.0);
        let v = field.interpolate(x1, x2).unwrap();
        assert!((v - (1.25 * x1 + 0.75 * x2)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = SurfaceReconstructor::default()
            .reconstruct(&RegressionDataset::default(), PlaneFit::new(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
    }

    #[test]
    fn test_resolution_validated() {
        assert!(SurfaceReconstructor::new(1).is_err());
        assert_eq!(SurfaceReconstructor::new(5).unwrap().resolution(), 5);
    }
}
