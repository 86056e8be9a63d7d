//! Numeric-stability filter
//!
//! Divergent optimizer runs produce values that dwarf convergent ones on a
//! shared axis. Before plotting, each series is scanned in ordinal order:
//! if its largest value exceeds the threshold a [`DivergenceWarning`] is
//! raised, and only the prefix of points strictly below the threshold is
//! kept. A series whose prefix is empty is dropped from rendering.
//!
//! `NaN` and `+inf` count as exceeding the threshold.
//! Values `<= 0` pass through untouched even though a log-scaled chart
//! cannot show them.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::group::{Series, SeriesKey};
use crate::{Error, Result};

/// Threshold used when none is configured.
pub const DEFAULT_DIVERGENCE_THRESHOLD: f64 = 1e10;

/// A series crossed the divergence threshold. Carries identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceWarning {
    label: String,
}

impl DivergenceWarning {
    /// Create a warning for the series described by `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Legend label of the diverging series (e.g. `GD, lr=0.1`).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for DivergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "possible divergence in {}", self.label)
    }
}

/// Result of filtering one series.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Retained prefix, `None` when nothing survived
    pub series: Option<Series>,
    /// Whether the series crossed the threshold
    pub diverged: bool,
}

/// Truncates series at their first divergent value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityFilter {
    threshold: f64,
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DIVERGENCE_THRESHOLD,
        }
    }
}

impl StabilityFilter {
    /// Create a filter with an explicit threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] unless `threshold` is finite and positive.
    pub fn new(threshold: f64) -> Result<Self> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(Error::Config(format!(
                "divergence threshold must be finite and positive, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    /// Configured threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    fn exceeds(&self, value: f64) -> bool {
        value.is_nan() || value > self.threshold
    }

    /// Filter one series.
    #[must_use]
    pub fn apply(&self, series: &Series) -> FilterOutcome {
        let diverged = series.points().iter().any(|&(_, v)| self.exceeds(v));

        let kept = series
            .points()
            .iter()
            .take_while(|&&(_, v)| v < self.threshold)
            .count();

        if kept < series.len() {
            debug!(
                series = %series.key(),
                kept,
                total = series.len(),
                "truncated series at threshold"
            );
        }

        let series = (kept > 0)
            .then(|| Series::new(series.key().clone(), series.points()[..kept].to_vec()));
        FilterOutcome { series, diverged }
    }

    /// Filter many series, collecting one warning per diverging series.
    ///
    /// `label` turns a series key into the text carried by the warning.
    pub fn apply_all<'a, I, F>(&self, series: I, label: F) -> (Vec<Series>, Vec<DivergenceWarning>)
    where
        I: IntoIterator<Item = &'a Series>,
        F: Fn(&SeriesKey) -> String,
    {
        let mut kept = Vec::new();
        let mut warnings = Vec::new();
        for s in series {
            let outcome = self.apply(s);
            if outcome.diverged {
                warnings.push(DivergenceWarning::new(label(s.key())));
            }
            if let Some(filtered) = outcome.series {
                kept.push(filtered);
            }
        }
        (kept, warnings)
    }
}
