//! Result Record - one row of a convergence table

use serde::{Deserialize, Serialize};

/// Result Record represents a single objective evaluation of one optimizer
/// configuration.
///
/// ## Series Keys
///
/// Records are partitioned by:
/// - `method` + `learning_rate` as the categorical key tuple
/// - `iteration` as the ordinal (sort) key within a series
///
/// `iteration` is expected to be unique inside one (method, learning rate)
/// group. Values may be arbitrarily large; divergence is handled by the
/// stability filter, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    method: String,
    learning_rate: f64,
    iteration: u64,
    value: f64,
}

impl ResultRecord {
    /// Create a new result record.
    ///
    /// # Arguments
    ///
    /// * `method` - Optimizer name (e.g., "GD", "Adam")
    /// * `learning_rate` - Step size used by the run
    /// * `iteration` - Iteration index within the run
    /// * `value` - Objective value `f(x)` at that iteration
    #[must_use]
    pub fn new(method: impl Into<String>, learning_rate: f64, iteration: u64, value: f64) -> Self {
        Self {
            method: method.into(),
            learning_rate,
            iteration,
            value,
        }
    }

    /// Get the optimizer name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the learning rate.
    #[must_use]
    pub const fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Get the iteration index.
    #[must_use]
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the objective value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}
