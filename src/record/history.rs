//! History Record - one L-BFGS iteration

use serde::{Deserialize, Serialize};

/// One row of an L-BFGS history: loss and gradient norm at an iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    /// Iteration index
    pub iteration: u64,
    /// Objective value
    pub loss: f64,
    /// Euclidean norm of the gradient
    pub grad_norm: f64,
}

impl HistoryRecord {
    /// Create a new history record.
    #[must_use]
    pub const fn new(iteration: u64, loss: f64, grad_norm: f64) -> Self {
        Self {
            iteration,
            loss,
            grad_norm,
        }
    }
}
