//! Tour Solution - output of a combinatorial routing solver

use serde::{Deserialize, Serialize};

/// A closed tour over `node_count` nodes.
///
/// `tour` is kept exactly as read (signed) so that out-of-range entries are
/// reported by the layout stage rather than lost in a conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourSolution {
    node_count: usize,
    cost: f64,
    tour: Vec<i64>,
    length: Option<f64>,
}

impl TourSolution {
    /// Create a new tour solution.
    #[must_use]
    pub fn new(node_count: usize, cost: f64, tour: Vec<i64>, length: Option<f64>) -> Self {
        Self {
            node_count,
            cost,
            tour,
            length,
        }
    }

    /// Number of nodes `N`.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Objective value reported by the solver.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Visiting order.
    #[must_use]
    pub fn tour(&self) -> &[i64] {
        &self.tour
    }

    /// Precomputed tour length, if the solver wrote one.
    #[must_use]
    pub const fn length(&self) -> Option<f64> {
        self.length
    }

    /// Chart title: the length when known, the cost otherwise.
    #[must_use]
    pub fn title(&self) -> String {
        match self.length {
            Some(length) => format!("TSP tour, length = {length:.4}"),
            None => format!("TSP tour, cost = {:.4}", self.cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_length() {
        let solution = TourSolution::new(3, 10.0, vec![0, 1, 2], Some(3.0));
        assert_eq!(solution.title(), "TSP tour, length = 3.0000");
    }

    #[test]
    fn test_title_falls_back_to_cost() {
        let solution = TourSolution::new(3, 10.5, vec![0, 2, 1], None);
        assert_eq!(solution.title(), "TSP tour, cost = 10.5000");
    }
}
