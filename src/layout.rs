//! Tour diagram geometry
//!
//! Nodes sit on the unit circle (node `i` at angle `2π·i/N`), the complete
//! graph is drawn underneath for context, and the tour is drawn on top as a
//! closed cycle.

use std::f64::consts::TAU;

use crate::record::TourSolution;
use crate::{Error, Result};

/// Undirected edge between two node indices.
pub type Edge = (usize, usize);

/// Node positions plus background and tour edge layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TourLayout {
    positions: Vec<(f64, f64)>,
    background_edges: Vec<Edge>,
    tour_edges: Vec<Edge>,
}

/// Position of node `i` of `n` on the unit circle.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn circle_position(i: usize, n: usize) -> (f64, f64) {
    let angle = TAU * i as f64 / n as f64;
    (angle.cos(), angle.sin())
}

/// Check that `tour` is a permutation of `0..n` and convert it to indices.
fn validate_tour(n: usize, tour: &[i64]) -> Result<Vec<usize>> {
    if n == 0 {
        return Err(Error::InvalidTour("node count must be positive".to_string()));
    }
    if tour.len() != n {
        return Err(Error::InvalidTour(format!(
            "tour has {} entries, expected {n}",
            tour.len()
        )));
    }

    let mut seen = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for (k, &node) in tour.iter().enumerate() {
        let index = usize::try_from(node)
            .ok()
            .filter(|&i| i < n)
            .ok_or_else(|| {
                Error::InvalidTour(format!("tour[{k}] = {node} is outside 0..{n}"))
            })?;
        if std::mem::replace(&mut seen[index], true) {
            return Err(Error::InvalidTour(format!(
                "node {index} is visited more than once (tour[{k}])"
            )));
        }
        order.push(index);
    }
    Ok(order)
}

impl TourLayout {
    /// Lay out a tour over `n` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTour`] if `n` is zero, `tour.len() != n`, or
    /// `tour` repeats a node or names one outside `0..n`.
    pub fn new(n: usize, tour: &[i64]) -> Result<Self> {
        let order = validate_tour(n, tour)?;

        let positions = (0..n).map(|i| circle_position(i, n)).collect();

        let background_edges = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        let tour_edges = (0..n).map(|k| (order[k], order[(k + 1) % n])).collect();

        Ok(Self {
            positions,
            background_edges,
            tour_edges,
        })
    }

    /// Lay out a parsed solution.
    ///
    /// # Errors
    ///
    /// As [`TourLayout::new`].
    pub fn from_solution(solution: &TourSolution) -> Result<Self> {
        Self::new(solution.node_count(), solution.tour())
    }

    /// Node positions, indexed by node.
    #[must_use]
    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    /// Every unordered pair `(i, j)` with `i < j`.
    #[must_use]
    pub fn background_edges(&self) -> &[Edge] {
        &self.background_edges
    }

    /// Consecutive tour pairs, closing back to the first node.
    #[must_use]
    pub fn tour_edges(&self) -> &[Edge] {
        &self.tour_edges
    }

    /// Edge as a pair of endpoint coordinates.
    #[must_use]
    pub fn segment(&self, (u, v): Edge) -> [(f64, f64); 2] {
        [self.positions[u], self.positions[v]]
    }
}
