//! Typed records parsed from solver result files
//!
//! ## Record Overview
//!
//! ```text
//! convergence.csv  ──> ResultRecord (method, lr, iter, fval)
//! history.csv      ──> HistoryRecord (iteration, loss, grad_norm)
//! data.tsv + beta  ──> RegressionDataset (x1, x2, y) + PlaneFit
//! solution.json    ──> TourSolution (N, cost, tour, length)
//! ```
//!
//! Records are built once per input file and consumed immediately by the
//! grouping and filtering stages; nothing here is persisted.

mod history;
mod regression;
mod result_record;
mod tour;

pub use history::HistoryRecord;
pub use regression::{Observation, PlaneFit, RegressionDataset};
pub(crate) use regression::min_max;
pub use result_record::ResultRecord;
pub use tour::TourSolution;
