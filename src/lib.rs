//! # optviz: diagnostic plots for numerical-optimization experiments
//!
//! optviz consumes the result files written by external solver programs
//! (delimited text and JSON) and renders static PNG artifacts: convergence
//! curves across optimizer × learning-rate configurations, L-BFGS histories,
//! tour diagrams, regression scatter/surface charts and Lagrangian
//! landscapes.
//!
//! ## Pipeline
//!
//! ```text
//! ResultParser ─► SeriesGrouper ─► StabilityFilter ─┐
//!                                                   ├─► PlotRenderer ─► PNG
//!       TourLayout | SurfaceReconstructor | Lagrangian
//!                                   ▲
//!                     ArtifactNamer picks the path
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use optviz::config::PlotConfig;
//! use optviz::pipeline::plot_convergence;
//! use optviz::render::BitmapRenderer;
//!
//! let config = PlotConfig::default();
//! let mut renderer = BitmapRenderer::new();
//! let report = plot_convergence(&mut renderer, &config, Path::new("runs/convergence.csv"), None)?;
//! for warning in &report.warnings {
//!     println!("Warning: {warning}");
//! }
//! # Ok::<(), optviz::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod field;
pub mod group;
pub mod landscape;
pub mod layout;
pub mod naming;
pub mod parse;
pub mod pipeline;
pub mod process;
pub mod record;
pub mod render;
pub mod stability;
pub mod surface;

pub use error::{Error, Result};
