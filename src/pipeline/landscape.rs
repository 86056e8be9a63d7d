//! Lagrangian landscape contour.

use std::path::Path;

use tracing::info;

use super::RenderReport;
use crate::config::PlotConfig;
use crate::landscape::{Bounds, Lagrangian};
use crate::naming::{ArtifactKind, ArtifactNamer};
use crate::render::{Axes, ContourChart, Figure, NamedSeries, PlotRenderer};
use crate::Result;

/// Sample the Lagrangian for `lambda` over `bounds` and write its contour
/// chart into `output_dir`.
///
/// # Errors
///
/// A render or I/O failure.
pub fn plot_lagrangian<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    bounds: Bounds,
    lambda: f64,
    output_dir: &Path,
) -> Result<RenderReport> {
    let lagrangian = Lagrangian::new(lambda);
    let field = lagrangian.sample(bounds, config.landscape_resolution);
    let overlay = NamedSeries::new("y = -x²", Lagrangian::constraint_curve(field.xs()));
    info!(lambda, resolution = config.landscape_resolution, "sampled Lagrangian");

    let figure = Figure::Contour(ContourChart {
        axes: Axes::new(format!("Lagrangian landscape (λ = {lambda:?})"), "x", "y"),
        field,
        levels: config.contour_levels,
        overlay: Some(overlay),
    });

    let namer = ArtifactNamer::detached(output_dir);
    namer.ensure_output_dir()?;
    let mut report = RenderReport::default();
    report.emit(
        renderer,
        &figure,
        config.images.landscape,
        namer.path(&ArtifactKind::Lagrangian(lambda)),
    )?;
    Ok(report)
}
