//! Regression charts: observations before and after fitting the plane.

use std::path::Path;

use tracing::info;

use super::RenderReport;
use crate::config::PlotConfig;
use crate::naming::{ArtifactKind, ArtifactNamer};
use crate::parse::load_regression;
use crate::record::{PlaneFit, RegressionDataset};
use crate::render::{Figure, PlotRenderer, ScatterChart3d};
use crate::{Error, Result};

fn scatter(title: &str, data: &RegressionDataset) -> ScatterChart3d {
    ScatterChart3d {
        title: title.to_string(),
        axis_labels: ["x1".to_string(), "x2".to_string(), "y".to_string()],
        points_label: "Observed y".to_string(),
        points: data.observations().iter().map(|o| (o.x1, o.x2, o.y)).collect(),
        surface: None,
    }
}

/// The "before" and "after" figures for one dataset.
///
/// # Errors
///
/// [`Error::EmptyDataset`] without observations, or [`Error::Config`] for an
/// invalid configured surface resolution.
pub fn regression_figures(
    config: &PlotConfig,
    data: &RegressionDataset,
    fit: PlaneFit,
) -> Result<(Figure, Figure)> {
    if data.is_empty() {
        return Err(Error::EmptyDataset(
            "regression dataset has no observations".to_string(),
        ));
    }
    let plane = config.surface_reconstructor()?.reconstruct(data, fit)?;

    let before = scatter("Before regression", data);
    let mut after = scatter("After regression", data);
    after.surface = Some(("Regression plane".to_string(), plane));
    Ok((Figure::Scatter3d(before), Figure::Scatter3d(after)))
}

/// Render both charts through `namer`.
///
/// # Errors
///
/// See [`regression_figures`], plus render/I/O failures.
pub fn render_regression<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    data: &RegressionDataset,
    fit: PlaneFit,
    namer: &ArtifactNamer,
) -> Result<RenderReport> {
    let (before, after) = regression_figures(config, data, fit)?;
    namer.ensure_output_dir()?;

    let mut report = RenderReport::default();
    let size = config.images.regression;
    report.emit(renderer, &before, size, namer.path(&ArtifactKind::RegressionBefore))?;
    report.emit(renderer, &after, size, namer.path(&ArtifactKind::RegressionAfter))?;
    Ok(report)
}

/// Parse a dataset and write both charts into `output_dir`, named after the
/// input's stem.
///
/// # Errors
///
/// Any parse error, [`Error::EmptyDataset`], or a render/I/O failure.
pub fn plot_regression<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    input: &Path,
    fit: PlaneFit,
    output_dir: &Path,
) -> Result<RenderReport> {
    let data = load_regression(input)?;
    info!(
        path = %input.display(),
        observations = data.len(),
        beta0 = fit.beta0,
        beta1 = fit.beta1,
        "loaded regression dataset"
    );
    render_regression(renderer, config, &data, fit, &ArtifactNamer::in_dir(input, output_dir))
}
