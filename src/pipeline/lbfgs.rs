//! L-BFGS history: loss and gradient-norm curves on linear axes.

use std::path::Path;

use tracing::info;

use super::RenderReport;
use crate::config::PlotConfig;
use crate::group::{Series, SeriesKey};
use crate::naming::{ArtifactKind, ArtifactNamer};
use crate::parse::load_history;
use crate::record::HistoryRecord;
use crate::render::{Axes, AxisScale, Figure, LineChart, NamedSeries, PlotRenderer};
use crate::stability::DivergenceWarning;
use crate::Result;

/// Parse a history file and write both charts into `output_dir`.
///
/// # Errors
///
/// Any parse error of the history, or a render/I/O failure.
pub fn plot_lbfgs<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    input: &Path,
    output_dir: &Path,
) -> Result<RenderReport> {
    let history = load_history(input)?;
    info!(path = %input.display(), rows = history.len(), "loaded L-BFGS history");
    render_lbfgs(renderer, config, &history, &ArtifactNamer::in_dir(input, output_dir))
}

/// Render already-parsed history rows.
///
/// # Errors
///
/// A render or I/O failure, or an invalid configured threshold.
pub fn render_lbfgs<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    history: &[HistoryRecord],
    namer: &ArtifactNamer,
) -> Result<RenderReport> {
    let filter = config.stability_filter()?;
    namer.ensure_output_dir()?;

    let charts = [
        (
            ArtifactKind::LbfgsLoss,
            "Loss",
            "L-BFGS Loss Convergence",
            "f(x)",
            history.iter().map(|h| (h.iteration, h.loss)).collect::<Vec<_>>(),
        ),
        (
            ArtifactKind::LbfgsGradNorm,
            "||grad||",
            "L-BFGS Gradient Norm",
            "Gradient norm",
            history.iter().map(|h| (h.iteration, h.grad_norm)).collect(),
        ),
    ];

    let mut report = RenderReport::default();
    for (kind, name, title, y_label, points) in charts {
        let outcome = filter.apply(&Series::new(SeriesKey::named(name), points));
        if outcome.diverged {
            report.warn(renderer, DivergenceWarning::new(name));
        }
        let series = outcome
            .series
            .map(|s| vec![NamedSeries::new(name, s.xy())])
            .unwrap_or_default();
        let figure = Figure::Lines(LineChart {
            axes: Axes::new(title, "Iteration", y_label),
            y_scale: AxisScale::Linear,
            series,
        });
        report.emit(renderer, &figure, config.images.history, namer.path(&kind))?;
    }
    Ok(report)
}
