//! Convergence charts: one combined chart plus one chart per method.

use std::path::Path;

use tracing::info;

use super::{ensure_parent, RenderReport};
use crate::config::PlotConfig;
use crate::group::{split_on_first, KeySelector, Series, SeriesGrouper, SeriesMap};
use crate::naming::{ArtifactKind, ArtifactNamer};
use crate::parse::load_convergence;
use crate::record::ResultRecord;
use crate::render::{Axes, AxisScale, Figure, LineChart, NamedSeries, PlotRenderer};
use crate::Result;

/// Series identity of a convergence table: method, then learning rate.
pub const CONVERGENCE_KEYS: [KeySelector; 2] = [KeySelector::Method, KeySelector::LearningRate];

const X_LABEL: &str = "Iteration";
const Y_LABEL: &str = "f(x)";

/// Parse `input` and render its convergence charts.
///
/// The combined chart goes to `output` when given, otherwise to
/// `convergence.png` beside the input. Per-method charts always land beside
/// the input.
///
/// # Errors
///
/// Any parse error of the table, or a render/I/O failure.
pub fn plot_convergence<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<RenderReport> {
    let records = load_convergence(input)?;
    info!(path = %input.display(), records = records.len(), "loaded convergence table");

    let namer = ArtifactNamer::beside(input);
    let combined = output.map_or_else(
        || namer.path(&ArtifactKind::ConvergenceCombined),
        Path::to_path_buf,
    );
    render_convergence(renderer, config, &records, &namer, &combined)
}

fn line_chart<'a>(
    title: String,
    grouper: &SeriesGrouper,
    skip: usize,
    series: impl IntoIterator<Item = &'a Series>,
) -> Figure {
    Figure::Lines(LineChart {
        axes: Axes::new(title, X_LABEL, Y_LABEL),
        y_scale: AxisScale::Log,
        series: series
            .into_iter()
            .map(|s| NamedSeries::new(grouper.label(s.key(), skip), s.xy()))
            .collect(),
    })
}

/// Render already-parsed records.
///
/// # Errors
///
/// A render or I/O failure, or an invalid configured threshold.
pub fn render_convergence<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    records: &[ResultRecord],
    namer: &ArtifactNamer,
    combined: &Path,
) -> Result<RenderReport> {
    let filter = config.stability_filter()?;
    let grouper = SeriesGrouper::new(&CONVERGENCE_KEYS);
    let grouped = grouper.group(records);

    let (kept, warnings) = filter.apply_all(grouped.values(), |key| grouper.label(key, 0));
    let mut report = RenderReport::default();
    for warning in warnings {
        report.warn(renderer, warning);
    }

    ensure_parent(combined)?;
    let figure = line_chart("Convergence on Rosenbrock".to_string(), &grouper, 0, &kept);
    report.emit(renderer, &figure, config.images.convergence, combined.to_path_buf())?;

    // Every method in the table gets its chart, even with no series left.
    let kept: SeriesMap = kept.into_iter().map(|s| (s.key().clone(), s)).collect();
    let mut surviving = split_on_first(&kept);
    namer.ensure_output_dir()?;
    for method in split_on_first(&grouped).into_keys() {
        let series = surviving.remove(&method).unwrap_or_default();
        let method = method.to_string();
        let figure = line_chart(
            format!("Convergence of {method} on Rosenbrock"),
            &grouper,
            1,
            series,
        );
        let path = namer.path(&ArtifactKind::ConvergenceMethod(method));
        report.emit(renderer, &figure, config.images.convergence, path)?;
    }

    Ok(report)
}
