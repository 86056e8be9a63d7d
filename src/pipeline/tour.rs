//! Tour diagrams.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{ensure_parent, RenderReport};
use crate::config::PlotConfig;
use crate::layout::TourLayout;
use crate::naming::{ArtifactKind, ArtifactNamer};
use crate::parse::{load_tour, STDIN_PATH};
use crate::record::TourSolution;
use crate::render::{Figure, PlotRenderer, TourDiagram};
use crate::Result;

/// Lay out a solution as a diagram.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidTour`] if the tour is not a permutation of
/// `0..N`.
pub fn tour_figure(solution: &TourSolution) -> Result<Figure> {
    let layout = TourLayout::from_solution(solution)?;
    Ok(Figure::Tour(TourDiagram {
        title: solution.title(),
        nodes: layout.positions().to_vec(),
        background_edges: layout
            .background_edges()
            .iter()
            .map(|&edge| layout.segment(edge))
            .collect(),
        tour_edges: layout
            .tour_edges()
            .iter()
            .map(|&edge| layout.segment(edge))
            .collect(),
    }))
}

/// Where a tour diagram goes when `output` is not given: beside the input,
/// or in the configured output directory when the input is stdin.
fn diagram_path(config: &PlotConfig, input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None if input == Path::new(STDIN_PATH) => {
            ArtifactNamer::detached(&config.output_dir).path(&ArtifactKind::Tour)
        }
        None => ArtifactNamer::beside(input).path(&ArtifactKind::Tour),
    }
}

/// Read a solution (`-` for stdin) and draw it.
///
/// Without `output` the diagram lands beside the input, or in the configured
/// output directory when reading stdin.
///
/// # Errors
///
/// Any parse or layout error, or a render/I/O failure.
pub fn plot_tour<R: PlotRenderer + ?Sized>(
    renderer: &mut R,
    config: &PlotConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<RenderReport> {
    let solution = load_tour(input)?;
    info!(nodes = solution.node_count(), cost = solution.cost(), "loaded tour");
    let figure = tour_figure(&solution)?;

    let path = diagram_path(config, input, output);
    ensure_parent(&path)?;

    let mut report = RenderReport::default();
    report.emit(renderer, &figure, config.images.tour, path)?;
    Ok(report)
}
