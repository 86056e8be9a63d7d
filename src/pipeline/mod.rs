//! End-to-end artifact pipelines
//!
//! ```text
//! input file ──► parse ──► group ──► StabilityFilter ──┐
//!                               │                       ├──► Figure ──► PlotRenderer ──► PNG
//!                               └─► TourLayout / SurfaceReconstructor / Lagrangian ──┘
//!                                          ArtifactNamer picks every path ─────────────▲
//! ```
//!
//! Every entry point is generic over [`PlotRenderer`] and returns a
//! [`RenderReport`]; nothing here prints. Callers decide how to surface the
//! written paths and divergence warnings.

mod convergence;
mod landscape;
mod lbfgs;
mod regression;
mod tour;

pub use convergence::{plot_convergence, render_convergence, CONVERGENCE_KEYS};
pub use landscape::plot_lagrangian;
pub use lbfgs::{plot_lbfgs, render_lbfgs};
pub use regression::{plot_regression, regression_figures, render_regression};
pub use tour::{plot_tour, tour_figure};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ImageSize;
use crate::render::{Figure, PlotRenderer};
use crate::stability::DivergenceWarning;
use crate::Result;

/// What one pipeline run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Written image paths, in render order
    pub written: Vec<PathBuf>,
    /// One warning per diverging series
    pub warnings: Vec<DivergenceWarning>,
}

impl RenderReport {
    /// Render `figure` to `path` and record it.
    fn emit<R: PlotRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        figure: &Figure,
        size: ImageSize,
        path: PathBuf,
    ) -> Result<()> {
        renderer.render(figure, size, &path)?;
        info!(path = %path.display(), "saved artifact");
        self.written.push(path);
        Ok(())
    }

    /// Record a diverging series and tell the renderer about it.
    fn warn<R: PlotRenderer + ?Sized>(&mut self, renderer: &mut R, warning: DivergenceWarning) {
        warn!(series = warning.label(), "series crossed divergence threshold");
        renderer.divergence(&warning);
        self.warnings.push(warning);
    }
}

/// Create the parent directory of an explicit output path.
fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Renderer that keeps figures instead of drawing them.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub rendered: Vec<(PathBuf, Figure)>,
        pub warned: Vec<DivergenceWarning>,
    }

    impl PlotRenderer for RecordingRenderer {
        fn render(&mut self, figure: &Figure, _size: ImageSize, path: &Path) -> Result<()> {
            self.rendered.push((path.to_path_buf(), figure.clone()));
            Ok(())
        }

        fn divergence(&mut self, warning: &DivergenceWarning) {
            self.warned.push(warning.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingRenderer;
    use super::*;
    use crate::render::{Axes, AxisScale, LineChart};

    #[test]
    fn test_emit_records_path() {
        let mut renderer = RecordingRenderer::default();
        let mut report = RenderReport::default();
        let figure = Figure::Lines(LineChart {
            axes: Axes::new("t", "x", "y"),
            y_scale: AxisScale::Linear,
            series: Vec::new(),
        });
        report
            .emit(&mut renderer, &figure, ImageSize::new(10, 10), PathBuf::from("a.png"))
            .unwrap();
        assert_eq!(report.written, vec![PathBuf::from("a.png")]);
        assert_eq!(renderer.rendered.len(), 1);
    }

    #[test]
    fn test_warning_reaches_renderer() {
        let mut renderer = RecordingRenderer::default();
        let mut report = RenderReport::default();
        report.warn(&mut renderer, DivergenceWarning::new("GD, lr=1"));
        assert_eq!(report.warnings, renderer.warned);
        assert_eq!(report.warnings[0].label(), "GD, lr=1");
    }

    #[test]
    fn test_ensure_parent_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/out.png");
        ensure_parent(&target).unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
        ensure_parent(Path::new("bare.png")).unwrap();
    }
}
