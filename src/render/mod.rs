//! Rendering primitives and the renderer seam
//!
//! Pipelines describe each artifact as a [`Figure`] and hand it to a
//! [`PlotRenderer`] together with the target path. The renderer owns layout,
//! legends, axis scaling and file serialization; it knows nothing about
//! optimizers or tours. Divergence warnings are passed along only so a
//! front end can surface them as they happen.
//!
//! [`BitmapRenderer`] draws PNGs with `plotters`. Tests substitute a
//! renderer that records figures instead of drawing them.

mod bitmap;

pub use bitmap::BitmapRenderer;

use std::path::Path;

use crate::config::ImageSize;
use crate::field::ScalarField;
use crate::stability::DivergenceWarning;
use crate::Result;

/// Y-axis scaling of a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    /// Linear axis
    Linear,
    /// Base-10 logarithmic axis (values must be positive)
    Log,
}

/// A labelled polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    /// Legend text
    pub label: String,
    /// Points in drawing order
    pub points: Vec<(f64, f64)>,
}

impl NamedSeries {
    /// Create a labelled polyline.
    #[must_use]
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

/// Axis captions of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes {
    /// Chart caption
    pub title: String,
    /// Horizontal axis caption
    pub x_label: String,
    /// Vertical axis caption
    pub y_label: String,
}

impl Axes {
    /// Caption set.
    #[must_use]
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// Several named line series on shared axes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Captions
    pub axes: Axes,
    /// Y scaling
    pub y_scale: AxisScale,
    /// Series in legend order
    pub series: Vec<NamedSeries>,
}

/// Nodes on a plane with a faint background edge layer and a bold tour
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TourDiagram {
    /// Caption
    pub title: String,
    /// Node centres, drawn with their index as label
    pub nodes: Vec<(f64, f64)>,
    /// Context edges (drawn first)
    pub background_edges: Vec<[(f64, f64); 2]>,
    /// Tour edges (drawn on top)
    pub tour_edges: Vec<[(f64, f64); 2]>,
}

/// Filled contours of a scalar field with an optional overlay curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourChart {
    /// Captions
    pub axes: Axes,
    /// Sampled field
    pub field: ScalarField,
    /// Number of colour bands
    pub levels: usize,
    /// Curve drawn over the contours
    pub overlay: Option<NamedSeries>,
}

/// Observed points in 3D with an optional fitted surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart3d {
    /// Caption
    pub title: String,
    /// Captions of the x, y and z axes
    pub axis_labels: [String; 3],
    /// Legend text of the points
    pub points_label: String,
    /// Points `(x, y, z)`
    pub points: Vec<(f64, f64, f64)>,
    /// Surface `z = f(x, y)` with its legend text
    pub surface: Option<(String, ScalarField)>,
}

/// Everything a renderer can draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    /// 2D line chart
    Lines(LineChart),
    /// Node/edge diagram
    Tour(TourDiagram),
    /// Filled contour field
    Contour(ContourChart),
    /// 3D scatter with optional surface
    Scatter3d(ScatterChart3d),
}

impl Figure {
    /// Caption of the figure.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Lines(chart) => &chart.axes.title,
            Self::Tour(diagram) => &diagram.title,
            Self::Contour(chart) => &chart.axes.title,
            Self::Scatter3d(chart) => &chart.title,
        }
    }
}

/// Writes one figure to one image file.
pub trait PlotRenderer {
    /// Render `figure` at `size` into `path`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Render`] if the backend fails.
    fn render(&mut self, figure: &Figure, size: ImageSize, path: &Path) -> Result<()>;

    /// Called once per diverging series, before any figure showing it is
    /// rendered.
    fn divergence(&mut self, _warning: &DivergenceWarning) {}
}
