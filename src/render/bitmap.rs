//! PNG rendering with `plotters`

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use super::{AxisScale, ContourChart, Figure, LineChart, NamedSeries, PlotRenderer, ScatterChart3d, TourDiagram};
use crate::config::ImageSize;
use crate::field::ScalarField;
use crate::record::min_max;
use crate::{Error, Result};

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const NODE_RADIUS: i32 = 10;

/// Draws figures into PNG files.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRenderer;

impl BitmapRenderer {
    /// Create a renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PlotRenderer for BitmapRenderer {
    fn render(&mut self, figure: &Figure, size: ImageSize, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, size.dimensions()).into_drawing_area();
        let drawn = match figure {
            Figure::Lines(chart) => draw_lines(&root, chart),
            Figure::Tour(diagram) => draw_tour(&root, diagram),
            Figure::Contour(chart) => draw_contour(&root, chart, size),
            Figure::Scatter3d(chart) => draw_scatter3d(&root, chart),
        }
        .and_then(|()| root.present().map_err(Into::into));

        drawn.map_err(|e| Error::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), title = figure.title(), "rendered figure");
        Ok(())
    }
}

/// Finite extent of `values`, widened so that a flat range still draws.
fn padded_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match min_max(values.filter(|v| v.is_finite())) {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => {
            let pad = v.abs().max(1.0) * 0.5;
            (v - pad, v + pad)
        }
        None => (0.0, 1.0),
    }
}

/// Split a polyline into the runs whose points lie inside `[lo, hi]` on y.
fn runs_within(points: &[(f64, f64)], lo: f64, hi: f64) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        if (lo..=hi).contains(&y) {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Positive extent of `values` widened out to whole decades, so a log axis
/// always carries at least one labelled power of ten.
fn decade_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match min_max(values.filter(|v| v.is_finite() && *v > 0.0)) {
        Some((lo, hi)) => {
            let lo = 10f64.powf(lo.log10().floor());
            let hi = 10f64.powf(hi.log10().ceil());
            if hi > lo {
                (lo, hi)
            } else {
                (lo / 10.0, hi * 10.0)
            }
        }
        None => (1.0, 10.0),
    }
}

fn draw_lines(root: &DrawingArea<BitMapBackend<'_>, Shift>, chart: &LineChart) -> DrawResult<()> {
    root.fill(&WHITE)?;

    let (x_lo, x_hi) =
        padded_extent(chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let mut builder = ChartBuilder::on(root);
    builder
        .caption(&chart.axes.title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70);

    match chart.y_scale {
        AxisScale::Linear => {
            let (y_lo, y_hi) =
                padded_extent(chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
            let mut ctx = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
            ctx.configure_mesh()
                .x_desc(chart.axes.x_label.as_str())
                .y_desc(chart.axes.y_label.as_str())
                .draw()?;
            draw_named_series(&mut ctx, &chart.series)
        }
        AxisScale::Log => {
            let series: Vec<NamedSeries> = chart
                .series
                .iter()
                .map(|s| {
                    let points: Vec<(f64, f64)> =
                        s.points.iter().copied().filter(|&(_, y)| y > 0.0).collect();
                    if points.len() < s.points.len() {
                        debug!(series = %s.label, "dropped non-positive values from log axis");
                    }
                    NamedSeries::new(s.label.clone(), points)
                })
                .collect();
            let (y_lo, y_hi) =
                decade_extent(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
            let mut ctx = builder.build_cartesian_2d(x_lo..x_hi, (y_lo..y_hi).log_scale())?;
            ctx.configure_mesh()
                .x_desc(chart.axes.x_label.as_str())
                .y_desc(chart.axes.y_label.as_str())
                .draw()?;
            draw_named_series(&mut ctx, &series)
        }
    }
}

fn draw_named_series<'a, CT>(
    ctx: &mut ChartContext<'a, BitMapBackend<'a>, CT>,
    series: &[NamedSeries],
) -> DrawResult<()>
where
    CT: CoordTranslate<From = (f64, f64)>,
{
    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        ctx.draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if !series.is_empty() {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 12))
            .draw()?;
    }
    Ok(())
}

fn draw_tour(root: &DrawingArea<BitMapBackend<'_>, Shift>, diagram: &TourDiagram) -> DrawResult<()> {
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(root)
        .caption(&diagram.title, (FONT, 20))
        .margin(20)
        .build_cartesian_2d(-1.2f64..1.2f64, -1.2f64..1.2f64)?;

    let grey = RGBColor(160, 160, 160);
    ctx.draw_series(
        diagram
            .background_edges
            .iter()
            .map(|segment| PathElement::new(segment.to_vec(), grey.stroke_width(1))),
    )?;
    ctx.draw_series(
        diagram
            .tour_edges
            .iter()
            .map(|segment| PathElement::new(segment.to_vec(), RED.stroke_width(3))),
    )?;

    let label_style = TextStyle::from((FONT, 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    ctx.draw_series(diagram.nodes.iter().enumerate().map(|(i, &p)| {
        EmptyElement::at(p)
            + Circle::new((0, 0), NODE_RADIUS, WHITE.filled())
            + Circle::new((0, 0), NODE_RADIUS, BLACK.stroke_width(1))
            + Text::new(i.to_string(), (0, 0), label_style.clone())
    }))?;
    Ok(())
}

/// Five-stop approximation of the viridis colour map, `t` in `[0, 1]`.
fn viridis(t: f64) -> RGBColor {
    const STOPS: [(f64, f64, f64); 5] = [
        (68.0, 1.0, 84.0),
        (59.0, 82.0, 139.0),
        (33.0, 145.0, 140.0),
        (94.0, 201.0, 98.0),
        (253.0, 231.0, 37.0),
    ];
    let scaled = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let k = (scaled.floor() as usize).min(STOPS.len() - 2);
    let f = scaled - k as f64;
    let (a, b) = (STOPS[k], STOPS[k + 1]);
    let mix = |u: f64, v: f64| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let c = (v - u).mul_add(f, u).round() as u8;
        c
    };
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Colour of the band `value` falls in when `[lo, hi]` is cut into `levels`.
#[allow(clippy::cast_precision_loss)]
fn band_color(value: f64, lo: f64, hi: f64, levels: usize) -> RGBColor {
    let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let band = ((t.clamp(0.0, 1.0) * levels as f64).floor() as usize).min(levels - 1);
    viridis((band as f64 + 0.5) / levels as f64)
}

/// Cell boundaries around each grid coordinate.
fn cell_edges(axis: &[f64]) -> Vec<f64> {
    match axis {
        [] => Vec::new(),
        [only] => vec![only - 0.5, only + 0.5],
        _ => {
            let mut edges = Vec::with_capacity(axis.len() + 1);
            edges.push(axis[0] - (axis[1] - axis[0]) / 2.0);
            edges.extend(axis.windows(2).map(|w| (w[0] + w[1]) / 2.0));
            let n = axis.len();
            edges.push(axis[n - 1] + (axis[n - 1] - axis[n - 2]) / 2.0);
            edges
        }
    }
}

fn draw_contour(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &ContourChart,
    size: ImageSize,
) -> DrawResult<()> {
    root.fill(&WHITE)?;
    let (main, bar) = root.split_horizontally(size.width * 85 / 100);

    let field: &ScalarField = &chart.field;
    let levels = chart.levels.max(1);
    let x_edges = cell_edges(field.xs());
    let y_edges = cell_edges(field.ys());
    let (x_lo, x_hi) = (x_edges.first().copied().unwrap_or(0.0), x_edges.last().copied().unwrap_or(1.0));
    let (y_lo, y_hi) = (y_edges.first().copied().unwrap_or(0.0), y_edges.last().copied().unwrap_or(1.0));
    let (v_lo, v_hi) = field.value_range().unwrap_or((0.0, 1.0));

    let mut ctx = ChartBuilder::on(&main)
        .caption(&chart.axes.title, (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    ctx.configure_mesh()
        .disable_mesh()
        .x_desc(chart.axes.x_label.as_str())
        .y_desc(chart.axes.y_label.as_str())
        .draw()?;

    let (nx, ny) = field.shape();
    ctx.draw_series(
        (0..ny)
            .flat_map(|j| (0..nx).map(move |i| (i, j)))
            .map(|(i, j)| {
                let color = band_color(field.value(i, j), v_lo, v_hi, levels);
                Rectangle::new(
                    [(x_edges[i], y_edges[j]), (x_edges[i + 1], y_edges[j + 1])],
                    color.filled(),
                )
            }),
    )?;

    if let Some(overlay) = &chart.overlay {
        let runs = runs_within(&overlay.points, y_lo, y_hi);
        for (k, run) in runs.into_iter().enumerate() {
            let anno = ctx.draw_series(LineSeries::new(run, RED.stroke_width(2)))?;
            if k == 0 {
                anno.label(overlay.label.as_str())
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
            }
        }
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    // Colour bar
    let (b_lo, b_hi) = if v_hi > v_lo { (v_lo, v_hi) } else { (v_lo - 0.5, v_lo + 0.5) };
    let mut bar_ctx = ChartBuilder::on(&bar)
        .margin_top(40)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..1.0f64, b_lo..b_hi)?;
    bar_ctx
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .draw()?;
    #[allow(clippy::cast_precision_loss)]
    let step = (b_hi - b_lo) / levels as f64;
    bar_ctx.draw_series((0..levels).map(|k| {
        #[allow(clippy::cast_precision_loss)]
        let lo = step.mul_add(k as f64, b_lo);
        Rectangle::new(
            [(0.0, lo), (1.0, lo + step)],
            band_color(lo + step / 2.0, b_lo, b_hi, levels).filled(),
        )
    }))?;
    Ok(())
}

fn draw_scatter3d(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &ScatterChart3d,
) -> DrawResult<()> {
    root.fill(&WHITE)?;

    // plotters draws y as the vertical axis: data (x, y, z) maps to (x, z, y).
    let surface = chart.surface.as_ref().map(|(_, field)| field);
    let (x_lo, x_hi) = padded_extent(
        chart
            .points
            .iter()
            .map(|p| p.0)
            .chain(surface.into_iter().flat_map(|f| f.xs().iter().copied())),
    );
    let (y_lo, y_hi) = padded_extent(
        chart
            .points
            .iter()
            .map(|p| p.1)
            .chain(surface.into_iter().flat_map(|f| f.ys().iter().copied())),
    );
    let (z_lo, z_hi) = padded_extent(
        chart.points.iter().map(|p| p.2).chain(
            surface
                .and_then(ScalarField::value_range)
                .into_iter()
                .flat_map(|(lo, hi)| [lo, hi]),
        ),
    );

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 20))
        .margin(20)
        .build_cartesian_3d(x_lo..x_hi, z_lo..z_hi, y_lo..y_hi)?;
    ctx.with_projection(|mut pb| {
        pb.pitch = 0.35;
        pb.yaw = 0.6;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    ctx.configure_axes().draw()?;

    let caption_style = TextStyle::from((FONT, 14).into_font()).color(&BLACK);
    let [x_label, y_label, z_label] = &chart.axis_labels;
    ctx.draw_series([
        Text::new(x_label.clone(), (x_hi, z_lo, y_lo), caption_style.clone()),
        Text::new(y_label.clone(), (x_lo, z_lo, y_hi), caption_style.clone()),
        Text::new(z_label.clone(), (x_lo, z_hi, y_lo), caption_style.clone()),
    ])?;

    if let Some((label, field)) = &chart.surface {
        let (nx, ny) = field.shape();
        let (xs, ys) = (field.xs(), field.ys());
        let plane = GREEN.mix(0.5);
        ctx.draw_series(
            (0..ny.saturating_sub(1))
                .flat_map(|j| (0..nx.saturating_sub(1)).map(move |i| (i, j)))
                .map(|(i, j)| {
                    Polygon::new(
                        vec![
                            (xs[i], field.value(i, j), ys[j]),
                            (xs[i + 1], field.value(i + 1, j), ys[j]),
                            (xs[i + 1], field.value(i + 1, j + 1), ys[j + 1]),
                            (xs[i], field.value(i, j + 1), ys[j + 1]),
                        ],
                        plane.filled(),
                    )
                }),
        )?
        .label(label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], plane.filled()));
    }

    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&(x, y, z)| Circle::new((x, z, y), 3, BLUE.filled())),
    )?
    .label(chart.points_label.as_str())
    .legend(|(x, y)| Circle::new((x + 5, y), 3, BLUE.filled()));

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
