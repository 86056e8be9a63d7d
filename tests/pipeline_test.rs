//! Integration tests for the parse → group → filter → render pipelines
//!
//! Inputs are written to temporary directories and rendered through a
//! recording renderer, so no raster backend or fonts are needed.

use std::fs;
use std::path::{Path, PathBuf};

use optviz::config::{ImageSize, PlotConfig};
use optviz::landscape::Bounds;
use optviz::pipeline::{plot_convergence, plot_lagrangian, plot_lbfgs, plot_regression, plot_tour};
use optviz::record::PlaneFit;
use optviz::render::{Figure, PlotRenderer};
use optviz::{Error, Result};

/// Keeps every figure instead of drawing it.
#[derive(Default)]
struct RecordingRenderer {
    rendered: Vec<(PathBuf, Figure, ImageSize)>,
}

impl PlotRenderer for RecordingRenderer {
    fn render(&mut self, figure: &Figure, size: ImageSize, path: &Path) -> Result<()> {
        self.rendered.push((path.to_path_buf(), figure.clone(), size));
        Ok(())
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn line_points(figure: &Figure) -> Vec<(String, Vec<(f64, f64)>)> {
    match figure {
        Figure::Lines(chart) => chart
            .series
            .iter()
            .map(|s| (s.label.clone(), s.points.clone()))
            .collect(),
        other => panic!("expected a line chart, got {other:?}"),
    }
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_convergence_round_trip_with_divergence() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "convergence.csv",
        "method,lr,iter,fval\nA,0.1,0,100.0\nA,0.1,1,50.0\nA,0.1,2,1e12\n",
    );

    let mut renderer = RecordingRenderer::default();
    let report = plot_convergence(&mut renderer, &PlotConfig::default(), &input, None).unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].label(), "A, lr=0.1");
    assert_eq!(
        report.warnings[0].to_string(),
        "possible divergence in A, lr=0.1"
    );

    let combined = line_points(&renderer.rendered[0].1);
    assert_eq!(combined, vec![(
        "A, lr=0.1".to_string(),
        vec![(0.0, 100.0), (1.0, 50.0)]
    )]);
    assert_eq!(report.written, vec![
        dir.path().join("convergence.png"),
        dir.path().join("convergence_A.png"),
    ]);
}

#[test]
fn test_convergence_missing_fval_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "c.csv", "method,lr,iter\nA,0.1,0\n");

    let mut renderer = RecordingRenderer::default();
    let err = plot_convergence(&mut renderer, &PlotConfig::default(), &input, None).unwrap_err();
    match err {
        Error::Schema { detail, .. } => assert!(detail.contains("fval")),
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(renderer.rendered.is_empty());
}

#[test]
fn test_convergence_header_only_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "c.csv", "method,lr,iter,fval\n");

    let mut renderer = RecordingRenderer::default();
    let err = plot_convergence(&mut renderer, &PlotConfig::default(), &input, None).unwrap_err();
    assert!(matches!(err, Error::EmptyInput { .. }));
}

#[test]
fn test_convergence_malformed_value_names_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "c.csv", "method,lr,iter,fval\nA,0.1,0,1.0\nA,0.1,one,2.0\n");

    let mut renderer = RecordingRenderer::default();
    let err = plot_convergence(&mut renderer, &PlotConfig::default(), &input, None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("row 3"), "{message}");
    assert!(message.contains("iter"), "{message}");
}

#[test]
fn test_convergence_missing_file() {
    let mut renderer = RecordingRenderer::default();
    let err = plot_convergence(
        &mut renderer,
        &PlotConfig::default(),
        Path::new("/nonexistent/convergence.csv"),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_convergence_explicit_output_and_sorted_legend() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "c.csv",
        "method,lr,iter,fval\nSGD,0.1,1,2\nSGD,0.1,0,3\nAdam,0.01,0,1\nSGD,0.01,0,4\n",
    );
    let output = dir.path().join("plots/all.png");

    let mut renderer = RecordingRenderer::default();
    let report =
        plot_convergence(&mut renderer, &PlotConfig::default(), &input, Some(&output)).unwrap();

    assert_eq!(report.written[0], output);
    assert!(dir.path().join("plots").is_dir());
    let combined = line_points(&renderer.rendered[0].1);
    let labels: Vec<&str> = combined.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["Adam, lr=0.01", "SGD, lr=0.01", "SGD, lr=0.1"]);
    // points re-ordered by iteration
    assert_eq!(combined[2].1, vec![(0.0, 3.0), (1.0, 2.0)]);
    assert_eq!(renderer.rendered[0].2, ImageSize::new(800, 600));
}

#[test]
fn test_configured_threshold_applies() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "c.csv", "method,lr,iter,fval\nGD,1,0,5\nGD,1,1,500\n");
    let config = PlotConfig::default().with_divergence_threshold(100.0);

    let mut renderer = RecordingRenderer::default();
    let report = plot_convergence(&mut renderer, &config, &input, None).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(line_points(&renderer.rendered[0].1)[0].1, vec![(0.0, 5.0)]);
}

// ============================================================================
// L-BFGS history
// ============================================================================

#[test]
fn test_lbfgs_history() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "history.csv",
        "iteration,loss,grad_norm\n0,4.0,2.0\n1,1.0,0.5\n",
    );
    let out = dir.path().join("out");

    let mut renderer = RecordingRenderer::default();
    let report = plot_lbfgs(&mut renderer, &PlotConfig::default(), &input, &out).unwrap();
    assert_eq!(report.written, vec![out.join("lbfgs_loss.png"), out.join("lbfgs_grad_norm.png")]);
    assert_eq!(line_points(&renderer.rendered[0].1), vec![(
        "Loss".to_string(),
        vec![(0.0, 4.0), (1.0, 1.0)]
    )]);
}

#[test]
fn test_lbfgs_wrong_field_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "history.csv", "iteration,loss,grad_norm\n0,4.0\n");

    let mut renderer = RecordingRenderer::default();
    let err = plot_lbfgs(&mut renderer, &PlotConfig::default(), &input, dir.path()).unwrap_err();
    assert!(matches!(err, Error::MalformedValue { .. }));
}

// ============================================================================
// Tour
// ============================================================================

#[test]
fn test_tour_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "solution.json",
        r#"{"N":3,"cost":10,"tour":[0,1,2],"length":3.0}"#,
    );

    let mut renderer = RecordingRenderer::default();
    let report = plot_tour(&mut renderer, &PlotConfig::default(), &input, None).unwrap();
    assert_eq!(report.written, vec![dir.path().join("solution_tour.png")]);

    let Figure::Tour(diagram) = &renderer.rendered[0].1 else {
        panic!("expected a tour diagram");
    };
    assert_eq!(diagram.background_edges.len(), 3);
    assert_eq!(diagram.tour_edges.len(), 3);
    assert!(diagram.title.contains("3.0000"));
}

#[test]
fn test_tour_wrong_length() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "s.json", r#"{"N":4,"cost":1,"tour":[0,1,2]}"#);

    let mut renderer = RecordingRenderer::default();
    let err = plot_tour(&mut renderer, &PlotConfig::default(), &input, None).unwrap_err();
    assert!(matches!(err, Error::InvalidTour(_)));
}

#[test]
fn test_tour_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "s.json", r#"{"N":3,"tour":[0,1,2]}"#);

    let mut renderer = RecordingRenderer::default();
    let err = plot_tour(&mut renderer, &PlotConfig::default(), &input, None).unwrap_err();
    assert!(err.to_string().contains("`cost`"));
}

// ============================================================================
// Regression and landscape
// ============================================================================

#[test]
fn test_regression_headerless_rows_and_short_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "plane.tsv", "1\t2\t5\n3\n2\t1\t4\n");
    let out = dir.path().join("out");

    let mut renderer = RecordingRenderer::default();
    let report = plot_regression(
        &mut renderer,
        &PlotConfig::default(),
        &input,
        PlaneFit::new(1.0, 2.0),
        &out,
    )
    .unwrap();

    assert_eq!(report.written.len(), 2);
    let Figure::Scatter3d(after) = &renderer.rendered[1].1 else {
        panic!("expected a 3D scatter");
    };
    assert_eq!(after.points, vec![(1.0, 2.0, 5.0), (2.0, 1.0, 4.0)]);
    assert!(after.surface.is_some());
}

#[test]
fn test_regression_without_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "plane.tsv", "x1\tx2\ty\n");

    let mut renderer = RecordingRenderer::default();
    let err = plot_regression(
        &mut renderer,
        &PlotConfig::default(),
        &input,
        PlaneFit::new(1.0, 2.0),
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::EmptyDataset(_)));
}

#[test]
fn test_lagrangian_landscape() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PlotConfig::default();
    config.landscape_resolution = 16;
    let bounds = Bounds::new(-1.5, 1.5, -2.0, 2.0).unwrap();

    let mut renderer = RecordingRenderer::default();
    let report = plot_lagrangian(&mut renderer, &config, bounds, 0.5, dir.path()).unwrap();
    assert_eq!(report.written, vec![dir.path().join("lagrangian_lambda_0.5.png")]);
    assert!(matches!(renderer.rendered[0].1, Figure::Contour(_)));
}

#[test]
fn test_lagrangian_bounds_are_usage_errors() {
    let err = Bounds::new(1.0, -1.0, 0.0, 1.0).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
