//! optviz command-line entry point.

mod cli;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use optviz::config::{ImageSize, PlotConfig};
use optviz::landscape::Bounds;
use optviz::pipeline::{
    plot_convergence, plot_lagrangian, plot_lbfgs, plot_regression, plot_tour, RenderReport,
};
use optviz::process::TrainingRun;
use optviz::record::PlaneFit;
use optviz::render::{BitmapRenderer, Figure, PlotRenderer};
use optviz::stability::DivergenceWarning;

/// Prints progress to stdout as each artifact is produced.
struct ConsoleRenderer<R> {
    inner: R,
}

impl<R: PlotRenderer> PlotRenderer for ConsoleRenderer<R> {
    fn render(&mut self, figure: &Figure, size: ImageSize, path: &Path) -> optviz::Result<()> {
        self.inner.render(figure, size, path)?;
        println!("Saved: {}", path.display());
        Ok(())
    }

    fn divergence(&mut self, warning: &DivergenceWarning) {
        println!("Warning: {warning}");
        self.inner.divergence(warning);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<RenderReport> {
    let config = PlotConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut renderer = ConsoleRenderer {
        inner: BitmapRenderer::new(),
    };

    let report = match cli.command {
        Command::Convergence { input, output } => {
            plot_convergence(&mut renderer, &config, &input, output.as_deref())?
        }
        Command::Lbfgs { input, output_dir } => {
            let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            plot_lbfgs(&mut renderer, &config, &input, &dir)?
        }
        Command::Tour { input, output } => {
            plot_tour(&mut renderer, &config, &input, output.as_deref())?
        }
        Command::Regression {
            input,
            beta0,
            beta1,
            output_dir,
        } => {
            let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            plot_regression(&mut renderer, &config, &input, PlaneFit::new(beta0, beta1), &dir)?
        }
        Command::Lagrangian {
            x_min,
            x_max,
            y_min,
            y_max,
            lambda,
            output_dir,
        } => {
            let bounds = Bounds::new(x_min, x_max, y_min, y_max)?;
            let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            plot_lagrangian(&mut renderer, &config, bounds, lambda, &dir)?
        }
        Command::TrainRegression {
            data,
            build_dir,
            output_dir,
        } => {
            println!("Using build_dir = {}", build_dir.display());
            println!("Using output_dir = {}", output_dir.display());
            TrainingRun::new(data, build_dir, output_dir).run(&mut renderer, &config)?
        }
    };
    Ok(report)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse().and_then(Cli::validated) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            println!("{err}");
            return ExitCode::from(2);
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(report) => {
            tracing::debug!(
                written = report.written.len(),
                warnings = report.warnings.len(),
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<optviz::Error>()
                .map_or(1, optviz::Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
