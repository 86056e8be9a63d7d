//! Command-line surface: one subcommand per artifact family.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use optviz::landscape::Bounds;

#[derive(Parser, Debug)]
#[command(name = "optviz", author, version, about = "Diagnostic plots for optimization experiments")]
pub struct Cli {
    /// Path to an extra config TOML (merged over optviz.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Reject argument combinations clap cannot express, before any I/O.
    pub fn validated(self) -> Result<Self, clap::Error> {
        if let Command::Lagrangian {
            x_min,
            x_max,
            y_min,
            y_max,
            ..
        } = self.command
        {
            if let Err(err) = Bounds::new(x_min, x_max, y_min, y_max) {
                return Err(Self::command().error(ErrorKind::ValueValidation, err));
            }
        }
        Ok(self)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convergence curves per (method, lr), combined and per method
    Convergence {
        /// Table with columns method, lr, iter, fval
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Combined chart path (default: convergence.png beside the input)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// L-BFGS loss and gradient-norm charts
    Lbfgs {
        /// History with rows iteration, loss, grad_norm
        #[arg(value_name = "HISTORY_CSV")]
        input: PathBuf,

        /// Output directory (default from config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Tour diagram from a solution JSON
    Tour {
        /// Solution file, or `-` for stdin
        #[arg(value_name = "SOLUTION_JSON")]
        input: PathBuf,

        /// Image path (default: <stem>_tour.png beside the input)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Regression scatter before and after fitting the plane
    #[command(allow_negative_numbers = true)]
    Regression {
        /// Tab-separated x1, x2, y rows
        #[arg(value_name = "DATA_TSV")]
        input: PathBuf,

        /// Coefficient of x1
        beta0: f64,

        /// Coefficient of x2
        beta1: f64,

        /// Output directory (default from config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Filled contours of the Lagrangian for one multiplier
    #[command(allow_negative_numbers = true)]
    Lagrangian {
        /// Left bound
        x_min: f64,

        /// Right bound
        x_max: f64,

        /// Bottom bound
        y_min: f64,

        /// Top bound
        y_max: f64,

        /// Multiplier λ
        lambda: f64,

        /// Output directory (default from config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Run the external trainer, then plot its regression
    TrainRegression {
        /// Tab-separated x1, x2, y rows
        #[arg(value_name = "DATA_TSV")]
        data: PathBuf,

        /// Directory holding train_linear_regression
        #[arg(value_name = "BUILD_DIR")]
        build_dir: PathBuf,

        /// Directory the trainer writes beta.txt into
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,
    },
}
