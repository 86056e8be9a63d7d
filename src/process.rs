//! Train-and-plot orchestration
//!
//! Runs the external linear-regression trainer as one blocking child
//! process, reads the coefficients it writes, then renders the regression
//! charts in-process:
//!
//! ```text
//! <build_dir>/train_linear_regression <data> <output_dir>
//!        │
//!        └──► <output_dir>/beta.txt ──► PlaneFit ──► regression charts
//! ```
//!
//! Any failure aborts the remaining steps. There is no retry.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::PlotConfig;
use crate::parse::load_plane_fit;
use crate::pipeline::{plot_regression, RenderReport};
use crate::record::PlaneFit;
use crate::render::PlotRenderer;
use crate::{Error, Result};

/// File name of the trainer inside the build directory.
pub const TRAINER_NAME: &str = "train_linear_regression";

/// Coefficient file the trainer writes into the output directory.
pub const BETA_FILE_NAME: &str = "beta.txt";

/// One train-then-plot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRun {
    data: PathBuf,
    build_dir: PathBuf,
    output_dir: PathBuf,
}

fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl TrainingRun {
    /// Describe a run over `data`, with the trainer in `build_dir` writing
    /// into `output_dir`.
    #[must_use]
    pub fn new(
        data: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data: data.into(),
            build_dir: build_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Path of the trainer executable.
    #[must_use]
    pub fn trainer(&self) -> PathBuf {
        self.build_dir.join(TRAINER_NAME)
    }

    /// Path the coefficients are read from.
    #[must_use]
    pub fn beta_file(&self) -> PathBuf {
        self.output_dir.join(BETA_FILE_NAME)
    }

    /// Check the directories, data file and trainer before anything runs.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] for a missing directory, data file or trainer
    /// - [`Error::NotExecutable`] if the trainer lacks execute permission
    pub fn validate(&self) -> Result<()> {
        require_dir(&self.build_dir)?;
        require_dir(&self.output_dir)?;
        if !self.data.is_file() {
            return Err(Error::FileNotFound {
                path: self.data.clone(),
            });
        }

        let trainer = self.trainer();
        if !trainer.is_file() {
            return Err(Error::FileNotFound { path: trainer });
        }
        if !is_executable(&trainer) {
            return Err(Error::NotExecutable { path: trainer });
        }
        Ok(())
    }

    /// Run the trainer and wait for it.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if it cannot be spawned, [`Error::ExternalProcess`] on a
    /// non-zero exit or a signal.
    pub fn train(&self) -> Result<()> {
        let trainer = self.trainer();
        info!(
            program = %trainer.display(),
            data = %self.data.display(),
            output_dir = %self.output_dir.display(),
            "running trainer"
        );

        let status = Command::new(&trainer)
            .arg(&self.data)
            .arg(&self.output_dir)
            .status()?;
        debug!(%status, "trainer finished");

        if status.success() {
            Ok(())
        } else {
            Err(Error::ExternalProcess {
                program: trainer.display().to_string(),
                code: status.code(),
            })
        }
    }

    /// Read the coefficients the trainer wrote.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] without `beta.txt`, [`Error::Schema`] with
    /// fewer than two coefficient lines, [`Error::MalformedValue`] for a
    /// non-numeric one.
    pub fn read_fit(&self) -> Result<PlaneFit> {
        let fit = load_plane_fit(&self.beta_file())?;
        info!(beta0 = fit.beta0, beta1 = fit.beta1, "read coefficients");
        Ok(fit)
    }

    /// Validate, train, read the fit and render the regression charts into
    /// the output directory.
    ///
    /// # Errors
    ///
    /// The first failing step's error.
    pub fn run<R: PlotRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        config: &PlotConfig,
    ) -> Result<RenderReport> {
        self.validate()?;
        self.train()?;
        let fit = self.read_fit()?;
        plot_regression(renderer, config, &self.data, fit, &self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::RecordingRenderer;
    use std::fs;

    fn layout() -> (tempfile::TempDir, TrainingRun) {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        let out = dir.path().join("out");
        fs::create_dir_all(&build).unwrap();
        fs::create_dir_all(&out).unwrap();
        let data = dir.path().join("data.tsv");
        fs::write(&data, "1\t2\t3\n").unwrap();
        let run = TrainingRun::new(data, build, out);
        (dir, run)
    }

    #[test]
    fn test_missing_build_dir() {
        let run = TrainingRun::new("d.tsv", "/nonexistent/build", "/tmp");
        let err = run.validate().unwrap_err();
        assert!(matches!(err, Error::FileNotFound { path } if path == Path::new("/nonexistent/build")));
    }

    #[test]
    fn test_missing_trainer() {
        let (_dir, run) = layout();
        let err = run.validate().unwrap_err();
        assert!(matches!(err, Error::FileNotFound { path } if path.ends_with(TRAINER_NAME)));
    }

    #[cfg(unix)]
    #[test]
    fn test_trainer_without_execute_bit() {
        let (_dir, run) = layout();
        fs::write(run.trainer(), "#!/bin/sh\n").unwrap();
        let err = run.validate().unwrap_err();
        assert!(matches!(err, Error::NotExecutable { .. }));
    }

    #[cfg(unix)]
    fn install_trainer(run: &TrainingRun, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let trainer = run.trainer();
        fs::write(&trainer, script).unwrap();
        fs::set_permissions(&trainer, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_trainer_stops_the_run() {
        let (_dir, run) = layout();
        install_trainer(&run, "#!/bin/sh\nexit 3\n");

        let mut renderer = RecordingRenderer::default();
        let err = run.run(&mut renderer, &PlotConfig::default()).unwrap_err();
        match err {
            Error::ExternalProcess { program, code } => {
                assert!(program.ends_with(TRAINER_NAME));
                assert_eq!(code, Some(3));
            }
            other => panic!("expected an external process error, got {other:?}"),
        }
        assert!(!run.beta_file().exists());
        assert!(renderer.rendered.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_trainer_renders_both_charts() {
        let (_dir, run) = layout();
        install_trainer(&run, "#!/bin/sh\nprintf '0.5\\n-1.25\\n' > \"$2/beta.txt\"\n");

        let mut renderer = RecordingRenderer::default();
        let report = run.run(&mut renderer, &PlotConfig::default()).unwrap();
        assert_eq!(run.read_fit().unwrap(), PlaneFit::new(0.5, -1.25));
        assert_eq!(report.written, vec![
            run.output_dir.join("data_before_regression.png"),
            run.output_dir.join("data_after_regression.png"),
        ]);
        assert_eq!(renderer.rendered.len(), 2);
    }

    #[test]
    fn test_read_fit_needs_two_lines() {
        let (_dir, run) = layout();
        fs::write(run.beta_file(), "0.5\n").unwrap();
        assert!(matches!(run.read_fit().unwrap_err(), Error::Schema { .. }));

        fs::write(run.beta_file(), "\n0.5\n\n-1.25\n").unwrap();
        assert_eq!(run.read_fit().unwrap(), PlaneFit::new(0.5, -1.25));
    }
}
