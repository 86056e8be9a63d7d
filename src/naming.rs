//! Output path construction
//!
//! Every artifact path is derived from an input file (its directory and
//! base name) and an [`ArtifactKind`] discriminator. Distinct kinds never map
//! to the same file name for one namer; keeping discriminators distinct
//! (e.g. method names) is up to the caller.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// What an output image shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactKind {
    /// All (method, lr) convergence series on one chart
    ConvergenceCombined,
    /// Convergence series of one method
    ConvergenceMethod(String),
    /// L-BFGS loss curve
    LbfgsLoss,
    /// L-BFGS gradient-norm curve
    LbfgsGradNorm,
    /// Tour diagram
    Tour,
    /// Observations only
    RegressionBefore,
    /// Observations plus fitted plane
    RegressionAfter,
    /// Lagrangian landscape for one multiplier
    Lagrangian(f64),
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConvergenceCombined => f.write_str("combined convergence plot"),
            Self::ConvergenceMethod(m) => write!(f, "convergence plot for {m}"),
            Self::LbfgsLoss => f.write_str("L-BFGS loss plot"),
            Self::LbfgsGradNorm => f.write_str("L-BFGS gradient-norm plot"),
            Self::Tour => f.write_str("tour plot"),
            Self::RegressionBefore => f.write_str("pre-regression plot"),
            Self::RegressionAfter => f.write_str("post-regression plot"),
            Self::Lagrangian(lambda) => write!(f, "Lagrangian landscape (λ = {lambda:?})"),
        }
    }
}

/// Replace anything that is not safe in a file name with `_`.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derives artifact paths for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNamer {
    stem: Option<String>,
    output_dir: PathBuf,
}

impl ArtifactNamer {
    /// Write artifacts next to `input`.
    #[must_use]
    pub fn beside(input: &Path) -> Self {
        let output_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::in_dir(input, output_dir)
    }

    /// Write artifacts for `input` into `output_dir`.
    #[must_use]
    pub fn in_dir(input: &Path, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            stem: input
                .file_stem()
                .map(|s| sanitize(&s.to_string_lossy()))
                .filter(|s| !s.is_empty()),
            output_dir: output_dir.into(),
        }
    }

    /// Write artifacts that have no input file (stdin, generated data) into
    /// `output_dir`.
    #[must_use]
    pub fn detached(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            stem: None,
            output_dir: output_dir.into(),
        }
    }

    /// Directory every path lands in.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the directory cannot be created.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    fn stemmed(&self, suffix: &str, fallback: &str) -> String {
        self.stem.as_ref().map_or_else(
            || format!("{fallback}.png"),
            |stem| format!("{stem}_{suffix}.png"),
        )
    }

    /// File name for `kind`, without the directory.
    #[must_use]
    pub fn file_name(&self, kind: &ArtifactKind) -> String {
        match kind {
            ArtifactKind::ConvergenceCombined => "convergence.png".to_string(),
            ArtifactKind::ConvergenceMethod(method) => {
                format!("convergence_{}.png", sanitize(method))
            }
            ArtifactKind::LbfgsLoss => "lbfgs_loss.png".to_string(),
            ArtifactKind::LbfgsGradNorm => "lbfgs_grad_norm.png".to_string(),
            ArtifactKind::Tour => self.stemmed("tour", "tour"),
            ArtifactKind::RegressionBefore => {
                self.stemmed("before_regression", "before_regression")
            }
            ArtifactKind::RegressionAfter => self.stemmed("after_regression", "after_regression"),
            ArtifactKind::Lagrangian(lambda) => format!("lagrangian_lambda_{lambda:?}.png"),
        }
    }

    /// Full output path for `kind`.
    #[must_use]
    pub fn path(&self, kind: &ArtifactKind) -> PathBuf {
        self.output_dir.join(self.file_name(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convergence_paths_beside_input() {
        let namer = ArtifactNamer::beside(Path::new("runs/exp1/convergence.csv"));
        assert_eq!(
            namer.path(&ArtifactKind::ConvergenceCombined),
            PathBuf::from("runs/exp1/convergence.png")
        );
        assert_eq!(
            namer.path(&ArtifactKind::ConvergenceMethod("Adam".into())),
            PathBuf::from("runs/exp1/convergence_Adam.png")
        );
    }

    #[test]
    fn test_regression_paths_use_stem() {
        let namer = ArtifactNamer::in_dir(Path::new("data/plane.tsv"), "output");
        assert_eq!(
            namer.path(&ArtifactKind::RegressionBefore),
            PathBuf::from("output/plane_before_regression.png")
        );
        assert_eq!(
            namer.path(&ArtifactKind::RegressionAfter),
            PathBuf::from("output/plane_after_regression.png")
        );
    }

    #[test]
    fn test_lagrangian_lambda_formatting() {
        let namer = ArtifactNamer::detached("output");
        assert_eq!(
            namer.file_name(&ArtifactKind::Lagrangian(1.0)),
            "lagrangian_lambda_1.0.png"
        );
        assert_eq!(
            namer.file_name(&ArtifactKind::Lagrangian(-0.5)),
            "lagrangian_lambda_-0.5.png"
        );
    }

    #[test]
    fn test_detached_tour() {
        let namer = ArtifactNamer::detached("out");
        assert_eq!(namer.path(&ArtifactKind::Tour), PathBuf::from("out/tour.png"));
    }

    #[test]
    fn test_method_names_sanitized() {
        let namer = ArtifactNamer::beside(Path::new("c.csv"));
        assert_eq!(
            namer.file_name(&ArtifactKind::ConvergenceMethod("SGD/nesterov".into())),
            "convergence_SGD_nesterov.png"
        );
    }

    #[test]
    fn test_distinct_kinds_distinct_paths() {
        let namer = ArtifactNamer::in_dir(Path::new("x/data.tsv"), "o");
        let kinds = [
            ArtifactKind::ConvergenceCombined,
            ArtifactKind::ConvergenceMethod("GD".into()),
            ArtifactKind::LbfgsLoss,
            ArtifactKind::LbfgsGradNorm,
            ArtifactKind::Tour,
            ArtifactKind::RegressionBefore,
            ArtifactKind::RegressionAfter,
            ArtifactKind::Lagrangian(0.5),
        ];
        let mut paths: Vec<PathBuf> = kinds.iter().map(|k| namer.path(k)).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), kinds.len());
    }
}
