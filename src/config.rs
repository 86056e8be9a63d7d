//! Plot configuration
//!
//! Layered with `figment`: built-in defaults, then `optviz.toml` in the
//! working directory, then an explicit `--config` file, then `OPTVIZ_*`
//! environment variables (`OPTVIZ_IMAGES__TOUR__WIDTH=800` sets a nested
//! field).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landscape::DEFAULT_LANDSCAPE_RESOLUTION;
use crate::stability::{StabilityFilter, DEFAULT_DIVERGENCE_THRESHOLD};
use crate::surface::{SurfaceReconstructor, DEFAULT_SURFACE_RESOLUTION};
use crate::{Error, Result};

/// Config file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "optviz.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "OPTVIZ_";

/// Raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl ImageSize {
    /// Size of `width × height` pixels.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `(width, height)` as the plotting backend takes it.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Image sizes per artifact family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSizes {
    /// Convergence charts
    pub convergence: ImageSize,
    /// L-BFGS history charts
    pub history: ImageSize,
    /// Tour diagrams
    pub tour: ImageSize,
    /// Landscape contours
    pub landscape: ImageSize,
    /// Regression 3D charts
    pub regression: ImageSize,
}

impl Default for ImageSizes {
    fn default() -> Self {
        Self {
            convergence: ImageSize::new(800, 600),
            history: ImageSize::new(640, 480),
            tour: ImageSize::new(600, 600),
            landscape: ImageSize::new(800, 600),
            regression: ImageSize::new(640, 480),
        }
    }
}

impl ImageSizes {
    fn all(&self) -> [(&'static str, ImageSize); 5] {
        [
            ("convergence", self.convergence),
            ("history", self.history),
            ("tour", self.tour),
            ("landscape", self.landscape),
            ("regression", self.regression),
        ]
    }
}

/// Settings shared by every pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Values above this are treated as divergent
    pub divergence_threshold: f64,
    /// Grid points per axis of the regression plane
    pub surface_resolution: usize,
    /// Grid points per axis of the Lagrangian landscape
    pub landscape_resolution: usize,
    /// Colour levels of filled contours
    pub contour_levels: usize,
    /// Where artifacts without a natural location are written
    pub output_dir: PathBuf,
    /// Raster sizes
    pub images: ImageSizes,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            divergence_threshold: DEFAULT_DIVERGENCE_THRESHOLD,
            surface_resolution: DEFAULT_SURFACE_RESOLUTION,
            landscape_resolution: DEFAULT_LANDSCAPE_RESOLUTION,
            contour_levels: 100,
            output_dir: PathBuf::from("output"),
            images: ImageSizes::default(),
        }
    }
}

impl PlotConfig {
    /// Load layered configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if `explicit` is given but missing
    /// - [`Error::Config`] if a layer cannot be parsed or a value is out of
    ///   range
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            debug!(path = %local.display(), "merging working-directory config");
            figment = figment.merge(Toml::file(local));
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Extract and validate from an already-assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on extraction failure or an invalid value.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        StabilityFilter::new(self.divergence_threshold)?;
        SurfaceReconstructor::new(self.surface_resolution)?;
        if self.landscape_resolution < 2 {
            return Err(Error::Config(format!(
                "landscape resolution must be at least 2, got {}",
                self.landscape_resolution
            )));
        }
        if self.contour_levels == 0 {
            return Err(Error::Config("contour levels must be positive".to_string()));
        }
        for (name, size) in self.images.all() {
            if size.width == 0 || size.height == 0 {
                return Err(Error::Config(format!(
                    "image size `{name}` must be non-zero, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        Ok(())
    }

    /// Override the divergence threshold.
    #[must_use]
    pub const fn with_divergence_threshold(mut self, threshold: f64) -> Self {
        self.divergence_threshold = threshold;
        self
    }

    /// Filter configured with this threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the threshold is invalid.
    pub fn stability_filter(&self) -> Result<StabilityFilter> {
        StabilityFilter::new(self.divergence_threshold)
    }

    /// Reconstructor configured with this resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the resolution is invalid.
    pub fn surface_reconstructor(&self) -> Result<SurfaceReconstructor> {
        SurfaceReconstructor::new(self.surface_resolution)
    }
}
