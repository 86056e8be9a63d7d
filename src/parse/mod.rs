//! Result file parsers
//!
//! Each format has a reader-level entry point (`read_*`, takes any `Read`
//! plus an origin label used in error messages) and a path-level one
//! (`load_*`) that reports a missing file as [`Error::FileNotFound`] before
//! touching it.
//!
//! | Format             | Delimiter | Header                   | Reader                 |
//! |--------------------|-----------|--------------------------|------------------------|
//! | convergence table  | `,`       | required, names checked  | [`read_convergence`]   |
//! | L-BFGS history     | `,`       | skipped, names ignored   | [`read_history`]       |
//! | regression data    | `\t`      | optional, auto-detected  | [`read_regression`]    |
//! | fitted coefficients| newline   | none                     | [`read_plane_fit`]     |
//! | tour solution      | JSON      | n/a                      | [`read_tour`]          |

mod delimited;
mod tour;

pub use delimited::{
    load_convergence, load_history, load_plane_fit, load_regression, read_convergence,
    read_history, read_plane_fit, read_regression, CONVERGENCE_COLUMNS,
};
pub use tour::{load_tour, read_tour, STDIN_PATH};

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::{Error, Result};

/// Origin label for error messages.
pub(crate) fn origin_of(path: &Path) -> String {
    path.display().to_string()
}

/// Open an input file, distinguishing "missing" from other IO failures.
pub(crate) fn open_input(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(File::open(path)?)
}

/// Parse one trimmed cell, mapping failure to [`Error::MalformedValue`].
pub(crate) fn parse_cell<T: FromStr>(
    origin: &str,
    row: usize,
    field: &str,
    raw: Option<&str>,
) -> Result<T> {
    let raw = raw.unwrap_or("").trim();
    raw.parse::<T>()
        .map_err(|_| Error::malformed_field(origin, row, field, raw))
}
