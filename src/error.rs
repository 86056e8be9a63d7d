//! Error types for optviz
//!
//! Every terminal error names the file (or `<stdin>`) it came from, plus the
//! column, key or row where one applies, so the message alone is enough to
//! find the bad input.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Optviz error types
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong argument count or type (raised before any I/O)
    #[error("usage: {0}")]
    Usage(String),

    /// Input path does not exist
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Missing path
        path: PathBuf,
    },

    /// Required column or key absent
    #[error("schema error in {origin}: {detail}")]
    Schema {
        /// File the schema was read from
        origin: String,
        /// What is missing
        detail: String,
    },

    /// Header present but no data rows
    #[error("{origin} is empty: no data rows")]
    EmptyInput {
        /// File with no data
        origin: String,
    },

    /// Non-numeric value in a numeric field
    #[error("malformed value in {origin} at {location}: {value:?}")]
    MalformedValue {
        /// File containing the value
        origin: String,
        /// Row and column, or JSON key
        location: String,
        /// Offending raw text
        value: String,
    },

    /// Tour is not a permutation of `0..N`
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    /// No observations to fit a surface over
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Child binary exited unsuccessfully
    #[error("external process `{program}` failed: {}", exit_description(*.code))]
    ExternalProcess {
        /// Program that was run
        program: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Program exists but lacks execute permission
    #[error("cannot execute {}", path.display())]
    NotExecutable {
        /// Program path
        path: PathBuf,
    },

    /// Plotting backend failure
    #[error("render error for {}: {message}", path.display())]
    Render {
        /// Target image path
        path: PathBuf,
        /// Backend message
        message: String,
    },

    /// Configuration could not be loaded or is out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited-text reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit code {c}"),
    )
}

impl Error {
    /// Shorthand for a missing delimited-text column.
    pub fn missing_column(origin: impl Into<String>, column: &str) -> Self {
        Self::Schema {
            origin: origin.into(),
            detail: format!("missing required column `{column}`"),
        }
    }

    /// Shorthand for a missing JSON key.
    pub fn missing_key(origin: impl Into<String>, key: &str) -> Self {
        Self::Schema {
            origin: origin.into(),
            detail: format!("missing required key `{key}`"),
        }
    }

    /// Shorthand for a bad delimited-text cell. `row` is the 1-based line
    /// number, header included.
    pub fn malformed_field(
        origin: impl Into<String>,
        row: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            origin: origin.into(),
            location: format!("row {row}, field `{field}`"),
            value: value.into(),
        }
    }

    /// Shorthand for a bad JSON value.
    pub fn malformed_key(origin: impl Into<String>, key: &str, value: impl Into<String>) -> Self {
        Self::MalformedValue {
            origin: origin.into(),
            location: format!("key `{key}`"),
            value: value.into(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
