//! Error types for fgmax input and output handling.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while writing fgmax input or decoding fgmax output.
#[derive(Error, Debug)]
pub enum FgmaxError {
    /// A required descriptor attribute is unset.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The point style is not supported by the requested operation.
    #[error("{operation} not implemented for point_style {style}")]
    UnsupportedPointStyle { style: i64, operation: &'static str },

    /// An expected file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The valuemax table has a column count that matches no known layout.
    #[error("unexpected number of columns {ncols} in file {}", path.display())]
    UnexpectedColumnCount { ncols: usize, path: PathBuf },

    /// The number of rows does not fill the grid shape.
    #[error("{} has {rows} rows, grid shape {shape:?} needs {expected}", path.display())]
    ShapeMismatch {
        path: PathBuf,
        rows: usize,
        shape: Vec<usize>,
        expected: usize,
    },

    /// A numeric table is ragged, empty, or otherwise unusable.
    #[error("malformed table {}: {message}", path.display())]
    MalformedTable { path: PathBuf, message: String },

    /// A token in an input file could not be parsed.
    #[error("parse error in {} line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// YAML configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FgmaxError {
    /// Create a NotConfigured error.
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    /// Create an UnsupportedPointStyle error.
    pub fn unsupported_style(style: i64, operation: &'static str) -> Self {
        Self::UnsupportedPointStyle { style, operation }
    }

    /// Create a MalformedTable error.
    pub fn malformed(path: &Path, msg: impl Into<String>) -> Self {
        Self::MalformedTable {
            path: path.to_path_buf(),
            message: msg.into(),
        }
    }

    /// Create a Parse error.
    pub fn parse(path: &Path, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: msg.into(),
        }
    }
}

impl From<serde_yaml::Error> for FgmaxError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for fgmax operations.
pub type Result<T> = std::result::Result<T, FgmaxError>;
