//! Error taxonomy for chart generation.
//!
//! Every variant aborts the whole run: this is a batch visualization
//! tool where a silently-partial chart is worse than a hard failure.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, aggregating, composing or rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The input path does not exist or cannot be read.
    #[error("input file not found or unreadable: {path}")]
    MissingFile { path: PathBuf },

    /// The file is not parseable delimited text, a required column is
    /// absent, or a numeric column holds a non-numeric value.
    #[error("malformed table {path}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },

    /// A requested quantile falls outside [0, 1].
    #[error("quantile {quantile} is outside [0, 1]")]
    InvalidStatistic { quantile: f64 },

    /// Parallel flag lists have different lengths (trace paths vs names).
    #[error("{names} name(s) supplied for {traces} execution trace(s)")]
    ConfigurationMismatch { traces: usize, names: usize },

    /// Two series would collide under one legend label.
    #[error("duplicate series label: {label:?}")]
    DuplicateLabel { label: String },

    /// The plotting backend failed while writing the image.
    #[error("chart rendering failed: {0}")]
    Render(String),
}

impl ChartError {
    /// Wraps a table-level problem for `path`.
    pub fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        ChartError::MalformedTable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
