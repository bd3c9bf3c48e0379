use std::path::PathBuf;

use thiserror::Error;

/// Typed failures of the preparation steps.
///
/// I/O and parse errors from the underlying readers are not listed here;
/// the loader and writer wrap those in `anyhow` context instead.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not numeric")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}, column '{column}': '{value}' is not an integer class label")]
    InvalidLabel {
        row: usize,
        column: String,
        value: String,
    },

    /// Thresholds are undefined when the minority class has no rows.
    #[error("no minority-class rows to derive '{feature}' bounds from")]
    NoMinorityRows { feature: String },

    #[error("row {row} has {found} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}
