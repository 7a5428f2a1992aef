use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error type covering the different failure cases that can occur while the
/// tool ingests, normalizes, or emits season data.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("spreadsheet read error: {0}")]
    Sheet(#[from] calamine::Error),

    /// Raised when the fixed data sheet is absent from a workbook.
    #[error("missing sheet '{}' in {}", .sheet, .path.display())]
    MissingSheet { sheet: String, path: PathBuf },

    /// Raised when a file carries neither of the supported spreadsheet
    /// extensions.
    #[error("unsupported spreadsheet format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Raised when a filename stem lacks a recognizable season pattern.
    #[error("no season (expected YYYY_YYYY) in file name '{stem}'")]
    SeasonPattern { stem: String },

    /// Raised when required columns are absent from the source table. The
    /// list keeps the canonical column order.
    #[error("missing columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// Raised when the output directory cannot be created.
    #[error("cannot create output directory {}: {}", .path.display(), .source)]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Raised when the user provides an input directory that does not exist.
    #[error("input directory not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Raised when the input directory glob pattern cannot be built.
    #[error("invalid input glob: {0}")]
    Glob(#[from] glob::PatternError),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
