//! Error types for NAF extraction

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for NAF operations
pub type Result<T> = std::result::Result<T, NafError>;

/// Main error type for NAF extraction
///
/// Every variant is fatal for a run. Malformed rows and merge misses are not
/// errors; builders skip and count them instead.
#[derive(Error, Debug)]
pub enum NafError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Download of {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("Unexpected status {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Row {row}: {level} code '{code}' arrived before any {missing} was established")]
    Ordering {
        row: usize,
        code: String,
        level: &'static str,
        missing: &'static str,
    },

    #[error("Cannot write output at {}: {source}", path.display())]
    OutputPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NafError {
    /// Wrap an IO error with the output path it happened on
    pub fn output_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NafError::OutputPath {
            path: path.into(),
            source,
        }
    }
}
