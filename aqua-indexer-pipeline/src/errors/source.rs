//! Error types for reading the input file.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the record source. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file does not exist or cannot be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row is missing or does not declare the required columns.
    #[error("Invalid header row: {0}")]
    Header(String),

    /// The file became unreadable or corrupt part way through.
    #[error("Failed to read data row {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl SourceError {
    /// Create a header error.
    pub fn header(msg: impl Into<String>) -> Self {
        Self::Header(msg.into())
    }
}
