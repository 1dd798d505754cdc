//! Error types for the aqua indexer pipeline.
//!
//! Only [`SourceError`] and [`ProvisionError`] abort a run. [`MappingError`]
//! and submission failures are recorded against the offending row and the
//! batch carries on.

mod mapping;
mod provision;
mod source;

pub use mapping::MappingError;
pub use provision::ProvisionError;
pub use source::SourceError;

use thiserror::Error;

/// Errors that can occur in the aqua indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input file could not be read.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The index could not be provisioned.
    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// A pipeline task panicked or was cancelled.
    #[error("Worker error: {0}")]
    WorkerError(String),

    /// The run report could not be written.
    #[error("Report error: {0}")]
    ReportError(String),
}

impl PipelineError {
    /// Create a worker error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::WorkerError(msg.into())
    }

    /// Create a report error.
    pub fn report(msg: impl Into<String>) -> Self {
        Self::ReportError(msg.into())
    }
}
