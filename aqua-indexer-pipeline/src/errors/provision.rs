//! Error types for index provisioning.

use aqua_indexer_repository::SearchError;
use thiserror::Error;

/// Errors raised while creating the index. Fatal: ingestion never starts.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The search engine refused the create-index request (bad mapping,
    /// rejected credential, ...).
    #[error("Index creation rejected with status {status_code}: {body}")]
    Rejected { status_code: u16, body: String },

    /// The request did not complete.
    #[error("Index creation failed: {0}")]
    Transport(#[from] SearchError),
}
