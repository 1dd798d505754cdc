//! # Aqua Indexer Shared
//!
//! Types shared between the repository, the pipeline and the indexer binary:
//! the raw rows read from the sensor dataset, the typed document sent to the
//! search index, and the credential used to authenticate against it.

pub mod credential;
pub mod document;

pub use credential::ApiKey;
pub use document::{FishDocument, RawRow, REQUIRED_COLUMNS};
