//! Error types for the aqua indexer repository.

mod search_error;

pub use search_error::SearchError;
