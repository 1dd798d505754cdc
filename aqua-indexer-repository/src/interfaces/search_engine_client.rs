//! Search engine client trait definition.
//!
//! This module defines the abstract interface for the two search engine
//! operations the indexer needs, allowing for different backend
//! implementations (OpenSearch, Elasticsearch, test doubles).

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::opensearch::IndexSchema;
use crate::types::EngineResponse;
use aqua_indexer_shared::FishDocument;

/// Abstract interface for search engine operations.
///
/// Implementations can be swapped for different backends (OpenSearch, mock,
/// etc.) enabling easy testing.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: a single client is shared by
/// every ingestion worker.
///
/// # Error Handling
///
/// `Err(SearchError)` is reserved for exchanges that did not complete
/// (transport failures, unusable configuration). Any HTTP status, including
/// 4xx and 5xx, is returned as `Ok(EngineResponse)`.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Name of the index this client writes to.
    fn index_name(&self) -> &str;

    /// Create the index with the given field mapping.
    ///
    /// Issues `PUT /{index}` with the schema's mapping body.
    async fn create_index(&self, schema: &IndexSchema) -> Result<EngineResponse, SearchError>;

    /// Index a single document.
    ///
    /// Issues `POST /{index}/_doc`; the search engine assigns the document ID,
    /// so repeating the call creates a second document.
    async fn index_document(&self, document: &FishDocument)
        -> Result<EngineResponse, SearchError>;
}
