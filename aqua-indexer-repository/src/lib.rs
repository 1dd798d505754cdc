//! # Aqua Indexer Repository
//!
//! This crate provides the trait and implementation for talking to the
//! search engine that stores the sensor readings. It includes the error
//! type, the `SearchEngineClient` interface, the index schema and a concrete
//! implementation for OpenSearch/Elasticsearch compatible endpoints.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::ClientConfig;
pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::{FieldType, IndexSchema, OpenSearchClient, DEFAULT_INDEX_NAME};
pub use types::EngineResponse;
