//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client. The same wire protocol is spoken by
//! Elasticsearch, so both work as a backend.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{FieldType, IndexSchema, DEFAULT_INDEX_NAME};
