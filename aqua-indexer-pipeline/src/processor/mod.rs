//! Processor module for the aqua indexer pipeline.
//!
//! Transforms raw rows into search documents.

mod document_mapper;

pub use document_mapper::{DocumentMapper, ProcessedRow};
