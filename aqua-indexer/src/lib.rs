//! # Aqua Indexer
//!
//! Main library for the aqua sensor indexer binary.
//!
//! This crate provides the command-line configuration, credential
//! resolution and dependency wiring for running the ingestion pipeline.

pub mod config;

pub use config::{Cli, Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during indexer initialization.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] aqua_indexer_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
