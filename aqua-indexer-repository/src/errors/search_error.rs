//! Search error types.
//!
//! This module defines the error types that can occur while talking to the
//! search engine. HTTP error statuses are not errors at this layer: they are
//! returned as an [`EngineResponse`](crate::EngineResponse) and classified by
//! the caller.

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Invalid client configuration (bad URL, unusable credential).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to establish connection to the search engine or the request
    /// did not complete.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to read the response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
