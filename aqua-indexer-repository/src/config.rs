//! Configuration types for the OpenSearchClient.

use std::time::Duration;

use aqua_indexer_shared::ApiKey;

use crate::opensearch::DEFAULT_INDEX_NAME;

/// Default search engine URL.
pub const DEFAULT_URL: &str = "https://localhost:9200";

/// Configuration for connecting to the search engine.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the search engine (e.g., "https://localhost:9200").
    pub url: String,
    /// Name of the index documents are written to.
    pub index_name: String,
    /// API key sent as `Authorization: ApiKey <key>`. `None` sends no
    /// authorization header.
    pub api_key: Option<ApiKey>,
    /// Verify the server's TLS certificate. Only disable this for
    /// self-signed test clusters.
    pub verify_tls: bool,
    /// Transport-level timeout applied to every request.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            api_key: None,
            verify_tls: true,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given URL and index with TLS verification on.
    pub fn new(url: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index_name: index_name.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Turn TLS certificate verification on or off.
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
