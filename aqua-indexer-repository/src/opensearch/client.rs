//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cert::CertificateValidation,
    http::headers::{HeaderValue, AUTHORIZATION},
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesCreateParts,
    IndexParts, OpenSearch,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::IndexSchema;
use crate::types::EngineResponse;
use aqua_indexer_shared::FishDocument;

/// OpenSearch client implementation.
///
/// Holds one transport (and its connection pool) that is reused by every
/// request; wrap it in an `Arc` to share it between workers.
///
/// # Example
///
/// ```ignore
/// use aqua_indexer_repository::{ClientConfig, IndexSchema, OpenSearchClient, SearchEngineClient};
///
/// let config = ClientConfig::new("https://localhost:9200", "iot-fishdata")
///     .with_api_key(ApiKey::new(key));
/// let client = OpenSearchClient::new(config)?;
///
/// let response = client.create_index(&IndexSchema::fish_readings()).await?;
/// println!("{} {}", response.status_code, response.body);
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_name: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client from the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL or credential is unusable or the
    ///   transport cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(&config.url)
            .map_err(|e| SearchError::config(format!("Invalid URL {}: {}", config.url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let Some(ref api_key) = config.api_key {
            let mut value = HeaderValue::from_str(&api_key.authorization_header())
                .map_err(|e| SearchError::config(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        if !config.verify_tls {
            warn!(url = %config.url, "TLS certificate verification is disabled");
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            index = %config.index_name,
            verify_tls = config.verify_tls,
            authenticated = config.api_key.is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_name: config.index_name,
        })
    }

    /// Read status and body from a response, whatever the status.
    async fn into_engine_response(response: Response) -> Result<EngineResponse, SearchError> {
        let status_code = response.status_code().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(EngineResponse { status_code, body })
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn create_index(&self, schema: &IndexSchema) -> Result<EngineResponse, SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index_name))
            .body(schema.to_mapping())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::into_engine_response(response).await?;
        debug!(
            index = %self.index_name,
            status = response.status_code,
            "Create index request completed"
        );
        Ok(response)
    }

    async fn index_document(
        &self,
        document: &FishDocument,
    ) -> Result<EngineResponse, SearchError> {
        let response = self
            .client
            .index(IndexParts::Index(&self.index_name))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::into_engine_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_indexer_shared::ApiKey;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> OpenSearchClient {
        let config = ClientConfig::new(server.uri(), "iot-fishdata")
            .with_api_key(ApiKey::new("c2VjcmV0"));
        OpenSearchClient::new(config).unwrap()
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let result = OpenSearchClient::new(ClientConfig::new("not a url", "idx"));
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_create_index_sends_mapping_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/iot-fishdata"))
            .and(header("authorization", "ApiKey c2VjcmV0"))
            .and(body_json(IndexSchema::fish_readings().to_mapping()))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"acknowledged":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .create_index(&IndexSchema::fish_readings())
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("acknowledged"));
    }

    #[tokio::test]
    async fn test_index_document_returns_error_status_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/iot-fishdata/_doc"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let document = FishDocument::new(7.1, 25.0, 3.2, "tilapia");
        let response = client_for(&server).index_document(&document).await.unwrap();

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "boom");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = OpenSearchClient::new(ClientConfig::new("http://127.0.0.1:9", "idx")).unwrap();
        let document = FishDocument::new(7.0, 20.0, 1.0, "carp");

        let result = client.index_document(&document).await;
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }
}
