//! Provisioner module for the aqua indexer pipeline.
//!
//! Makes sure the target index exists with the expected field schema before
//! any document is written.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::errors::ProvisionError;
use aqua_indexer_repository::{EngineResponse, IndexSchema, SearchEngineClient};

/// Error type the search engine reports when the index is already there.
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Outcome of a successful provisioning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionAck {
    /// The index was created by this call.
    Created,
    /// The index existed before this call; nothing changed.
    AlreadyExists,
}

/// Creates the index with its mapping. Safe to call repeatedly.
pub struct IndexProvisioner {
    client: Arc<dyn SearchEngineClient>,
    schema: IndexSchema,
}

impl IndexProvisioner {
    /// Create a provisioner for the sensor readings schema.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_schema(client, IndexSchema::fish_readings())
    }

    /// Create a provisioner with a custom schema.
    pub fn with_schema(client: Arc<dyn SearchEngineClient>, schema: IndexSchema) -> Self {
        Self { client, schema }
    }

    /// Issue a single create-index request.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionAck::Created)` - On any 2xx response
    /// * `Ok(ProvisionAck::AlreadyExists)` - If the index was already present
    /// * `Err(ProvisionError)` - On any other status or a transport failure
    #[instrument(skip(self), fields(index = %self.client.index_name()))]
    pub async fn provision(&self) -> Result<ProvisionAck, ProvisionError> {
        let response = self.client.create_index(&self.schema).await?;
        let ack = Self::classify(response)?;

        info!(ack = ?ack, "Index provisioned");
        Ok(ack)
    }

    fn classify(response: EngineResponse) -> Result<ProvisionAck, ProvisionError> {
        if response.is_success() {
            return Ok(ProvisionAck::Created);
        }

        if response.status_code == 400 && response.body.contains(ALREADY_EXISTS) {
            return Ok(ProvisionAck::AlreadyExists);
        }

        error!(
            status = response.status_code,
            body = %response.body,
            "Create index request rejected"
        );
        Err(ProvisionError::Rejected {
            status_code: response.status_code,
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aqua_indexer_repository::SearchError;
    use aqua_indexer_shared::FishDocument;
    use std::sync::Mutex;

    /// Mock client that remembers created indices like a real cluster.
    struct MockSearchClient {
        created: Mutex<bool>,
        reject_with: Option<EngineResponse>,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                created: Mutex::new(false),
                reject_with: None,
            }
        }

        fn rejecting(status_code: u16, body: &str) -> Self {
            Self {
                created: Mutex::new(false),
                reject_with: Some(EngineResponse::new(status_code, body)),
            }
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        fn index_name(&self) -> &str {
            "iot-fishdata"
        }

        async fn create_index(&self, _schema: &IndexSchema) -> Result<EngineResponse, SearchError> {
            if let Some(ref response) = self.reject_with {
                return Ok(response.clone());
            }
            let mut created = self.created.lock().unwrap();
            if *created {
                return Ok(EngineResponse::new(
                    400,
                    r#"{"error":{"type":"resource_already_exists_exception"},"status":400}"#,
                ));
            }
            *created = true;
            Ok(EngineResponse::new(200, r#"{"acknowledged":true}"#))
        }

        async fn index_document(
            &self,
            _document: &FishDocument,
        ) -> Result<EngineResponse, SearchError> {
            Ok(EngineResponse::new(201, "{}"))
        }
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let provisioner = IndexProvisioner::new(Arc::new(MockSearchClient::new()));

        assert_eq!(provisioner.provision().await.unwrap(), ProvisionAck::Created);
        assert_eq!(
            provisioner.provision().await.unwrap(),
            ProvisionAck::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_auth_rejection_is_fatal() {
        let client = MockSearchClient::rejecting(401, "missing authentication credentials");
        let provisioner = IndexProvisioner::new(Arc::new(client));

        match provisioner.provision().await {
            Err(ProvisionError::Rejected { status_code, body }) => {
                assert_eq!(status_code, 401);
                assert!(body.contains("credentials"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_bad_request_is_not_already_exists() {
        let client = MockSearchClient::rejecting(400, r#"{"error":{"type":"mapper_parsing_exception"}}"#);
        let provisioner = IndexProvisioner::new(Arc::new(client));

        assert!(matches!(
            provisioner.provision().await,
            Err(ProvisionError::Rejected { status_code: 400, .. })
        ));
    }
}
