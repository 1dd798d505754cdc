//! Dependency initialization and wiring for the aqua indexer.

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use aqua_indexer_pipeline::{Dispatcher, IndexProvisioner, Orchestrator};
use aqua_indexer_repository::{OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from validated settings.
    ///
    /// No request is sent here: connectivity problems surface when the run
    /// provisions the index.
    pub fn new(settings: Settings) -> Result<Self, IndexingError> {
        info!(
            url = %settings.client.url,
            index = %settings.client.index_name,
            csv = %settings.source.path().display(),
            concurrency = settings.dispatcher.concurrency,
            authenticated = settings.client.api_key.is_some(),
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(settings.client)?;
        let client: Arc<dyn SearchEngineClient> = Arc::new(search_client);

        let provisioner = IndexProvisioner::new(Arc::clone(&client));
        let dispatcher = Dispatcher::with_config(client, settings.dispatcher);

        let orchestrator = Orchestrator::with_config(
            provisioner,
            settings.source,
            dispatcher,
            settings.orchestrator,
        );

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_indexer_pipeline::{DispatcherConfig, OrchestratorConfig, RecordSource, RunState};
    use aqua_indexer_repository::ClientConfig;

    fn settings(url: &str) -> Settings {
        Settings {
            client: ClientConfig::new(url, "iot-fishdata"),
            source: RecordSource::new("data.csv"),
            dispatcher: DispatcherConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }

    #[test]
    fn test_wires_an_idle_orchestrator() {
        let deps = Dependencies::new(settings("http://localhost:9200")).unwrap();

        assert_eq!(deps.orchestrator.state(), RunState::Idle);
    }

    #[test]
    fn test_invalid_url_is_a_search_error() {
        let result = Dependencies::new(settings("not a url"));

        assert!(matches!(result, Err(IndexingError::SearchError(_))));
    }
}
