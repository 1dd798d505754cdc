//! Validated run settings built from the command line.

use std::time::Duration;

use crate::config::{resolve_api_key, Cli};
use crate::IndexingError;
use aqua_indexer_pipeline::{DispatcherConfig, OrchestratorConfig, RecordSource, SourceOptions};
use aqua_indexer_repository::ClientConfig;

/// Everything needed to wire up one ingestion run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub source: RecordSource,
    pub dispatcher: DispatcherConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Settings {
    /// Validate the parsed command line and resolve the credential.
    pub fn from_cli(cli: &Cli) -> Result<Self, IndexingError> {
        if !cli.delimiter.is_ascii() {
            return Err(IndexingError::config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                cli.delimiter
            )));
        }
        if cli.request_timeout_secs == 0 {
            return Err(IndexingError::config("Request timeout must be at least 1 second"));
        }
        if cli.index.trim().is_empty() {
            return Err(IndexingError::config("Index name must not be empty"));
        }

        let request_timeout = Duration::from_secs(cli.request_timeout_secs);

        let api_key = resolve_api_key(cli.api_key.as_deref(), cli.api_key_file.as_deref())?;
        let mut client = ClientConfig::new(&cli.es_url, &cli.index)
            .with_verify_tls(!cli.insecure)
            .with_timeout(request_timeout);
        if let Some(key) = api_key {
            client = client.with_api_key(key);
        }

        let source = RecordSource::with_options(
            &cli.csv,
            SourceOptions {
                max_rows: cli.max_rows,
                delimiter: cli.delimiter as u8,
            },
        );

        let dispatcher = DispatcherConfig {
            concurrency: usize::from(cli.concurrency),
            request_timeout,
        };

        let orchestrator = OrchestratorConfig {
            skip_provisioning: cli.skip_provisioning,
            show_progress: !cli.no_progress,
            failures_path: cli.failures_out.clone(),
        };

        Ok(Self {
            client,
            source,
            dispatcher,
            orchestrator,
        })
    }
}
