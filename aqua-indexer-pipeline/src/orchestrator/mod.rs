//! Orchestrator module for the aqua indexer pipeline.
//!
//! Coordinates the provisioner, source, processor, loader and reporter for a
//! single ingestion run.

use std::path::PathBuf;

use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::{Dispatcher, IngestionTally, ShutdownSignal};
use crate::processor::DocumentMapper;
use crate::provisioner::IndexProvisioner;
use crate::reporter::Reporter;
use crate::source::RecordSource;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Do not create the index; assume it is managed elsewhere.
    pub skip_provisioning: bool,
    /// Draw a progress spinner on stderr.
    pub show_progress: bool,
    /// Write failed rows to this CSV file when there are any.
    pub failures_path: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            skip_provisioning: false,
            show_progress: true,
            failures_path: None,
        }
    }
}

/// Lifecycle of an ingestion run.
///
/// `Idle → Provisioning → Ingesting → Completed`, with `Aborted` reachable
/// from `Provisioning` (index rejected) and `Ingesting` (input unreadable),
/// and `Cancelled` reachable from `Ingesting` when a shutdown leaves rows unread.
/// Row failures never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Provisioning,
    Ingesting,
    Completed,
    Cancelled,
    Aborted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Cancelled | RunState::Aborted
        )
    }
}

/// Final report of a run.
#[derive(Debug)]
pub struct RunReport {
    pub state: RunState,
    pub tally: IngestionTally,
    /// The fatal error, for aborted runs.
    pub error: Option<PipelineError>,
    /// Human-readable summary.
    pub summary: String,
}

impl RunReport {
    /// Process exit code for this run.
    ///
    /// * `0` - every row was indexed
    /// * `1` - the run completed but at least one row failed
    /// * `2` - the run was aborted (provisioning or input failure)
    /// * `130` - the run was cancelled
    pub fn exit_code(&self) -> u8 {
        match self.state {
            RunState::Completed if self.tally.is_clean() => 0,
            RunState::Completed => 1,
            RunState::Cancelled => 130,
            _ => 2,
        }
    }
}

/// Orchestrator that drives one ingestion run.
///
/// The orchestrator:
/// - Provisions the index once, before any row is read
/// - Streams rows through the mapper into the dispatcher
/// - Tracks the run state machine
/// - Produces the final report
pub struct Orchestrator {
    provisioner: IndexProvisioner,
    source: RecordSource,
    mapper: DocumentMapper,
    dispatcher: Dispatcher,
    config: OrchestratorConfig,
    state: RunState,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(provisioner: IndexProvisioner, source: RecordSource, dispatcher: Dispatcher) -> Self {
        Self::with_config(provisioner, source, dispatcher, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        provisioner: IndexProvisioner,
        source: RecordSource,
        dispatcher: Dispatcher,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provisioner,
            source,
            mapper: DocumentMapper::new(),
            dispatcher,
            config,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Signal that cancels the run cooperatively.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.dispatcher.shutdown_signal()
    }

    /// Run the pipeline to a terminal state.
    #[instrument(skip(self), fields(index = %self.dispatcher.index_name(), source = %self.source.path().display()))]
    pub async fn run(&mut self) -> RunReport {
        info!("Starting ingestion run");
        let mut reporter = if self.config.show_progress {
            Reporter::new(self.dispatcher.index_name())
        } else {
            Reporter::hidden()
        };

        self.transition(RunState::Provisioning);
        if self.config.skip_provisioning {
            warn!("Provisioning skipped, assuming the index already exists");
        } else if let Err(e) = self.provisioner.provision().await {
            return self.abort(e.into(), IngestionTally::default(), &reporter);
        }

        self.transition(RunState::Ingesting);
        let rows = match self.source.rows() {
            Ok(rows) => rows,
            Err(e) => return self.abort(e.into(), IngestionTally::default(), &reporter),
        };

        let mapper = self.mapper;
        let processed = rows.map(move |row| row.map(|row| mapper.process(row)));
        let result = self.dispatcher.dispatch(processed, &mut reporter).await;
        reporter.finish();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                let observed = reporter.failures().len() as u64;
                let partial = IngestionTally {
                    attempted: reporter.observed(),
                    succeeded: reporter.observed() - observed,
                    failed: observed,
                };
                return self.abort(e, partial, &reporter);
            }
        };

        if let Some(ref path) = self.config.failures_path {
            if !reporter.failures().is_empty() {
                match reporter.write_failures(path) {
                    Ok(()) => info!(path = %path.display(), "Failed rows written"),
                    Err(e) => warn!(error = %e, "Could not write failed rows"),
                }
            }
        }

        let state = if outcome.interrupted {
            RunState::Cancelled
        } else {
            RunState::Completed
        };
        self.transition(state);

        let tally = outcome.tally;
        RunReport {
            state,
            tally,
            error: None,
            summary: reporter.summarize(&tally),
        }
    }

    fn abort(&mut self, error: PipelineError, tally: IngestionTally, reporter: &Reporter) -> RunReport {
        error!(error = %error, "Ingestion run aborted");
        reporter.finish();
        self.transition(RunState::Aborted);

        let summary = format!("{}\nRun aborted: {}", reporter.summarize(&tally), error);
        RunReport {
            state: RunState::Aborted,
            tally,
            error: Some(error),
            summary,
        }
    }

    fn transition(&mut self, next: RunState) {
        info!(from = ?self.state, to = ?next, "Run state changed");
        self.state = next;
    }
}
