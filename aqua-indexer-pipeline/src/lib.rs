//! # Aqua Indexer Pipeline
//!
//! This crate provides the pipeline that loads water-quality sensor readings
//! from a delimited file into a search index.
//!
//! ## Architecture
//!
//! 1. **Provisioner**: Creates the index with its field schema (idempotent)
//! 2. **Source**: Lazily reads rows from the input file
//! 3. **Processor**: Maps each row into a typed document
//! 4. **Loader**: Submits documents through a bounded worker pool and tallies outcomes
//! 5. **Reporter**: Shows progress and summarizes the run
//! 6. **Orchestrator**: Drives the run state machine

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod provisioner;
pub mod reporter;
pub mod source;

pub use errors::{MappingError, PipelineError, ProvisionError, SourceError};
pub use loader::{
    DispatchOutcome, Dispatcher, DispatcherConfig, IngestionTally, ShutdownSignal, SubmissionResult,
};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunReport, RunState};
pub use processor::{DocumentMapper, ProcessedRow};
pub use provisioner::{IndexProvisioner, ProvisionAck};
pub use reporter::{FailureRecord, Reporter};
pub use source::{RecordSource, Rows, SourceOptions};
