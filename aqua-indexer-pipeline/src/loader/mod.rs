//! Loader module for the aqua indexer pipeline.
//!
//! Submits documents to the search index through a fixed pool of workers
//! and tallies the outcome of every row.
//!
//! ```text
//!  rows ──► feeder (blocking) ──► job queue (bounded) ──► worker × N ──► search engine
//!              │                                              │
//!              └──────── rejected rows ──► outcomes ◄─────────┘
//!                                            │
//!                                       aggregator ──► tally + reporter
//! ```
//!
//! The aggregator is the only writer of the tally, so counter updates never
//! race whatever the pool width.

mod tally;

pub use tally::{IngestionTally, ShutdownSignal};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::{MappingError, PipelineError, SourceError};
use crate::processor::ProcessedRow;
use crate::reporter::Reporter;
use aqua_indexer_repository::SearchEngineClient;
use aqua_indexer_shared::{FishDocument, RawRow};

/// Statuses that count as a successful submission.
const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of workers, and so the maximum number of requests in flight.
    pub concurrency: usize,
    /// Deadline for a single submission, connection time included.
    pub request_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of submitting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    /// Data row number the document came from.
    pub line: u64,
    pub document: FishDocument,
    /// HTTP status, absent when the request did not complete.
    pub status_code: Option<u16>,
    /// Response body, empty when the request did not complete.
    pub body: String,
    /// Failure cause; `None` means the document was indexed.
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a dispatch that ran to the end of its input or was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub tally: IngestionTally,
    /// The shutdown signal stopped the feeder before the input was exhausted.
    pub interrupted: bool,
}

/// What the feeder handed on before it stopped.
struct Fed {
    rows: u64,
    interrupted: bool,
}

/// A document waiting in the queue.
struct Job {
    line: u64,
    document: FishDocument,
}

enum Outcome {
    Submitted(SubmissionResult),
    Rejected { row: RawRow, error: MappingError },
}

/// Dispatcher that indexes documents with bounded concurrency.
///
/// The dispatcher is responsible for:
/// - Submitting every document exactly once, without retries
/// - Bounding in-flight requests to the configured concurrency
/// - Enforcing a per-request timeout
/// - Counting every row as succeeded or failed
pub struct Dispatcher {
    client: Arc<dyn SearchEngineClient>,
    config: DispatcherConfig,
    shutdown: ShutdownSignal,
}

impl Dispatcher {
    /// Create a new dispatcher with the given client.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_config(client, DispatcherConfig::default())
    }

    /// Create a new dispatcher with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: DispatcherConfig) -> Self {
        Self {
            client,
            config,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Signal that stops this dispatcher from enqueuing further rows.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn index_name(&self) -> &str {
        self.client.index_name()
    }

    /// Submit every document of `rows` and tally the outcomes.
    ///
    /// Rejected rows count as attempted and failed. Submission failures are
    /// logged and counted; they never stop the batch. A [`SourceError`]
    /// stops the feeder, lets queued and in-flight submissions finish, and is
    /// then returned. A shutdown stops the feeder the same way and is
    /// reported through [`DispatchOutcome::interrupted`] once rows were left
    /// unread.
    ///
    /// The iterator is driven on the blocking thread pool, so it may perform
    /// synchronous file I/O.
    #[instrument(
        skip(self, rows, reporter),
        fields(index = %self.client.index_name(), concurrency = self.config.concurrency)
    )]
    pub async fn dispatch<I>(
        &self,
        rows: I,
        reporter: &mut Reporter,
    ) -> Result<DispatchOutcome, PipelineError>
    where
        I: IntoIterator<Item = Result<ProcessedRow, SourceError>>,
        I::IntoIter: Send + 'static,
    {
        let concurrency = self.config.concurrency.max(1);

        let (job_tx, job_rx) = mpsc::channel::<Job>(concurrency);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(concurrency * 2);

        let feeder = {
            let rows = rows.into_iter();
            let outcome_tx = outcome_tx.clone();
            let shutdown = self.shutdown.clone();
            tokio::task::spawn_blocking(move || feed(rows, job_tx, outcome_tx, shutdown))
        };

        let mut workers = Vec::with_capacity(concurrency);
        for worker_id in 0..concurrency {
            let client = Arc::clone(&self.client);
            let job_rx = Arc::clone(&job_rx);
            let outcome_tx = outcome_tx.clone();
            let timeout = self.config.request_timeout;

            workers.push(tokio::spawn(async move {
                loop {
                    let job = job_rx.lock().await.recv().await;
                    let Some(job) = job else { break };

                    let result = submit(client.as_ref(), job, timeout).await;
                    if outcome_tx.send(Outcome::Submitted(result)).await.is_err() {
                        break;
                    }
                }
                debug!(worker_id, "Worker finished");
            }));
        }
        drop(outcome_tx);

        let mut tally = IngestionTally::default();
        while let Some(outcome) = outcome_rx.recv().await {
            match outcome {
                Outcome::Submitted(result) => {
                    if result.is_success() {
                        tally.record_success();
                    } else {
                        warn!(
                            line = result.line,
                            document = ?result.document,
                            status = ?result.status_code,
                            body = %result.body,
                            error = result.error.as_deref().unwrap_or_default(),
                            "Failed to index document"
                        );
                        tally.record_failure();
                    }
                    reporter.observe(&result);
                }
                Outcome::Rejected { row, error } => {
                    warn!(line = row.line, error = %error, "Skipping malformed row");
                    tally.record_failure();
                    reporter.observe_rejection(&row, &error);
                }
            }
        }

        for worker in workers {
            worker
                .await
                .map_err(|e| PipelineError::worker(format!("Worker task failed: {}", e)))?;
        }

        let fed = feeder
            .await
            .map_err(|e| PipelineError::worker(format!("Feeder task failed: {}", e)))?;

        match fed {
            Ok(fed) => {
                info!(
                    rows = fed.rows,
                    interrupted = fed.interrupted,
                    attempted = tally.attempted,
                    succeeded = tally.succeeded,
                    failed = tally.failed,
                    "Dispatch completed"
                );
                Ok(DispatchOutcome {
                    tally,
                    interrupted: fed.interrupted,
                })
            }
            Err(e) => {
                error!(
                    error = %e,
                    attempted = tally.attempted,
                    succeeded = tally.succeeded,
                    failed = tally.failed,
                    "Dispatch stopped by source error"
                );
                Err(e.into())
            }
        }
    }
}

/// Drive the row iterator, queueing documents and forwarding rejections.
///
/// Stops early when the shutdown signal fires or the iterator yields an
/// error. A signal that fires after the last row was handed on does not count
/// as an interruption.
fn feed<I>(
    rows: I,
    job_tx: mpsc::Sender<Job>,
    outcome_tx: mpsc::Sender<Outcome>,
    shutdown: ShutdownSignal,
) -> Result<Fed, SourceError>
where
    I: Iterator<Item = Result<ProcessedRow, SourceError>>,
{
    let mut fed = 0;

    for row in rows {
        if shutdown.is_triggered() {
            info!(rows = fed, "Shutdown requested, no further rows will be enqueued");
            return Ok(Fed {
                rows: fed,
                interrupted: true,
            });
        }

        let sent = match row? {
            ProcessedRow::Document { line, document } => {
                job_tx.blocking_send(Job { line, document }).is_ok()
            }
            ProcessedRow::Rejected { row, error } => outcome_tx
                .blocking_send(Outcome::Rejected { row, error })
                .is_ok(),
        };
        if !sent {
            warn!(rows = fed, "Pipeline channel closed, stopping feeder");
            break;
        }
        fed += 1;
    }

    Ok(Fed {
        rows: fed,
        interrupted: false,
    })
}

/// Submit one document and classify the response.
async fn submit(client: &dyn SearchEngineClient, job: Job, timeout: Duration) -> SubmissionResult {
    let Job { line, document } = job;

    match tokio::time::timeout(timeout, client.index_document(&document)).await {
        Ok(Ok(response)) => {
            let error = (!SUCCESS_STATUSES.contains(&response.status_code))
                .then(|| format!("unexpected status {}", response.status_code));
            SubmissionResult {
                line,
                document,
                status_code: Some(response.status_code),
                body: response.body,
                error,
            }
        }
        Ok(Err(e)) => SubmissionResult {
            line,
            document,
            status_code: None,
            body: String::new(),
            error: Some(e.to_string()),
        },
        Err(_) => SubmissionResult {
            line,
            document,
            status_code: None,
            body: String::new(),
            error: Some(format!("request timed out after {:?}", timeout)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::DocumentMapper;
    use async_trait::async_trait;
    use aqua_indexer_repository::{EngineResponse, IndexSchema, SearchError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Mock search client for testing.
    struct MockSearchClient {
        indexed_count: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        /// Requests seen per fish label.
        seen: StdMutex<HashMap<String, usize>>,
        /// Labels answered with a 500.
        failing: Vec<String>,
        delay: Duration,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                indexed_count: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                seen: StdMutex::new(HashMap::new()),
                failing: Vec::new(),
                delay: Duration::from_millis(0),
            }
        }

        fn failing_on(mut self, label: &str) -> Self {
            self.failing.push(label.to_string());
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        fn index_name(&self) -> &str {
            "iot-fishdata"
        }

        async fn create_index(&self, _schema: &IndexSchema) -> Result<EngineResponse, SearchError> {
            Ok(EngineResponse::new(200, "{}"))
        }

        async fn index_document(
            &self,
            document: &FishDocument,
        ) -> Result<EngineResponse, SearchError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            *self
                .seen
                .lock()
                .unwrap()
                .entry(document.fish.clone())
                .or_insert(0) += 1;

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if document.fish == "unreachable" {
                return Err(SearchError::connection("connection refused"));
            }
            if self.failing.contains(&document.fish) {
                return Ok(EngineResponse::new(500, "internal error"));
            }
            self.indexed_count.fetch_add(1, Ordering::SeqCst);
            Ok(EngineResponse::new(201, r#"{"result":"created"}"#))
        }
    }

    fn documents(count: usize) -> Vec<Result<ProcessedRow, SourceError>> {
        (0..count)
            .map(|i| {
                Ok(ProcessedRow::Document {
                    line: i as u64 + 1,
                    document: FishDocument::new(7.0, 20.0, 1.0, format!("fish-{}", i)),
                })
            })
            .collect()
    }

    fn dispatcher(client: Arc<MockSearchClient>, concurrency: usize) -> Dispatcher {
        Dispatcher::with_config(
            client,
            DispatcherConfig {
                concurrency,
                request_timeout: Duration::from_secs(5),
            },
        )
    }

    #[tokio::test]
    async fn test_every_document_is_submitted_once() {
        for concurrency in [1, 8, 64] {
            let client = Arc::new(MockSearchClient::new());
            let mut reporter = Reporter::hidden();

            let tally = dispatcher(client.clone(), concurrency)
                .dispatch(documents(100), &mut reporter)
                .await
                .unwrap()
                .tally;

            assert_eq!(tally.attempted, 100);
            assert_eq!(tally.succeeded, 100);
            let seen = client.seen.lock().unwrap();
            assert_eq!(seen.len(), 100);
            assert!(seen.values().all(|count| *count == 1));
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let client = Arc::new(
            MockSearchClient::new()
                .failing_on("fish-3")
                .failing_on("fish-7"),
        );
        let mut reporter = Reporter::hidden();

        let tally = dispatcher(client.clone(), 4)
            .dispatch(documents(10), &mut reporter)
            .await
            .unwrap()
            .tally;

        assert_eq!(
            tally,
            IngestionTally {
                attempted: 10,
                succeeded: 8,
                failed: 2
            }
        );
        let mut failed_lines: Vec<u64> = reporter.failures().iter().map(|f| f.line).collect();
        failed_lines.sort_unstable();
        assert_eq!(failed_lines, vec![4, 8]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_counted() {
        let client = Arc::new(MockSearchClient::new());
        let rows = vec![
            Ok(ProcessedRow::Document {
                line: 1,
                document: FishDocument::new(7.0, 20.0, 1.0, "unreachable"),
            }),
            Ok(ProcessedRow::Document {
                line: 2,
                document: FishDocument::new(7.0, 20.0, 1.0, "koi"),
            }),
        ];
        let mut reporter = Reporter::hidden();

        let tally = dispatcher(client, 2)
            .dispatch(rows, &mut reporter)
            .await
            .unwrap()
            .tally;

        assert_eq!(tally.failed, 1);
        assert_eq!(tally.succeeded, 1);
        assert!(reporter.failures()[0].cause.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_rejected_rows_count_as_failures() {
        let mapper = DocumentMapper::new();
        let rows: Vec<Result<ProcessedRow, SourceError>> = vec![
            Ok(mapper.process(RawRow::new(
                1,
                [("ph", "7.1"), ("temperature", "25.0"), ("turbidity", "3.2"), ("fish", "tilapia")],
            ))),
            Ok(mapper.process(RawRow::new(
                2,
                [("ph", "bad"), ("temperature", "25.1"), ("turbidity", "3.0"), ("fish", "carp")],
            ))),
        ];
        let client = Arc::new(MockSearchClient::new());
        let mut reporter = Reporter::hidden();

        let tally = dispatcher(client.clone(), 2)
            .dispatch(rows, &mut reporter)
            .await
            .unwrap()
            .tally;

        assert_eq!(tally.attempted, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(client.indexed_count.load(Ordering::SeqCst), 1);
        assert_eq!(reporter.failures()[0].line, 2);
        assert_eq!(reporter.failures()[0].ph, "bad");
    }

    #[tokio::test]
    async fn test_in_flight_requests_are_bounded() {
        let client = Arc::new(MockSearchClient::new().with_delay(Duration::from_millis(5)));
        let mut reporter = Reporter::hidden();

        dispatcher(client.clone(), 3)
            .dispatch(documents(30), &mut reporter)
            .await
            .unwrap();

        let max = client.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {}", max);
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out() {
        let client = Arc::new(MockSearchClient::new().with_delay(Duration::from_secs(10)));
        let dispatcher = Dispatcher::with_config(
            client,
            DispatcherConfig {
                concurrency: 2,
                request_timeout: Duration::from_millis(50),
            },
        );
        let mut reporter = Reporter::hidden();

        let tally = dispatcher
            .dispatch(documents(4), &mut reporter)
            .await
            .unwrap()
            .tally;

        assert_eq!(tally.failed, 4);
        assert!(reporter.failures()[0].cause.contains("timed out"));
    }

    #[tokio::test]
    async fn test_source_error_stops_feeding() {
        let mut rows = documents(2);
        rows.push(Err(SourceError::header("simulated corruption")));
        rows.extend(documents(5));
        let client = Arc::new(MockSearchClient::new());
        let mut reporter = Reporter::hidden();

        let result = dispatcher(client.clone(), 2)
            .dispatch(rows, &mut reporter)
            .await;

        assert!(matches!(result, Err(PipelineError::Source(_))));
        assert_eq!(client.indexed_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_enqueuing() {
        let client = Arc::new(MockSearchClient::new());
        let dispatcher = dispatcher(client.clone(), 2);
        dispatcher.shutdown_signal().trigger();
        let mut reporter = Reporter::hidden();

        let outcome = dispatcher
            .dispatch(documents(50), &mut reporter)
            .await
            .unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.tally.attempted, 0);
        assert_eq!(client.indexed_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_mid_run_drains_in_flight_requests() {
        let client = Arc::new(MockSearchClient::new().with_delay(Duration::from_millis(50)));
        let dispatcher = dispatcher(client.clone(), 2);
        let shutdown = dispatcher.shutdown_signal();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            shutdown.trigger();
        });
        let mut reporter = Reporter::hidden();

        let outcome = dispatcher
            .dispatch(documents(50), &mut reporter)
            .await
            .unwrap();

        let started: usize = client.seen.lock().unwrap().values().sum();
        assert!(outcome.interrupted);
        assert_eq!(client.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.tally.attempted as usize, started);
        assert_eq!(outcome.tally.succeeded as usize, started);
        assert!(outcome.tally.attempted > 0);
        assert!(outcome.tally.attempted < 50, "attempted {}", outcome.tally.attempted);
    }

    #[tokio::test]
    async fn test_shutdown_after_last_row_is_not_an_interruption() {
        let client = Arc::new(MockSearchClient::new().with_delay(Duration::from_millis(100)));
        let dispatcher = dispatcher(client.clone(), 4);
        let shutdown = dispatcher.shutdown_signal();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            shutdown.trigger();
        });
        let mut reporter = Reporter::hidden();

        let outcome = dispatcher
            .dispatch(documents(2), &mut reporter)
            .await
            .unwrap();

        assert!(!outcome.interrupted);
        assert_eq!(outcome.tally.attempted, 2);
        assert_eq!(client.indexed_count.load(Ordering::SeqCst), 2);
    }
}
