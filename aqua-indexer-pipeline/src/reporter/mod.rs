//! Reporter module for the aqua indexer pipeline.
//!
//! Shows live progress while rows are dispatched and renders the final
//! summary. A reporter belongs to a single run and only observes: it never
//! changes an outcome.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;

use crate::errors::{MappingError, PipelineError};
use crate::loader::{IngestionTally, SubmissionResult};
use aqua_indexer_shared::RawRow;

/// Failures listed individually in the summary; the rest are counted.
const MAX_LISTED_FAILURES: usize = 20;

/// A row that was not indexed, with enough data to submit it again.
///
/// Serializes to a CSV row the record source accepts as input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub line: u64,
    pub ph: String,
    pub temperature: String,
    pub turbidity: String,
    pub fish: String,
    pub cause: String,
}

impl FailureRecord {
    fn from_submission(result: &SubmissionResult) -> Self {
        let cause = match (&result.error, result.status_code) {
            (Some(error), Some(_)) if !result.body.is_empty() => {
                format!("{}: {}", error, result.body)
            }
            (Some(error), _) => error.clone(),
            (None, _) => String::new(),
        };

        Self {
            line: result.line,
            ph: result.document.ph.to_string(),
            temperature: result.document.temperature.to_string(),
            turbidity: result.document.turbidity.to_string(),
            fish: result.document.fish.clone(),
            cause,
        }
    }

    fn from_rejection(row: &RawRow, error: &MappingError) -> Self {
        let field = |name: &str| row.get(name).unwrap_or_default().to_string();

        Self {
            line: row.line,
            ph: field("ph"),
            temperature: field("temperature"),
            turbidity: field("turbidity"),
            fish: field("fish"),
            cause: error.to_string(),
        }
    }
}

/// Run-scoped progress display and failure log.
pub struct Reporter {
    progress: ProgressBar,
    label: String,
    failures: Vec<FailureRecord>,
}

impl Reporter {
    /// Create a reporter drawing a spinner on stderr.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        progress.enable_steady_tick(Duration::from_millis(120));
        progress.set_message(format!("importing into {}", label));

        Self {
            progress,
            label,
            failures: Vec::new(),
        }
    }

    /// Create a reporter that draws nothing (tests, non-interactive runs).
    pub fn hidden() -> Self {
        Self {
            progress: ProgressBar::hidden(),
            label: String::new(),
            failures: Vec::new(),
        }
    }

    /// Record the outcome of one submission.
    pub fn observe(&mut self, result: &SubmissionResult) {
        self.progress.inc(1);
        if !result.is_success() {
            self.failures.push(FailureRecord::from_submission(result));
        }
    }

    /// Record a row the mapper rejected.
    pub fn observe_rejection(&mut self, row: &RawRow, error: &MappingError) {
        self.progress.inc(1);
        self.failures.push(FailureRecord::from_rejection(row, error));
    }

    /// Stop the progress display.
    pub fn finish(&self) {
        self.progress.finish_and_clear();
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    /// Rows observed so far.
    pub fn observed(&self) -> u64 {
        self.progress.position()
    }

    /// Failed rows in completion order.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Human-readable report of a run.
    pub fn summarize(&self, tally: &IngestionTally) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("=".repeat(80));
        if self.label.is_empty() {
            lines.push("INGESTION RESULTS".to_string());
        } else {
            lines.push(format!("INGESTION RESULTS: {}", self.label));
        }
        lines.push("=".repeat(80));
        lines.push(format!("  Attempted: {}", tally.attempted));
        lines.push(format!("  Succeeded: {}", tally.succeeded));
        lines.push(format!("  Failed:    {}", tally.failed));

        if !self.failures.is_empty() {
            let mut failures: Vec<&FailureRecord> = self.failures.iter().collect();
            failures.sort_by_key(|f| f.line);

            lines.push(String::new());
            lines.push("Failed rows:".to_string());
            for failure in failures.iter().take(MAX_LISTED_FAILURES) {
                lines.push(format!(
                    "  row {}: {} (ph={}, temperature={}, turbidity={}, fish={})",
                    failure.line,
                    failure.cause,
                    failure.ph,
                    failure.temperature,
                    failure.turbidity,
                    failure.fish
                ));
            }
            if failures.len() > MAX_LISTED_FAILURES {
                lines.push(format!(
                    "  ... and {} more",
                    failures.len() - MAX_LISTED_FAILURES
                ));
            }
        }

        lines.push("=".repeat(80));
        lines.join("\n")
    }

    /// Write the failed rows as CSV, ordered by row number.
    pub fn write_failures(&self, path: &Path) -> Result<(), PipelineError> {
        let mut failures: Vec<&FailureRecord> = self.failures.iter().collect();
        failures.sort_by_key(|f| f.line);

        let mut writer = csv::Writer::from_path(path).map_err(|e| {
            PipelineError::report(format!("Failed to create {}: {}", path.display(), e))
        })?;
        for failure in failures {
            writer
                .serialize(failure)
                .map_err(|e| PipelineError::report(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| PipelineError::report(e.to_string()))?;

        Ok(())
    }
}
