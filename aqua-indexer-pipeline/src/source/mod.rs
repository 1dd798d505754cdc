//! Source module for the aqua indexer pipeline.
//!
//! Reads the sensor dataset lazily, one [`RawRow`] per data line, in file
//! order. Every call to [`RecordSource::rows`] re-opens the file, so a source
//! can be replayed and yields the same sequence each time.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use tracing::debug;

use crate::errors::SourceError;
use aqua_indexer_shared::{RawRow, REQUIRED_COLUMNS};

/// Options for reading the input file.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Stop after this many data rows. `None` reads the whole file.
    pub max_rows: Option<usize>,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            max_rows: None,
            delimiter: b',',
        }
    }
}

/// A delimited file with a header row.
#[derive(Debug, Clone)]
pub struct RecordSource {
    path: PathBuf,
    options: SourceOptions,
}

impl RecordSource {
    /// Create a source reading the whole file with `,` as delimiter.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, SourceOptions::default())
    }

    /// Create a source with custom options.
    pub fn with_options(path: impl Into<PathBuf>, options: SourceOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// Open the file and validate its header.
    ///
    /// # Returns
    ///
    /// * `Ok(Rows)` - A lazy iterator over the data rows
    /// * `Err(SourceError)` - If the file cannot be opened or the header row
    ///   is missing or lacks a required column
    pub fn rows(&self) -> Result<Rows, SourceError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .flexible(true)
            .trim(Trim::Headers)
            .from_path(&self.path)
            .map_err(|source| SourceError::Open {
                path: self.path.clone(),
                source,
            })?;

        let headers = reader
            .headers()
            .map_err(|e| SourceError::header(e.to_string()))?
            .clone();

        if headers.iter().all(str::is_empty) {
            return Err(SourceError::header("file has no header row"));
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::header(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        debug!(
            path = %self.path.display(),
            columns = headers.len(),
            max_rows = ?self.options.max_rows,
            "Opened record source"
        );

        Ok(Rows {
            records: reader.into_records(),
            headers,
            line: 0,
            remaining: self.options.max_rows,
        })
    }
}

/// Lazy iterator over the data rows of a [`RecordSource`].
///
/// Yields `Err` once if the file becomes unreadable; callers stop there.
pub struct Rows {
    records: StringRecordsIntoIter<File>,
    headers: StringRecord,
    line: u64,
    remaining: Option<usize>,
}

impl Iterator for Rows {
    type Item = Result<RawRow, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }

        let record = self.records.next()?;
        self.line += 1;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        let line = self.line;
        Some(
            record
                .map(|record| RawRow::new(line, self.headers.iter().zip(record.iter())))
                .map_err(|source| SourceError::Read { line, source }),
        )
    }
}
