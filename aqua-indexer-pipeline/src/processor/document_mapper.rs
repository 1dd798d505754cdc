//! Document mapper implementation.
//!
//! Transforms raw rows into FishDocument structures for indexing.

use crate::errors::MappingError;
use aqua_indexer_shared::{FishDocument, RawRow};

/// Processed result from the document mapper.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedRow {
    /// Document ready to be submitted.
    Document { line: u64, document: FishDocument },
    /// Row that could not be mapped; kept for failure reporting.
    Rejected { row: RawRow, error: MappingError },
}

/// Mapper that turns raw rows into typed documents.
///
/// Pure: it performs no I/O and holds no state, so one instance can be used
/// from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMapper;

impl DocumentMapper {
    /// Create a new document mapper.
    pub fn new() -> Self {
        Self
    }

    /// Map one row into a document.
    ///
    /// Numeric fields are trimmed and parsed as `f64`; non-finite values are
    /// rejected because JSON cannot carry them. The `fish` label is passed
    /// through verbatim and must be non-empty.
    pub fn map(&self, row: &RawRow) -> Result<FishDocument, MappingError> {
        Ok(FishDocument {
            ph: Self::number(row, "ph")?,
            temperature: Self::number(row, "temperature")?,
            turbidity: Self::number(row, "turbidity")?,
            fish: Self::label(row, "fish")?,
        })
    }

    /// Map a row, keeping the row itself when it is rejected.
    pub fn process(&self, row: RawRow) -> ProcessedRow {
        match self.map(&row) {
            Ok(document) => ProcessedRow::Document {
                line: row.line,
                document,
            },
            Err(error) => ProcessedRow::Rejected { row, error },
        }
    }

    fn number(row: &RawRow, field: &str) -> Result<f64, MappingError> {
        let raw = row.get(field).ok_or_else(|| MappingError::MissingField {
            field: field.to_string(),
        })?;

        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| MappingError::InvalidNumber {
                field: field.to_string(),
                raw_value: raw.to_string(),
            })
    }

    fn label(row: &RawRow, field: &str) -> Result<String, MappingError> {
        match row.get(field) {
            None => Err(MappingError::MissingField {
                field: field.to_string(),
            }),
            Some("") => Err(MappingError::EmptyLabel {
                field: field.to_string(),
            }),
            Some(label) => Ok(label.to_string()),
        }
    }
}
