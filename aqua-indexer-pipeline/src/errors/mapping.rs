//! Error types for mapping raw rows into documents.

use thiserror::Error;

/// Why a single row could not become a document. Row-level: the row is
/// counted as failed and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The row has no value for a required column.
    #[error("missing field '{field}'")]
    MissingField { field: String },

    /// A numeric column does not hold a finite decimal number.
    #[error("invalid number in field '{field}': {raw_value:?}")]
    InvalidNumber { field: String, raw_value: String },

    /// The species label is empty.
    #[error("empty label in field '{field}'")]
    EmptyLabel { field: String },
}

impl MappingError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            MappingError::MissingField { field }
            | MappingError::InvalidNumber { field, .. }
            | MappingError::EmptyLabel { field } => field,
        }
    }

    /// Raw value of the offending field, when there was one.
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            MappingError::InvalidNumber { raw_value, .. } => Some(raw_value),
            MappingError::EmptyLabel { .. } => Some(""),
            MappingError::MissingField { .. } => None,
        }
    }
}
