//! Sensor document types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Columns every input file must declare in its header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["ph", "temperature", "turbidity", "fish"];

/// One data row of the input file, keyed by header name.
///
/// Rows shorter than the header simply lack the trailing fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    /// 1-based data row number (the header row is not counted).
    pub line: u64,
    /// Raw field values keyed by column name.
    pub fields: HashMap<String, String>,
}

impl RawRow {
    /// Create a row from `(column, value)` pairs.
    pub fn new<K, V>(line: u64, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get the raw value of a column, if the row carries it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A water-quality reading with the fish species observed in the tank.
///
/// This is the document stored in the search index; it serializes to a flat
/// JSON object with exactly these four keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishDocument {
    pub ph: f64,
    pub temperature: f64,
    pub turbidity: f64,
    /// Species label, indexed as a keyword.
    pub fish: String,
}

impl FishDocument {
    pub fn new(ph: f64, temperature: f64, turbidity: f64, fish: impl Into<String>) -> Self {
        Self {
            ph,
            temperature,
            turbidity,
            fish: fish.into(),
        }
    }
}
