//! Index configuration and mappings.
//!
//! This module defines the field schema of the sensor readings index.

use serde_json::{json, Map, Value};

/// The default name of the search index.
pub const DEFAULT_INDEX_NAME: &str = "iot-fishdata";

/// Field types used by the sensor readings mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 32-bit floating point number.
    Float,
    /// Exact-match string, used for categorical labels.
    Keyword,
}

impl FieldType {
    /// Name of the type in the mapping DSL.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Float => "float",
            FieldType::Keyword => "keyword",
        }
    }
}

/// Static declaration of field name to field type, sent once when the index
/// is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    fields: Vec<(String, FieldType)>,
}

impl IndexSchema {
    /// Create a schema from `(field, type)` pairs.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = (S, FieldType)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, field_type)| (name.into(), field_type))
                .collect(),
        }
    }

    /// The schema of the sensor readings index:
    /// - **ph**, **temperature**, **turbidity**: `float`
    /// - **fish**: `keyword`
    pub fn fish_readings() -> Self {
        Self::new([
            ("ph", FieldType::Float),
            ("temperature", FieldType::Float),
            ("turbidity", FieldType::Float),
            ("fish", FieldType::Keyword),
        ])
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    /// Body of the create-index request.
    pub fn to_mapping(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, field_type)| (name.clone(), json!({ "type": field_type.as_str() })))
            .collect();

        json!({
            "mappings": {
                "properties": properties
            }
        })
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::fish_readings()
    }
}
