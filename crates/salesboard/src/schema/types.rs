//! Semantic types of canonical fields.

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Expected kind of data for a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Free text or identifiers.
    #[default]
    String,
    /// Quantities and prices.
    Numeric,
    /// Dates and timestamps.
    DateTime,
}

impl SemanticType {
    pub fn label(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Numeric => "numeric",
            SemanticType::DateTime => "datetime",
        }
    }

    /// Whether a non-missing cell can be coerced to this type.
    pub fn accepts(&self, value: &Value, date_formats: &[String]) -> bool {
        match self {
            SemanticType::String => true,
            SemanticType::Numeric => !value.to_numeric().is_missing(),
            SemanticType::DateTime => !value.to_timestamp(date_formats).is_missing(),
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
