//! Canonical field descriptors.

use serde::{Deserialize, Serialize};

use super::types::SemanticType;

/// Definition of one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique symbolic key, e.g. `invoice_no`.
    pub name: String,
    /// Whether a mapping must assign a source column to this field.
    pub required: bool,
    /// Expected kind of data.
    pub semantic_type: SemanticType,
    /// Source column names commonly used for this field, in priority order.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl FieldDescriptor {
    /// Create an optional field with no aliases.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            required: false,
            semantic_type,
            aliases: Vec::new(),
            description: String::new(),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
