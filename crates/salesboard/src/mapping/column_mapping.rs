//! Assignment of canonical fields to source columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaRegistry;

/// Mapping from canonical field name to a source column, or `None` when
/// the field is unmapped.
///
/// Entry order is preserved; detected mappings follow registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: IndexMap<String, Option<String>>,
}

impl ColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping listing every registry field as unmapped.
    pub fn unmapped(registry: &SchemaRegistry) -> Self {
        registry
            .field_names()
            .map(|name| (name.to_string(), None))
            .collect()
    }

    /// Source column assigned to `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).and_then(|c| c.as_deref())
    }

    /// Whether `field` has an entry, mapped or not.
    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Assign `column` to `field`, replacing any previous assignment.
    pub fn set(&mut self, field: impl Into<String>, column: impl Into<String>) {
        self.entries.insert(field.into(), Some(column.into()));
    }

    /// Mark `field` as explicitly unmapped.
    pub fn clear(&mut self, field: impl Into<String>) {
        self.entries.insert(field.into(), None);
    }

    /// Builder form of [`ColumnMapping::set`].
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.set(field, column);
        self
    }

    /// Apply manual overrides on top of this mapping. Every entry in
    /// `overrides` wins, including explicit unmappings.
    pub fn merged(&self, overrides: &ColumnMapping) -> Self {
        let mut merged = self.clone();
        for (field, column) in &overrides.entries {
            merged.entries.insert(field.clone(), column.clone());
        }
        merged
    }

    /// All entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(field, column)| (field.as_str(), column.as_deref()))
    }

    /// Only the mapped entries, in order.
    pub fn mapped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(field, column)| column.as_deref().map(|c| (field.as_str(), c)))
    }

    pub fn mapped_count(&self) -> usize {
        self.mapped().count()
    }

    /// Fields that have an entry but no column.
    pub fn unmapped_fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(field, _)| field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
