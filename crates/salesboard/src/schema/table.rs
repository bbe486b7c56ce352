//! Tables restricted to the canonical vocabulary.

use std::collections::HashSet;
use std::ops::Deref;

use serde::Serialize;

use crate::error::{Result, SalesError};
use crate::input::Table;

use super::columns;
use super::registry::SchemaRegistry;

/// A table whose columns are canonical field names, plus any columns the
/// cleaner derives from them.
///
/// Downstream consumers only ever read it; the cleaner works on its own copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalTable {
    table: Table,
}

impl CanonicalTable {
    /// Wrap a table produced by projecting a validated mapping.
    pub(crate) fn from_projection(table: Table) -> Self {
        Self { table }
    }

    /// Check that every column belongs to `registry` or is a derived column,
    /// and that no column appears twice.
    pub fn from_table(table: Table, registry: &SchemaRegistry) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in table.headers() {
            let known = registry.contains(header) || columns::DERIVED.contains(&header.as_str());
            if !known || !seen.insert(header.as_str()) {
                return Err(SalesError::NotCanonical(header.clone()));
            }
        }
        Ok(Self { table })
    }

    pub fn as_table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }
}

impl Deref for CanonicalTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

impl AsRef<Table> for CanonicalTable {
    fn as_ref(&self) -> &Table {
        &self.table
    }
}
