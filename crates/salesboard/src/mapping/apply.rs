//! Projection of a raw table onto the canonical schema.

use crate::error::Result;
use crate::input::Table;
use crate::schema::{CanonicalTable, SchemaRegistry};

use super::column_mapping::ColumnMapping;
use super::report::{MappingError, MappingIssue};
use super::validate::validate;

/// Select the mapped columns of `raw`, renamed to their canonical names.
///
/// The mapping is validated first; an invalid mapping fails with every
/// issue attached. Columns come out in registry order. Rows are neither
/// dropped nor reordered, and `raw` itself is left untouched.
pub fn apply(
    mapping: &ColumnMapping,
    raw: &Table,
    registry: &SchemaRegistry,
) -> Result<CanonicalTable> {
    validate(mapping, raw.headers(), registry).into_result()?;

    let mut headers = Vec::new();
    let mut indices = Vec::new();
    for field in registry.fields() {
        let Some(column) = mapping.get(&field.name) else {
            continue;
        };
        let index = raw.column_index(column).ok_or_else(|| MappingError {
            issues: vec![MappingIssue::MissingColumn {
                field: field.name.clone(),
                column: column.to_string(),
            }],
        })?;
        headers.push(field.name.clone());
        indices.push(index);
    }

    let rows = raw
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(CanonicalTable::from_projection(Table::new(headers, rows)?))
}
