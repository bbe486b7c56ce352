//! Mapping validation against the registry and the source columns.

use indexmap::IndexMap;

use crate::input::Table;
use crate::schema::{SchemaRegistry, SemanticType};

use super::column_mapping::ColumnMapping;
use super::report::{MappingIssue, MappingReport, TypeAdvisory};

/// Check a mapping against the registry and the source column names.
///
/// Every check runs; the report lists one issue per violation, in the order
/// required fields, duplicate columns, missing columns, unknown fields.
pub fn validate<S: AsRef<str>>(
    mapping: &ColumnMapping,
    source_columns: &[S],
    registry: &SchemaRegistry,
) -> MappingReport {
    let mut errors = Vec::new();

    for field in registry.required_fields() {
        if mapping.get(&field.name).is_none() {
            errors.push(MappingIssue::RequiredUnmapped {
                field: field.name.clone(),
            });
        }
    }

    let mut claims: IndexMap<&str, Vec<String>> = IndexMap::new();
    for (field, column) in mapping.mapped() {
        claims.entry(column).or_default().push(field.to_string());
    }
    for (column, fields) in claims {
        if fields.len() > 1 {
            errors.push(MappingIssue::DuplicateColumn {
                column: column.to_string(),
                fields,
            });
        }
    }

    for (field, column) in mapping.mapped() {
        if !source_columns.iter().any(|c| c.as_ref() == column) {
            errors.push(MappingIssue::MissingColumn {
                field: field.to_string(),
                column: column.to_string(),
            });
        }
    }

    for (field, column) in mapping.mapped() {
        if !registry.contains(field) {
            errors.push(MappingIssue::UnknownField {
                field: field.to_string(),
                column: column.to_string(),
            });
        }
    }

    MappingReport {
        errors,
        advisories: Vec::new(),
    }
}

/// Validate against a whole table, adding type advisories for mapped
/// numeric and date-time fields.
pub fn validate_with_table(
    mapping: &ColumnMapping,
    table: &Table,
    registry: &SchemaRegistry,
    date_formats: &[String],
) -> MappingReport {
    let mut report = validate(mapping, table.headers(), registry);
    report.advisories = type_advisories(mapping, table, registry, date_formats);
    report
}

fn type_advisories(
    mapping: &ColumnMapping,
    table: &Table,
    registry: &SchemaRegistry,
    date_formats: &[String],
) -> Vec<TypeAdvisory> {
    let mut advisories = Vec::new();

    for (field_name, column) in mapping.mapped() {
        let Some(field) = registry.field(field_name) else {
            continue;
        };
        if field.semantic_type == SemanticType::String {
            continue;
        }
        let Some(index) = table.column_index(column) else {
            continue;
        };

        let mut checked = 0;
        let mut incompatible = 0;
        let mut example = None;
        for value in table.column_values(index).filter(|v| !v.is_missing()) {
            checked += 1;
            if !field.semantic_type.accepts(value, date_formats) {
                incompatible += 1;
                example.get_or_insert_with(|| value.to_string());
            }
        }

        if let Some(example) = example {
            advisories.push(TypeAdvisory {
                field: field.name.clone(),
                column: column.to_string(),
                expected: field.semantic_type,
                incompatible,
                checked,
                example,
            });
        }
    }

    advisories
}
