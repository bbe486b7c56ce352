//! Column mapping: detection, validation and projection onto the
//! canonical schema.

mod apply;
mod column_mapping;
mod detect;
mod report;
mod validate;

pub use apply::apply;
pub use column_mapping::ColumnMapping;
pub use detect::{Detection, MatchKind, detect, detect_detailed, normalize};
pub use report::{MappingError, MappingIssue, MappingReport, TypeAdvisory};
pub use validate::{validate, validate_with_table};

use crate::error::Result;
use crate::input::Table;
use crate::schema::{CanonicalTable, SchemaRegistry};

/// Mapper bound to one registry.
///
/// Convenience wrapper over the free functions in this module.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapper<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> ColumnMapper<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn detect(&self, table: &Table) -> ColumnMapping {
        detect(table.headers(), self.registry)
    }

    pub fn detect_detailed(&self, table: &Table) -> Vec<Detection> {
        detect_detailed(table.headers(), self.registry)
    }

    pub fn validate(&self, mapping: &ColumnMapping, table: &Table, date_formats: &[String]) -> MappingReport {
        validate_with_table(mapping, table, self.registry, date_formats)
    }

    pub fn apply(&self, mapping: &ColumnMapping, table: &Table) -> Result<CanonicalTable> {
        apply(mapping, table, self.registry)
    }
}

impl Default for ColumnMapper<'static> {
    fn default() -> Self {
        Self::new(SchemaRegistry::canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    #[test]
    fn test_mapper_round_trip() {
        let raw = Table::from_rows(
            ["Receipt", "SKU", "Qty", "Date", "Price", "Nation"],
            vec![vec![
                Value::from("9"),
                Value::from("X1"),
                Value::from(2),
                Value::from("2011-05-01"),
                Value::from(1.25),
                Value::from("Spain"),
            ]],
        )
        .unwrap();

        let mapper = ColumnMapper::default();
        let mapping = mapper.detect(&raw);
        assert_eq!(mapping.get("country"), None);

        let mapping = mapping.with("country", "Nation");
        assert!(mapper.validate(&mapping, &raw, &[]).is_valid());

        let table = mapper.apply(&mapping, &raw).unwrap();
        assert_eq!(table.headers().len(), 6);
        assert_eq!(table.value(0, "country"), Some(&Value::from("Spain")));
    }
}
