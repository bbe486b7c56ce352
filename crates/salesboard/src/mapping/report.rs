//! Validation outcomes for column mappings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::SemanticType;

/// One reason a mapping cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MappingIssue {
    /// A required field has no source column.
    RequiredUnmapped { field: String },
    /// Several fields claim the same source column.
    DuplicateColumn { column: String, fields: Vec<String> },
    /// A mapped column is not present in the source table.
    MissingColumn { field: String, column: String },
    /// The mapping assigns a column to a field the registry does not define.
    UnknownField { field: String, column: String },
}

impl fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingIssue::RequiredUnmapped { field } => {
                write!(f, "Required field '{}' is not mapped", field)
            }
            MappingIssue::DuplicateColumn { column, fields } => write!(
                f,
                "Column '{}' is mapped to multiple fields: {}",
                column,
                fields.join(", ")
            ),
            MappingIssue::MissingColumn { field, column } => write!(
                f,
                "Mapped column '{}' (for '{}') does not exist in the source table",
                column, field
            ),
            MappingIssue::UnknownField { field, column } => write!(
                f,
                "Column '{}' is mapped to unknown field '{}'",
                column, field
            ),
        }
    }
}

/// A non-fatal note that a column's cells do not all fit the field's type.
///
/// The cleaner drops rows that fail coercion, so this never blocks a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAdvisory {
    pub field: String,
    pub column: String,
    pub expected: SemanticType,
    /// Non-missing cells that do not coerce.
    pub incompatible: usize,
    /// Non-missing cells inspected.
    pub checked: usize,
    /// First offending cell, rendered as text.
    pub example: String,
}

impl fmt::Display for TypeAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' expects {} data, but {} of {} values in '{}' do not convert (e.g. '{}')",
            self.field, self.expected, self.incompatible, self.checked, self.column, self.example
        )
    }
}

/// Result of validating a mapping: every violation, plus type advisories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    pub errors: Vec<MappingIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<TypeAdvisory>,
}

impl MappingReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the report into an error carrying every issue, if there are any.
    pub fn into_result(self) -> Result<(), MappingError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(MappingError {
                issues: self.errors,
            })
        }
    }
}

/// Error raised when applying a mapping that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    pub issues: Vec<MappingIssue>,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid column mapping ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for MappingError {}
