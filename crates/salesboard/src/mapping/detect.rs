//! Automatic detection of column mappings from header names.

use serde::{Deserialize, Serialize};

use crate::schema::SchemaRegistry;

use super::column_mapping::ColumnMapping;

/// How a source column was matched to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "alias", rename_all = "snake_case")]
pub enum MatchKind {
    /// The normalized column name equals the normalized field name.
    Exact,
    /// The column and this alias contain one another after normalization.
    Alias(String),
}

/// Detection outcome for one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub field: String,
    pub column: Option<String>,
    pub matched_by: Option<MatchKind>,
}

/// Lower-case and drop whitespace and underscores.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Propose a mapping for every registry field.
///
/// No validation happens here: two fields may end up claiming the same
/// column.
pub fn detect<S: AsRef<str>>(source_columns: &[S], registry: &SchemaRegistry) -> ColumnMapping {
    detect_detailed(source_columns, registry)
        .into_iter()
        .map(|d| (d.field, d.column))
        .collect()
}

/// Like [`detect`], also reporting how each field was matched.
pub fn detect_detailed<S: AsRef<str>>(
    source_columns: &[S],
    registry: &SchemaRegistry,
) -> Vec<Detection> {
    let normalized: Vec<(&str, String)> = source_columns
        .iter()
        .map(|c| (c.as_ref(), normalize(c.as_ref())))
        .filter(|(_, n)| !n.is_empty())
        .collect();

    registry
        .fields()
        .iter()
        .map(|field| {
            let (column, matched_by) = match match_field(&field.name, &field.aliases, &normalized) {
                Some((column, kind)) => (Some(column.to_string()), Some(kind)),
                None => (None, None),
            };
            Detection {
                field: field.name.clone(),
                column,
                matched_by,
            }
        })
        .collect()
}

fn match_field<'a>(
    name: &str,
    aliases: &[String],
    columns: &[(&'a str, String)],
) -> Option<(&'a str, MatchKind)> {
    let target = normalize(name);
    if let Some((column, _)) = columns.iter().find(|(_, n)| *n == target) {
        return Some((*column, MatchKind::Exact));
    }

    for alias in aliases {
        let alias_norm = normalize(alias);
        if alias_norm.is_empty() {
            continue;
        }
        let hit = columns
            .iter()
            .find(|(_, n)| n.contains(alias_norm.as_str()) || alias_norm.contains(n.as_str()));
        if let Some((column, _)) = hit {
            return Some((*column, MatchKind::Alias(alias.clone())));
        }
    }

    None
}
