//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};

use super::value::Value;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been parsed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Rectangular table of tagged cells.
///
/// Every row holds exactly one cell per header; construction rejects
/// anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// A table as delivered by the source, before any column mapping.
pub type RawTable = Table;

impl Table {
    /// Create a table, checking that every row matches the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let expected = headers.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(SalesError::NotTabular {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Build a table from string headers and anything convertible to cells.
    pub fn from_rows<H, R, V>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let headers = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by row and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.get(row, self.column_index(column)?)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    /// Keep rows for which `keep` returns true. Returns the number removed.
    pub(crate) fn retain_rows(&mut self, mut keep: impl FnMut(&[Value]) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Keep rows whose position is flagged in `mask`. Returns the number removed.
    pub(crate) fn retain_mask(&mut self, mask: &[bool]) -> usize {
        let before = self.rows.len();
        let mut flags = mask.iter();
        self.rows.retain(|_| flags.next().copied().unwrap_or(true));
        before - self.rows.len()
    }

    /// Overwrite a column in place, or append it if absent.
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Check if a raw string represents a missing/null value.
    pub fn is_null_token(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(
            ["a", "b"],
            vec![vec![Value::from(1), Value::from("x")], vec![Value::from(2), Value::Missing]],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::from_rows(["a", "b"], vec![vec![Value::from(1)]]).unwrap_err();
        assert!(matches!(
            err,
            SalesError::NotTabular { row: 0, expected: 2, found: 1 }
        ));
    }

    #[test]
    fn test_lookup() {
        let t = table();
        assert_eq!(t.column_index("b"), Some(1));
        assert_eq!(t.value(1, "a"), Some(&Value::from(2)));
        assert!(t.value(0, "zzz").is_none());
        assert_eq!(t.column_by_name("b").unwrap().len(), 2);
    }

    #[test]
    fn test_set_column_overwrites_in_place() {
        let mut t = table();
        t.set_column("c", vec![Value::from(3), Value::from(4)]);
        assert_eq!(t.headers(), ["a", "b", "c"]);
        t.set_column("a", vec![Value::from(9), Value::from(9)]);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.value(0, "a"), Some(&Value::from(9)));
    }

    #[test]
    fn test_retain_mask() {
        let mut t = table();
        assert_eq!(t.retain_mask(&[false, true]), 1);
        assert_eq!(t.value(0, "a"), Some(&Value::from(2)));
    }

    #[test]
    fn test_is_null_token() {
        assert!(Table::is_null_token(""));
        assert!(Table::is_null_token("NA"));
        assert!(Table::is_null_token("NaN"));
        assert!(Table::is_null_token("null"));
        assert!(!Table::is_null_token("0"));
        assert!(!Table::is_null_token("Unknown"));
    }
}
