//! CSV/TSV parser with delimiter detection and cell type inference.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::source::{SourceMetadata, Table};
use super::value::{Value, parse_timestamp};
use crate::error::{Result, SalesError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(),      // ISO date
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}").unwrap(),  // US date
        Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap(),   // European date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(),      // Alt ISO
    ]
});

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Convert numeric and date-like cells to typed values.
    pub infer_types: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            infer_types: true,
        }
    }
}

/// Parses delimited text into a [`Table`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| SalesError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        if !DELIMITERS.contains(&delimiter) && !delimiter.is_ascii_punctuation() {
            return Err(SalesError::InvalidDelimiter(format!("{:?}", delimiter as char)));
        }

        // Spreadsheet exports often lead with a UTF-8 byte order mark
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record?,
            None => return Err(SalesError::EmptyData("No data rows found".to_string())),
        };

        let mut rows = Vec::new();
        let headers: Vec<String> = if self.config.has_header {
            first.iter().map(|s| s.trim().to_string()).collect()
        } else {
            let generated = (0..first.len()).map(|i| format!("column_{}", i + 1)).collect();
            rows.push(first.iter().map(|s| self.infer_cell(s)).collect::<Vec<_>>());
            generated
        };

        if headers.is_empty() {
            return Err(SalesError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        for result in records {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<Value> = record.iter().map(|s| self.infer_cell(s)).collect();

            // Short rows are padded with missing cells, long rows truncated
            row.resize(expected_cols, Value::Missing);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(SalesError::EmptyData("No data rows found".to_string()));
        }

        Table::new(headers, rows)
    }

    /// Turn one raw field into a tagged cell.
    fn infer_cell(&self, raw: &str) -> Value {
        if Table::is_null_token(raw) {
            return Value::Missing;
        }
        if !self.config.infer_types {
            return Value::Text(raw.to_string());
        }
        infer_value(raw)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer the most specific value for a non-null field.
fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();

    // Zero-padded codes stay text so identifiers keep their digits
    let zero_padded = trimmed.len() > 1
        && trimmed.starts_with('0')
        && trimmed.as_bytes().get(1).is_some_and(u8::is_ascii_digit);

    if !zero_padded {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Value::Number(n);
            }
        }
    }

    if DATE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed)) {
        if let Some(ts) = parse_timestamp(trimmed, &[]) {
            return Value::Timestamp(ts);
        }
    }

    Value::Text(raw.to_string())
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SalesError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a slight bonus as it rarely appears inside values
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{MatchKind, detect_detailed};
    use crate::schema::SchemaRegistry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_infers_cells() {
        let parser = Parser::new();
        let table = parser
            .parse_str("Invoice,Qty,Price,Date,Code\n536365,6,2.55,2010-12-01 08:26:00,00123\nC1,,abc,12/1/2010 8:26,85123A\n")
            .unwrap();

        assert_eq!(table.headers(), ["Invoice", "Qty", "Price", "Date", "Code"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Value::Number(536365.0)));
        assert_eq!(table.get(0, 2), Some(&Value::Number(2.55)));
        assert!(table.get(0, 3).unwrap().as_timestamp().is_some());
        assert_eq!(table.get(0, 4), Some(&Value::from("00123")));
        assert_eq!(table.get(1, 1), Some(&Value::Missing));
        assert_eq!(table.get(1, 2), Some(&Value::from("abc")));
        assert!(table.get(1, 3).unwrap().as_timestamp().is_some());
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let parser = Parser::new();
        let table = parser
            .parse_str("\u{feff}InvoiceNo,Quantity\n536365,6\n")
            .unwrap();
        assert_eq!(table.headers(), ["InvoiceNo", "Quantity"]);

        let details = detect_detailed(table.headers(), SchemaRegistry::canonical());
        let invoice = details.iter().find(|d| d.field == "invoice_no").unwrap();
        assert_eq!(invoice.column.as_deref(), Some("InvoiceNo"));
        assert_eq!(invoice.matched_by, Some(MatchKind::Exact));
    }

    #[test]
    fn test_parse_without_inference() {
        let parser = Parser::with_config(ParserConfig {
            infer_types: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("a,b\n1,\n").unwrap();
        assert_eq!(table.get(0, 0), Some(&Value::from("1")));
        assert_eq!(table.get(0, 1), Some(&Value::Missing));
    }

    #[test]
    fn test_short_rows_padded() {
        let table = Parser::new().parse_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.get(0, 2), Some(&Value::Missing));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Parser::new().parse_str("a,b,c\n").unwrap_err();
        assert!(matches!(err, SalesError::EmptyData(_)));
    }

    #[test]
    fn test_parse_file_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id\tqty\n1\t2\n3\t4\n").unwrap();

        let (table, meta) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.column_count, 2);
        assert!(meta.hash.starts_with("sha256:"));
    }
}
