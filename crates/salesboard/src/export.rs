//! Writing tables as delimited text and results as JSON.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SalesError};
use crate::input::Table;

/// Write `table` as delimited text, header row first.
///
/// Missing cells are written as empty fields; timestamps use
/// `%Y-%m-%d %H:%M:%S`.
pub fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Save `table` to `path`; `.tsv`/`.tab` files are tab separated,
/// everything else comma separated.
pub fn save_delimited(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = create_file(path)?;
    write_delimited(table, BufWriter::new(file), delimiter_for(path))
}

/// Save any serializable result as pretty-printed JSON.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = create_file(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|source| SalesError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Delimiter implied by a file extension.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}

fn create_file(path: &Path) -> Result<File> {
    let io_err = |source| SalesError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    File::create(path).map_err(io_err)
}
