//! CLI command implementations.

pub mod clean;
pub mod detect;
pub mod report;
pub mod sample;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use salesboard::cleaning::TracingSink;
use salesboard::input::{sample_dataset, sample_overrides};
use salesboard::{ColumnMapping, PipelineResult, SalesBoard, SalesBoardConfig};

use crate::cli::FieldAssignment;

/// Load the configuration file, if any, and fold in `--map` assignments.
pub fn load_config(
    config: Option<&Path>,
    map: &[FieldAssignment],
) -> Result<SalesBoardConfig, Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => SalesBoardConfig::load(path)?,
        None => SalesBoardConfig::default(),
    };

    let mut overrides = ColumnMapping::new();
    for assignment in map {
        match &assignment.column {
            Some(column) => overrides.set(assignment.field.clone(), column.clone()),
            None => overrides.clear(assignment.field.clone()),
        }
    }
    config.overrides = config.overrides.merged(&overrides);
    Ok(config)
}

/// Run the pipeline on `file`, or on the bundled sample.
///
/// The sample's built-in overrides sit underneath any user assignments.
pub fn run_pipeline(
    config: SalesBoardConfig,
    file: Option<&PathBuf>,
    sample: bool,
    verbose: bool,
) -> Result<PipelineResult, Box<dyn std::error::Error>> {
    let mut board = if sample {
        let mut config = config;
        config.overrides = sample_overrides().merged(&config.overrides);
        SalesBoard::with_config(config)
    } else {
        SalesBoard::with_config(config)
    };

    if verbose {
        board = board.with_sink(Arc::new(TracingSink));
    }

    match file {
        Some(path) if !sample => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            Ok(board.run_file(path)?)
        }
        _ => Ok(board.run_table(&sample_dataset()?, None)?),
    }
}

/// Name shown for the data being processed.
pub fn source_label(result: &PipelineResult) -> String {
    result
        .source
        .as_ref()
        .map(|s| s.file.clone())
        .unwrap_or_else(|| "bundled sample".to_string())
}
