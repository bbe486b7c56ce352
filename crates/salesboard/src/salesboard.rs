//! Main SalesBoard struct and public API.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleaning::{CleanerConfig, CleaningLog, CleaningSink, CleaningSummary, DataCleaner, NoopSink};
use crate::error::{Result, SalesError};
use crate::input::{Parser, ParserConfig, SourceMetadata, Table};
use crate::kpi::{DEFAULT_TOP_N, KpiCalculator, KpiSummary, ProductMetric};
use crate::mapping::{self, ColumnMapping, Detection, MappingReport};
use crate::schema::{CanonicalTable, SchemaRegistry};

/// Configuration for a SalesBoard pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesBoardConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Cleaner configuration.
    pub cleaner: CleanerConfig,
    /// Manual column assignments applied on top of detection.
    pub overrides: ColumnMapping,
    /// Number of products in the KPI summary.
    pub top_n: usize,
    /// Ranking metric for top products.
    pub by: ProductMetric,
}

impl Default for SalesBoardConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            cleaner: CleanerConfig::default(),
            overrides: ColumnMapping::new(),
            top_n: DEFAULT_TOP_N,
            by: ProductMetric::Revenue,
        }
    }
}

impl SalesBoardConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SalesError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            SalesError::Config(format!(
                "Failed to parse configuration '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Detected and validated mapping for a raw table, before anything is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingInspection {
    /// How each field was matched by detection, before overrides.
    pub detections: Vec<Detection>,
    /// Detected mapping with overrides applied.
    pub mapping: ColumnMapping,
    pub report: MappingReport,
}

/// Result of running the full pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Metadata about the source file, when read from disk.
    pub source: Option<SourceMetadata>,
    pub detections: Vec<Detection>,
    /// The mapping that was applied.
    pub mapping: ColumnMapping,
    pub report: MappingReport,
    /// Cleaned, enriched canonical table.
    pub table: CanonicalTable,
    pub log: CleaningLog,
    pub cleaning: CleaningSummary,
    pub kpis: KpiSummary,
}

/// Runs parse, map, clean and KPI stages with one configuration.
pub struct SalesBoard {
    config: SalesBoardConfig,
    parser: Parser,
    registry: SchemaRegistry,
    sink: Arc<dyn CleaningSink>,
}

impl SalesBoard {
    /// Create a new SalesBoard instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(SalesBoardConfig::default())
    }

    /// Create a SalesBoard instance with custom configuration.
    pub fn with_config(config: SalesBoardConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self {
            config,
            parser,
            registry: SchemaRegistry::canonical().clone(),
            sink: Arc::new(NoopSink),
        }
    }

    /// Use a registry other than the canonical one.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Receive cleaning-log entries as they are recorded.
    pub fn with_sink(mut self, sink: Arc<dyn CleaningSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Add manual column assignments on top of the configured ones.
    pub fn with_overrides(mut self, overrides: &ColumnMapping) -> Self {
        self.config.overrides = self.config.overrides.merged(overrides);
        self
    }

    pub fn config(&self) -> &SalesBoardConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Detect, override and validate a mapping for `raw` without applying it.
    pub fn inspect(&self, raw: &Table) -> MappingInspection {
        let detections = mapping::detect_detailed(raw.headers(), &self.registry);
        let detected: ColumnMapping = detections
            .iter()
            .map(|d| (d.field.clone(), d.column.clone()))
            .collect();
        let mapping = detected.merged(&self.config.overrides);
        let report = mapping::validate_with_table(
            &mapping,
            raw,
            &self.registry,
            &self.config.cleaner.date_formats,
        );

        debug!(
            mapped = mapping.mapped_count(),
            errors = report.errors.len(),
            advisories = report.advisories.len(),
            "Inspected column mapping"
        );

        MappingInspection {
            detections,
            mapping,
            report,
        }
    }

    /// Parse a file and inspect its mapping.
    pub fn inspect_file(&self, path: impl AsRef<Path>) -> Result<(MappingInspection, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        Ok((self.inspect(&table), source))
    }

    /// Run the full pipeline on a file.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<PipelineResult> {
        let path = path.as_ref();
        let (table, source) = self.parser.parse_file(path)?;
        debug!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            format = %source.format,
            "Parsed source file"
        );
        self.run_table(&table, Some(source))
    }

    /// Run the full pipeline on an in-memory table. `raw` is not modified.
    pub fn run_table(&self, raw: &Table, source: Option<SourceMetadata>) -> Result<PipelineResult> {
        let MappingInspection {
            detections,
            mapping,
            report,
        } = self.inspect(raw);

        let canonical = mapping::apply(&mapping, raw, &self.registry)?;

        let mut cleaner = DataCleaner::with_config(canonical, self.config.cleaner.clone())?
            .with_sink(Arc::clone(&self.sink));
        cleaner.clean();
        let cleaning = cleaner.summary();
        let (table, log) = cleaner.into_parts();
        debug!(
            initial = cleaning.initial_rows,
            remaining = cleaning.final_rows,
            "Cleaned table"
        );

        let kpis = KpiCalculator::new(&table)
            .with_customer_sentinel(self.config.cleaner.fill_defaults.customer_id.clone())
            .summary(self.config.top_n, self.config.by);

        Ok(PipelineResult {
            source,
            detections,
            mapping,
            report,
            table,
            log,
            cleaning,
            kpis,
        })
    }
}

impl Default for SalesBoard {
    fn default() -> Self {
        Self::new()
    }
}
