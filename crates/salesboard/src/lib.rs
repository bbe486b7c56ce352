//! SalesBoard: schema mapping, cleaning and KPIs for sales transaction tables.
//!
//! A raw table with arbitrary column names is mapped onto a canonical
//! sales vocabulary, cleaned by a fixed five-stage pipeline that records
//! every step, and summarized into headline metrics and rollups.
//!
//! # Core Principles
//!
//! - **Deterministic**: Detection and cleaning are rule-based and repeatable
//! - **Non-destructive**: The caller's table is never modified
//! - **Auditable**: Every cleaning step is logged with row counts
//!
//! # Example
//!
//! ```no_run
//! use salesboard::SalesBoard;
//!
//! let board = SalesBoard::new();
//! let result = board.run_file("transactions.csv").unwrap();
//!
//! println!("Rows kept: {}", result.table.row_count());
//! println!("Revenue: {:.2}", result.kpis.headline.total_revenue);
//! ```

pub mod cleaning;
pub mod error;
pub mod export;
pub mod input;
pub mod kpi;
pub mod mapping;
pub mod schema;

mod salesboard;

pub use crate::salesboard::{MappingInspection, PipelineResult, SalesBoard, SalesBoardConfig};
pub use cleaning::{CleanerConfig, CleaningLog, CleaningStep, DataCleaner};
pub use error::{Result, SalesError};
pub use input::{SourceMetadata, Table, Value};
pub use kpi::{KpiCalculator, KpiSummary, ProductMetric};
pub use mapping::{ColumnMapper, ColumnMapping, MappingReport};
pub use schema::{CanonicalTable, SchemaRegistry};
