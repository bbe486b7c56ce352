//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use salesboard::ProductMetric;
use std::path::PathBuf;

/// SalesBoard: schema mapping, cleaning and KPIs for sales data
#[derive(Parser)]
#[command(name = "salesboard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how columns would be mapped onto the canonical schema
    Detect {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Manual assignment, e.g. --map quantity=HowMany (repeatable)
        #[arg(short, long, value_name = "FIELD=COLUMN")]
        map: Vec<FieldAssignment>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map and clean a data file, writing the canonical table
    Clean {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE", required_unless_present = "sample")]
        file: Option<PathBuf>,

        /// Output path (default: <file>_clean.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Manual assignment, e.g. --map quantity=HowMany (repeatable)
        #[arg(short, long, value_name = "FIELD=COLUMN")]
        map: Vec<FieldAssignment>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the bundled sample dataset instead of a file
        #[arg(long, conflicts_with = "file")]
        sample: bool,

        /// Also write the cleaning log as JSON
        #[arg(long, value_name = "PATH")]
        log_json: Option<PathBuf>,
    },

    /// Run the pipeline and print sales KPIs
    Report {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE", required_unless_present = "sample")]
        file: Option<PathBuf>,

        /// Manual assignment, e.g. --map quantity=HowMany (repeatable)
        #[arg(short, long, value_name = "FIELD=COLUMN")]
        map: Vec<FieldAssignment>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the bundled sample dataset instead of a file
        #[arg(long, conflicts_with = "file")]
        sample: bool,

        /// Number of top products to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Rank products by revenue or units
        #[arg(long)]
        by: Option<ProductMetric>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the bundled sample dataset as CSV
    Sample {
        /// Output path, or - for stdout (default: sample_sales.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// A `field=column` pair given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: String,
    /// `None` for `field=`, which unmaps the field.
    pub column: Option<String>,
}

impl std::str::FromStr for FieldAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, column) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected FIELD=COLUMN, got '{}'", s))?;

        let field = field.trim();
        if field.is_empty() {
            return Err(format!("Missing field name in '{}'", s));
        }

        let column = column.trim();
        Ok(FieldAssignment {
            field: field.to_string(),
            column: (!column.is_empty()).then(|| column.to_string()),
        })
    }
}
