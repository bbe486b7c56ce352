//! Input parsing, cell values and data source handling.

mod parser;
mod sample;
mod source;
mod value;

pub use parser::{Parser, ParserConfig};
pub use sample::{sample_dataset, sample_overrides};
pub use source::{RawTable, SourceMetadata, Table};
pub use value::{Value, parse_timestamp};

pub(crate) use value::CellKey;
