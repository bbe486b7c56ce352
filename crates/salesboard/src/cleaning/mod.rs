//! Data cleaning pipeline with an audit log.

mod cleaner;
mod log;
mod policy;
mod sink;

pub use cleaner::{CleaningSummary, DataCleaner};
pub use log::{CleaningLog, CleaningStage, CleaningStep};
pub use policy::{CancellationPolicy, CancellationRule, CleanerConfig, FillDefaults};
pub use sink::{CleaningSink, NoopSink, TracingSink};
