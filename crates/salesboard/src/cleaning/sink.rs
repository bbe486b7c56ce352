//! Receivers for cleaning-log entries as they are recorded.

use tracing::{debug, info};

use super::log::CleaningStep;

/// Receives every cleaning step as it is appended to the log.
pub trait CleaningSink: Send + Sync {
    fn record(&self, step: &CleaningStep);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl CleaningSink for NoopSink {
    fn record(&self, _step: &CleaningStep) {}
}

/// Sink that emits each step as a `tracing` event.
///
/// Steps that removed rows are logged at info level, the rest at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CleaningSink for TracingSink {
    fn record(&self, step: &CleaningStep) {
        if step.rows_removed > 0 {
            info!(
                stage = %step.stage,
                rows_removed = step.rows_removed,
                rows_remaining = step.rows_remaining,
                "{}",
                step.details
            );
        } else {
            debug!(
                stage = %step.stage,
                rows_remaining = step.rows_remaining,
                "{}",
                step.details
            );
        }
    }
}

impl<F> CleaningSink for F
where
    F: Fn(&CleaningStep) + Send + Sync,
{
    fn record(&self, step: &CleaningStep) {
        self(step)
    }
}
