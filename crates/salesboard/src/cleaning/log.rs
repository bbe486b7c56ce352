//! Audit trail of cleaning steps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    Initialization,
    Deduplicate,
    HandleMissing,
    FillMissing,
    TypeConversion,
    BusinessRules,
    DeriveFields,
    Completion,
}

impl CleaningStage {
    /// Human-readable step name.
    pub fn label(&self) -> &'static str {
        match self {
            CleaningStage::Initialization => "Initialization",
            CleaningStage::Deduplicate => "Remove Duplicates",
            CleaningStage::HandleMissing => "Handle Missing",
            CleaningStage::FillMissing => "Fill Missing",
            CleaningStage::TypeConversion => "Type Conversion",
            CleaningStage::BusinessRules => "Business Logic",
            CleaningStage::DeriveFields => "Feature Engineering",
            CleaningStage::Completion => "Completion",
        }
    }
}

impl fmt::Display for CleaningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the cleaning log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningStep {
    pub stage: CleaningStage,
    /// Step name, as shown to users.
    pub step: String,
    pub details: String,
    pub rows_removed: usize,
    /// Row count after the step ran.
    pub rows_remaining: usize,
    pub timestamp: DateTime<Utc>,
}

impl CleaningStep {
    pub fn new(
        stage: CleaningStage,
        details: impl Into<String>,
        rows_removed: usize,
        rows_remaining: usize,
    ) -> Self {
        Self {
            stage,
            step: stage.label().to_string(),
            details: details.into(),
            rows_removed,
            rows_remaining,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.details)?;
        if self.rows_removed > 0 {
            write!(f, " (removed {} rows)", self.rows_removed)?;
        }
        Ok(())
    }
}

/// Append-only, ordered list of cleaning steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleaningLog {
    steps: Vec<CleaningStep>,
}

impl CleaningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, step: CleaningStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Entries recorded for one stage.
    pub fn stage(&self, stage: CleaningStage) -> impl Iterator<Item = &CleaningStep> {
        self.steps.iter().filter(move |s| s.stage == stage)
    }

    /// Rows removed across all steps.
    pub fn total_removed(&self) -> usize {
        self.steps.iter().map(|s| s.rows_removed).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleaningStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a CleaningLog {
    type Item = &'a CleaningStep;
    type IntoIter = std::slice::Iter<'a, CleaningStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
