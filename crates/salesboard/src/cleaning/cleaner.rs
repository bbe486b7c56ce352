//! The five-stage cleaning pipeline.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};
use crate::input::{CellKey, Value};
use crate::schema::CanonicalTable;
use crate::schema::columns::{
    COUNTRY, CUSTOMER_ID, DAY, DAY_OF_WEEK, DESCRIPTION, HOUR, INVOICE_DATE, INVOICE_NO, MONTH,
    MONTH_YEAR, QUANTITY, TOTAL_PRICE, UNIT_PRICE, YEAR,
};

use super::log::{CleaningLog, CleaningStage, CleaningStep};
use super::policy::{CancellationRule, CleanerConfig};
use super::sink::{CleaningSink, NoopSink};

/// Fields whose absence makes a transaction unusable.
const CRITICAL_FIELDS: [&str; 3] = [QUANTITY, UNIT_PRICE, INVOICE_DATE];

/// Row counts before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub initial_rows: usize,
    pub final_rows: usize,
    pub rows_removed: usize,
    /// Share of the initial rows removed, in percent.
    pub removed_pct: f64,
}

/// Cleans a canonical table in place and records every step.
///
/// Stages run in a fixed order: deduplicate, handle missing values, convert
/// types, apply business rules, derive fields. Every stage is logged even
/// when it changes nothing.
pub struct DataCleaner {
    table: CanonicalTable,
    config: CleanerConfig,
    rule: Arc<dyn CancellationRule>,
    sink: Arc<dyn CleaningSink>,
    log: CleaningLog,
    initial_rows: usize,
    cleaned: bool,
}

impl DataCleaner {
    /// Create a cleaner with the default configuration.
    pub fn new(table: CanonicalTable) -> Result<Self> {
        Self::with_config(table, CleanerConfig::default())
    }

    /// Create a cleaner. Fails on a table with no rows or no columns.
    pub fn with_config(table: CanonicalTable, config: CleanerConfig) -> Result<Self> {
        if table.row_count() == 0 {
            return Err(SalesError::EmptyData("table has no rows".to_string()));
        }
        if table.column_count() == 0 {
            return Err(SalesError::EmptyData("table has no columns".to_string()));
        }

        let initial_rows = table.row_count();
        let rule = Arc::new(config.cancellation.clone());
        let mut cleaner = Self {
            table,
            config,
            rule,
            sink: Arc::new(NoopSink),
            log: CleaningLog::new(),
            initial_rows,
            cleaned: false,
        };
        cleaner.record(
            CleaningStage::Initialization,
            format!("Started with {} rows", initial_rows),
            0,
        );
        Ok(cleaner)
    }

    /// Send log entries to `sink`. Entries already recorded are replayed.
    pub fn with_sink(mut self, sink: Arc<dyn CleaningSink>) -> Self {
        for step in &self.log {
            sink.record(step);
        }
        self.sink = sink;
        self
    }

    /// Replace the configured cancellation policy with a custom rule.
    pub fn with_cancellation_rule(mut self, rule: impl CancellationRule + 'static) -> Self {
        self.rule = Arc::new(rule);
        self
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Run the pipeline and return the cleaned table.
    ///
    /// The pipeline runs once; later calls return the same table without
    /// touching the log.
    pub fn clean(&mut self) -> &CanonicalTable {
        if !self.cleaned {
            self.remove_duplicates();
            self.handle_missing_values();
            self.convert_types();
            self.apply_business_rules();
            self.derive_fields();

            let summary = self.summary();
            self.record(
                CleaningStage::Completion,
                format!(
                    "Finished with {} rows ({:.1}% reduction)",
                    summary.final_rows, summary.removed_pct
                ),
                0,
            );
            self.cleaned = true;
        }
        &self.table
    }

    pub fn table(&self) -> &CanonicalTable {
        &self.table
    }

    pub fn log(&self) -> &CleaningLog {
        &self.log
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    pub fn summary(&self) -> CleaningSummary {
        let final_rows = self.table.row_count();
        let rows_removed = self.initial_rows.saturating_sub(final_rows);
        let removed_pct = if self.initial_rows > 0 {
            rows_removed as f64 / self.initial_rows as f64 * 100.0
        } else {
            0.0
        };
        CleaningSummary {
            initial_rows: self.initial_rows,
            final_rows,
            rows_removed,
            removed_pct,
        }
    }

    /// Consume the cleaner, returning the table and the log.
    pub fn into_parts(self) -> (CanonicalTable, CleaningLog) {
        (self.table, self.log)
    }

    fn record(&mut self, stage: CleaningStage, details: impl Into<String>, rows_removed: usize) {
        let step = CleaningStep::new(stage, details, rows_removed, self.table.row_count());
        self.sink.record(&step);
        self.log.push(step);
    }

    /// Rows count as duplicates when they agree after the type coercion of
    /// stage three, so `"6"` and `6` collide here.
    fn remove_duplicates(&mut self) {
        let numeric = self.present_columns(&[QUANTITY, UNIT_PRICE]);
        let date = self.table.column_index(INVOICE_DATE);
        let formats = &self.config.date_formats;

        let keyed: Vec<Vec<Value>> = self
            .table
            .rows()
            .iter()
            .map(|row| {
                let mut row = row.clone();
                for &i in &numeric {
                    coerce_in_place(&mut row[i], Value::to_numeric);
                }
                if let Some(i) = date {
                    coerce_in_place(&mut row[i], |v| v.to_timestamp(formats));
                }
                row
            })
            .collect();

        let mask: Vec<bool> = {
            let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::new();
            keyed
                .iter()
                .map(|row| seen.insert(row.iter().map(Value::key).collect()))
                .collect()
        };
        let removed = self.table.table_mut().retain_mask(&mask);
        self.record(CleaningStage::Deduplicate, "Removed identical rows", removed);
    }

    fn handle_missing_values(&mut self) {
        let critical = self.present_columns(&CRITICAL_FIELDS);
        let removed = self
            .table
            .table_mut()
            .retain_rows(|row| critical.iter().all(|&i| !row[i].is_missing()));
        self.record(
            CleaningStage::HandleMissing,
            "Dropped rows with missing critical data",
            removed,
        );

        let defaults = &self.config.fill_defaults;
        let fills = [
            (CUSTOMER_ID, defaults.customer_id.clone()),
            (DESCRIPTION, defaults.description.clone()),
            (COUNTRY, defaults.country.clone()),
        ];
        let mut filled = 0;
        for (column, default) in fills {
            let Some(index) = self.table.column_index(column) else {
                continue;
            };
            for row in self.table.table_mut().rows_mut() {
                if row[index].is_missing() {
                    row[index] = Value::Text(default.clone());
                    filled += 1;
                }
            }
        }
        self.record(
            CleaningStage::FillMissing,
            format!("Filled {} optional values", filled),
            0,
        );
    }

    fn convert_types(&mut self) {
        let numeric = self.present_columns(&[QUANTITY, UNIT_PRICE]);
        let date = self.table.column_index(INVOICE_DATE);
        let formats = &self.config.date_formats;

        for row in self.table.table_mut().rows_mut() {
            for &i in &numeric {
                row[i] = row[i].to_numeric();
            }
            if let Some(i) = date {
                row[i] = row[i].to_timestamp(formats);
            }
        }

        let critical = self.present_columns(&CRITICAL_FIELDS);
        let removed = self
            .table
            .table_mut()
            .retain_rows(|row| critical.iter().all(|&i| !row[i].is_missing()));
        let details = if removed > 0 {
            "Dropped rows with invalid format"
        } else {
            "All data types valid"
        };
        self.record(CleaningStage::TypeConversion, details, removed);
    }

    fn apply_business_rules(&mut self) {
        let quantity = self.table.column_index(QUANTITY);
        let price = self.table.column_index(UNIT_PRICE);
        let invoice = self.table.column_index(INVOICE_NO);
        let rule = Arc::clone(&self.rule);

        let removed = self.table.table_mut().retain_rows(|row| {
            let positive_quantity =
                quantity.is_none_or(|i| row[i].as_number().is_some_and(|q| q > 0.0));
            let valid_price = price.is_none_or(|i| row[i].as_number().is_some_and(|p| p >= 0.0));
            let not_cancelled = invoice.is_none_or(|i| !rule.is_cancelled(&row[i]));
            positive_quantity && valid_price && not_cancelled
        });
        self.record(
            CleaningStage::BusinessRules,
            "Removed returns/cancellations/invalid values",
            removed,
        );
    }

    fn derive_fields(&mut self) {
        let mut created = Vec::new();

        if let (Some(q), Some(p)) = (
            self.table.column_index(QUANTITY),
            self.table.column_index(UNIT_PRICE),
        ) {
            let totals = self
                .table
                .rows()
                .iter()
                .map(|row| match (row[q].as_number(), row[p].as_number()) {
                    (Some(q), Some(p)) => Value::Number(q * p),
                    _ => Value::Missing,
                })
                .collect();
            self.table.table_mut().set_column(TOTAL_PRICE, totals);
            created.push(TOTAL_PRICE);
        }

        if let Some(d) = self.table.column_index(INVOICE_DATE) {
            let stamps: Vec<_> = self
                .table
                .rows()
                .iter()
                .map(|row| row[d].as_timestamp())
                .collect();
            let columns = [
                (YEAR, date_part(&stamps, |ts| Value::from(ts.year()))),
                (MONTH, date_part(&stamps, |ts| Value::from(ts.month() as i64))),
                (DAY, date_part(&stamps, |ts| Value::from(ts.day() as i64))),
                (
                    DAY_OF_WEEK,
                    date_part(&stamps, |ts| {
                        Value::from(ts.weekday().num_days_from_monday() as i64)
                    }),
                ),
                (HOUR, date_part(&stamps, |ts| Value::from(ts.hour() as i64))),
                (
                    MONTH_YEAR,
                    date_part(&stamps, |ts| Value::Text(ts.format("%Y-%m").to_string())),
                ),
            ];
            for (name, values) in columns {
                self.table.table_mut().set_column(name, values);
                created.push(name);
            }
        }

        let details = if created.is_empty() {
            "No derived fields could be created".to_string()
        } else {
            format!("Created derived fields ({})", created.join(", "))
        };
        self.record(CleaningStage::DeriveFields, details, 0);
    }

    fn present_columns(&self, names: &[&str]) -> Vec<usize> {
        names
            .iter()
            .filter_map(|name| self.table.column_index(name))
            .collect()
    }
}

/// Replace a cell with its coerced form, leaving cells that fail to convert
/// untouched so they stay distinct.
fn coerce_in_place(cell: &mut Value, coerce: impl Fn(&Value) -> Value) {
    let coerced = coerce(cell);
    if !coerced.is_missing() {
        *cell = coerced;
    }
}

fn date_part(stamps: &[Option<NaiveDateTime>], part: impl Fn(&NaiveDateTime) -> Value) -> Vec<Value> {
    stamps
        .iter()
        .map(|ts| ts.as_ref().map_or(Value::Missing, &part))
        .collect()
}

impl fmt::Debug for DataCleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCleaner")
            .field("rows", &self.table.row_count())
            .field("config", &self.config)
            .field("steps", &self.log.len())
            .field("cleaned", &self.cleaned)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::input::Table;
    use crate::schema::SchemaRegistry;

    fn canonical(headers: &[&str], rows: Vec<Vec<Value>>) -> CanonicalTable {
        let table = Table::from_rows(headers.iter().copied(), rows).unwrap();
        CanonicalTable::from_table(table, SchemaRegistry::canonical()).unwrap()
    }

    fn business_table() -> CanonicalTable {
        canonical(
            &[INVOICE_NO, QUANTITY, UNIT_PRICE, INVOICE_DATE],
            vec![
                vec!["536365".into(), 6.into(), 2.5.into(), "2010-12-01".into()],
                vec!["536365".into(), (-1).into(), 2.5.into(), "2010-12-01".into()],
                vec!["C99".into(), 0.into(), 2.5.into(), "2010-12-01".into()],
                vec!["536367".into(), 3.into(), (-1.0).into(), "2010-12-01".into()],
                vec!["536365".into(), 6.into(), 2.5.into(), "2010-12-01".into()],
            ],
        )
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = canonical(&[QUANTITY], vec![]);
        assert!(matches!(DataCleaner::new(table), Err(SalesError::EmptyData(_))));
    }

    #[test]
    fn test_business_rules_filter() {
        let mut cleaner = DataCleaner::new(business_table()).unwrap();
        let cleaned = cleaner.clean();
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.value(0, TOTAL_PRICE), Some(&Value::from(15.0)));

        let business = cleaner.log().stage(CleaningStage::BusinessRules).next().unwrap();
        assert_eq!(business.rows_removed, 3);
        let dedup = cleaner.log().stage(CleaningStage::Deduplicate).next().unwrap();
        assert_eq!(dedup.rows_removed, 1);
    }

    #[test]
    fn test_duplicates_detected_across_cell_types() {
        let table = canonical(
            &[INVOICE_NO, QUANTITY, UNIT_PRICE, INVOICE_DATE],
            vec![
                vec!["536365".into(), "6".into(), 2.5.into(), "2010-12-01".into()],
                vec!["536365".into(), 6.into(), "2.50".into(), "2010-12-01 00:00:00".into()],
                vec!["536366".into(), "abc".into(), 2.5.into(), "2010-12-01".into()],
                vec!["536366".into(), "xyz".into(), 2.5.into(), "2010-12-01".into()],
            ],
        );
        let mut cleaner = DataCleaner::new(table).unwrap();
        cleaner.clean();
        let dedup = cleaner.log().stage(CleaningStage::Deduplicate).next().unwrap();
        assert_eq!(dedup.rows_removed, 1);
        let conversion = cleaner.log().stage(CleaningStage::TypeConversion).next().unwrap();
        assert_eq!(conversion.rows_removed, 2);

        let (once, _) = cleaner.into_parts();
        assert_eq!(once.row_count(), 1);

        let mut again = DataCleaner::new(once.clone()).unwrap();
        assert_eq!(again.clean(), &once);
    }

    #[test]
    fn test_log_stage_order() {
        let mut cleaner = DataCleaner::new(business_table()).unwrap();
        cleaner.clean();
        let stages: Vec<_> = cleaner.log().iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                CleaningStage::Initialization,
                CleaningStage::Deduplicate,
                CleaningStage::HandleMissing,
                CleaningStage::FillMissing,
                CleaningStage::TypeConversion,
                CleaningStage::BusinessRules,
                CleaningStage::DeriveFields,
                CleaningStage::Completion,
            ]
        );
        assert_eq!(cleaner.log().steps()[7].rows_remaining, 1);
    }

    #[test]
    fn test_clean_runs_once() {
        let mut cleaner = DataCleaner::new(business_table()).unwrap();
        cleaner.clean();
        let steps = cleaner.log().len();
        let rows = cleaner.clean().row_count();
        assert_eq!(cleaner.log().len(), steps);
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_fills_optional_fields() {
        let table = canonical(
            &[QUANTITY, UNIT_PRICE, CUSTOMER_ID, COUNTRY, DESCRIPTION],
            vec![
                vec![1.into(), 1.0.into(), Value::Missing, Value::Missing, "Mug".into()],
                vec![2.into(), 1.0.into(), "17850".into(), Value::Missing, Value::Missing],
            ],
        );
        let mut cleaner = DataCleaner::new(table).unwrap();
        let cleaned = cleaner.clean();
        assert_eq!(cleaned.value(0, CUSTOMER_ID), Some(&Value::from("Unknown")));
        assert_eq!(cleaned.value(1, COUNTRY), Some(&Value::from("Unknown")));
        assert_eq!(cleaned.value(1, DESCRIPTION), Some(&Value::from("Unknown Product")));

        let fill = cleaner.log().stage(CleaningStage::FillMissing).next().unwrap();
        assert_eq!(fill.details, "Filled 4 optional values");
    }

    #[test]
    fn test_type_conversion_drops_unparseable() {
        let table = canonical(
            &[QUANTITY, UNIT_PRICE, INVOICE_DATE],
            vec![
                vec!["6".into(), "2.55".into(), "2010-12-01 08:26:00".into()],
                vec![6.into(), "Invalid".into(), "2010-12-01".into()],
                vec![6.into(), 1.0.into(), "not a date".into()],
            ],
        );
        let mut cleaner = DataCleaner::new(table).unwrap();
        let cleaned = cleaner.clean();
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.value(0, QUANTITY), Some(&Value::from(6.0)));
        assert_eq!(cleaned.value(0, HOUR), Some(&Value::from(8)));
        assert_eq!(cleaned.value(0, DAY_OF_WEEK), Some(&Value::from(2)));
        assert_eq!(cleaned.value(0, MONTH_YEAR), Some(&Value::from("2010-12")));
    }

    #[test]
    fn test_custom_cancellation_rule() {
        let cleaner = DataCleaner::new(business_table())
            .unwrap()
            .with_cancellation_rule(|v: &Value| v.to_string() == "536365");
        let mut cleaner = cleaner;
        let cleaned = cleaner.clean();
        // only 536367 escapes the rule, and its price is negative
        assert_eq!(cleaned.row_count(), 0);
    }

    #[test]
    fn test_sink_receives_every_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let collector = Arc::clone(&seen);
        let sink = move |step: &CleaningStep| collector.lock().unwrap().push(step.stage);

        let mut cleaner = DataCleaner::new(business_table())
            .unwrap()
            .with_sink(Arc::new(sink));
        cleaner.clean();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), cleaner.log().len());
        assert_eq!(seen[0], CleaningStage::Initialization);
    }
}
