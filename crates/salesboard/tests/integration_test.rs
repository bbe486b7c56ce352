//! Integration tests for the SalesBoard pipeline.

use std::io::Write;
use tempfile::NamedTempFile;

use salesboard::cleaning::{CleaningStage, DataCleaner};
use salesboard::input::Parser;
use salesboard::mapping::{self, ColumnMapping, MappingIssue};
use salesboard::schema::columns::{
    CUSTOMER_ID, INVOICE_DATE, INVOICE_NO, QUANTITY, STOCK_CODE, TOTAL_PRICE, UNIT_PRICE,
};
use salesboard::{SalesBoard, SalesBoardConfig, SalesError, SchemaRegistry, Value};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Six transactions: one duplicate, one cancellation, one missing quantity,
/// one unparseable price and two valid sales.
const TRANSACTIONS: &str = "InvoiceNo,StockCode,Quantity,UnitPrice,InvoiceDate,CustomerID\n\
                            536365,85123A,6,2.55,2010-12-01,17850\n\
                            536365,85123A,6,2.55,2010-12-01,17850\n\
                            C536366,71053,-1,3.39,2010-12-01,17850\n\
                            536367,84406B,,2.75,2010-12-01,\n\
                            536368,84029G,6,Invalid,2010-12-01,17850\n\
                            536369,84029E,10,2.55,2010-12-02,17850\n";

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_end_to_end_keeps_two_valid_sales() {
    let file = create_test_file(TRANSACTIONS);
    let result = SalesBoard::new().run_file(file.path()).expect("Pipeline failed");

    let source = result.source.as_ref().unwrap();
    assert_eq!(source.row_count, 6);
    assert_eq!(source.format, "csv");

    let table = &result.table;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, INVOICE_NO).unwrap().to_string(), "536365");
    assert_eq!(table.value(1, INVOICE_NO).unwrap().to_string(), "536369");
    assert_eq!(table.value(0, TOTAL_PRICE), Some(&Value::from(6.0 * 2.55)));
    assert_eq!(table.value(1, TOTAL_PRICE), Some(&Value::from(10.0 * 2.55)));

    let removed = |stage| {
        result
            .log
            .stage(stage)
            .map(|s| s.rows_removed)
            .sum::<usize>()
    };
    assert_eq!(removed(CleaningStage::Deduplicate), 1);
    assert_eq!(removed(CleaningStage::HandleMissing), 1);
    assert_eq!(removed(CleaningStage::TypeConversion), 1);
    assert_eq!(removed(CleaningStage::BusinessRules), 1);
    assert_eq!(result.cleaning.rows_removed, 4);

    let headline = result.kpis.headline;
    assert_eq!(headline.total_orders, 2);
    assert_eq!(headline.total_customers, 1);
    assert_eq!(headline.total_items_sold, 16.0);
    assert!((headline.total_revenue - 40.8).abs() < 1e-9);
    assert!((headline.avg_order_value - 20.4).abs() < 1e-9);

    assert_eq!(result.kpis.monthly.len(), 1);
    assert_eq!(result.kpis.monthly[0].month, "2010-12");
    assert_eq!(result.kpis.monthly[0].label, "Dec 2010");
    assert!(result.kpis.top_products.is_empty());
    assert!(result.kpis.regions.is_empty());
}

#[test]
fn test_log_rows_never_increase() {
    let file = create_test_file(TRANSACTIONS);
    let result = SalesBoard::new().run_file(file.path()).expect("Pipeline failed");

    let remaining: Vec<usize> = result.log.iter().map(|s| s.rows_remaining).collect();
    assert_eq!(remaining.first(), Some(&6));
    assert!(remaining.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(result.log.iter().last().unwrap().stage, CleaningStage::Completion);
}

#[test]
fn test_clean_is_a_fixed_point() {
    let file = create_test_file(TRANSACTIONS);
    let result = SalesBoard::new().run_file(file.path()).expect("Pipeline failed");

    let mut again = DataCleaner::new(result.table.clone()).unwrap();
    assert_eq!(again.clean(), &result.table);
    assert_eq!(again.log().total_removed(), 0);
}

#[test]
fn test_tsv_with_overrides_from_config() {
    let content = "Ref\tCode\tPieces\tPrice\tWhen\n\
                   1001\tA\t2\t1.50\t2011-01-15 10:30:00\n\
                   1002\tB\t1\t4.00\t2011-02-03 09:00:00\n";
    let file = create_test_file(content);

    let board = SalesBoard::new();
    let err = board.run_file(file.path()).unwrap_err();
    let SalesError::Mapping(err) = err else {
        panic!("expected a mapping error, got {err}");
    };
    assert!(err.issues.contains(&MappingIssue::RequiredUnmapped {
        field: INVOICE_NO.to_string()
    }));

    let config = SalesBoardConfig {
        overrides: ColumnMapping::new()
            .with(INVOICE_NO, "Ref")
            .with(STOCK_CODE, "Code")
            .with(QUANTITY, "Pieces")
            .with(INVOICE_DATE, "When"),
        ..SalesBoardConfig::default()
    };
    let result = SalesBoard::with_config(config)
        .run_file(file.path())
        .expect("Pipeline failed");

    assert_eq!(result.source.as_ref().unwrap().format, "tsv");
    assert_eq!(result.table.row_count(), 2);
    assert_eq!(result.kpis.monthly.len(), 2);
    assert_eq!(result.kpis.monthly[1].growth_pct, Some((4.0 - 3.0) / 3.0 * 100.0));
}

// =============================================================================
// Mapper contracts
// =============================================================================

#[test]
fn test_apply_projects_in_registry_order() {
    let raw = Parser::new().parse_str(TRANSACTIONS).unwrap();
    let registry = SchemaRegistry::canonical();
    let detected = mapping::detect(raw.headers(), registry);
    let canonical = mapping::apply(&detected, &raw, registry).unwrap();

    assert_eq!(
        canonical.headers(),
        [INVOICE_NO, STOCK_CODE, QUANTITY, INVOICE_DATE, UNIT_PRICE, CUSTOMER_ID]
    );
    assert_eq!(canonical.row_count(), raw.row_count());
    for (field, column) in detected.mapped() {
        let projected = canonical.column_by_name(field).unwrap();
        let original = raw.column_by_name(column).unwrap();
        assert_eq!(projected, original, "column for {field}");
    }
    // the raw table is untouched
    assert_eq!(raw.headers()[0], "InvoiceNo");
}

#[test]
fn test_validation_reports_every_violation() {
    let headers = ["Order ID", "Qty", "Price", "Date"];
    let registry = SchemaRegistry::canonical();
    let mapping = mapping::detect(&headers, registry)
        .with(UNIT_PRICE, "Qty")
        .with(CUSTOMER_ID, "Client");

    let report = mapping::validate(&mapping, &headers, registry);
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().any(|e| matches!(e, MappingIssue::RequiredUnmapped { field } if field == STOCK_CODE)));
    assert!(report.errors.iter().any(|e| matches!(e, MappingIssue::DuplicateColumn { column, .. } if column == "Qty")));
    assert!(report.errors.iter().any(|e| matches!(e, MappingIssue::MissingColumn { column, .. } if column == "Client")));
}

#[test]
fn test_detection_is_deterministic() {
    let headers = ["Transaction Date", "SKU", "Units", "Item Price", "Receipt", "Territory"];
    let registry = SchemaRegistry::canonical();
    let first = mapping::detect(&headers, registry);
    for _ in 0..5 {
        assert_eq!(mapping::detect(&headers, registry), first);
    }
    assert_eq!(first.get(INVOICE_DATE), Some("Transaction Date"));
    assert_eq!(first.get(UNIT_PRICE), Some("Item Price"));
    assert_eq!(first.get(INVOICE_NO), Some("Receipt"));
}
