//! Bundled reference dataset.
//!
//! A small export with marketplace-style headers that auto-detection only
//! partly recognizes, so it also exercises manual mapping overrides.

use crate::error::Result;
use crate::mapping::ColumnMapping;
use crate::schema::columns;

use super::source::Table;
use super::value::Value;

const SAMPLE_HEADERS: [&str; 8] = [
    "OrderRef",
    "ItemCode",
    "ProductName",
    "HowMany",
    "SaleDate",
    "CostPer",
    "BuyerID",
    "Location",
];

/// The bundled sample transactions table.
pub fn sample_dataset() -> Result<Table> {
    let rows: [(&str, &str, &str, i32, &str, f64, &str, &str); 5] = [
        ("A001", "WIDGET-A", "White Hanging Heart", 6, "2010-12-01", 2.55, "CUST001", "United Kingdom"),
        ("A002", "GADGET-B", "Metal Lantern", 6, "2010-12-01", 3.39, "CUST001", "United Kingdom"),
        ("A003", "THING-C", "Cream Cupid", 8, "2010-12-01", 2.75, "CUST002", "France"),
        ("A004", "STUFF-D", "Glass Star", 6, "2010-12-01", 3.25, "CUST001", "United Kingdom"),
        ("A005", "WIDGET-A", "White Hanging Heart", 12, "2010-12-02", 2.55, "CUST003", "Germany"),
    ];

    let rows = rows.into_iter().map(|(order, item, product, qty, date, cost, buyer, location)| {
        vec![
            Value::from(order),
            Value::from(item),
            Value::from(product),
            Value::from(qty),
            Value::from(date),
            Value::from(cost),
            Value::from(buyer),
            Value::from(location),
        ]
    });

    Table::from_rows(SAMPLE_HEADERS, rows)
}

/// Manual overrides for the sample columns auto-detection misses.
pub fn sample_overrides() -> ColumnMapping {
    ColumnMapping::new()
        .with(columns::INVOICE_NO, "OrderRef")
        .with(columns::QUANTITY, "HowMany")
        .with(columns::CUSTOMER_ID, "BuyerID")
}
