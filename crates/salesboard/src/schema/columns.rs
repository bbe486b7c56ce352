//! Column names of the canonical vocabulary.

pub const INVOICE_NO: &str = "invoice_no";
pub const STOCK_CODE: &str = "stock_code";
pub const DESCRIPTION: &str = "description";
pub const QUANTITY: &str = "quantity";
pub const INVOICE_DATE: &str = "invoice_date";
pub const UNIT_PRICE: &str = "unit_price";
pub const CUSTOMER_ID: &str = "customer_id";
pub const COUNTRY: &str = "country";

// Derived by the cleaner
pub const TOTAL_PRICE: &str = "total_price";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const HOUR: &str = "hour";
pub const MONTH_YEAR: &str = "month_year";

/// Columns the cleaner may add to a canonical table.
pub const DERIVED: &[&str] = &[TOTAL_PRICE, YEAR, MONTH, DAY, DAY_OF_WEEK, HOUR, MONTH_YEAR];
