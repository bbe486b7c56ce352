//! KPI aggregation over a cleaned canonical table.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::input::{CellKey, Value};
use crate::schema::CanonicalTable;
use crate::schema::columns::{
    COUNTRY, CUSTOMER_ID, DESCRIPTION, INVOICE_DATE, INVOICE_NO, QUANTITY, TOTAL_PRICE, UNIT_PRICE,
};

use super::metrics::{
    HeadlineMetrics, KpiSummary, MonthlySales, ProductMetric, ProductSales, RegionSales,
};

/// Default number of products in a summary.
pub const DEFAULT_TOP_N: usize = 10;

/// Read-only KPI calculator.
///
/// Cells that are missing or not numeric count as zero in sums and are
/// ignored in distinct counts.
#[derive(Debug, Clone)]
pub struct KpiCalculator<'a> {
    table: &'a CanonicalTable,
    customer_sentinel: String,
    invoice: Option<usize>,
    total_price: Option<usize>,
    quantity: Option<usize>,
    unit_price: Option<usize>,
}

#[derive(Default)]
struct Group<'a> {
    revenue: f64,
    units: f64,
    invoices: HashSet<CellKey<'a>>,
}

impl<'a> KpiCalculator<'a> {
    pub fn new(table: &'a CanonicalTable) -> Self {
        Self {
            table,
            customer_sentinel: "Unknown".to_string(),
            invoice: table.column_index(INVOICE_NO),
            total_price: table.column_index(TOTAL_PRICE),
            quantity: table.column_index(QUANTITY),
            unit_price: table.column_index(UNIT_PRICE),
        }
    }

    /// Customer id excluded from customer counts. Defaults to `"Unknown"`.
    pub fn with_customer_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.customer_sentinel = sentinel.into();
        self
    }

    pub fn headline_metrics(&self) -> HeadlineMetrics {
        let rows = self.table.rows();
        let total_revenue: f64 = rows.iter().map(|row| self.revenue(row)).sum();
        let total_orders = self.distinct_invoices(rows.iter()).len();

        let total_customers = match self.table.column_index(CUSTOMER_ID) {
            Some(i) => rows
                .iter()
                .map(|row| &row[i])
                .filter(|v| !v.is_missing() && v.as_text() != Some(self.customer_sentinel.as_str()))
                .map(Value::key)
                .collect::<HashSet<_>>()
                .len(),
            None => 0,
        };

        let total_items_sold = match self.quantity {
            Some(i) => rows.iter().filter_map(|row| row[i].as_number()).sum(),
            None => 0.0,
        };

        let avg_order_value = if total_orders > 0 {
            total_revenue / total_orders as f64
        } else {
            0.0
        };

        HeadlineMetrics {
            total_revenue,
            total_orders,
            avg_order_value,
            total_customers,
            total_items_sold,
        }
    }

    /// Revenue and orders per calendar month, first to last, with empty
    /// months included as zero rows.
    pub fn monthly_sales(&self) -> Vec<MonthlySales> {
        let Some(date) = self.table.column_index(INVOICE_DATE) else {
            return Vec::new();
        };

        let mut months: BTreeMap<(i32, u32), Group<'a>> = BTreeMap::new();
        for row in self.table.rows() {
            let Some(ts) = row[date].as_timestamp() else {
                continue;
            };
            let group = months.entry((ts.year(), ts.month())).or_default();
            group.revenue += self.revenue(row);
            if let Some(key) = self.invoice_key(row) {
                group.invoices.insert(key);
            }
        }

        let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) else {
            return Vec::new();
        };

        let mut result: Vec<MonthlySales> = Vec::new();
        let (mut year, mut month) = first;
        while (year, month) <= last {
            let (revenue, orders) = months
                .get(&(year, month))
                .map_or((0.0, 0), |g| (g.revenue, g.invoices.len()));
            let growth_pct = result
                .last()
                .map(|prev| prev.revenue)
                .filter(|&prev| prev != 0.0)
                .map(|prev| (revenue - prev) / prev * 100.0);

            result.push(MonthlySales {
                month: format!("{:04}-{:02}", year, month),
                label: NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|d| d.format("%b %Y").to_string())
                    .unwrap_or_default(),
                revenue,
                orders,
                growth_pct,
            });

            (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        }
        result
    }

    /// The best `limit` products by `by`, descending. Ties keep product-name
    /// order.
    pub fn top_products(&self, limit: usize, by: ProductMetric) -> Vec<ProductSales> {
        let Some(description) = self.table.column_index(DESCRIPTION) else {
            return Vec::new();
        };

        let mut products: Vec<ProductSales> = self
            .group_by(description)
            .into_iter()
            .map(|(product, g)| ProductSales {
                product,
                revenue: g.revenue,
                units: g.units,
                orders: g.invoices.len(),
            })
            .collect();

        match by {
            ProductMetric::Revenue => products.sort_by(|a, b| b.revenue.total_cmp(&a.revenue)),
            ProductMetric::Units => products.sort_by(|a, b| b.units.total_cmp(&a.units)),
        }
        products.truncate(limit);
        products
    }

    /// Revenue and orders per country, highest revenue first.
    pub fn sales_by_region(&self) -> Vec<RegionSales> {
        let Some(country) = self.table.column_index(COUNTRY) else {
            return Vec::new();
        };

        let mut regions: Vec<RegionSales> = self
            .group_by(country)
            .into_iter()
            .map(|(region, g)| RegionSales {
                region,
                revenue: g.revenue,
                orders: g.invoices.len(),
            })
            .collect();
        regions.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        regions
    }

    pub fn summary(&self, top_n: usize, by: ProductMetric) -> KpiSummary {
        KpiSummary {
            headline: self.headline_metrics(),
            monthly: self.monthly_sales(),
            top_products: self.top_products(top_n, by),
            regions: self.sales_by_region(),
        }
    }

    /// Groups keyed by the text of column `index`; rows with a missing key
    /// are skipped.
    fn group_by(&self, index: usize) -> BTreeMap<String, Group<'a>> {
        let mut groups: BTreeMap<String, Group<'a>> = BTreeMap::new();
        for row in self.table.rows() {
            if row[index].is_missing() {
                continue;
            }
            let group = groups.entry(row[index].to_string()).or_default();
            group.revenue += self.revenue(row);
            group.units += self.quantity.and_then(|i| row[i].as_number()).unwrap_or(0.0);
            if let Some(key) = self.invoice_key(row) {
                group.invoices.insert(key);
            }
        }
        groups
    }

    fn revenue(&self, row: &[Value]) -> f64 {
        if let Some(i) = self.total_price {
            return row[i].as_number().unwrap_or(0.0);
        }
        match (self.quantity, self.unit_price) {
            (Some(q), Some(p)) => match (row[q].as_number(), row[p].as_number()) {
                (Some(q), Some(p)) => q * p,
                _ => 0.0,
            },
            _ => 0.0,
        }
    }

    fn invoice_key(&self, row: &'a [Value]) -> Option<CellKey<'a>> {
        let value = &row[self.invoice?];
        (!value.is_missing()).then(|| value.key())
    }

    fn distinct_invoices(&self, rows: impl Iterator<Item = &'a Vec<Value>>) -> HashSet<CellKey<'a>> {
        rows.filter_map(|row| self.invoice_key(row)).collect()
    }
}
