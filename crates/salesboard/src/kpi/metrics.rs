//! KPI result types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SalesError;

/// Top-level figures for a dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    pub total_revenue: f64,
    /// Distinct invoice numbers.
    pub total_orders: usize,
    /// Zero when there are no orders.
    pub avg_order_value: f64,
    /// Distinct known customers.
    pub total_customers: usize,
    pub total_items_sold: f64,
}

/// Revenue and order count for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    /// `Mon YYYY`
    pub label: String,
    pub revenue: f64,
    pub orders: usize,
    /// Change against the previous month, in percent.
    pub growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product: String,
    pub revenue: f64,
    pub units: f64,
    /// Distinct invoices containing the product.
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSales {
    pub region: String,
    pub revenue: f64,
    pub orders: usize,
}

/// Ranking metric for top products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductMetric {
    #[default]
    Revenue,
    Units,
}

impl fmt::Display for ProductMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductMetric::Revenue => write!(f, "revenue"),
            ProductMetric::Units => write!(f, "units"),
        }
    }
}

impl FromStr for ProductMetric {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(ProductMetric::Revenue),
            "units" | "quantity" => Ok(ProductMetric::Units),
            other => Err(SalesError::Config(format!(
                "Unknown product metric '{}' (expected 'revenue' or 'units')",
                other
            ))),
        }
    }
}

/// Every KPI in one serializable bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub headline: HeadlineMetrics,
    pub monthly: Vec<MonthlySales>,
    pub top_products: Vec<ProductSales>,
    pub regions: Vec<RegionSales>,
}
