//! Sales KPIs computed from a cleaned canonical table.

mod calculator;
mod metrics;

pub use calculator::{DEFAULT_TOP_N, KpiCalculator};
pub use metrics::{HeadlineMetrics, KpiSummary, MonthlySales, ProductMetric, ProductSales, RegionSales};
