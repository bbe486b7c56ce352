//! Report command - run the pipeline and print sales KPIs.

use std::path::PathBuf;

use colored::Colorize;
use salesboard::ProductMetric;

use super::{load_config, run_pipeline, source_label};
use crate::cli::FieldAssignment;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: Option<PathBuf>,
    map: Vec<FieldAssignment>,
    config: Option<PathBuf>,
    sample: bool,
    top: Option<usize>,
    by: Option<ProductMetric>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config.as_deref(), &map)?;
    if let Some(top) = top {
        config.top_n = top;
    }
    if let Some(by) = by {
        config.by = by;
    }
    let by = config.by;

    let result = run_pipeline(config, file.as_ref(), sample, verbose)?;
    let kpis = &result.kpis;

    if json_output {
        println!("{}", serde_json::to_string_pretty(kpis)?);
        return Ok(());
    }

    println!(
        "{} {} ({} clean rows)",
        "Sales report for".cyan().bold(),
        source_label(&result).white(),
        result.table.row_count()
    );
    println!();

    let headline = &kpis.headline;
    println!("{}", "Headline:".yellow().bold());
    println!("  {:20} {:>14.2}", "Total revenue", headline.total_revenue);
    println!("  {:20} {:>14}", "Orders", headline.total_orders);
    println!("  {:20} {:>14.2}", "Avg order value", headline.avg_order_value);
    println!("  {:20} {:>14}", "Customers", headline.total_customers);
    println!("  {:20} {:>14}", "Items sold", headline.total_items_sold);
    println!();

    if !kpis.monthly.is_empty() {
        println!("{}", "Monthly:".yellow().bold());
        for month in &kpis.monthly {
            let growth = match month.growth_pct {
                Some(g) if g >= 0.0 => format!("+{:.1}%", g).green().to_string(),
                Some(g) => format!("{:.1}%", g).red().to_string(),
                None => "-".dimmed().to_string(),
            };
            println!(
                "  {:10} {:>14.2} {:>8} orders {:>10}",
                month.label, month.revenue, month.orders, growth
            );
        }
        println!();
    }

    if !kpis.top_products.is_empty() {
        println!("{} (by {})", "Top products:".yellow().bold(), by);
        for (rank, product) in kpis.top_products.iter().enumerate() {
            println!(
                "  {:>3}. {:40} {:>12.2} {:>8} units {:>6} orders",
                rank + 1,
                product.product,
                product.revenue,
                product.units,
                product.orders
            );
        }
        println!();
    }

    if !kpis.regions.is_empty() {
        println!("{}", "Regions:".yellow().bold());
        for region in &kpis.regions {
            println!(
                "  {:24} {:>14.2} {:>8} orders",
                region.region, region.revenue, region.orders
            );
        }
    }

    Ok(())
}
