//! Clean command - run the pipeline and write the canonical table.

use std::path::PathBuf;

use colored::Colorize;
use salesboard::export;

use super::{load_config, run_pipeline, source_label};
use crate::cli::FieldAssignment;

pub fn run(
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    map: Vec<FieldAssignment>,
    config: Option<PathBuf>,
    sample: bool,
    log_json: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref(), &map)?;
    let result = run_pipeline(config, file.as_ref(), sample, verbose)?;

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        source_label(&result).white()
    );
    println!();

    for step in &result.log {
        let removed = if step.rows_removed > 0 {
            format!("-{}", step.rows_removed).red().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:20} {:50} {:>8} {:>8}",
            step.step.yellow(),
            step.details,
            removed,
            step.rows_remaining
        );
    }

    for advisory in &result.report.advisories {
        println!("  {} {}", "!".yellow(), advisory);
    }

    let output_path = output.unwrap_or_else(|| match &file {
        Some(f) if !sample => {
            let mut p = f.clone();
            let stem = p.file_stem().unwrap_or_default().to_string_lossy();
            p.set_file_name(format!("{}_clean.csv", stem));
            p
        }
        _ => PathBuf::from("sample_clean.csv"),
    });

    export::save_delimited(&result.table, &output_path)?;

    println!();
    println!(
        "Kept {} of {} rows ({:.1}% removed)",
        result.cleaning.final_rows.to_string().white().bold(),
        result.cleaning.initial_rows,
        result.cleaning.removed_pct
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    if let Some(path) = log_json {
        export::save_json(&result.log, &path)?;
        println!(
            "{} {}",
            "Cleaning log saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
