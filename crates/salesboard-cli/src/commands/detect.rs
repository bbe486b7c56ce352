//! Detect command - show the detected column mapping and its validation.

use std::path::PathBuf;

use colored::Colorize;
use salesboard::SalesBoard;
use salesboard::mapping::MatchKind;

use super::load_config;
use crate::cli::FieldAssignment;

pub fn run(
    file: PathBuf,
    map: Vec<FieldAssignment>,
    config: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let board = SalesBoard::with_config(load_config(config.as_deref(), &map)?);
    let (inspection, source) = board.inspect_file(&file)?;

    if json_output {
        let output = serde_json::json!({
            "source": source,
            "detections": inspection.detections,
            "mapping": inspection.mapping,
            "report": inspection.report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Detecting columns in".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.column_count
    );
    println!();

    for field in board.registry().fields() {
        let marker = if field.required { "*" } else { " " };
        let detection = inspection.detections.iter().find(|d| d.field == field.name);
        let column = inspection.mapping.get(&field.name);
        let detected_column = detection.and_then(|d| d.column.as_deref());

        let how = match (column, detection.and_then(|d| d.matched_by.as_ref())) {
            (Some(c), _) if Some(c) != detected_column => "manual".magenta().to_string(),
            (Some(_), Some(MatchKind::Exact)) => "exact".green().to_string(),
            (Some(_), Some(MatchKind::Alias(alias))) => format!("alias '{}'", alias).blue().to_string(),
            _ => String::new(),
        };

        let shown = match column {
            Some(c) => c.white().bold().to_string(),
            None if field.required => "unmapped".red().to_string(),
            None => "unmapped".dimmed().to_string(),
        };

        println!("  {}{:14} <- {:24} {}", marker, field.name, shown, how);
        if verbose && !field.description.is_empty() {
            println!("    {}", field.description.dimmed());
        }
    }
    println!();

    let report = &inspection.report;
    if report.is_valid() {
        println!("{}", "Mapping is valid".green().bold());
    } else {
        println!(
            "{} ({} issues)",
            "Mapping is invalid".red().bold(),
            report.errors.len()
        );
        for issue in &report.errors {
            println!("  {} {}", "x".red(), issue);
        }
    }

    for advisory in &report.advisories {
        println!("  {} {}", "!".yellow(), advisory);
    }

    if !report.is_valid() {
        println!();
        println!(
            "Fix with {}",
            format!("salesboard clean {} --map FIELD=COLUMN", file.display())
                .cyan()
                .bold()
        );
    }

    Ok(())
}
