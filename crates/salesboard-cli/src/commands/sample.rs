//! Sample command - write the bundled dataset.

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use salesboard::export;
use salesboard::input::sample_dataset;

pub fn run(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let table = sample_dataset()?;

    match output {
        Some(path) if path.as_os_str() == "-" => {
            export::write_delimited(&table, io::stdout().lock(), b',')?;
        }
        output => {
            let path = output.unwrap_or_else(|| PathBuf::from("sample_sales.csv"));
            export::save_delimited(&table, &path)?;
            println!(
                "{} {} ({} rows)",
                "Saved sample to".green().bold(),
                path.display().to_string().white(),
                table.row_count()
            );
        }
    }

    Ok(())
}
