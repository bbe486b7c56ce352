//! SalesBoard CLI - map, clean and summarize sales transaction files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Detect { file, map, config, json } => {
            commands::detect::run(file, map, config, json, cli.verbose)
        }

        Commands::Clean {
            file,
            output,
            map,
            config,
            sample,
            log_json,
        } => commands::clean::run(file, output, map, config, sample, log_json, cli.verbose),

        Commands::Report {
            file,
            map,
            config,
            sample,
            top,
            by,
            json,
        } => commands::report::run(file, map, config, sample, top, by, json, cli.verbose),

        Commands::Sample { output } => commands::sample::run(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "salesboard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
