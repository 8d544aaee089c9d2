mod commands;
mod logging;
mod organize;
mod progress;
mod report;

use std::io::{self, Write};
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use seqledger_core::RunEngine;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match seqledger_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Run(run_args)) => {
            if let Some(input) = run_args.input_path {
                config.input_path = Some(input);
            }
            if let Some(db) = run_args.db {
                config.db_path = db;
            }
            if let Some(report) = run_args.report {
                config.report_path = report;
            }
            if let Err(err) = run_pass(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Organize(organize_args)) => {
            if let Err(err) = organize::organize(&organize_args) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        Some(Commands::TruncateDb) => {
            match prompt_confirm(
                "Are you SURE you want to COMPLETELY DELETE the database contents?",
                Some(false),
            ) {
                Ok(true) => match seqledger_core::storage::Database::open(&config.db_path) {
                    Ok(db) => {
                        if let Err(e) = db.truncate_all() {
                            error!("Error truncating database: {}", e);
                        } else {
                            println!("All tables truncated");
                        }
                    }
                    Err(e) => error!("Error opening database: {}", e),
                },
                _ => {
                    process::exit(0);
                }
            }
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_pass(config: &seqledger_core::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RunEngine::new(config.clone());
    let reporter = CliReporter::new();
    let result = engine.run(&reporter)?;

    let rendered = report::render_report(&result);
    println!("{}", rendered);
    report::append_to_file(&config.report_path, &rendered)?;

    println!();
    info!(
        "Scan: {}, Classify: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.classify_duration.as_secs_f64()).green(),
    );
    info!(
        "{} drifted, {} empty, {} missing, {} essential patterns unresolved",
        format!("{}", result.drifted.len()).red(),
        format!("{}", result.empty.len()).red(),
        format!("{}", result.missing.len()).red(),
        format!("{}", result.essentials_missing.len()).red(),
    );
    info!("Report appended to {}", config.report_path);

    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
