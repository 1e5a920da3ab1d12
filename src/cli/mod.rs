//! calidad CLI - Tabular Data Quality Assessment
//!
//! Command-line interface for calidad operations.

use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};

mod commands;

/// calidad - Tabular Data Quality Assessment in Pure Rust
#[derive(Parser)]
#[command(name = "calidad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a table.
#[derive(Args)]
struct LoadArgs {
    /// Path to the data file (CSV/TSV/Parquet)
    path: PathBuf,
    /// JSON schema file declaring column types, ranges and roles
    #[arg(short, long)]
    schema: Option<PathBuf>,
    /// CSV field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,
    /// Column holding a demographic group for the bias check (repeatable)
    #[arg(long = "group")]
    groups: Vec<String>,
    /// Outcome column for the bias check (repeatable)
    #[arg(long = "outcome")]
    outcomes: Vec<String>,
    /// Target column for the feature ranking
    #[arg(long)]
    target: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the quality checks and print a summary
    Check {
        #[command(flatten)]
        load: LoadArgs,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Write the full quality report as JSON
    Report {
        #[command(flatten)]
        load: LoadArgs,
        /// Output file for the report (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Display per-column profiles
    Profile {
        #[command(flatten)]
        load: LoadArgs,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Display the table schema as JSON, a starting point for a schema file
    Schema {
        #[command(flatten)]
        load: LoadArgs,
    },
}

/// Run the calidad CLI.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { load, format } => commands::cmd_check(&load, &format),
        Commands::Report { load, output } => {
            commands::cmd_report(&load, output.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Commands::Profile { load, format } => {
            commands::cmd_profile(&load, &format).map(|()| ExitCode::SUCCESS)
        }
        Commands::Schema { load } => commands::cmd_schema(&load).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
