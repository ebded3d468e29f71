use ace_cli::commands::{check, init};
use ace_cli::ReportFormat;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ace")]
#[command(author, version, about = "API contract compliance checker for FastAPI services", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a service against its OpenAPI contract
    Check {
        #[arg(short, long, default_value = "ace.toml")]
        config: PathBuf,

        /// Overrides `output.format` from the config
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
    },
    /// Write a template config file
    Init {
        #[arg(default_value = "ace.toml")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = ace_core::init_from_args(cli.log_level.clone(), cli.log_file.clone(), cli.verbose) {
        eprintln!("{} {:#}", "warning:".yellow().bold(), err);
    }

    let result = match cli.command {
        Commands::Check { config, format } => check::execute_check(&config, format)
            .map(|report| if report.is_compliant() { ExitCode::SUCCESS } else { ExitCode::from(1) }),
        Commands::Init { path } => init::execute_init(&path).map(|_| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}
