//! code-enforcer CLI tool.
//!
//! Usage:
//! ```bash
//! code-enforcer [--config-file <path>] [--solutions] [--root <dir>]
//! code-enforcer --list-rules
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_loader;

/// Exit code for a run that aborted before producing a report.
const EXIT_FATAL: u8 = 2;

/// Source-code compliance checker for JavaScript projects
#[derive(Parser)]
#[command(name = "code-enforcer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file name, relative to the project root
    #[arg(long, default_value = code_enforcer_core::DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Show solutions to problems
    #[arg(long)]
    solutions: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root (default: current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = if cli.list_rules {
        commands::list_rules::run().map(|()| ExitCode::SUCCESS)
    } else {
        commands::check::run(&cli.root, &cli.config_file, cli.solutions).await
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
