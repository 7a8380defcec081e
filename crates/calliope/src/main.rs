//! Calliope CLI - Docstring overview generation from the command line.
//!
//! Calliope scans a Python project and writes a single AsciiDoc document
//! listing every class, method and function with its docstring.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Calliope: docstring overview generator.
#[derive(Parser)]
#[command(name = "calliope")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root directory (defaults to current directory)
    root: Option<PathBuf>,

    /// Depth of the generated table of contents
    #[arg(short, long, default_value_t = 3)]
    toclevels: u32,

    /// Output file (defaults to <root>/docstrings_doc.adoc)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional filenames to exclude from scanning (can be repeated)
    #[arg(long, value_name = "FILENAME")]
    exclude: Vec<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Determine project root
    let root = match cli.root {
        Some(r) => r,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let result = cli::generate::run(&root, cli.toclevels, cli.output, &cli.exclude);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
