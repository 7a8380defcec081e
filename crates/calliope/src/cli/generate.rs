//! Document generation command implementation.

use std::path::{Path, PathBuf};

use calliope::Calliope;
use colored::Colorize;

/// Run document generation and print the run summary.
pub fn run(
    root: &Path,
    toclevels: u32,
    output: Option<PathBuf>,
    exclude: &[String],
) -> Result<(), calliope::Error> {
    println!("{} {}...", "Scanning".cyan().bold(), root.display());

    let mut calliope = Calliope::new(root)?.with_toclevels(toclevels);
    if let Some(output) = output {
        calliope = calliope.with_output(output);
    }
    for name in exclude {
        calliope = calliope.exclude_file(name.clone());
    }

    let output_path = calliope.output_path().to_path_buf();
    let stats = calliope.generate()?;

    // Display results
    println!();
    println!(
        "{} {} of {} files, {} classes, {} functions",
        "Documented".green().bold(),
        stats.files_documented,
        stats.files_scanned,
        stats.classes_found,
        stats.functions_found
    );
    println!("{}: {}", "Output".dimmed(), output_path.display());
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    if !stats.errors.is_empty() {
        println!();
        println!(
            "{} ({}):",
            "Skipped files".yellow().bold(),
            stats.errors.len()
        );
        for err in stats.errors.iter().take(5) {
            let bullet = if err.kind.is_internal_error() {
                "•".red()
            } else {
                "•".yellow()
            };
            println!("  {bullet} {}: {}", err.path.display(), err.message);
        }
        if stats.errors.len() > 5 {
            println!("  ... and {} more", stats.errors.len() - 5);
        }
    }

    Ok(())
}
