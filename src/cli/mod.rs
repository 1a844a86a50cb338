//! CLI command definitions and handlers

mod analyze;
mod compare;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// meiliscan - Meilisearch deployment health diagnostics
#[derive(Parser, Debug)]
#[command(name = "meiliscan")]
#[command(
    version,
    about = "Health diagnostics for Meilisearch deployments",
    long_about = "meiliscan reads a snapshot bundle written by a collector (index settings, \
stats, sampled documents, task history, launch configuration, search probes), runs its rule \
analyzers and writes a JSON report with findings, a health score and an action plan.\n\n\
Two reports can be compared to track configuration health over time.",
    after_help = "\
Examples:
  meiliscan analyze snapshot.json                       Report JSON on stdout
  meiliscan analyze snapshot.json -o report.json        Write the report to a file
  meiliscan analyze snapshot.json --fail-on warning     Exit code 1 on warning+ findings (CI mode)
  meiliscan compare last-week.json report.json          Trend between two reports"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers for per-index analysis (1-64, default: auto)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a snapshot bundle and produce a report
    #[command(after_help = "\
Examples:
  meiliscan analyze snapshot.json
  meiliscan analyze snapshot.json --config meiliscan.toml
  meiliscan analyze snapshot.json --detect-sensitive       Also scan values for PII (best effort)
  meiliscan analyze snapshot.json --compact -o report.json
  meiliscan analyze snapshot.json --explain-score")]
    Analyze {
        /// Snapshot bundle JSON produced by a collector
        bundle: PathBuf,

        /// Policy file (default: ./meiliscan.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Enable sensitive field name and PII content checks
        #[arg(long)]
        detect_sensitive: bool,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Exit with code 1 if findings at this severity or higher exist
        #[arg(long, value_parser = ["critical", "warning", "suggestion", "info"])]
        fail_on: Option<String>,

        /// Print the scoring breakdown to stderr
        #[arg(long)]
        explain_score: bool,
    },

    /// Compare two reports (old first) and produce a comparison report
    Compare {
        /// Older report JSON
        old: PathBuf,

        /// Newer report JSON
        new: PathBuf,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let workers = cli.workers.unwrap_or(0);
    match cli.command {
        Commands::Analyze {
            bundle,
            config,
            detect_sensitive,
            output,
            compact,
            fail_on,
            explain_score,
        } => analyze::run(
            &bundle,
            config.as_deref(),
            detect_sensitive,
            output.as_deref(),
            compact,
            fail_on,
            explain_score,
            workers,
        ),

        Commands::Compare {
            old,
            new,
            output,
            compact,
        } => compare::run(&old, &new, output.as_deref(), compact),
    }
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} {}", what, path.display()))
}

/// Write rendered output to a file, or stdout when no path is given
fn write_output(output: Option<&Path>, rendered: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
