//! `meiliscan analyze`: snapshot bundle in, report out

use super::{read_file, write_output};
use crate::analyzers::AnalysisEngine;
use crate::config::{load_policy, load_policy_file, AnalysisPolicy};
use crate::models::Severity;
use crate::report::Report;
use crate::reporters::{report_with_format, OutputFormat};
use crate::scoring::HealthScorer;
use crate::snapshot::AnalysisInput;
use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub(super) fn run(
    bundle: &Path,
    config: Option<&Path>,
    detect_sensitive: bool,
    output: Option<&Path>,
    compact: bool,
    fail_on: Option<String>,
    explain_score: bool,
    workers: usize,
) -> Result<()> {
    let start = Instant::now();

    let mut policy = resolve_policy(config)?;
    policy.detect_sensitive |= detect_sensitive;

    let raw = read_file(bundle, "snapshot bundle")?;
    let input = AnalysisInput::from_json(&raw)
        .with_context(|| format!("Invalid snapshot bundle {}", bundle.display()))?;
    info!(
        "Loaded snapshot bundle with {} indexes from {}",
        input.indexes.len(),
        bundle.display()
    );

    let engine = AnalysisEngine::from_policy(&policy, workers);
    let report = engine.run(&input)?;

    let format = if compact {
        OutputFormat::Compact
    } else {
        OutputFormat::Json
    };
    write_output(output, &report_with_format(&report, format)?)?;

    if explain_score {
        let scorer = HealthScorer::new(policy.scoring);
        eprintln!("{}", scorer.explain(&report.findings_summary()));
    }

    info!(
        "Health score {} ({}), {} findings in {:.2}s",
        report.summary.health_score,
        report.summary.health_label,
        report.summary.total_findings,
        start.elapsed().as_secs_f64()
    );

    check_fail_threshold(&fail_on, &report)
}

/// Explicit file (errors are fatal), then `./meiliscan.toml`, then defaults
fn resolve_policy(config: Option<&Path>) -> Result<AnalysisPolicy> {
    match config {
        Some(path) => load_policy_file(path)
            .with_context(|| format!("Failed to load policy {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
            Ok(load_policy(&cwd))
        }
    }
}

/// Whether any finding is at or above the `--fail-on` severity
fn fail_threshold_reached(fail_on: &str, report: &Report) -> bool {
    let Ok(threshold) = Severity::from_str(fail_on) else {
        return false;
    };
    report.all_findings().any(|f| f.severity >= threshold)
}

fn check_fail_threshold(fail_on: &Option<String>, report: &Report) -> Result<()> {
    if let Some(ref threshold) = fail_on {
        if fail_threshold_reached(threshold, report) {
            eprintln!("Failing due to --fail-on={} threshold", threshold);
            std::process::exit(1);
        }
    }
    Ok(())
}
