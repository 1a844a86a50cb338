//! `meiliscan compare`: two reports in, comparison out

use super::{read_file, write_output};
use crate::history::compare;
use crate::report::Report;
use crate::reporters::{report_with_format, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub(super) fn run(old: &Path, new: &Path, output: Option<&Path>, compact: bool) -> Result<()> {
    let old_report = load_report(old)?;
    let new_report = load_report(new)?;

    let comparison = compare(&old_report, &new_report);
    info!(
        "Compared {} to {} ({}): trend {:?}, {} finding changes",
        old.display(),
        new.display(),
        comparison.summary.time_between,
        comparison.summary.overall_trend,
        comparison.finding_changes.len()
    );

    let format = if compact {
        OutputFormat::Compact
    } else {
        OutputFormat::Json
    };
    write_output(output, &report_with_format(&comparison, format)?)
}

fn load_report(path: &Path) -> Result<Report> {
    let raw = read_file(path, "report")?;
    Report::from_json(&raw).with_context(|| format!("Invalid report {}", path.display()))
}
