//! Output reporters for meiliscan results
//!
//! Both `Report` and `ComparisonReport` serialize to JSON:
//! - `json` - pretty-printed, the default and the on-disk format
//! - `compact` - single-line JSON for piping

mod json;

pub use json::{render, render_compact};

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Compact,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "pretty" => Ok(OutputFormat::Json),
            "compact" | "json-compact" => Ok(OutputFormat::Compact),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: json, compact", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Compact => write!(f, "compact"),
        }
    }
}

/// Render any report using an OutputFormat
pub fn report_with_format<T: Serialize>(report: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(report),
        OutputFormat::Compact => json::render_compact(report),
    }
}
