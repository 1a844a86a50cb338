//! JSON reporter
//!
//! Outputs reports as pretty-printed JSON. This is the persisted format:
//! `compare` re-reads exactly what `render` writes.

use anyhow::Result;
use serde::Serialize;

/// Render a report as JSON
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render a report as compact JSON (single line)
pub fn render_compact<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
