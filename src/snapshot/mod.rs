//! Snapshots handed to the engine by a collector
//!
//! Collectors (live API, dump extraction) are out of process. They write a
//! single JSON bundle:
//!
//! ```text
//! {
//!   "source":       { "type": "instance", "url": ... },
//!   "instance":     { "version", "databaseSize", "usedDatabaseSize",
//!                     "tasks": [...], "launchConfig": {...} },
//!   "indexes":      [ IndexSnapshot, ... ],
//!   "probeResults": [ ProbeResult, ... ]
//! }
//! ```
//!
//! Everything here is read-only once parsed.

mod index;
mod launch;
mod task;

pub use index::{
    Document, Faceting, IndexSnapshot, IndexStats, MinWordSizeForTypos, Pagination, Settings,
    TypoTolerance, DEFAULT_RANKING_RULES,
};
pub use launch::{
    parse_byte_size, ByteSize, LaunchConfig, SnapshotSchedule, DEFAULT_PAYLOAD_LIMIT,
};
pub use task::{
    parse_iso_duration, parse_timestamp, Task, TaskError, TaskStatus, DOCUMENT_ADDITION,
    DOCUMENT_DELETION, SETTINGS_UPDATE,
};

use crate::error::MeiliscanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the analyzed data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Instance,
    Dump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meilisearch_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_date: Option<DateTime<Utc>>,
}

impl SourceInfo {
    pub fn instance(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Instance,
            url: Some(url.into()),
            meilisearch_version: None,
            dump_path: None,
            dump_date: None,
        }
    }
}

/// Instance-wide state: storage stats, version, tasks, launch config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSnapshot {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database_size: Option<u64>,
    #[serde(default)]
    pub used_database_size: Option<u64>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub launch_config: Option<LaunchConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Sort,
    Filter,
    Basic,
}

/// Outcome of one test query run by the live collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub index_uid: String,
    pub probe_type: ProbeKind,
    pub success: bool,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub response_size_bytes: Option<u64>,
    #[serde(default)]
    pub hit_count: Option<u64>,
}

/// Everything one analysis run consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub source: SourceInfo,
    #[serde(default)]
    pub instance: InstanceSnapshot,
    #[serde(default)]
    pub indexes: Vec<IndexSnapshot>,
    #[serde(default)]
    pub probe_results: Option<Vec<ProbeResult>>,
}

impl AnalysisInput {
    pub fn from_json(raw: &str) -> Result<Self, MeiliscanError> {
        serde_json::from_str(raw).map_err(MeiliscanError::Snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_bundle() {
        let input = AnalysisInput::from_json(r#"{"source": {"type": "dump"}}"#).unwrap();
        assert_eq!(input.source.kind, SourceKind::Dump);
        assert!(input.indexes.is_empty());
        assert!(input.instance.tasks.is_none());
        assert!(input.probe_results.is_none());
    }

    #[test]
    fn test_bundle_rejects_missing_source() {
        assert!(AnalysisInput::from_json(r#"{"indexes": []}"#).is_err());
    }

    #[test]
    fn test_probe_result_parses() {
        let raw = r#"{"index_uid": "movies", "probe_type": "sort", "success": false,
                      "field": "year", "error_message": "invalid sort"}"#;
        let p: ProbeResult = serde_json::from_str(raw).unwrap();
        assert_eq!(p.probe_type, ProbeKind::Sort);
        assert!(!p.success);
    }
}
