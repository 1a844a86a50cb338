//! Analysis report model
//!
//! A report has a two-phase lifecycle:
//!
//! ```text
//! ReportBuilder::new(source)
//!     │
//!     ├── add_index(snapshot)    one entry per index uid
//!     ├── add_finding(finding)   filed under its index, or global
//!     │
//!     └── finalize(scorer) ──▶ Report { summary, action_plan }
//! ```
//!
//! The summary and action plan are computed exactly once, after every
//! analyzer has run. A finalized `Report` is plain data; it is what gets
//! written to disk and later re-read by the differ.

mod action_plan;

pub use action_plan::ActionPlan;

use crate::error::MeiliscanError;
use crate::models::{Finding, FindingsSummary};
use crate::scoring::{HealthLabel, HealthScorer};
use crate::snapshot::{IndexSnapshot, SourceInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub document_count: u64,
}

/// Settings as they were when the snapshot was taken, kept as raw JSON so
/// the differ can compare them key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSettingsSnapshot {
    #[serde(default)]
    pub current: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStatistics {
    #[serde(default)]
    pub field_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub field_count: usize,
    #[serde(default)]
    pub is_indexing: bool,
}

/// Everything the report holds about one index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexAnalysis {
    #[serde(default)]
    pub metadata: IndexMetadata,
    #[serde(default)]
    pub settings: IndexSettingsSnapshot,
    #[serde(default)]
    pub statistics: IndexStatistics,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl IndexAnalysis {
    pub fn from_snapshot(index: &IndexSnapshot) -> Self {
        let current = match serde_json::to_value(&index.settings) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            metadata: IndexMetadata {
                primary_key: index.primary_key.clone(),
                created_at: index.created_at,
                updated_at: index.updated_at,
                document_count: index.document_count(),
            },
            settings: IndexSettingsSnapshot { current },
            statistics: IndexStatistics {
                field_distribution: index.stats.field_distribution.clone(),
                field_count: index.field_count(),
                is_indexing: index.stats.is_indexing,
            },
            findings: Vec::new(),
        }
    }

    pub fn summary(&self) -> FindingsSummary {
        FindingsSummary::from_findings(&self.findings)
    }
}

fn default_label() -> HealthLabel {
    HealthLabel::Excellent
}

/// Run totals, computed at finalize time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_indexes: usize,
    pub total_documents: u64,
    #[serde(default)]
    pub database_size_bytes: Option<u64>,
    pub health_score: u32,
    #[serde(default = "default_label")]
    pub health_label: HealthLabel,
    #[serde(default)]
    pub critical_issues: usize,
    #[serde(default)]
    pub warnings: usize,
    #[serde(default)]
    pub suggestions: usize,
    #[serde(default)]
    pub info_count: usize,
    #[serde(default)]
    pub total_findings: usize,
}

/// Finalized result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub source: SourceInfo,
    /// Required: a report without a summary was never finalized.
    pub summary: Summary,
    #[serde(default)]
    pub indexes: BTreeMap<String, IndexAnalysis>,
    #[serde(default)]
    pub global_findings: Vec<Finding>,
    #[serde(default)]
    pub action_plan: ActionPlan,
}

impl Report {
    pub fn from_json(raw: &str) -> Result<Self, MeiliscanError> {
        serde_json::from_str(raw).map_err(MeiliscanError::Report)
    }

    /// Global findings first, then each index in uid order
    pub fn all_findings(&self) -> impl Iterator<Item = &Finding> {
        self.global_findings
            .iter()
            .chain(self.indexes.values().flat_map(|i| i.findings.iter()))
    }

    pub fn findings_summary(&self) -> FindingsSummary {
        FindingsSummary::from_findings(self.all_findings())
    }
}

/// Accumulates indexes and findings until `finalize`
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    source: SourceInfo,
    database_size: Option<u64>,
    indexes: BTreeMap<String, IndexAnalysis>,
    global_findings: Vec<Finding>,
}

impl ReportBuilder {
    pub fn new(source: SourceInfo) -> Self {
        Self {
            source,
            database_size: None,
            indexes: BTreeMap::new(),
            global_findings: Vec::new(),
        }
    }

    pub fn database_size(mut self, bytes: Option<u64>) -> Self {
        self.database_size = bytes;
        self
    }

    /// Register an index. Registering the same uid twice keeps the first entry.
    pub fn add_index(&mut self, index: &IndexSnapshot) {
        self.indexes
            .entry(index.uid.clone())
            .or_insert_with(|| IndexAnalysis::from_snapshot(index));
    }

    /// File a finding under its index if that index is registered,
    /// otherwise under the instance-wide list.
    pub fn add_finding(&mut self, finding: Finding) {
        match finding.index_uid.as_deref().and_then(|uid| self.indexes.get_mut(uid)) {
            Some(analysis) => analysis.findings.push(finding),
            None => {
                if let Some(uid) = finding.index_uid.as_deref() {
                    debug!(
                        "Finding {} references unknown index {}, filing as global",
                        finding.id, uid
                    );
                }
                self.global_findings.push(finding);
            }
        }
    }

    pub fn add_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.add_finding(finding);
        }
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Compute the summary, score and action plan. Consumes the builder.
    pub fn finalize(self, scorer: &HealthScorer) -> Report {
        let all: Vec<&Finding> = self
            .global_findings
            .iter()
            .chain(self.indexes.values().flat_map(|i| i.findings.iter()))
            .collect();

        let counts = FindingsSummary::from_findings(all.iter().copied());
        let health_score = scorer.score(all.iter().copied());
        let action_plan = ActionPlan::build(all.iter().copied());

        let summary = Summary {
            total_indexes: self.indexes.len(),
            total_documents: self.indexes.values().map(|i| i.metadata.document_count).sum(),
            database_size_bytes: self.database_size,
            health_score,
            health_label: scorer.label(health_score),
            critical_issues: counts.critical,
            warnings: counts.warning,
            suggestions: counts.suggestion,
            info_count: counts.info,
            total_findings: counts.total,
        };

        Report {
            version: REPORT_VERSION.to_string(),
            generated_at: Utc::now(),
            source: self.source,
            summary,
            indexes: self.indexes,
            global_findings: self.global_findings,
            action_plan,
        }
    }
}
