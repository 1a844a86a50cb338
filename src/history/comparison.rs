use crate::error::MeiliscanError;
use crate::models::{Finding, Severity};
use crate::snapshot::SourceInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const COMPARISON_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Improved,
    Degraded,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Stable,
}

impl TrendDirection {
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            TrendDirection::Up
        } else if delta < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            TrendDirection::Up => TrendDirection::Down,
            TrendDirection::Down => TrendDirection::Up,
            TrendDirection::Stable => TrendDirection::Stable,
        }
    }
}

/// Movement of one numeric metric between two reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub name: String,
    #[serde(default)]
    pub old_value: Option<f64>,
    #[serde(default)]
    pub new_value: Option<f64>,
    #[serde(default)]
    pub change: f64,
    /// Undefined when the old value is zero
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub trend: TrendDirection,
}

impl MetricChange {
    /// Compare two values. A missing side yields a stable change with no delta.
    pub fn calculate(name: &str, old_value: Option<f64>, new_value: Option<f64>) -> Self {
        let (Some(old), Some(new)) = (old_value, new_value) else {
            return Self {
                name: name.to_string(),
                old_value,
                new_value,
                change: 0.0,
                change_percent: None,
                trend: TrendDirection::Stable,
            };
        };
        let change = new - old;
        Self {
            name: name.to_string(),
            old_value,
            new_value,
            change,
            change_percent: (old != 0.0).then(|| change / old * 100.0),
            trend: TrendDirection::of(change),
        }
    }

    pub fn between(name: &str, old: impl Into<f64>, new: impl Into<f64>) -> Self {
        Self::calculate(name, Some(old.into()), Some(new.into()))
    }
}

/// A finding that appeared or disappeared between two reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingChange {
    pub finding: Finding,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_severity: Option<Severity>,
}

/// Old and new value of one settings key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDelta {
    pub old: Value,
    pub new: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexChange {
    pub uid: String,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<MetricChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<MetricChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding_count: Option<MetricChange>,
    #[serde(default)]
    pub new_findings: Vec<Finding>,
    #[serde(default)]
    pub resolved_findings: Vec<Finding>,
    #[serde(default)]
    pub settings_changed: bool,
    #[serde(default)]
    pub settings_diff: BTreeMap<String, SettingDelta>,
}

impl IndexChange {
    pub fn critical_new_findings(&self) -> usize {
        self.new_findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub old_report_date: DateTime<Utc>,
    pub new_report_date: DateTime<Utc>,
    pub time_between: String,

    #[serde(default)]
    pub indexes_added: Vec<String>,
    #[serde(default)]
    pub indexes_removed: Vec<String>,
    #[serde(default)]
    pub indexes_changed: Vec<String>,

    pub health_score: MetricChange,
    pub total_documents: MetricChange,
    pub total_indexes: MetricChange,
    pub total_findings: MetricChange,
    pub critical_issues: MetricChange,
    pub warnings: MetricChange,
    pub suggestions: MetricChange,

    #[serde(default)]
    pub overall_trend: TrendDirection,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub degradation_areas: Vec<String>,
}

/// Result of comparing two finalized reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub old_source: SourceInfo,
    pub new_source: SourceInfo,
    pub summary: ComparisonSummary,
    #[serde(default)]
    pub index_changes: BTreeMap<String, IndexChange>,
    #[serde(default)]
    pub finding_changes: Vec<FindingChange>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ComparisonReport {
    pub fn from_json(raw: &str) -> Result<Self, MeiliscanError> {
        serde_json::from_str(raw).map_err(MeiliscanError::Report)
    }

    pub fn changes_of(&self, kind: ChangeType) -> impl Iterator<Item = &FindingChange> {
        self.finding_changes
            .iter()
            .filter(move |c| c.change_type == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_change_up() {
        let m = MetricChange::between("health_score", 70, 85);
        assert_eq!(m.change, 15.0);
        assert_eq!(m.trend, TrendDirection::Up);
        let pct = m.change_percent.unwrap();
        assert!((pct - 21.428).abs() < 0.01);
    }

    #[test]
    fn test_metric_change_from_zero() {
        let m = MetricChange::between("critical_issues", 0, 3);
        assert_eq!(m.change, 3.0);
        assert!(m.change_percent.is_none());
        assert_eq!(m.trend, TrendDirection::Up);
    }

    #[test]
    fn test_metric_change_missing_side() {
        let m = MetricChange::calculate("document_count", None, Some(10.0));
        assert_eq!(m.change, 0.0);
        assert_eq!(m.trend, TrendDirection::Stable);
        assert_eq!(m.new_value, Some(10.0));
    }

    #[test]
    fn test_trend_inversion() {
        assert_eq!(TrendDirection::Down.inverted(), TrendDirection::Up);
        assert_eq!(TrendDirection::Stable.inverted(), TrendDirection::Stable);
    }

    #[test]
    fn test_change_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeType::Degraded).unwrap(),
            "\"degraded\""
        );
    }
}
