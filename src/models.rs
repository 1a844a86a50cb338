//! Core data models for meiliscan
//!
//! A `Finding` is the only thing analyzers produce. Its `id` is the rule
//! code (`MEILI-S001`, `MEILI-D010`, ...) and, together with `index_uid`,
//! is the identity used to match the same issue across two reports.

use crate::error::MeiliscanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Severity levels for findings
///
/// Ordered from least to most severe, so `Severity::Critical` is the max.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Suggestion,
    Warning,
    Critical,
}

impl Severity {
    /// Priority rank used for sorting, 0 is the most urgent.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Suggestion => 2,
            Severity::Info => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "suggestion" => Ok(Severity::Suggestion),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Diagnostic dimension a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Schema,
    Documents,
    Performance,
    BestPractices,
    Security,
    InstanceConfig,
    SearchProbe,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Schema => "schema",
            Category::Documents => "documents",
            Category::Performance => "performance",
            Category::BestPractices => "best_practices",
            Category::Security => "security",
            Category::InstanceConfig => "instance_config",
            Category::SearchProbe => "search_probe",
        };
        f.write_str(s)
    }
}

/// Check the `MEILI-<letter><3 digits>` rule code format.
pub fn is_valid_finding_id(id: &str) -> bool {
    let Some(code) = id.strip_prefix("MEILI-") else {
        return false;
    };
    let bytes = code.as_bytes();
    bytes.len() == 4
        && bytes[0].is_ascii_uppercase()
        && bytes[1..].iter().all(|b| b.is_ascii_digit())
}

fn deserialize_finding_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = String::deserialize(deserializer)?;
    if is_valid_finding_id(&id) {
        Ok(id)
    } else {
        Err(serde::de::Error::custom(MeiliscanError::InvalidFinding(id)))
    }
}

/// Machine-applicable remediation attached to a finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingFix {
    /// Remediation kind, e.g. `settings_update`
    #[serde(rename = "type")]
    pub kind: String,
    /// Target endpoint, e.g. `PATCH /indexes/movies/settings`
    pub endpoint: String,
    #[serde(default)]
    pub payload: serde_json::Map<String, Value>,
}

impl FindingFix {
    /// A settings PATCH against one index. Non-object payloads are dropped.
    pub fn settings_update(index_uid: &str, payload: Value) -> Self {
        Self {
            kind: "settings_update".to_string(),
            endpoint: format!("PATCH /indexes/{}/settings", index_uid),
            payload: match payload {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
        }
    }
}

/// A diagnosed issue or observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(deserialize_with = "deserialize_finding_id")]
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_uid: Option<String>,
    /// Opaque payload; only renderers interpret its shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FindingFix>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default = "Utc::now")]
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    /// Start a finding for a rule. `id` must be a rule code constant.
    pub fn new(
        id: &'static str,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
    ) -> Self {
        debug_assert!(is_valid_finding_id(id), "malformed rule id {}", id);
        Self {
            id: id.to_string(),
            category,
            severity,
            title: title.into(),
            description: String::new(),
            impact: String::new(),
            index_uid: None,
            current_value: None,
            recommended_value: None,
            fix: None,
            references: Vec::new(),
            detected_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }

    pub fn for_index(mut self, index_uid: impl Into<String>) -> Self {
        self.index_uid = Some(index_uid.into());
        self
    }

    pub fn with_current(mut self, value: Value) -> Self {
        self.current_value = Some(value);
        self
    }

    pub fn with_recommended(mut self, value: Value) -> Self {
        self.recommended_value = Some(value);
        self
    }

    pub fn with_fix(mut self, fix: FindingFix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }

    /// Identity used to match a finding across reports.
    pub fn identity(&self) -> (&str, Option<&str>) {
        (self.id.as_str(), self.index_uid.as_deref())
    }

    pub fn validate(&self) -> Result<(), MeiliscanError> {
        if is_valid_finding_id(&self.id) {
            Ok(())
        } else {
            Err(MeiliscanError::InvalidFinding(self.id.clone()))
        }
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub critical: usize,
    pub warning: usize,
    pub suggestion: usize,
    pub info: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Suggestion => summary.suggestion += 1,
                Severity::Info => summary.info += 1,
            }
            summary.total += 1;
        }
        summary
    }
}
