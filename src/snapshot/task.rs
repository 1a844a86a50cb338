//! Task history records
//!
//! Timestamps and durations are kept as the raw strings the instance
//! returned. Parsing happens lazily in the accessors, and a value that
//! does not parse yields `None` so the dependent check is skipped
//! instead of failing the whole bundle.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

pub const DOCUMENT_ADDITION: &str = "documentAdditionOrUpdate";
pub const DOCUMENT_DELETION: &str = "documentDeletion";
pub const SETTINGS_UPDATE: &str = "settingsUpdate";

static DURATION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn duration_pattern() -> &'static Regex {
    DURATION_PATTERN.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?$")
            .expect("valid regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskError {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub error: Option<TaskError>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub enqueued_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl Task {
    pub fn new(uid: u64, kind: &str, status: TaskStatus) -> Self {
        Self {
            uid,
            index_uid: None,
            status,
            kind: kind.to_string(),
            details: None,
            error: None,
            duration: None,
            enqueued_at: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == TaskStatus::Failed
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    /// Duration in seconds, parsed from an ISO-8601 duration like `PT1M30.5S`.
    pub fn duration_secs(&self) -> Option<f64> {
        parse_iso_duration(self.duration.as_deref()?)
    }

    pub fn enqueued(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.enqueued_at.as_deref()?)
    }

    pub fn started(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.started_at.as_deref()?)
    }

    /// Seconds between enqueue and start. Negative spans are discarded.
    pub fn queue_secs(&self) -> Option<f64> {
        let waited = self.started()? - self.enqueued()?;
        let secs = waited.num_milliseconds() as f64 / 1000.0;
        (secs >= 0.0).then_some(secs)
    }

    /// Numeric entry from `details`, if present and a non-negative integer.
    pub fn detail_u64(&self, key: &str) -> Option<u64> {
        self.details.as_ref()?.get(key)?.as_u64()
    }

    /// Keys present in `details`, used to name the settings a task touched.
    pub fn detail_keys(&self) -> Vec<String> {
        match &self.details {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Document count for an indexing task, first non-zero detail wins.
    pub fn document_count(&self) -> Option<u64> {
        ["receivedDocuments", "indexedDocuments", "providedIds"]
            .iter()
            .filter_map(|k| self.detail_u64(k))
            .find(|n| *n > 0)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

pub fn parse_iso_duration(raw: &str) -> Option<f64> {
    let caps = duration_pattern().captures(raw.trim())?;
    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    // "PT" alone carries no components
    if (1..=4).all(|i| caps.get(i).is_none()) {
        return None;
    }
    Some(part(1) * 86_400.0 + part(2) * 3_600.0 + part(3) * 60.0 + part(4))
}
