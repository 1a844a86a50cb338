use crate::models::{Finding, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered list of what to fix first, plus advisory impact estimates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Finding ids, most severe first
    #[serde(default)]
    pub priority_order: Vec<String>,
    #[serde(default)]
    pub estimated_impact: BTreeMap<String, String>,
}

impl ActionPlan {
    /// Build the plan from the finalized finding set.
    ///
    /// Info findings are left out. Ties on severity are broken by id and
    /// then by index uid so the order never depends on analyzer scheduling.
    pub fn build<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut actionable: Vec<&Finding> = findings
            .into_iter()
            .filter(|f| f.severity != Severity::Info)
            .collect();
        actionable.sort_by(|a, b| {
            (a.severity.rank(), a.id.as_str(), a.index_uid.as_deref()).cmp(&(
                b.severity.rank(),
                b.id.as_str(),
                b.index_uid.as_deref(),
            ))
        });

        let has_critical = actionable.iter().any(|f| f.severity == Severity::Critical);
        let has_warning = actionable.iter().any(|f| f.severity == Severity::Warning);

        let mut estimated_impact = BTreeMap::new();
        if has_critical {
            estimated_impact.insert("index_size_reduction".to_string(), "~20-40%".to_string());
            estimated_impact.insert(
                "indexing_speed_improvement".to_string(),
                "~15-30%".to_string(),
            );
        }
        if has_warning {
            estimated_impact.insert(
                "search_latency_improvement".to_string(),
                "~5-15%".to_string(),
            );
        }

        Self {
            priority_order: actionable.iter().map(|f| f.id.clone()).collect(),
            estimated_impact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.priority_order.is_empty()
    }
}
