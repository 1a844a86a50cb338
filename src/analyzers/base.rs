//! Base analyzer traits and types
//!
//! This module defines the core abstractions for deployment diagnosis:
//! - `IndexAnalyzer` for rules that look at one index at a time
//! - `GlobalAnalyzer` for rules that need every index plus instance state
//! - `AnalyzerOutcome` for capturing one execution

use crate::models::Finding;
use crate::snapshot::{IndexSnapshot, InstanceSnapshot, LaunchConfig, ProbeResult, Task};
use anyhow::Result;

/// Result from running a single analyzer against one target
#[derive(Debug, Clone)]
pub struct AnalyzerOutcome {
    /// Name of the analyzer that produced these results
    pub analyzer_name: String,
    /// Index the analyzer ran against, `None` for global analyzers
    pub index_uid: Option<String>,
    pub findings: Vec<Finding>,
    pub duration_ms: u64,
    pub success: bool,
    /// Error or panic message if the analyzer failed
    pub error: Option<String>,
}

impl AnalyzerOutcome {
    pub fn success(
        analyzer_name: String,
        index_uid: Option<String>,
        findings: Vec<Finding>,
        duration_ms: u64,
    ) -> Self {
        Self {
            analyzer_name,
            index_uid,
            findings,
            duration_ms,
            success: true,
            error: None,
        }
    }

    /// A failed run. No findings are kept, and none are synthesized for the failure.
    pub fn failure(
        analyzer_name: String,
        index_uid: Option<String>,
        error: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            analyzer_name,
            index_uid,
            findings: Vec::new(),
            duration_ms,
            success: false,
            error: Some(error),
        }
    }
}

/// Everything a global analyzer may look at
#[derive(Debug, Clone, Copy)]
pub struct GlobalContext<'a> {
    pub indexes: &'a [IndexSnapshot],
    pub instance: &'a InstanceSnapshot,
    pub probe_results: Option<&'a [ProbeResult]>,
}

impl<'a> GlobalContext<'a> {
    pub fn tasks(&self) -> Option<&'a [Task]> {
        self.instance.tasks.as_deref()
    }

    pub fn launch_config(&self) -> Option<&'a LaunchConfig> {
        self.instance.launch_config.as_ref()
    }

    pub fn total_documents(&self) -> u64 {
        self.indexes.iter().map(|i| i.document_count()).sum()
    }
}

/// Common identity for every analyzer
pub trait Analyzer: Send + Sync {
    /// Unique identifier, used in logs
    fn name(&self) -> &'static str;
}

/// Rule set evaluated once per index
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyAnalyzer;
///
/// impl Analyzer for MyAnalyzer {
///     fn name(&self) -> &'static str {
///         "my-analyzer"
///     }
/// }
///
/// impl IndexAnalyzer for MyAnalyzer {
///     fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
///         Ok(vec![])
///     }
/// }
/// ```
///
/// Implementations must be pure: the same snapshot yields the same
/// findings (apart from `detected_at`).
pub trait IndexAnalyzer: Analyzer {
    fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>>;
}

/// Rule set evaluated once per run, after every per-index pass
pub trait GlobalAnalyzer: Analyzer {
    fn analyze_global(&self, ctx: &GlobalContext<'_>) -> Result<Vec<Finding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        let outcome = AnalyzerOutcome::success("schema".into(), Some("movies".into()), vec![], 3);
        assert!(outcome.success);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.index_uid.as_deref(), Some("movies"));
    }

    #[test]
    fn test_outcome_failure_drops_findings() {
        let outcome = AnalyzerOutcome::failure("schema".into(), None, "boom".into(), 1);
        assert!(!outcome.success);
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_global_context_totals() {
        let mut a = IndexSnapshot::new("a");
        a.stats.number_of_documents = 10;
        let mut b = IndexSnapshot::new("b");
        b.stats.number_of_documents = 5;
        let indexes = vec![a, b];
        let instance = InstanceSnapshot::default();
        let ctx = GlobalContext {
            indexes: &indexes,
            instance: &instance,
            probe_results: None,
        };
        assert_eq!(ctx.total_documents(), 15);
        assert!(ctx.tasks().is_none());
        assert!(ctx.launch_config().is_none());
    }
}
