//! Search probe analyzer (Q001-Q003)
//!
//! The live collector runs a handful of test queries per index (a basic
//! empty query, sorts on sortable fields, filters on filterable fields)
//! and ships the outcomes in the bundle. This analyzer turns failed or
//! oversized probes into findings; it never issues queries itself.

use crate::analyzers::base::{Analyzer, GlobalAnalyzer, GlobalContext};
use crate::config::ProbeThresholds;
use crate::models::{Category, Finding, Severity};
use crate::snapshot::{ProbeKind, ProbeResult};
use anyhow::Result;
use rustc_hash::FxHashSet;
use serde_json::json;
use tracing::debug;

const DOCS_SORTING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/sort_search_results";
const DOCS_FILTERING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/filter_search_results";
const DOCS_DISPLAYED: &str =
    "https://www.meilisearch.com/docs/learn/relevancy/displayed_searchable_attributes";

pub struct SearchProbeAnalyzer {
    thresholds: ProbeThresholds,
}

impl SearchProbeAnalyzer {
    pub fn new(thresholds: ProbeThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for SearchProbeAnalyzer {
    fn default() -> Self {
        Self::new(ProbeThresholds::default())
    }
}

impl Analyzer for SearchProbeAnalyzer {
    fn name(&self) -> &'static str {
        "search_probe"
    }
}

impl GlobalAnalyzer for SearchProbeAnalyzer {
    fn analyze_global(&self, ctx: &GlobalContext<'_>) -> Result<Vec<Finding>> {
        let Some(results) = ctx.probe_results else {
            return Ok(Vec::new());
        };
        let known: FxHashSet<&str> = ctx.indexes.iter().map(|i| i.uid.as_str()).collect();

        let mut findings = Vec::new();
        for result in results {
            if !known.contains(result.index_uid.as_str()) {
                debug!("Ignoring probe for unknown index {}", result.index_uid);
                continue;
            }
            findings.extend(self.check_probe(result));
        }
        Ok(findings)
    }
}

impl SearchProbeAnalyzer {
    fn check_probe(&self, result: &ProbeResult) -> Option<Finding> {
        let field = result.field.as_deref().unwrap_or("");
        let error = result.error_message.as_deref().unwrap_or("unknown error");
        match (result.probe_type, result.success) {
            (ProbeKind::Sort, false) => Some(
                Finding::new(
                    "MEILI-Q001",
                    Category::SearchProbe,
                    Severity::Warning,
                    format!("Sort on '{}' failed", field),
                )
                .with_description(format!(
                    "Sorting by '{}' on index '{}' returned an error. The field is \
                     sortable but may hold incompatible values. Error: {}",
                    field, result.index_uid, error
                ))
                .with_impact("Sorting by this field will fail in production queries")
                .for_index(&result.index_uid)
                .with_current(json!({ "field": result.field, "error": result.error_message }))
                .with_reference(DOCS_SORTING),
            ),
            (ProbeKind::Filter, false) => Some(
                Finding::new(
                    "MEILI-Q002",
                    Category::SearchProbe,
                    Severity::Warning,
                    format!("Filter on '{}' failed", field),
                )
                .with_description(format!(
                    "Filtering by '{}' on index '{}' returned an error. The field is \
                     filterable but may hold incompatible values. Error: {}",
                    field, result.index_uid, error
                ))
                .with_impact("Filtering by this field will fail in production queries")
                .for_index(&result.index_uid)
                .with_current(json!({ "field": result.field, "error": result.error_message }))
                .with_reference(DOCS_FILTERING),
            ),
            (ProbeKind::Basic, true) => {
                let size = result
                    .response_size_bytes
                    .filter(|n| *n > self.thresholds.max_response_bytes)?;
                let kb = size as f64 / 1024.0;
                Some(
                    Finding::new(
                        "MEILI-Q003",
                        Category::SearchProbe,
                        Severity::Info,
                        "Large search response payload",
                    )
                    .with_description(format!(
                        "A basic search on index '{}' returned {:.1} KB. Limit \
                         displayedAttributes if clients do not need every field.",
                        result.index_uid, kb
                    ))
                    .with_impact("Increased bandwidth usage, slower client rendering")
                    .for_index(&result.index_uid)
                    .with_current(json!({
                        "response_size_bytes": size,
                        "response_size_kb": (kb * 10.0).round() / 10.0,
                        "hit_count": result.hit_count,
                    }))
                    .with_reference(DOCS_DISPLAYED),
                )
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{IndexSnapshot, InstanceSnapshot};

    fn probe(kind: ProbeKind, success: bool) -> ProbeResult {
        ProbeResult {
            index_uid: "movies".into(),
            probe_type: kind,
            success,
            field: Some("year".into()),
            error_message: (!success).then(|| "invalid sort".to_string()),
            response_size_bytes: None,
            hit_count: None,
        }
    }

    fn run(results: Option<Vec<ProbeResult>>) -> Vec<Finding> {
        let indexes = vec![IndexSnapshot::new("movies")];
        let instance = InstanceSnapshot::default();
        let ctx = GlobalContext {
            indexes: &indexes,
            instance: &instance,
            probe_results: results.as_deref(),
        };
        SearchProbeAnalyzer::default().analyze_global(&ctx).unwrap()
    }

    #[test]
    fn test_no_probes() {
        assert!(run(None).is_empty());
    }

    #[test]
    fn test_failed_sort_and_filter() {
        let findings = run(Some(vec![
            probe(ProbeKind::Sort, false),
            probe(ProbeKind::Filter, false),
            probe(ProbeKind::Sort, true),
        ]));
        let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["MEILI-Q001", "MEILI-Q002"]);
        assert_eq!(findings[0].title, "Sort on 'year' failed");
        assert_eq!(findings[0].index_uid.as_deref(), Some("movies"));
    }

    #[test]
    fn test_large_basic_response() {
        let mut big = probe(ProbeKind::Basic, true);
        big.response_size_bytes = Some(200 * 1024);
        big.hit_count = Some(20);
        let mut small = probe(ProbeKind::Basic, true);
        small.response_size_bytes = Some(1024);
        let findings = run(Some(vec![big, small]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "MEILI-Q003");
        assert_eq!(
            findings[0].current_value.as_ref().unwrap()["response_size_kb"],
            200.0
        );
    }

    #[test]
    fn test_unknown_index_ignored() {
        let mut stray = probe(ProbeKind::Sort, false);
        stray.index_uid = "gone".into();
        assert!(run(Some(vec![stray])).is_empty());
    }
}
