//! Document content analyzer (D001-D013)
//!
//! Every rule here reads only the sampled documents of one index, plus
//! its filterable/sortable lists to decide severity. Statistics are keyed
//! by dotted field path; array elements aggregate under their parent path.
//!
//! D009 (sensitive field names) and D010 (PII in values) scan content and
//! only run when `detect_sensitive` is enabled.

mod patterns;
mod traversal;

pub use traversal::{document_depth, walk_document, Step, Visit};

use crate::analyzers::base::{Analyzer, IndexAnalyzer};
use crate::analyzers::fields::value_kind;
use crate::config::DocumentThresholds;
use crate::models::{Category, Finding, Severity};
use crate::snapshot::IndexSnapshot;
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use patterns::{has_markup, is_date_name, is_date_value, is_sensitive_name, pii_kinds};
use traversal::{geo_candidates, is_empty_value, path_covered_by, GeoCandidate};

const DOCS_INDEXING: &str =
    "https://www.meilisearch.com/docs/learn/indexing/indexing_best_practices";
const DOCS_TENANT_TOKENS: &str = "https://www.meilisearch.com/docs/learn/security/tenant_tokens";
const DOCS_GEOSEARCH: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/geosearch";
const DOCS_SORTING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/sort_search_results";

pub struct DocumentAnalyzer {
    thresholds: DocumentThresholds,
    detect_sensitive: bool,
}

impl DocumentAnalyzer {
    pub fn new(thresholds: DocumentThresholds, detect_sensitive: bool) -> Self {
        Self {
            thresholds,
            detect_sensitive,
        }
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new(DocumentThresholds::default(), false)
    }
}

impl Analyzer for DocumentAnalyzer {
    fn name(&self) -> &'static str {
        "documents"
    }
}

impl IndexAnalyzer for DocumentAnalyzer {
    fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
        let sampled = index.sample_documents.len();
        if sampled == 0 || sampled < self.thresholds.min_sample_size {
            debug!(
                "Skipping document rules for {}: {} sampled documents",
                index.uid, sampled
            );
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        findings.extend(self.check_document_size(index)?);
        findings.extend(self.check_schema_consistency(index));
        findings.extend(self.check_nesting_depth(index));
        findings.extend(self.check_array_sizes(index));
        findings.extend(self.check_markup(index));
        findings.extend(self.check_empty_fields(index));
        findings.extend(self.check_mixed_types(index));
        findings.extend(self.check_text_length(index));
        if self.detect_sensitive {
            findings.extend(self.check_sensitive_names(index));
            findings.extend(self.check_pii_content(index));
        }
        findings.extend(self.check_arrays_of_objects(index));
        findings.extend(self.check_geo_coordinates(index));
        findings.extend(self.check_date_strings(index));
        Ok(findings)
    }
}

/// Run `visit` over every sampled document of the index.
fn walk_samples(index: &IndexSnapshot, mut visit: impl FnMut(Visit<'_>)) {
    for doc in &index.sample_documents {
        walk_document(doc, &mut visit);
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

impl DocumentAnalyzer {
    /// D001
    fn check_document_size(&self, index: &IndexSnapshot) -> Result<Option<Finding>> {
        let mut sizes = Vec::with_capacity(index.sample_documents.len());
        for doc in &index.sample_documents {
            sizes.push(serde_json::to_vec(doc)?.len() as u64);
        }
        let avg = sizes.iter().sum::<u64>() as f64 / sizes.len() as f64;
        let max = sizes.iter().copied().max().unwrap_or(0);

        if avg <= self.thresholds.avg_size_bytes as f64 && max <= self.thresholds.max_size_bytes {
            return Ok(None);
        }
        Ok(Some(
            Finding::new(
                "MEILI-D001",
                Category::Documents,
                Severity::Warning,
                "Large documents detected",
            )
            .with_description(format!(
                "Documents are larger than recommended. Average size: {:.1}KB, max size: {:.1}KB.",
                avg / 1024.0,
                max as f64 / 1024.0
            ))
            .with_impact("Slower indexing and search")
            .for_index(&index.uid)
            .with_current(json!({ "avg_size_bytes": avg as u64, "max_size_bytes": max }))
            .with_reference(DOCS_INDEXING),
        ))
    }

    /// D002
    fn check_schema_consistency(&self, index: &IndexSnapshot) -> Option<Finding> {
        let total = index.sample_documents.len();
        if total < self.thresholds.consistency_min_documents {
            return None;
        }
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &index.sample_documents {
            for key in doc.keys() {
                *counts.entry(key.as_str()).or_insert(0) += 1;
            }
        }
        let lower = total as f64 * self.thresholds.consistency_lower;
        let upper = total as f64 * self.thresholds.consistency_upper;
        let inconsistent: Vec<&str> = counts
            .into_iter()
            .filter(|(_, n)| (*n as f64) < upper && (*n as f64) > lower)
            .map(|(field, _)| field)
            .collect();
        if inconsistent.is_empty() {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-D002",
                Category::Documents,
                Severity::Warning,
                "Inconsistent document schema",
            )
            .with_description(format!(
                "Some fields appear in only part of the documents: {}. They may be \
                 optional fields worth normalizing.",
                inconsistent.iter().take(5).copied().collect::<Vec<_>>().join(", ")
            ))
            .with_impact("Inconsistent search and filter behavior")
            .for_index(&index.uid)
            .with_current(json!(inconsistent.iter().take(10).collect::<Vec<_>>())),
        )
    }

    /// D003
    fn check_nesting_depth(&self, index: &IndexSnapshot) -> Option<Finding> {
        let depth = index
            .sample_documents
            .iter()
            .map(document_depth)
            .max()
            .unwrap_or(0);
        if depth <= self.thresholds.max_depth {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-D003",
                Category::Documents,
                Severity::Warning,
                "Deep document nesting",
            )
            .with_description(format!(
                "Documents nest {} levels deep. Nested objects are flattened on \
                 indexing, which produces long dotted field names.",
                depth
            ))
            .with_impact("Flattened field names and surprising search behavior")
            .for_index(&index.uid)
            .with_current(json!(depth))
            .with_recommended(json!(self.thresholds.max_depth))
            .with_reference(DOCS_INDEXING),
        )
    }

    /// D004
    fn check_array_sizes(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut lengths: FxHashMap<String, (usize, usize)> = FxHashMap::default();
        walk_samples(index, |visit| {
            if let Value::Array(items) = visit.value {
                let entry = lengths.entry(visit.path.to_string()).or_insert((0, 0));
                entry.0 += items.len();
                entry.1 += 1;
            }
        });

        let mut large: Vec<(String, f64)> = lengths
            .into_iter()
            .map(|(path, (sum, n))| (path, sum as f64 / n as f64))
            .filter(|(_, mean)| *mean > self.thresholds.array_mean_length)
            .collect();
        if large.is_empty() {
            return None;
        }
        large.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let listed: Vec<String> = large
            .iter()
            .take(3)
            .map(|(path, mean)| format!("{} ({:.0} items)", path, mean))
            .collect();
        let current: Map<String, Value> = large
            .iter()
            .take(5)
            .map(|(path, mean)| (path.clone(), json!(*mean as u64)))
            .collect();
        Some(
            Finding::new(
                "MEILI-D004",
                Category::Documents,
                Severity::Warning,
                "Large array fields detected",
            )
            .with_description(format!(
                "Array fields with a high average element count: {}.",
                listed.join(", ")
            ))
            .with_impact("Slower filtering and faceting")
            .for_index(&index.uid)
            .with_current(Value::Object(current)),
        )
    }

    /// D005
    fn check_markup(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut fields: BTreeSet<String> = BTreeSet::new();
        walk_samples(index, |visit| {
            if let Value::String(text) = visit.value {
                if text.chars().count() > self.thresholds.markup_min_length
                    && !fields.contains(visit.path)
                    && has_markup(text)
                {
                    fields.insert(visit.path.to_string());
                }
            }
        });
        if fields.is_empty() {
            return None;
        }
        let listed: Vec<&String> = fields.iter().take(10).collect();
        Some(
            Finding::new(
                "MEILI-D005",
                Category::Documents,
                Severity::Suggestion,
                "HTML/Markdown content in text fields",
            )
            .with_description(format!(
                "Fields contain HTML or Markdown markup: {}. Strip markup before \
                 indexing for cleaner matches.",
                listed.iter().take(5).map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            ))
            .with_impact("Markup may appear in results and affect matching")
            .for_index(&index.uid)
            .with_current(json!(listed)),
        )
    }

    /// D006
    fn check_empty_fields(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut counts: FxHashMap<String, (usize, usize)> = FxHashMap::default();
        walk_samples(index, |visit| {
            if visit.step != Step::Key {
                return;
            }
            let entry = counts.entry(visit.path.to_string()).or_insert((0, 0));
            entry.1 += 1;
            if is_empty_value(visit.value) {
                entry.0 += 1;
            }
        });

        let mut flagged: Vec<(String, f64)> = counts
            .into_iter()
            .filter(|(_, (_, total))| *total >= self.thresholds.empty_min_occurrences)
            .map(|(path, (empty, total))| (path, empty as f64 / total as f64))
            .filter(|(_, ratio)| *ratio > self.thresholds.empty_ratio)
            .collect();
        if flagged.is_empty() {
            return None;
        }
        flagged.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let listed: Vec<String> = flagged
            .iter()
            .take(3)
            .map(|(path, ratio)| format!("{} ({})", path, percent(*ratio)))
            .collect();
        let current: Map<String, Value> = flagged
            .iter()
            .take(5)
            .map(|(path, ratio)| (path.clone(), json!(percent(*ratio))))
            .collect();
        Some(
            Finding::new(
                "MEILI-D006",
                Category::Documents,
                Severity::Info,
                "High empty/null field ratio",
            )
            .with_description(format!(
                "Fields with more than {} null or empty values: {}.",
                percent(self.thresholds.empty_ratio),
                listed.join(", ")
            ))
            .with_impact("Wasted storage and inconsistent filtering")
            .for_index(&index.uid)
            .with_current(Value::Object(current)),
        )
    }

    /// D007
    fn check_mixed_types(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut kinds: FxHashMap<String, BTreeSet<&'static str>> = FxHashMap::default();
        walk_samples(index, |visit| {
            if visit.step == Step::Key && !visit.value.is_null() {
                kinds
                    .entry(visit.path.to_string())
                    .or_default()
                    .insert(value_kind(visit.value));
            }
        });

        let numeric: BTreeSet<&'static str> = ["float", "integer"].into_iter().collect();
        let mixed: BTreeMap<String, BTreeSet<&'static str>> = kinds
            .into_iter()
            .filter(|(_, set)| set.len() > 1 && *set != numeric)
            .collect();
        if mixed.is_empty() {
            return None;
        }
        let listed: Vec<String> = mixed
            .iter()
            .take(3)
            .map(|(path, set)| {
                format!(
                    "{} ({})",
                    path,
                    set.iter().copied().collect::<Vec<_>>().join("/")
                )
            })
            .collect();
        let current: Map<String, Value> = mixed
            .iter()
            .take(5)
            .map(|(path, set)| (path.clone(), json!(set)))
            .collect();
        Some(
            Finding::new(
                "MEILI-D007",
                Category::Documents,
                Severity::Warning,
                "Mixed types in fields",
            )
            .with_description(format!(
                "Fields hold different types across documents: {}.",
                listed.join(", ")
            ))
            .with_impact("Inconsistent filtering and sorting results")
            .for_index(&index.uid)
            .with_current(Value::Object(current)),
        )
    }

    /// D008
    fn check_text_length(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut longest: BTreeMap<String, usize> = BTreeMap::new();
        walk_samples(index, |visit| {
            if let Value::String(text) = visit.value {
                let len = text.chars().count();
                if len > self.thresholds.long_text_chars {
                    let entry = longest.entry(visit.path.to_string()).or_insert(0);
                    *entry = (*entry).max(len);
                }
            }
        });
        if longest.is_empty() {
            return None;
        }
        let listed: Vec<&str> = longest.keys().take(3).map(|s| s.as_str()).collect();
        Some(
            Finding::new(
                "MEILI-D008",
                Category::Documents,
                Severity::Suggestion,
                "Very long text fields",
            )
            .with_description(format!(
                "Some fields hold text longer than {} characters: {}. Consider \
                 truncating or splitting them.",
                self.thresholds.long_text_chars,
                listed.join(", ")
            ))
            .with_impact("Slower indexing and larger index")
            .for_index(&index.uid)
            .with_current(json!(longest)),
        )
    }

    /// D009
    fn check_sensitive_names(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut fields: BTreeSet<String> = BTreeSet::new();
        walk_samples(index, |visit| {
            if visit.step == Step::Key && is_sensitive_name(visit.key) {
                fields.insert(visit.path.to_string());
            }
        });
        if fields.is_empty() {
            return None;
        }
        let listed: Vec<&String> = fields.iter().take(10).collect();
        Some(
            Finding::new(
                "MEILI-D009",
                Category::Security,
                Severity::Warning,
                "Potentially sensitive field names detected",
            )
            .with_description(format!(
                "Field names suggest personal or secret data: {}. Review whether \
                 they need to be indexed or searchable.",
                listed.iter().take(5).map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            ))
            .with_impact("Privacy or compliance exposure if the data is searchable")
            .for_index(&index.uid)
            .with_current(json!(listed))
            .with_reference(DOCS_TENANT_TOKENS),
        )
    }

    /// D010
    fn check_pii_content(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut detections: BTreeMap<String, BTreeSet<&'static str>> = BTreeMap::new();
        walk_samples(index, |visit| {
            if let Value::String(text) = visit.value {
                if text.chars().count() < self.thresholds.pii_min_length {
                    return;
                }
                for kind in pii_kinds(text) {
                    detections
                        .entry(visit.path.to_string())
                        .or_default()
                        .insert(kind);
                }
            }
        });
        if detections.is_empty() {
            return None;
        }
        let kinds: BTreeSet<&'static str> = detections.values().flatten().copied().collect();
        let fields: Vec<&str> = detections.keys().take(5).map(|s| s.as_str()).collect();
        let current: Map<String, Value> = detections
            .iter()
            .take(5)
            .map(|(path, set)| (path.clone(), json!(set)))
            .collect();
        Some(
            Finding::new(
                "MEILI-D010",
                Category::Security,
                Severity::Critical,
                "Potential PII detected in document content",
            )
            .with_description(format!(
                "Values in {} match patterns for {}. Matching is pattern-based and may \
                 include false positives or miss other personal data; verify before \
                 acting.",
                fields.join(", "),
                kinds.iter().copied().collect::<Vec<_>>().join(", ")
            ))
            .with_impact("Possible exposure of personal data through search")
            .for_index(&index.uid)
            .with_current(Value::Object(current))
            .with_reference(DOCS_TENANT_TOKENS),
        )
    }

    /// D011
    fn check_arrays_of_objects(&self, index: &IndexSnapshot) -> Option<Finding> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        walk_samples(index, |visit| {
            if let Value::Array(items) = visit.value {
                if items.iter().any(Value::is_object) {
                    *counts.entry(visit.path.to_string()).or_insert(0) += 1;
                }
            }
        });
        if counts.is_empty() {
            return None;
        }

        let filterable = &index.settings.filterable_attributes;
        let (under_filter, plain): (Vec<_>, Vec<_>) = counts
            .into_iter()
            .partition(|(path, _)| path_covered_by(path, filterable));

        let (severity, title, fields, description) = if !under_filter.is_empty() {
            (
                Severity::Warning,
                "Arrays of objects in filterable fields",
                under_filter,
                "Filterable fields contain arrays of objects",
            )
        } else {
            (
                Severity::Info,
                "Arrays of objects detected",
                plain,
                "Fields contain arrays of objects",
            )
        };
        let names: Vec<&str> = fields.iter().take(5).map(|(p, _)| p.as_str()).collect();
        let current: Map<String, Value> = fields
            .iter()
            .take(5)
            .map(|(path, n)| (path.clone(), json!(n)))
            .collect();
        Some(
            Finding::new("MEILI-D011", Category::Documents, severity, title)
                .with_description(format!(
                    "{}: {}. Nested arrays are flattened on indexing, so filters \
                     cannot target a single element.",
                    description,
                    names.join(", ")
                ))
                .with_impact("Filters on nested array fields may match unexpectedly")
                .for_index(&index.uid)
                .with_current(Value::Object(current))
                .with_reference(DOCS_INDEXING),
        )
    }

    /// D012
    fn check_geo_coordinates(&self, index: &IndexSnapshot) -> Option<Finding> {
        if index
            .sample_documents
            .iter()
            .any(|doc| doc.contains_key("_geo"))
        {
            return None;
        }
        let mut seen = FxHashSet::default();
        let unique: Vec<GeoCandidate> = index
            .sample_documents
            .iter()
            .flat_map(geo_candidates)
            .filter(|c| seen.insert(c.pattern.clone()))
            .take(3)
            .collect();
        if unique.is_empty() {
            return None;
        }
        let patterns: Vec<&str> = unique.iter().map(|c| c.pattern.as_str()).collect();
        Some(
            Finding::new(
                "MEILI-D012",
                Category::Documents,
                Severity::Suggestion,
                "Potential geo coordinates not using _geo format",
            )
            .with_description(format!(
                "Fields look like geographic coordinates but are not stored in _geo: \
                 {}. Geo search requires _geo.lat and _geo.lng.",
                patterns.join(", ")
            ))
            .with_impact("Geo search is unavailable")
            .for_index(&index.uid)
            .with_current(json!(unique))
            .with_recommended(json!({ "_geo": { "lat": 45.4773, "lng": -73.6102 } }))
            .with_reference(DOCS_GEOSEARCH),
        )
    }

    /// D013
    fn check_date_strings(&self, index: &IndexSnapshot) -> Option<Finding> {
        let min = self.thresholds.date_min_length;
        let max = self.thresholds.date_max_length;
        let mut samples: BTreeMap<String, Vec<String>> = BTreeMap::new();
        walk_samples(index, |visit| {
            if visit.step != Step::Key {
                return;
            }
            let Value::String(text) = visit.value else {
                return;
            };
            let len = text.chars().count();
            if len < min || len > max {
                return;
            }
            if is_date_name(visit.key) || is_date_value(text) {
                let entry = samples.entry(visit.path.to_string()).or_default();
                if entry.len() < 2 {
                    entry.push(text.clone());
                }
            }
        });
        if samples.is_empty() {
            return None;
        }

        let sortable = &index.settings.sortable_attributes;
        let (sorted_on, unsorted): (Vec<_>, Vec<_>) = samples
            .into_iter()
            .partition(|(path, _)| path_covered_by(path, sortable));

        let first_samples = |fields: &[(String, Vec<String>)]| -> Map<String, Value> {
            fields
                .iter()
                .take(5)
                .map(|(path, values)| (path.clone(), json!(values.first())))
                .collect()
        };
        let names = |fields: &[(String, Vec<String>)]| -> String {
            fields
                .iter()
                .take(3)
                .map(|(p, _)| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        if !sorted_on.is_empty() {
            return Some(
                Finding::new(
                    "MEILI-D013",
                    Category::Documents,
                    Severity::Suggestion,
                    "Date strings in sortable attributes",
                )
                .with_description(format!(
                    "Sortable fields hold date strings: {}. Strings sort \
                     lexicographically, not chronologically.",
                    names(&sorted_on)
                ))
                .with_impact("Sorting by date may return the wrong order")
                .for_index(&index.uid)
                .with_current(Value::Object(first_samples(&sorted_on)))
                .with_recommended(json!("Unix timestamp (e.g., 1704412800)"))
                .with_reference(DOCS_SORTING),
            );
        }
        if unsorted.len() >= self.thresholds.date_unsorted_min_fields {
            return Some(
                Finding::new(
                    "MEILI-D013",
                    Category::Documents,
                    Severity::Info,
                    "Date fields detected",
                )
                .with_description(format!(
                    "Fields appear to contain dates: {}. To sort by them, add them to \
                     sortableAttributes as numeric timestamps.",
                    names(&unsorted)
                ))
                .with_impact("Date fields are not available for sorting")
                .for_index(&index.uid)
                .with_current(Value::Object(first_samples(&unsorted))),
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Document;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn index_of(docs: Vec<Value>) -> IndexSnapshot {
        let mut index = IndexSnapshot::new("books");
        index.primary_key = Some("id".into());
        index.sample_documents = docs.into_iter().map(doc).collect();
        index
    }

    fn analyze(index: &IndexSnapshot) -> Vec<Finding> {
        DocumentAnalyzer::default().analyze(index).unwrap()
    }

    fn find<'a>(findings: &'a [Finding], id: &str) -> Option<&'a Finding> {
        findings.iter().find(|f| f.id == id)
    }

    #[test]
    fn test_no_samples_no_findings() {
        assert!(analyze(&IndexSnapshot::new("empty")).is_empty());
    }

    #[test]
    fn test_min_sample_size_gate() {
        let index = index_of(vec![json!({"a": {"b": {"c": {"d": 1}}}})]);
        let analyzer = DocumentAnalyzer::new(
            DocumentThresholds {
                min_sample_size: 2,
                ..Default::default()
            },
            false,
        );
        assert!(analyzer.analyze(&index).unwrap().is_empty());
    }

    #[test]
    fn test_deep_nesting() {
        let findings = analyze(&index_of(vec![json!({"a": {"b": {"c": {"d": 1}}}})]));
        let d003 = find(&findings, "MEILI-D003").unwrap();
        assert_eq!(d003.current_value, Some(json!(4)));
        assert_eq!(d003.recommended_value, Some(json!(3)));
    }

    #[test]
    fn test_empty_ratio() {
        let findings = analyze(&index_of(vec![
            json!({"id": 1, "subtitle": null}),
            json!({"id": 2, "subtitle": ""}),
            json!({"id": 3, "subtitle": []}),
            json!({"id": 4, "subtitle": "Part two"}),
        ]));
        let d006 = find(&findings, "MEILI-D006").unwrap();
        assert_eq!(d006.current_value, Some(json!({"subtitle": "75%"})));
    }

    #[test]
    fn test_large_documents() {
        let big = "x".repeat(120 * 1024);
        let findings = analyze(&index_of(vec![json!({"id": 1, "body": big})]));
        assert!(find(&findings, "MEILI-D001").is_some());
    }

    #[test]
    fn test_inconsistent_schema() {
        let docs = (0..10)
            .map(|i| {
                if i < 5 {
                    json!({"id": i, "isbn": "x"})
                } else {
                    json!({"id": i})
                }
            })
            .collect();
        let findings = analyze(&index_of(docs));
        let d002 = find(&findings, "MEILI-D002").unwrap();
        assert_eq!(d002.current_value, Some(json!(["isbn"])));
    }

    #[test]
    fn test_large_arrays() {
        let tags: Vec<u32> = (0..60).collect();
        let findings = analyze(&index_of(vec![json!({"id": 1, "tags": tags})]));
        let d004 = find(&findings, "MEILI-D004").unwrap();
        assert_eq!(d004.current_value, Some(json!({"tags": 60})));
    }

    #[test]
    fn test_markup_detected() {
        let findings = analyze(&index_of(vec![
            json!({"id": 1, "summary": "<p>A short story</p>"}),
        ]));
        let d005 = find(&findings, "MEILI-D005").unwrap();
        assert_eq!(d005.current_value, Some(json!(["summary"])));
    }

    #[test]
    fn test_mixed_types_tolerate_numeric_widening() {
        let findings = analyze(&index_of(vec![
            json!({"id": 1, "price": 10, "year": 1999}),
            json!({"id": 2, "price": 10.5, "year": "1999"}),
        ]));
        let d007 = find(&findings, "MEILI-D007").unwrap();
        assert_eq!(d007.current_value, Some(json!({"year": ["integer", "string"]})));
    }

    #[test]
    fn test_sensitive_rules_are_opt_in() {
        let index = index_of(vec![json!({"id": 1, "email": "jane@example.com"})]);
        let findings = analyze(&index);
        assert!(find(&findings, "MEILI-D009").is_none());
        assert!(find(&findings, "MEILI-D010").is_none());

        let findings = DocumentAnalyzer::new(DocumentThresholds::default(), true)
            .analyze(&index)
            .unwrap();
        let d009 = find(&findings, "MEILI-D009").unwrap();
        assert_eq!(d009.current_value, Some(json!(["email"])));
        let d010 = find(&findings, "MEILI-D010").unwrap();
        assert_eq!(d010.severity, Severity::Critical);
        assert_eq!(d010.current_value, Some(json!({"email": ["email"]})));
    }

    #[test]
    fn test_arrays_of_objects_severity_follows_filterable() {
        let mut index = index_of(vec![json!({"id": 1, "variants": [{"sku": "a"}]})]);
        let d011 = find(&analyze(&index), "MEILI-D011").cloned().unwrap();
        assert_eq!(d011.severity, Severity::Info);

        index.settings.filterable_attributes = vec!["variants".into()];
        let d011 = find(&analyze(&index), "MEILI-D011").cloned().unwrap();
        assert_eq!(d011.severity, Severity::Warning);
        assert_eq!(d011.current_value, Some(json!({"variants": 1})));
    }

    #[test]
    fn test_geo_candidates_unless_geo_present() {
        let index = index_of(vec![json!({"id": 1, "lat": 45.5, "lng": -73.6})]);
        let d012 = find(&analyze(&index), "MEILI-D012").cloned().unwrap();
        assert_eq!(d012.current_value.unwrap()[0]["pattern"], "lat/lng");

        let index = index_of(vec![
            json!({"id": 1, "lat": 45.5, "lng": -73.6}),
            json!({"id": 2, "_geo": {"lat": 1.0, "lng": 2.0}}),
        ]);
        assert!(find(&analyze(&index), "MEILI-D012").is_none());
    }

    #[test]
    fn test_date_strings() {
        let mut index = index_of(vec![json!({
            "id": 1,
            "published_at": "2024-01-05T10:00:00Z",
            "release": "05/01/2024"
        })]);
        let d013 = find(&analyze(&index), "MEILI-D013").cloned().unwrap();
        assert_eq!(d013.severity, Severity::Info);

        index.settings.sortable_attributes = vec!["published_at".into()];
        let d013 = find(&analyze(&index), "MEILI-D013").cloned().unwrap();
        assert_eq!(d013.severity, Severity::Suggestion);
        assert_eq!(
            d013.current_value,
            Some(json!({"published_at": "2024-01-05T10:00:00Z"}))
        );
    }

    #[test]
    fn test_single_unsorted_date_field_is_quiet() {
        let index = index_of(vec![json!({"id": 1, "created_at": "2024-01-05"})]);
        assert!(find(&analyze(&index), "MEILI-D013").is_none());
    }

    #[test]
    fn test_analyzer_is_deterministic() {
        let index = index_of(vec![
            json!({"id": 1, "a": {"b": {"c": {"d": null}}}, "tags": [{"x": 1}]}),
            json!({"id": 2, "a": "text", "lat": 10.0, "lon": 20.0}),
        ]);
        let strip = |fs: Vec<Finding>| -> Vec<Value> {
            fs.into_iter()
                .map(|mut f| {
                    f.detected_at = Default::default();
                    serde_json::to_value(f).unwrap()
                })
                .collect()
        };
        assert_eq!(strip(analyze(&index)), strip(analyze(&index)));
    }
}
