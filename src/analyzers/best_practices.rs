//! Best-practice analyzer (B001-B004)

use crate::analyzers::base::{Analyzer, GlobalAnalyzer, GlobalContext, IndexAnalyzer};
use crate::config::BestPracticeThresholds;
use crate::models::{Category, Finding, Severity};
use crate::snapshot::{IndexSnapshot, Task, DOCUMENT_ADDITION, SETTINGS_UPDATE};
use anyhow::Result;
use rustc_hash::FxHashMap;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::debug;

const DOCS_SEARCHABLE: &str =
    "https://www.meilisearch.com/docs/learn/relevancy/displayed_searchable_attributes";
const DOCS_FILTERING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/filter_search_results";
const DOCS_CUSTOMIZING: &str =
    "https://www.meilisearch.com/docs/learn/getting_started/customizing_relevancy";
const DOCS_AI_SEARCH: &str =
    "https://www.meilisearch.com/docs/learn/ai_powered_search/getting_started_with_ai_search";
const RELEASES: &str = "https://github.com/meilisearch/meilisearch/releases";
const DOCS_UPDATING: &str = "https://www.meilisearch.com/docs/learn/update_and_migration/updating";

const TEXT_FIELD_FRAGMENTS: &[&str] = &["content", "body", "text", "description", "article", "post"];
const MAX_LISTED: usize = 5;

pub struct BestPracticesAnalyzer {
    thresholds: BestPracticeThresholds,
    stable_version: String,
}

impl BestPracticesAnalyzer {
    pub fn new(thresholds: BestPracticeThresholds, stable_version: impl Into<String>) -> Self {
        Self {
            thresholds,
            stable_version: stable_version.into(),
        }
    }
}

impl Default for BestPracticesAnalyzer {
    fn default() -> Self {
        Self::new(BestPracticeThresholds::default(), "1.12.0")
    }
}

impl Analyzer for BestPracticesAnalyzer {
    fn name(&self) -> &'static str {
        "best_practices"
    }
}

impl IndexAnalyzer for BestPracticesAnalyzer {
    fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
        Ok(self.check_searchable_filterable(index).into_iter().collect())
    }
}

impl GlobalAnalyzer for BestPracticesAnalyzer {
    fn analyze_global(&self, ctx: &GlobalContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        if let Some(tasks) = ctx.tasks() {
            findings.extend(self.check_settings_after_documents(tasks, ctx.indexes));
        }
        findings.extend(self.check_missing_embedders(ctx.indexes));
        if let Some(version) = ctx.instance.version.as_deref() {
            findings.extend(self.check_version(version));
        }
        Ok(findings)
    }
}

/// `(major, minor, patch)` from strings like `v1.10.2` or `1.9.0-rc.1`.
///
/// Missing minor/patch components count as zero; anything else that does
/// not parse yields `None`.
pub fn parse_version(raw: &str) -> Option<(u64, u64, u64)> {
    let core = raw.trim().trim_start_matches('v');
    let core = core.split(['-', '+']).next()?;
    let mut parts = core.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let patch = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    Some((major, minor, patch))
}

impl BestPracticesAnalyzer {
    /// B002
    fn check_searchable_filterable(&self, index: &IndexSnapshot) -> Option<Finding> {
        let settings = &index.settings;
        if settings.searchable_is_wildcard() {
            return None;
        }
        let filterable: BTreeSet<&str> = settings
            .filterable_attributes
            .iter()
            .map(String::as_str)
            .collect();
        let duplicates: BTreeSet<&str> = settings
            .searchable_attributes
            .iter()
            .map(String::as_str)
            .filter(|f| filterable.contains(f))
            .collect();
        if duplicates.is_empty() {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-B002",
                Category::BestPractices,
                Severity::Suggestion,
                "Fields in both searchable and filterable attributes",
            )
            .with_description(format!(
                "Fields configured as both searchable and filterable: {}. This is fine \
                 when you need full-text search and filtering on the same field, but \
                 often the configuration can be simplified.",
                duplicates.iter().copied().collect::<Vec<_>>().join(", ")
            ))
            .with_impact("Increased index size due to dual indexing")
            .for_index(&index.uid)
            .with_current(json!({
                "searchable": settings.searchable_attributes,
                "filterable": settings.filterable_attributes,
                "duplicates": duplicates,
            }))
            .with_reference(DOCS_SEARCHABLE)
            .with_reference(DOCS_FILTERING),
        )
    }

    /// B001
    fn check_settings_after_documents(
        &self,
        tasks: &[Task],
        indexes: &[IndexSnapshot],
    ) -> Vec<Finding> {
        let mut by_index: FxHashMap<&str, Vec<&Task>> = FxHashMap::default();
        for task in tasks {
            if let Some(uid) = task.index_uid.as_deref() {
                by_index.entry(uid).or_default().push(task);
            }
        }

        let mut findings = Vec::new();
        for index in indexes {
            let Some(index_tasks) = by_index.get_mut(index.uid.as_str()) else {
                continue;
            };
            index_tasks.sort_by_key(|t| (t.enqueued(), t.uid));

            let Some(first_docs) = index_tasks.iter().position(|t| t.kind == DOCUMENT_ADDITION)
            else {
                continue;
            };
            let late: Vec<&Task> = index_tasks[first_docs..]
                .iter()
                .filter(|t| t.kind == SETTINGS_UPDATE)
                .copied()
                .collect();
            if late.is_empty() {
                continue;
            }
            let changed: BTreeSet<String> = late.iter().flat_map(|t| t.detail_keys()).collect();
            let changed = if changed.is_empty() {
                Value::Null
            } else {
                json!(changed)
            };

            findings.push(
                Finding::new(
                    "MEILI-B001",
                    Category::BestPractices,
                    Severity::Warning,
                    "Settings updated after documents were added",
                )
                .with_description(format!(
                    "Index '{}' had {} settings update(s) after documents were first \
                     added. Each one re-indexes every document; configure settings \
                     before the first import.",
                    index.uid,
                    late.len()
                ))
                .with_impact("Causes re-indexing of all documents, slower initial setup")
                .for_index(&index.uid)
                .with_current(json!({
                    "settings_updates_after_docs": late.len(),
                    "settings_changed": changed,
                }))
                .with_reference(DOCS_CUSTOMIZING),
            );
        }
        findings
    }

    /// B003
    fn check_missing_embedders(&self, indexes: &[IndexSnapshot]) -> Option<Finding> {
        let candidates: Vec<&str> = indexes
            .iter()
            .filter(|i| i.settings.embedders.is_empty())
            .filter(|i| i.document_count() > self.thresholds.text_heavy_min_documents)
            .filter(|i| {
                i.stats.field_distribution.keys().any(|field| {
                    let lower = field.to_lowercase();
                    TEXT_FIELD_FRAGMENTS.iter().any(|frag| lower.contains(frag))
                })
            })
            .map(|i| i.uid.as_str())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let listed: Vec<&str> = candidates.iter().take(MAX_LISTED).copied().collect();
        Some(
            Finding::new(
                "MEILI-B003",
                Category::BestPractices,
                Severity::Info,
                "Consider configuring embedders for semantic search",
            )
            .with_description(format!(
                "Indexes with text-heavy content and no embedders: {}. Configure an \
                 embedder if you need semantic or hybrid search.",
                listed.join(", ")
            ))
            .with_impact("Semantic search not available without embedder configuration")
            .with_current(json!({
                "text_heavy_indexes": listed,
                "total_candidates": candidates.len(),
            }))
            .with_reference(DOCS_AI_SEARCH),
        )
    }

    /// B004
    fn check_version(&self, version: &str) -> Option<Finding> {
        let (Some(current), Some(stable)) =
            (parse_version(version), parse_version(&self.stable_version))
        else {
            debug!("Skipping version check for unparseable '{}'", version);
            return None;
        };
        if current >= stable {
            return None;
        }
        let severity = if current.0 < stable.0 {
            Severity::Warning
        } else if current.1 < stable.1 {
            Severity::Suggestion
        } else {
            // patch releases only
            return None;
        };
        Some(
            Finding::new(
                "MEILI-B004",
                Category::BestPractices,
                severity,
                "Outdated Meilisearch version",
            )
            .with_description(format!(
                "Running Meilisearch {}, but the current stable version is {}. Newer \
                 versions include performance improvements, bug fixes and new features.",
                version, self.stable_version
            ))
            .with_impact("Missing recent features, performance improvements and security fixes")
            .with_current(json!(version))
            .with_recommended(json!(self.stable_version))
            .with_reference(RELEASES)
            .with_reference(DOCS_UPDATING),
        )
    }
}
