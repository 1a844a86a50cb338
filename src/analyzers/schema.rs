//! Schema analyzer: index settings against field statistics (S001-S020)

use crate::analyzers::base::{Analyzer, IndexAnalyzer};
use crate::analyzers::fields::{
    contains_any, is_high_cardinality_name, is_id_field, is_mutable_field, is_numeric_name,
    is_sort_candidate, value_kind, FILTERABLE_FRAGMENTS,
};
use crate::config::SchemaThresholds;
use crate::models::{Category, Finding, FindingFix, Severity};
use crate::snapshot::IndexSnapshot;
use anyhow::Result;
use rustc_hash::FxHashSet;
use serde_json::{json, Value};
use std::collections::BTreeSet;

const DOCS_SEARCHABLE: &str =
    "https://www.meilisearch.com/docs/learn/relevancy/displayed_searchable_attributes";
const DOCS_FILTERING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/filter_search_results";
const DOCS_SORTING: &str =
    "https://www.meilisearch.com/docs/learn/filtering_and_sorting/sort_search_results";
const DOCS_RELEVANCY: &str = "https://www.meilisearch.com/docs/learn/relevancy/relevancy";
const DOCS_PRIMARY_KEY: &str =
    "https://www.meilisearch.com/docs/learn/getting_started/primary_key";
const DOCS_SETTINGS: &str = "https://www.meilisearch.com/docs/reference/api/settings";

const MAX_LISTED: usize = 5;

pub struct SchemaAnalyzer {
    thresholds: SchemaThresholds,
}

impl SchemaAnalyzer {
    pub fn new(thresholds: SchemaThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for SchemaAnalyzer {
    fn default() -> Self {
        Self::new(SchemaThresholds::default())
    }
}

impl Analyzer for SchemaAnalyzer {
    fn name(&self) -> &'static str {
        "schema"
    }
}

impl IndexAnalyzer for SchemaAnalyzer {
    fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        self.check_searchable(index, &mut findings);
        self.check_filterable(index, &mut findings);
        self.check_sortable(index, &mut findings);
        self.check_displayed(index, &mut findings);
        self.check_ranking_rules(index, &mut findings);
        self.check_stop_words(index, &mut findings);
        self.check_distinct(index, &mut findings);
        self.check_pagination(index, &mut findings);
        self.check_typo_tolerance(index, &mut findings);
        self.check_primary_key(index, &mut findings);
        self.check_sortable_types(index, &mut findings);
        self.check_filterable_cardinality(index, &mut findings);
        self.check_faceting(index, &mut findings);
        self.check_synonyms(index, &mut findings);
        self.check_tokenization(index, &mut findings);

        Ok(findings)
    }
}

impl SchemaAnalyzer {
    /// S001, S002, S003
    fn check_searchable(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let uid = index.uid.as_str();
        let searchable = &index.settings.searchable_attributes;

        if index.settings.searchable_is_wildcard() {
            let suggested: Vec<String> = index
                .stats
                .field_distribution
                .keys()
                .filter(|f| !is_id_field(f) && !is_likely_numeric(f, index))
                .take(self.thresholds.max_suggested_fields)
                .cloned()
                .collect();

            let mut finding = Finding::new(
                "MEILI-S001",
                Category::Schema,
                Severity::Critical,
                "Wildcard searchableAttributes",
            )
            .with_description(
                "searchableAttributes is set to ['*'], so every field including identifiers \
                 and numbers is indexed for full-text search.",
            )
            .with_impact("Larger index, slower indexing, and potentially irrelevant results")
            .for_index(uid)
            .with_current(json!(["*"]))
            .with_reference(DOCS_SEARCHABLE);
            if !suggested.is_empty() {
                finding = finding
                    .with_recommended(json!(suggested))
                    .with_fix(FindingFix::settings_update(
                        uid,
                        json!({ "searchableAttributes": suggested }),
                    ));
            }
            out.push(finding);
            return;
        }

        let id_fields: Vec<&String> = searchable.iter().filter(|f| is_id_field(f)).collect();
        if !id_fields.is_empty() {
            let recommended: Vec<&String> =
                searchable.iter().filter(|f| !is_id_field(f)).collect();
            out.push(
                Finding::new(
                    "MEILI-S002",
                    Category::Schema,
                    Severity::Warning,
                    "ID fields in searchableAttributes",
                )
                .with_description(format!(
                    "Identifier-like fields are searchable: {}. Users rarely search for IDs.",
                    join(&id_fields)
                ))
                .with_impact("Wasted index space and possibly irrelevant matches")
                .for_index(uid)
                .with_current(json!(searchable))
                .with_recommended(json!(recommended))
                .with_fix(FindingFix::settings_update(
                    uid,
                    json!({ "searchableAttributes": recommended }),
                ))
                .with_reference(DOCS_SEARCHABLE),
            );
        }

        let numeric: Vec<&String> = searchable
            .iter()
            .filter(|f| !is_id_field(f) && is_likely_numeric(f, index))
            .collect();
        if !numeric.is_empty() {
            out.push(
                Finding::new(
                    "MEILI-S003",
                    Category::Schema,
                    Severity::Suggestion,
                    "Numeric fields in searchableAttributes",
                )
                .with_description(format!(
                    "Fields that look numeric are searchable: {}. They are usually better \
                     as filterable attributes.",
                    join(&numeric)
                ))
                .with_impact("May not match user search intent")
                .for_index(uid)
                .with_current(json!(numeric))
                .with_reference(DOCS_FILTERING),
            );
        }
    }

    /// S004
    fn check_filterable(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        if !index.settings.filterable_attributes.is_empty()
            || index.document_count() < self.thresholds.no_filterable_min_documents
        {
            return;
        }
        let suggested: Vec<&String> = index
            .stats
            .field_distribution
            .keys()
            .filter(|f| contains_any(f, FILTERABLE_FRAGMENTS))
            .take(MAX_LISTED)
            .collect();

        let mut finding = Finding::new(
            "MEILI-S004",
            Category::Schema,
            Severity::Info,
            "No filterable attributes configured",
        )
        .with_description(
            "No filterable attributes are configured. Filtering and faceting need \
             filterableAttributes.",
        )
        .with_impact("Cannot use filters in search queries")
        .for_index(&index.uid)
        .with_current(json!([]))
        .with_reference(DOCS_FILTERING);
        if !suggested.is_empty() {
            finding = finding.with_recommended(json!(suggested));
        }
        out.push(finding);
    }

    /// S013
    fn check_sortable(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        if !index.settings.sortable_attributes.is_empty() {
            return;
        }
        let candidates: Vec<String> = index
            .known_fields()
            .into_iter()
            .filter(|f| is_sort_candidate(f))
            .take(MAX_LISTED)
            .collect();
        if candidates.is_empty() {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S013",
                Category::Schema,
                Severity::Info,
                "No sortable attributes configured",
            )
            .with_description(format!(
                "No sortable attributes are configured, but fields commonly used for \
                 sorting exist: {}.",
                candidates.join(", ")
            ))
            .with_impact("Cannot sort search results by these fields")
            .for_index(&index.uid)
            .with_current(json!([]))
            .with_recommended(json!(candidates))
            .with_reference(DOCS_SORTING),
        );
    }

    /// S005
    fn check_displayed(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let field_count = index.field_count();
        if !index.settings.displayed_is_wildcard()
            || field_count <= self.thresholds.displayed_wildcard_max_fields
        {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S005",
                Category::Schema,
                Severity::Suggestion,
                "Wildcard displayedAttributes with many fields",
            )
            .with_description(format!(
                "displayedAttributes is ['*'] but the index has {} fields. Return only \
                 the fields the UI needs.",
                field_count
            ))
            .with_impact("Larger response payloads and more bandwidth")
            .for_index(&index.uid)
            .with_current(json!(["*"]))
            .with_reference(DOCS_SEARCHABLE),
        );
    }

    /// S007
    fn check_ranking_rules(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        if !index.settings.has_default_ranking_rules() {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S007",
                Category::Schema,
                Severity::Info,
                "Default ranking rules",
            )
            .with_description(
                "Ranking rules are the defaults. Customize them if relevancy does not \
                 meet expectations.",
            )
            .with_impact("May not be optimal for this use case")
            .for_index(&index.uid)
            .with_current(json!(index.settings.ranking_rules))
            .with_reference(DOCS_RELEVANCY),
        );
    }

    /// S006
    fn check_stop_words(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        if !index.settings.stop_words.is_empty()
            || index.document_count() <= self.thresholds.stop_words_min_documents
        {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S006",
                Category::Schema,
                Severity::Suggestion,
                "No stop words configured",
            )
            .with_description(
                "No stop words are configured. Language-appropriate stop words keep \
                 words like 'the' or 'a' from affecting ranking.",
            )
            .with_impact("Common words may affect ranking unnecessarily")
            .for_index(&index.uid)
            .with_current(json!([]))
            .with_reference(format!("{}#stop-words", DOCS_SETTINGS)),
        );
    }

    /// S008
    fn check_distinct(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        if index.settings.distinct_attribute.is_some()
            || index.document_count() <= self.thresholds.distinct_min_documents
        {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S008",
                Category::Schema,
                Severity::Suggestion,
                "No distinct attribute set",
            )
            .with_description(
                "No distinct attribute is configured. If documents have near-duplicates, \
                 a distinct attribute keeps them from crowding results.",
            )
            .with_impact("Potentially duplicate or near-identical results")
            .for_index(&index.uid)
            .with_reference(format!("{}#distinct-attribute", DOCS_SETTINGS)),
        );
    }

    /// S009, S010
    fn check_pagination(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let max_hits = index.settings.pagination.max_total_hits;
        let reference = format!("{}#pagination", DOCS_SETTINGS);

        if max_hits < self.thresholds.min_max_total_hits {
            let recommended = self.thresholds.recommended_max_total_hits;
            out.push(
                Finding::new(
                    "MEILI-S009",
                    Category::Schema,
                    Severity::Warning,
                    "Very low pagination limit",
                )
                .with_description(format!(
                    "maxTotalHits is {}, which caps how many results pagination can reach.",
                    max_hits
                ))
                .with_impact("Users cannot paginate beyond the limit")
                .for_index(&index.uid)
                .with_current(json!(max_hits))
                .with_recommended(json!(recommended))
                .with_fix(FindingFix::settings_update(
                    &index.uid,
                    json!({ "pagination": { "maxTotalHits": recommended } }),
                ))
                .with_reference(reference),
            );
        } else if max_hits > self.thresholds.max_max_total_hits {
            out.push(
                Finding::new(
                    "MEILI-S010",
                    Category::Schema,
                    Severity::Suggestion,
                    "High pagination limit",
                )
                .with_description(format!(
                    "maxTotalHits is {}. Very high limits make deep pagination expensive.",
                    max_hits
                ))
                .with_impact("Potential performance impact on deep pagination")
                .for_index(&index.uid)
                .with_current(json!(max_hits))
                .with_reference(reference),
            );
        }
    }

    /// S018, S019
    fn check_typo_tolerance(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let typo = &index.settings.typo_tolerance;
        if !typo.enabled {
            return;
        }
        let reference = format!("{}#typo-tolerance", DOCS_SETTINGS);

        if !index.settings.searchable_is_wildcard() {
            let unprotected: Vec<&String> = index
                .settings
                .searchable_attributes
                .iter()
                .filter(|f| is_id_field(f) && !typo.disable_on_attributes.contains(f))
                .collect();
            if !unprotected.is_empty() {
                let merged: BTreeSet<&String> = typo
                    .disable_on_attributes
                    .iter()
                    .chain(unprotected.iter().copied())
                    .collect();
                out.push(
                    Finding::new(
                        "MEILI-S018",
                        Category::Schema,
                        Severity::Suggestion,
                        "Typo tolerance enabled on ID-like fields",
                    )
                    .with_description(format!(
                        "Typo tolerance applies to ID-like fields: {}. Add them to \
                         disableOnAttributes.",
                        join(&unprotected)
                    ))
                    .with_impact("Identifier searches may match the wrong document")
                    .for_index(&index.uid)
                    .with_current(json!({ "disableOnAttributes": typo.disable_on_attributes }))
                    .with_recommended(json!({ "disableOnAttributes": merged }))
                    .with_fix(FindingFix::settings_update(
                        &index.uid,
                        json!({ "typoTolerance": { "disableOnAttributes": merged } }),
                    ))
                    .with_reference(reference.clone()),
                );
            }
        }

        let sizes = typo.min_word_size_for_typos;
        if sizes.one_typo < self.thresholds.min_one_typo
            || sizes.two_typos < self.thresholds.min_two_typos
        {
            out.push(
                Finding::new(
                    "MEILI-S019",
                    Category::Schema,
                    Severity::Info,
                    "Very permissive typo tolerance settings",
                )
                .with_description(format!(
                    "minWordSizeForTypos is very low (oneTypo: {}, twoTypos: {}), so \
                     short words match with typos.",
                    sizes.one_typo, sizes.two_typos
                ))
                .with_impact("Short words may produce unexpected matches")
                .for_index(&index.uid)
                .with_current(json!({ "oneTypo": sizes.one_typo, "twoTypos": sizes.two_typos }))
                .with_recommended(json!({ "oneTypo": 5, "twoTypos": 9 }))
                .with_reference(reference),
            );
        }
    }

    /// S011, S012
    fn check_primary_key(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let Some(pk) = index.primary_key.as_deref() else {
            out.push(
                Finding::new(
                    "MEILI-S011",
                    Category::Schema,
                    Severity::Critical,
                    "Index has no primary key",
                )
                .with_description(
                    "No primary key is defined. It will be inferred from the first \
                     document, which breaks when documents differ in shape.",
                )
                .with_impact("Inconsistent document identity and possible indexing failures")
                .for_index(&index.uid)
                .with_reference(DOCS_PRIMARY_KEY),
            );
            return;
        };

        if is_mutable_field(pk) {
            out.push(
                Finding::new(
                    "MEILI-S012",
                    Category::Schema,
                    Severity::Warning,
                    "Primary key appears to be a mutable field",
                )
                .with_description(format!(
                    "The primary key '{}' looks like a mutable field. Primary keys should \
                     be stable identifiers such as 'id' or '*_id'.",
                    pk
                ))
                .with_impact("Changing this field creates duplicates or failed updates")
                .for_index(&index.uid)
                .with_current(json!(pk))
                .with_recommended(json!("id"))
                .with_reference(DOCS_PRIMARY_KEY),
            );
        }

        let sampled = index.sample_documents.len();
        let missing = index
            .sample_documents
            .iter()
            .filter(|doc| !doc.contains_key(pk))
            .count();
        if missing > 0 {
            out.push(
                Finding::new(
                    "MEILI-S011",
                    Category::Schema,
                    Severity::Critical,
                    "Primary key field missing from documents",
                )
                .with_description(format!(
                    "The primary key field '{}' is missing from {} of {} sampled documents.",
                    pk, missing, sampled
                ))
                .with_impact("Documents without the primary key fail to index")
                .for_index(&index.uid)
                .with_current(json!(format!("{}/{} missing", missing, sampled)))
                .with_reference(DOCS_PRIMARY_KEY),
            );
        }
    }

    /// S014
    fn check_sortable_types(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        for field in &index.settings.sortable_attributes {
            let kinds: BTreeSet<&'static str> = index
                .sample_documents
                .iter()
                .filter_map(|doc| doc.get(field))
                .map(value_kind)
                .collect();

            let has_complex = kinds.contains("array") || kinds.contains("object");
            let has_numeric = kinds.contains("integer") || kinds.contains("float");
            let has_string = kinds.contains("string");

            let (title, detail) = if has_complex {
                (
                    "Sortable attribute contains complex types",
                    "contains array or object values",
                )
            } else if has_numeric && has_string {
                (
                    "Sortable attribute has inconsistent types",
                    "mixes numeric and string values",
                )
            } else {
                continue;
            };

            out.push(
                Finding::new("MEILI-S014", Category::Schema, Severity::Warning, title)
                    .with_description(format!(
                        "The sortable attribute '{}' {} in sampled documents.",
                        field, detail
                    ))
                    .with_impact("Sort order may be unpredictable")
                    .for_index(&index.uid)
                    .with_current(json!({ "field": field, "types_found": kinds }))
                    .with_reference(DOCS_SORTING),
            );
        }
    }

    /// S015
    fn check_filterable_cardinality(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let mut flagged: Vec<&String> = Vec::new();
        for field in &index.settings.filterable_attributes {
            if is_high_cardinality_name(field) {
                flagged.push(field);
                continue;
            }
            let values = non_null_values(index, field);
            if values.len() >= self.thresholds.high_cardinality_min_values {
                let unique = unique_count(&values);
                if unique as f64 >= values.len() as f64 * self.thresholds.high_cardinality_unique_ratio
                {
                    flagged.push(field);
                }
            }
        }
        if flagged.is_empty() {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S015",
                Category::Schema,
                Severity::Suggestion,
                "High-cardinality filterable attributes detected",
            )
            .with_description(format!(
                "These filterable attributes look high-cardinality: {}. Fields with \
                 mostly unique values make poor filters and facets.",
                join(&flagged)
            ))
            .with_impact("Higher memory use and slower filters and facets")
            .for_index(&index.uid)
            .with_current(json!(flagged))
            .with_reference(DOCS_FILTERING),
        );
    }

    /// S016
    fn check_faceting(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let settings = &index.settings;
        if settings.filterable_attributes.is_empty() {
            return;
        }
        let max_values = settings.faceting.max_values_per_facet;
        let reference = format!("{}#faceting", DOCS_SETTINGS);

        let saturated = settings.filterable_attributes.iter().find_map(|field| {
            let unique = unique_count(&non_null_values(index, field));
            let near_limit = unique as f64 >= max_values as f64 * self.thresholds.facet_saturation_ratio;
            (near_limit && unique >= self.thresholds.facet_min_unique_values)
                .then_some((field, unique))
        });
        if let Some((field, unique)) = saturated {
            let recommended = (max_values * 2).min(self.thresholds.facet_values_fix_cap);
            out.push(
                Finding::new(
                    "MEILI-S016",
                    Category::Schema,
                    Severity::Suggestion,
                    "maxValuesPerFacet may be too low",
                )
                .with_description(format!(
                    "The field '{}' has {} unique values in the sample, close to the \
                     maxValuesPerFacet limit of {}.",
                    field, unique, max_values
                ))
                .with_impact("Some facet values may be missing from search results")
                .for_index(&index.uid)
                .with_current(json!(max_values))
                .with_recommended(json!(recommended))
                .with_fix(FindingFix::settings_update(
                    &index.uid,
                    json!({ "faceting": { "maxValuesPerFacet": recommended } }),
                ))
                .with_reference(reference.clone()),
            );
        }

        if max_values > self.thresholds.max_values_per_facet_ceiling {
            out.push(
                Finding::new(
                    "MEILI-S016",
                    Category::Schema,
                    Severity::Info,
                    "High maxValuesPerFacet setting",
                )
                .with_description(format!(
                    "maxValuesPerFacet is {}. Very high values enlarge faceted responses.",
                    max_values
                ))
                .with_impact("Potential performance impact on faceted searches")
                .for_index(&index.uid)
                .with_current(json!(max_values))
                .with_reference(reference),
            );
        }
    }

    /// S017
    fn check_synonyms(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let synonyms = &index.settings.synonyms;
        if synonyms.is_empty() {
            return;
        }
        let mut issues = Vec::new();

        let self_synonyms: Vec<&String> = synonyms
            .iter()
            .filter(|(term, list)| list.contains(term))
            .map(|(term, _)| term)
            .take(MAX_LISTED)
            .collect();
        if !self_synonyms.is_empty() {
            issues.push(format!("self-synonyms found: {}", join(&self_synonyms)));
        }

        let empty: Vec<&String> = synonyms
            .iter()
            .filter(|(_, list)| list.is_empty())
            .map(|(term, _)| term)
            .take(MAX_LISTED)
            .collect();
        if !empty.is_empty() {
            issues.push(format!("empty synonym lists: {}", join(&empty)));
        }

        let total_mappings: usize = synonyms.values().map(Vec::len).sum();
        if synonyms.len() > self.thresholds.synonyms_max_terms
            || total_mappings > self.thresholds.synonyms_max_mappings
        {
            issues.push(format!(
                "large synonym set ({} terms, {} total mappings)",
                synonyms.len(),
                total_mappings
            ));
        }

        let long_chains: Vec<String> = synonyms
            .iter()
            .filter(|(_, list)| list.len() > self.thresholds.synonym_chain_max)
            .map(|(term, list)| format!("{} ({})", term, list.len()))
            .take(3)
            .collect();
        if !long_chains.is_empty() {
            issues.push(format!("very long synonym chains: {}", long_chains.join(", ")));
        }

        if issues.is_empty() {
            return;
        }
        out.push(
            Finding::new(
                "MEILI-S017",
                Category::Schema,
                Severity::Suggestion,
                "Synonyms configuration issues detected",
            )
            .with_description(format!(
                "Potential issues in the synonyms configuration: {}.",
                issues.join("; ")
            ))
            .with_impact("May affect relevancy and makes synonyms harder to maintain")
            .for_index(&index.uid)
            .with_current(json!({
                "term_count": synonyms.len(),
                "total_mappings": total_mappings,
                "issues": issues,
            }))
            .with_reference(format!("{}#synonyms", DOCS_SETTINGS)),
        );
    }

    /// S020
    fn check_tokenization(&self, index: &IndexSnapshot, out: &mut Vec<Finding>) {
        let settings = &index.settings;
        let mut issues = Vec::new();

        if settings.dictionary.len() > self.thresholds.dictionary_max_entries {
            issues.push(format!(
                "large dictionary ({} entries)",
                settings.dictionary.len()
            ));
        }

        let mut seen = FxHashSet::default();
        let duplicates: BTreeSet<&String> = settings
            .dictionary
            .iter()
            .filter(|w| !seen.insert(w.as_str()))
            .collect();
        if !duplicates.is_empty() {
            let listed: Vec<&String> = duplicates.into_iter().take(MAX_LISTED).collect();
            issues.push(format!("duplicate dictionary entries: {}", join(&listed)));
        }

        let suspicious: Vec<&String> = settings
            .separator_tokens
            .iter()
            .filter(|t| {
                let alnum = !t.is_empty() && t.chars().all(char::is_alphanumeric);
                alnum || t.chars().count() > self.thresholds.separator_token_max_len
            })
            .take(MAX_LISTED)
            .collect();
        if !suspicious.is_empty() {
            issues.push(format!("suspicious separator tokens: {}", join(&suspicious)));
        }

        if settings.non_separator_tokens.len() > self.thresholds.non_separator_max_tokens {
            issues.push(format!(
                "large non-separator token list ({} entries)",
                settings.non_separator_tokens.len()
            ));
        }

        if issues.is_empty() {
            return;
        }
        let separators: Vec<&String> = settings.separator_tokens.iter().take(10).collect();
        out.push(
            Finding::new(
                "MEILI-S020",
                Category::Schema,
                Severity::Suggestion,
                "Dictionary/tokenization configuration issues",
            )
            .with_description(format!(
                "Potential issues in dictionary or tokenization settings: {}.",
                issues.join("; ")
            ))
            .with_impact("May slow indexing or change how queries are tokenized")
            .for_index(&index.uid)
            .with_current(json!({
                "dictionary_size": settings.dictionary.len(),
                "separator_tokens": separators,
                "non_separator_tokens_count": settings.non_separator_tokens.len(),
                "issues": issues,
            }))
            .with_reference(format!("{}#dictionary", DOCS_SETTINGS)),
        );
    }
}

/// Name says numeric, or every non-null sampled value is a number.
fn is_likely_numeric(field: &str, index: &IndexSnapshot) -> bool {
    if is_numeric_name(field) {
        return true;
    }
    let values = non_null_values(index, field);
    !values.is_empty() && values.iter().all(|v| v.is_number())
}

fn non_null_values<'a>(index: &'a IndexSnapshot, field: &str) -> Vec<&'a Value> {
    index
        .sample_documents
        .iter()
        .filter_map(|doc| doc.get(field))
        .filter(|v| !v.is_null())
        .collect()
}

fn unique_count(values: &[&Value]) -> usize {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<FxHashSet<_>>()
        .len()
}

fn join(items: &[&String]) -> String {
    items
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
