//! Index snapshot: settings, stats and sampled documents
//!
//! Field names follow the Meilisearch settings API (camelCase) so a
//! collector can pass `GET /indexes/{uid}/settings` through verbatim.
//! Every setting has the engine's own default, so partial settings
//! objects deserialize to what the instance would actually use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A sampled document. Meilisearch documents are always JSON objects.
pub type Document = serde_json::Map<String, Value>;

pub const DEFAULT_RANKING_RULES: [&str; 6] =
    ["words", "typo", "proximity", "attribute", "sort", "exactness"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypoTolerance {
    pub enabled: bool,
    pub min_word_size_for_typos: MinWordSizeForTypos,
    pub disable_on_words: Vec<String>,
    pub disable_on_attributes: Vec<String>,
}

impl Default for TypoTolerance {
    fn default() -> Self {
        Self {
            enabled: true,
            min_word_size_for_typos: MinWordSizeForTypos::default(),
            disable_on_words: Vec::new(),
            disable_on_attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinWordSizeForTypos {
    pub one_typo: u32,
    pub two_typos: u32,
}

impl Default for MinWordSizeForTypos {
    fn default() -> Self {
        Self {
            one_typo: 5,
            two_typos: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Faceting {
    pub max_values_per_facet: u64,
}

impl Default for Faceting {
    fn default() -> Self {
        Self {
            max_values_per_facet: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub max_total_hits: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            max_total_hits: 1000,
        }
    }
}

/// Index settings as reported by the instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub displayed_attributes: Vec<String>,
    pub searchable_attributes: Vec<String>,
    pub filterable_attributes: Vec<String>,
    pub sortable_attributes: Vec<String>,
    pub ranking_rules: Vec<String>,
    pub stop_words: Vec<String>,
    pub synonyms: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_attribute: Option<String>,
    pub typo_tolerance: TypoTolerance,
    pub faceting: Faceting,
    pub pagination: Pagination,
    pub proximity_precision: String,
    pub separator_tokens: Vec<String>,
    pub non_separator_tokens: Vec<String>,
    pub dictionary: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub embedders: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            displayed_attributes: vec!["*".to_string()],
            searchable_attributes: vec!["*".to_string()],
            filterable_attributes: Vec::new(),
            sortable_attributes: Vec::new(),
            ranking_rules: DEFAULT_RANKING_RULES.iter().map(|s| s.to_string()).collect(),
            stop_words: Vec::new(),
            synonyms: BTreeMap::new(),
            distinct_attribute: None,
            typo_tolerance: TypoTolerance::default(),
            faceting: Faceting::default(),
            pagination: Pagination::default(),
            proximity_precision: "byWord".to_string(),
            separator_tokens: Vec::new(),
            non_separator_tokens: Vec::new(),
            dictionary: Vec::new(),
            embedders: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn searchable_is_wildcard(&self) -> bool {
        is_wildcard(&self.searchable_attributes)
    }

    pub fn displayed_is_wildcard(&self) -> bool {
        is_wildcard(&self.displayed_attributes)
    }

    pub fn has_default_ranking_rules(&self) -> bool {
        self.ranking_rules.len() == DEFAULT_RANKING_RULES.len()
            && self
                .ranking_rules
                .iter()
                .zip(DEFAULT_RANKING_RULES.iter())
                .all(|(a, b)| a == b)
    }

    pub fn is_filterable(&self, field: &str) -> bool {
        self.filterable_attributes.iter().any(|f| f == field)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.sortable_attributes.iter().any(|f| f == field)
    }
}

fn is_wildcard(attrs: &[String]) -> bool {
    attrs.len() == 1 && attrs[0] == "*"
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexStats {
    pub number_of_documents: u64,
    pub is_indexing: bool,
    pub field_distribution: BTreeMap<String, u64>,
}

/// Immutable view of one index at collection time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub stats: IndexStats,
    #[serde(default)]
    pub sample_documents: Vec<Document>,
}

impl IndexSnapshot {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn document_count(&self) -> u64 {
        self.stats.number_of_documents
    }

    pub fn field_count(&self) -> usize {
        self.stats.field_distribution.len()
    }

    /// Field names known for this index, from stats or the sample.
    pub fn known_fields(&self) -> Vec<String> {
        if !self.stats.field_distribution.is_empty() {
            return self.stats.field_distribution.keys().cloned().collect();
        }
        let mut fields: Vec<String> = self
            .sample_documents
            .iter()
            .flat_map(|doc| doc.keys().cloned())
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}
