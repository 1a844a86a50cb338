//! Analysis policy: every rule threshold in one place
//!
//! Loaded from `meiliscan.toml` in the working directory, or a file passed
//! with `--config`. Any omitted key keeps its default.
//!
//! # Configuration Format
//!
//! ```toml
//! # meiliscan.toml
//! current_stable_version = "1.12.0"
//! detect_sensitive = false
//!
//! [schema]
//! stop_words_min_documents = 100
//! distinct_min_documents = 1000
//!
//! [documents]
//! max_depth = 3
//! empty_ratio = 0.3
//!
//! [performance]
//! failure_rate = 0.1
//! max_indexes = 20
//!
//! [scoring]
//! critical = 15
//! warning = 8
//! ```

use crate::scoring::SeverityWeights;
use serde::Deserialize;

fn default_stable_version() -> String {
    "1.12.0".to_string()
}

/// Top-level policy handed to the engine
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisPolicy {
    /// Baseline the version check compares against
    #[serde(default = "default_stable_version")]
    pub current_stable_version: String,

    /// Enable sensitive field name and PII content scanning
    #[serde(default)]
    pub detect_sensitive: bool,

    #[serde(default)]
    pub schema: SchemaThresholds,

    #[serde(default)]
    pub documents: DocumentThresholds,

    #[serde(default)]
    pub performance: PerformanceThresholds,

    #[serde(default)]
    pub best_practices: BestPracticeThresholds,

    #[serde(default)]
    pub instance_config: InstanceThresholds,

    #[serde(default)]
    pub search_probe: ProbeThresholds,

    #[serde(default)]
    pub scoring: SeverityWeights,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            current_stable_version: default_stable_version(),
            detect_sensitive: false,
            schema: SchemaThresholds::default(),
            documents: DocumentThresholds::default(),
            performance: PerformanceThresholds::default(),
            best_practices: BestPracticeThresholds::default(),
            instance_config: InstanceThresholds::default(),
            search_probe: ProbeThresholds::default(),
            scoring: SeverityWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaThresholds {
    /// Documents required before a missing filterable list is reported
    pub no_filterable_min_documents: u64,
    pub stop_words_min_documents: u64,
    pub distinct_min_documents: u64,
    pub min_max_total_hits: u64,
    pub recommended_max_total_hits: u64,
    pub max_max_total_hits: u64,
    /// Field count above which wildcard displayedAttributes is reported
    pub displayed_wildcard_max_fields: usize,
    pub max_suggested_fields: usize,
    pub high_cardinality_unique_ratio: f64,
    pub high_cardinality_min_values: usize,
    pub facet_saturation_ratio: f64,
    pub facet_min_unique_values: usize,
    pub max_values_per_facet_ceiling: u64,
    /// Upper bound for the raised maxValuesPerFacet a fix proposes
    pub facet_values_fix_cap: u64,
    pub min_one_typo: u32,
    pub min_two_typos: u32,
    pub synonyms_max_terms: usize,
    pub synonyms_max_mappings: usize,
    pub synonym_chain_max: usize,
    pub dictionary_max_entries: usize,
    pub separator_token_max_len: usize,
    pub non_separator_max_tokens: usize,
}

impl Default for SchemaThresholds {
    fn default() -> Self {
        Self {
            no_filterable_min_documents: 0,
            stop_words_min_documents: 100,
            distinct_min_documents: 1000,
            min_max_total_hits: 100,
            recommended_max_total_hits: 1000,
            max_max_total_hits: 10_000,
            displayed_wildcard_max_fields: 20,
            max_suggested_fields: 10,
            high_cardinality_unique_ratio: 0.9,
            high_cardinality_min_values: 5,
            facet_saturation_ratio: 0.8,
            facet_min_unique_values: 10,
            max_values_per_facet_ceiling: 500,
            facet_values_fix_cap: 1000,
            min_one_typo: 3,
            min_two_typos: 5,
            synonyms_max_terms: 1000,
            synonyms_max_mappings: 5000,
            synonym_chain_max: 20,
            dictionary_max_entries: 500,
            separator_token_max_len: 5,
            non_separator_max_tokens: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentThresholds {
    /// Sampled documents required before any document rule runs
    pub min_sample_size: usize,
    pub avg_size_bytes: u64,
    pub max_size_bytes: u64,
    pub consistency_min_documents: usize,
    pub consistency_lower: f64,
    pub consistency_upper: f64,
    pub max_depth: usize,
    pub array_mean_length: f64,
    pub markup_min_length: usize,
    pub empty_ratio: f64,
    pub empty_min_occurrences: usize,
    pub long_text_chars: usize,
    pub pii_min_length: usize,
    pub date_min_length: usize,
    pub date_max_length: usize,
    pub date_unsorted_min_fields: usize,
}

impl Default for DocumentThresholds {
    fn default() -> Self {
        Self {
            min_sample_size: 1,
            avg_size_bytes: 10 * 1024,
            max_size_bytes: 100 * 1024,
            consistency_min_documents: 10,
            consistency_lower: 0.2,
            consistency_upper: 0.8,
            max_depth: 3,
            array_mean_length: 50.0,
            markup_min_length: 10,
            empty_ratio: 0.3,
            empty_min_occurrences: 3,
            long_text_chars: 65_535,
            pii_min_length: 5,
            date_min_length: 8,
            date_max_length: 30,
            date_unsorted_min_fields: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub max_fields: usize,
    pub failure_min_tasks: usize,
    pub failure_rate: f64,
    pub slow_indexing_secs: f64,
    pub storage_utilization: f64,
    pub max_indexes: usize,
    pub dominant_index_ratio: f64,
    pub backlog_min_tasks: usize,
    pub backlog_min_timed: usize,
    pub backlog_queue_secs: f64,
    pub backlog_delay_secs: f64,
    pub tiny_task_documents: u64,
    pub tiny_min_document_tasks: usize,
    pub tiny_ratio: f64,
    pub tiny_min_count: usize,
    pub oversized_task_secs: f64,
    pub recurring_error_min: usize,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            max_fields: 100,
            failure_min_tasks: 10,
            failure_rate: 0.1,
            slow_indexing_secs: 300.0,
            storage_utilization: 0.6,
            max_indexes: 20,
            dominant_index_ratio: 0.8,
            backlog_min_tasks: 10,
            backlog_min_timed: 5,
            backlog_queue_secs: 60.0,
            backlog_delay_secs: 30.0,
            tiny_task_documents: 10,
            tiny_min_document_tasks: 20,
            tiny_ratio: 0.5,
            tiny_min_count: 10,
            oversized_task_secs: 600.0,
            recurring_error_min: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BestPracticeThresholds {
    pub text_heavy_min_documents: u64,
}

impl Default for BestPracticeThresholds {
    fn default() -> Self {
        Self {
            text_heavy_min_documents: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstanceThresholds {
    pub min_master_key_len: usize,
    pub min_payload_bytes: u64,
    pub max_payload_bytes: u64,
    pub max_indexing_memory_bytes: u64,
    pub min_indexing_memory_bytes: u64,
    pub max_indexing_threads: u32,
}

impl Default for InstanceThresholds {
    fn default() -> Self {
        Self {
            min_master_key_len: 16,
            min_payload_bytes: 1024 * 1024,
            max_payload_bytes: 500 * 1024 * 1024,
            max_indexing_memory_bytes: 64 * 1024 * 1024 * 1024,
            min_indexing_memory_bytes: 256 * 1024 * 1024,
            max_indexing_threads: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeThresholds {
    pub max_response_bytes: u64,
}

impl Default for ProbeThresholds {
    fn default() -> Self {
        Self {
            max_response_bytes: 100 * 1024,
        }
    }
}
