//! Field-name heuristics shared by the analyzers
//!
//! Names are matched two ways: whole-name regexes for identifier shapes,
//! and word lists over the name split on `_`, `-`, `.` and camelCase humps
//! (`createdAt` -> `["created", "at"]`).

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
static CAMEL_ID_PATTERN: OnceLock<Regex> = OnceLock::new();
static MUTABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn id_pattern() -> &'static Regex {
    ID_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:_?id|uuid|guid|.+_id)$").expect("valid regex")
    })
}

// `userId`, `orderID`; case-sensitive so `paid` and `valid` stay out
fn camel_id_pattern() -> &'static Regex {
    CAMEL_ID_PATTERN.get_or_init(|| Regex::new(r"^.+(?:Id|ID)$").expect("valid regex"))
}

fn mutable_pattern() -> &'static Regex {
    MUTABLE_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:title|name|label|description|content|text|body|status|state|email|url|slug)$",
        )
        .expect("valid regex")
    })
}

const NUMERIC_WORDS: &[&str] = &[
    "price", "amount", "quantity", "count", "total", "score", "rating", "age", "year", "number",
];

pub(crate) const SORT_CANDIDATE_FRAGMENTS: &[&str] = &[
    "created",
    "updated",
    "date",
    "time",
    "price",
    "rating",
    "score",
    "rank",
    "order",
    "priority",
    "popularity",
];

pub(crate) const FILTERABLE_FRAGMENTS: &[&str] = &[
    "category", "type", "status", "brand", "color", "size", "tag", "genre",
];

pub(crate) const HIGH_CARDINALITY_FRAGMENTS: &[&str] =
    &["email", "uuid", "guid", "token", "hash", "url", "path", "slug"];

/// Identifier-shaped field name (`id`, `_id`, `user_id`, `userId`, `uuid`)
pub fn is_id_field(name: &str) -> bool {
    id_pattern().is_match(name) || camel_id_pattern().is_match(name)
}

/// Field names that make poor primary keys because their values change
pub fn is_mutable_field(name: &str) -> bool {
    mutable_pattern().is_match(name)
}

/// Split a field name into lowercase words.
pub fn name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// True if any fragment occurs anywhere in the lowercased name.
pub fn contains_any(name: &str, fragments: &[&str]) -> bool {
    let lower = name.to_lowercase();
    fragments.iter().any(|f| lower.contains(f))
}

pub fn is_numeric_name(name: &str) -> bool {
    name_words(name)
        .iter()
        .any(|w| NUMERIC_WORDS.contains(&w.as_str()))
}

pub fn is_sort_candidate(name: &str) -> bool {
    let lower = name.to_lowercase();
    contains_any(&lower, SORT_CANDIDATE_FRAGMENTS)
        || lower.ends_with("view")
        || lower.ends_with("views")
        || lower.ends_with("count")
}

pub fn is_high_cardinality_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    contains_any(&lower, HIGH_CARDINALITY_FRAGMENTS)
        || lower.ends_with("key")
        || lower.ends_with("_id")
        || lower == "id"
}

/// Runtime category of a JSON value, as reported in findings.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
