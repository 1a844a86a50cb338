//! Iterative walks over sampled documents
//!
//! Documents come from arbitrary user data, so nothing here recurses:
//! every walk keeps its own stack.
//!
//! ```text
//! {"title": "x", "tags": ["a", "b"], "meta": {"year": 1999}}
//!
//!   Key  "title"      "x"
//!   Key  "tags"       ["a", "b"]
//!   Item "tags"       "a"          array items keep the parent path
//!   Item "tags"       "b"
//!   Key  "meta"       {...}
//!   Key  "meta.year"  1999
//! ```

use crate::snapshot::Document;
use serde::Serialize;
use serde_json::{Map, Value};

use super::patterns::{is_latitude_name, is_longitude_name};

/// How a visited value was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Value of an object key
    Key,
    /// Element of an array
    Item,
}

#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Dotted path from the document root
    pub path: &'a str,
    /// Last object key on the path
    pub key: &'a str,
    pub value: &'a Value,
    pub step: Step,
}

type Frame<'a> = (String, &'a str, &'a Value, Step);

pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Visit every value below the document root in document order.
pub fn walk_document<'a, F>(doc: &'a Document, mut visit: F)
where
    F: FnMut(Visit<'_>),
{
    let mut stack: Vec<Frame<'a>> = Vec::new();
    push_object(&mut stack, "", doc);

    while let Some((path, key, value, step)) = stack.pop() {
        visit(Visit {
            path: &path,
            key,
            value,
            step,
        });
        match value {
            Value::Object(map) => push_object(&mut stack, &path, map),
            Value::Array(items) => {
                for item in items.iter().rev() {
                    stack.push((path.clone(), key, item, Step::Item));
                }
            }
            _ => {}
        }
    }
}

fn push_object<'a>(stack: &mut Vec<Frame<'a>>, prefix: &str, map: &'a Map<String, Value>) {
    for (key, value) in map.iter().rev() {
        stack.push((join_path(prefix, key), key.as_str(), value, Step::Key));
    }
}

/// Deepest object nesting in a document.
///
/// Entering a non-empty object's values adds one level; array elements
/// stay at the array's level; empty containers end at the current level.
pub fn document_depth(doc: &Document) -> usize {
    if doc.is_empty() {
        return 0;
    }
    let mut deepest = 0;
    let mut stack: Vec<(&Value, usize)> = doc.values().map(|v| (v, 1)).collect();
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Object(map) if !map.is_empty() => {
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            Value::Array(items) if !items.is_empty() => {
                stack.extend(items.iter().map(|v| (v, depth)));
            }
            _ => deepest = deepest.max(depth),
        }
    }
    deepest
}

/// True if `path` or one of its dotted ancestors is in `attributes`.
pub fn path_covered_by(path: &str, attributes: &[String]) -> bool {
    attributes.iter().any(|attr| {
        path == attr
            || path
                .strip_prefix(attr.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// JSON-like value that is null, an empty string, or an empty container
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoShape {
    NestedObject,
    SeparateFields,
}

/// Coordinates stored outside `_geo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCandidate {
    pub pattern: String,
    #[serde(rename = "type")]
    pub shape: GeoShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng_field: Option<String>,
}

fn in_range(value: &Value, bound: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (-bound..=bound).contains(&v))
}

fn is_coordinate_object(map: &Map<String, Value>) -> bool {
    (map.contains_key("lat") && map.contains_key("lng"))
        || (map.contains_key("latitude") && map.contains_key("longitude"))
}

/// Latitude/longitude pairs found in one document.
///
/// Objects with `lat`/`lng` (or `latitude`/`longitude`) keys are reported
/// whole; other objects are searched further. Arrays are not entered.
pub fn geo_candidates(doc: &Document) -> Vec<GeoCandidate> {
    let mut found = Vec::new();
    let mut stack: Vec<(String, &Map<String, Value>)> = vec![(String::new(), doc)];

    while let Some((prefix, map)) = stack.pop() {
        let mut lat_field = None;
        let mut lng_field = None;

        for (key, value) in map {
            let path = join_path(&prefix, key);
            if lat_field.is_none() && is_latitude_name(key) && in_range(value, 90.0) {
                lat_field = Some(path.clone());
            }
            if lng_field.is_none() && is_longitude_name(key) && in_range(value, 180.0) {
                lng_field = Some(path.clone());
            }
            if let Value::Object(inner) = value {
                if is_coordinate_object(inner) {
                    found.push(GeoCandidate {
                        pattern: path,
                        shape: GeoShape::NestedObject,
                        sample: Some(value.clone()),
                        lat_field: None,
                        lng_field: None,
                    });
                } else {
                    stack.push((path, inner));
                }
            }
        }

        if let (Some(lat), Some(lng)) = (lat_field, lng_field) {
            found.push(GeoCandidate {
                pattern: format!("{}/{}", lat, lng),
                shape: GeoShape::SeparateFields,
                sample: None,
                lat_field: Some(lat),
                lng_field: Some(lng),
            });
        }
    }
    found
}
