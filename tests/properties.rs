//! Property tests: monotonic scoring, analyzer determinism, diff identity

use meiliscan::analyzers::{DocumentAnalyzer, IndexAnalyzer, SchemaAnalyzer};
use meiliscan::history::{compare, TrendDirection};
use meiliscan::models::{Category, Finding, Severity};
use meiliscan::report::ReportBuilder;
use meiliscan::scoring::{HealthScorer, MAX_SCORE};
use meiliscan::snapshot::{IndexSnapshot, SourceInfo};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::Warning),
        Just(Severity::Suggestion),
        Just(Severity::Info),
    ]
}

fn findings(max: usize) -> impl Strategy<Value = Vec<Finding>> {
    prop::collection::vec(severity(), 0..max).prop_map(|severities| {
        severities
            .into_iter()
            .map(|s| Finding::new("MEILI-S001", Category::Schema, s, "generated"))
            .collect()
    })
}

/// Small nested JSON values
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z@.<>/ 0-9]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,10}", json_value(), 1..6)
        .prop_map(|m| m.into_iter().collect())
}

fn strip_timestamps(mut findings: Vec<Finding>) -> Vec<Finding> {
    for f in &mut findings {
        f.detected_at = Default::default();
    }
    findings
}

proptest! {
    #[test]
    fn score_is_monotonic(base in findings(20), extra in findings(20)) {
        let scorer = HealthScorer::default();
        let mut superset = base.clone();
        superset.extend(extra);
        let a = scorer.score(&base);
        let b = scorer.score(&superset);
        prop_assert!(b <= a);
        prop_assert!(a <= MAX_SCORE);
    }

    #[test]
    fn document_analysis_is_deterministic(docs in prop::collection::vec(document(), 0..8)) {
        let mut index = IndexSnapshot::new("generated");
        index.stats.number_of_documents = docs.len() as u64;
        index.sample_documents = docs;

        let analyzer = DocumentAnalyzer::new(Default::default(), true);
        let first = strip_timestamps(analyzer.analyze(&index).unwrap());
        let second = strip_timestamps(analyzer.analyze(&index).unwrap());
        prop_assert_eq!(first, second);

        let schema = SchemaAnalyzer::default();
        let first = strip_timestamps(schema.analyze(&index).unwrap());
        let second = strip_timestamps(schema.analyze(&index).unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn compare_with_self_is_identity(
        per_index in prop::collection::vec(findings(6), 0..4),
        global in findings(4),
    ) {
        let mut builder = ReportBuilder::new(SourceInfo::instance("http://localhost:7700"));
        for (i, fs) in per_index.into_iter().enumerate() {
            let uid = format!("index_{}", i);
            let mut index = IndexSnapshot::new(uid.as_str());
            index.stats.number_of_documents = (i as u64) * 10;
            builder.add_index(&index);
            builder.add_findings(fs.into_iter().map(|f| f.for_index(uid.as_str())));
        }
        builder.add_findings(global);
        let report = builder.finalize(&HealthScorer::default());

        let c = compare(&report, &report);
        prop_assert!(c.finding_changes.is_empty());
        prop_assert!(c.summary.indexes_added.is_empty());
        prop_assert!(c.summary.indexes_removed.is_empty());
        prop_assert!(c.summary.indexes_changed.is_empty());
        prop_assert_eq!(c.summary.overall_trend, TrendDirection::Stable);
        prop_assert!(c.index_changes.values().all(|i| i.new_findings.is_empty()
            && i.resolved_findings.is_empty()
            && !i.settings_changed));
    }
}

#[test]
fn deep_document_does_not_overflow() {
    let mut value = json!(1);
    for _ in 0..1_000 {
        value = json!({ "n": value });
    }
    let mut index = IndexSnapshot::new("deep");
    index.stats.number_of_documents = 1;
    index.sample_documents = vec![value.as_object().cloned().unwrap_or_default()];
    let findings = DocumentAnalyzer::default().analyze(&index).unwrap();
    let depth = findings
        .iter()
        .find(|f| f.id == "MEILI-D003")
        .and_then(|f| f.current_value.clone());
    assert_eq!(depth, Some(json!(1_000)));
}
