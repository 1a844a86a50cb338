//! End-to-end engine tests
//!
//! Runs the full analyzer set over realistic snapshot bundles and checks
//! that findings land where they belong and that the summary, score and
//! action plan agree with the findings.

use meiliscan::analyzers::AnalysisEngine;
use meiliscan::config::AnalysisPolicy;
use meiliscan::models::Severity;
use meiliscan::report::Report;
use meiliscan::scoring::HealthScorer;
use meiliscan::snapshot::AnalysisInput;
use serde_json::json;

fn bundle() -> AnalysisInput {
    let raw = json!({
        "source": { "type": "instance", "url": "http://localhost:7700" },
        "instance": {
            "version": "1.10.0",
            "databaseSize": 10_000_000u64,
            "usedDatabaseSize": 9_000_000u64,
            "launchConfig": { "env": "production", "http_addr": "127.0.0.1:7700" },
            "tasks": [
                {
                    "uid": 1, "indexUid": "products", "status": "succeeded",
                    "type": "documentAdditionOrUpdate",
                    "enqueuedAt": "2024-01-01T10:00:00Z",
                    "details": { "receivedDocuments": 500, "indexedDocuments": 500 }
                },
                {
                    "uid": 2, "indexUid": "products", "status": "succeeded",
                    "type": "settingsUpdate",
                    "enqueuedAt": "2024-01-01T11:00:00Z",
                    "details": { "filterableAttributes": ["brand"] }
                }
            ]
        },
        "indexes": [
            {
                "uid": "movies",
                "primaryKey": "id",
                "stats": {
                    "numberOfDocuments": 1200,
                    "fieldDistribution": { "id": 1200, "title": 1200, "overview": 1100 }
                },
                "sampleDocuments": [
                    { "id": 1, "title": "Heat", "overview": "A heist", "meta": { "a": { "b": { "c": 1 } } } }
                ]
            },
            {
                "uid": "products",
                "primaryKey": "sku",
                "settings": {
                    "searchableAttributes": ["name", "brand"],
                    "filterableAttributes": ["brand", "price"],
                    "sortableAttributes": ["price"],
                    "stopWords": ["the", "a"]
                },
                "stats": {
                    "numberOfDocuments": 500,
                    "fieldDistribution": { "sku": 500, "name": 500, "brand": 500, "price": 500 }
                },
                "sampleDocuments": [
                    { "sku": "A1", "name": "Kettle", "brand": "Acme", "price": 20 },
                    { "sku": "A2", "name": "Toaster", "brand": "Acme", "price": 35 }
                ]
            }
        ],
        "probeResults": [
            {
                "index_uid": "products", "probe_type": "sort", "success": false,
                "field": "price", "error_message": "invalid sort"
            }
        ]
    });
    serde_json::from_value(raw).expect("valid bundle")
}

fn run(input: &AnalysisInput) -> Report {
    AnalysisEngine::from_policy(&AnalysisPolicy::default(), 2)
        .run(input)
        .expect("engine run")
}

fn ids(findings: &[meiliscan::models::Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn test_findings_are_filed_by_index() {
    let report = run(&bundle());

    let movies = ids(&report.indexes["movies"].findings);
    assert!(movies.contains(&"MEILI-S001"), "wildcard searchable: {:?}", movies);

    let products = ids(&report.indexes["products"].findings);
    assert!(products.contains(&"MEILI-B002"), "searchable/filterable overlap");
    assert!(products.contains(&"MEILI-B001"), "settings after documents");
    assert!(products.contains(&"MEILI-Q001"), "failed sort probe");
    assert!(!products.contains(&"MEILI-S001"));

    let global = ids(&report.global_findings);
    assert!(global.contains(&"MEILI-I001"), "production without master key");
    assert!(global.contains(&"MEILI-B004"), "version behind");

    for finding in &report.global_findings {
        if let Some(uid) = finding.index_uid.as_deref() {
            assert!(!report.indexes.contains_key(uid), "{} misfiled", finding.id);
        }
    }
}

#[test]
fn test_version_behind_is_suggestion() {
    let report = run(&bundle());
    let b004 = report
        .global_findings
        .iter()
        .find(|f| f.id == "MEILI-B004")
        .expect("B004");
    assert_eq!(b004.severity, Severity::Suggestion);
}

#[test]
fn test_summary_matches_findings() {
    let report = run(&bundle());
    let counts = report.findings_summary();
    assert_eq!(report.summary.total_findings, counts.total);
    assert_eq!(report.summary.critical_issues, counts.critical);
    assert_eq!(report.summary.warnings, counts.warning);
    assert_eq!(report.summary.suggestions, counts.suggestion);
    assert_eq!(report.summary.info_count, counts.info);
    assert_eq!(report.summary.total_indexes, 2);
    assert_eq!(report.summary.total_documents, 1700);
    assert_eq!(report.summary.database_size_bytes, Some(10_000_000));

    let expected = HealthScorer::default().score(report.all_findings());
    assert_eq!(report.summary.health_score, expected);
}

#[test]
fn test_action_plan_is_prioritized() {
    let report = run(&bundle());
    let plan = &report.action_plan;
    let non_info = report
        .all_findings()
        .filter(|f| f.severity != Severity::Info)
        .count();
    assert_eq!(plan.priority_order.len(), non_info);

    let severity_of = |id: &str| {
        report
            .all_findings()
            .filter(|f| f.id == id)
            .map(|f| f.severity)
            .max()
            .expect("finding for planned id")
    };
    assert_eq!(severity_of(&plan.priority_order[0]), Severity::Critical);
    assert!(plan.estimated_impact.contains_key("index_size_reduction"));
}

#[test]
fn test_sensitive_checks_are_opt_in() {
    let mut input = bundle();
    input.indexes[1].sample_documents[0].insert("contact".into(), json!("jane@example.com"));
    input.indexes[1].sample_documents[1].insert("contact".into(), json!("bob@example.org"));

    let report = run(&input);
    assert!(!ids(&report.indexes["products"].findings).contains(&"MEILI-D010"));

    let policy = AnalysisPolicy {
        detect_sensitive: true,
        ..Default::default()
    };
    let report = AnalysisEngine::from_policy(&policy, 1).run(&input).unwrap();
    assert!(ids(&report.indexes["products"].findings).contains(&"MEILI-D010"));
}

#[test]
fn test_empty_bundle() {
    let input = AnalysisInput::from_json(r#"{"source": {"type": "dump"}}"#).unwrap();
    let report = run(&input);
    assert_eq!(report.summary.total_indexes, 0);
    assert_eq!(report.summary.health_score, 100);
    assert!(report.action_plan.priority_order.is_empty());
}

#[test]
fn test_analysis_is_deterministic() {
    let input = bundle();
    let strip = |report: &Report| {
        let mut findings: Vec<_> = report
            .all_findings()
            .cloned()
            .map(|mut f| {
                f.detected_at = Default::default();
                f
            })
            .collect();
        findings.sort_by(|a, b| {
            (a.id.as_str(), a.index_uid.as_deref(), a.title.as_str()).cmp(&(
                b.id.as_str(),
                b.index_uid.as_deref(),
                b.title.as_str(),
            ))
        });
        findings
    };
    let first = run(&input);
    let second = AnalysisEngine::from_policy(&AnalysisPolicy::default(), 1)
        .run(&input)
        .unwrap();
    assert_eq!(strip(&first), strip(&second));
    assert_eq!(first.action_plan, second.action_plan);
}
