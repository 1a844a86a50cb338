//! Historical comparison scenarios over finalized reports

use chrono::{Duration, TimeZone, Utc};
use meiliscan::history::{compare, ChangeType, TrendDirection};
use meiliscan::models::{Category, Finding, Severity};
use meiliscan::report::{Report, ReportBuilder};
use meiliscan::scoring::HealthScorer;
use meiliscan::snapshot::{IndexSnapshot, SourceInfo};

fn index(uid: &str, documents: u64) -> IndexSnapshot {
    let mut index = IndexSnapshot::new(uid);
    index.stats.number_of_documents = documents;
    index
}

fn finding(id: &'static str, severity: Severity, index_uid: Option<&str>) -> Finding {
    let f = Finding::new(id, Category::Schema, severity, id);
    match index_uid {
        Some(uid) => f.for_index(uid),
        None => f,
    }
}

fn report(indexes: &[IndexSnapshot], findings: Vec<Finding>) -> Report {
    let mut builder = ReportBuilder::new(SourceInfo::instance("http://localhost:7700"));
    for index in indexes {
        builder.add_index(index);
    }
    builder.add_findings(findings);
    builder.finalize(&HealthScorer::default())
}

#[test]
fn test_compare_identical_reports() {
    let r = report(
        &[index("movies", 100), index("books", 50)],
        vec![
            finding("MEILI-S001", Severity::Critical, Some("movies")),
            finding("MEILI-S005", Severity::Suggestion, Some("books")),
            finding("MEILI-I004", Severity::Suggestion, None),
        ],
    );
    let c = compare(&r, &r);

    assert!(c.summary.indexes_added.is_empty());
    assert!(c.summary.indexes_removed.is_empty());
    assert!(c.summary.indexes_changed.is_empty());
    assert!(c.finding_changes.is_empty());
    assert_eq!(c.summary.overall_trend, TrendDirection::Stable);
    assert_eq!(c.summary.health_score.change, 0.0);
    assert!(c.recommendations.is_empty());
    for change in c.index_changes.values() {
        assert_eq!(change.change_type, ChangeType::Unchanged);
        assert!(change.new_findings.is_empty());
        assert!(change.resolved_findings.is_empty());
        assert!(!change.settings_changed);
    }
}

#[test]
fn test_health_trend_up() {
    // 70 = two criticals; 85 = one critical
    let old = report(
        &[index("movies", 100)],
        vec![
            finding("MEILI-S001", Severity::Critical, Some("movies")),
            finding("MEILI-S011", Severity::Critical, Some("movies")),
        ],
    );
    let new = report(
        &[index("movies", 100)],
        vec![finding("MEILI-S001", Severity::Critical, Some("movies"))],
    );
    assert_eq!(old.summary.health_score, 70);
    assert_eq!(new.summary.health_score, 85);

    let c = compare(&old, &new);
    let health = &c.summary.health_score;
    assert_eq!(health.old_value, Some(70.0));
    assert_eq!(health.new_value, Some(85.0));
    assert_eq!(health.change, 15.0);
    assert!((health.change_percent.unwrap() - 21.43).abs() < 0.01);
    assert_eq!(health.trend, TrendDirection::Up);
    assert_eq!(c.summary.overall_trend, TrendDirection::Up);

    let movies = &c.index_changes["movies"];
    assert_eq!(movies.change_type, ChangeType::Improved);
    assert_eq!(movies.resolved_findings.len(), 1);
    assert_eq!(c.summary.indexes_changed, vec!["movies"]);
    assert!(c
        .summary
        .improvement_areas
        .contains(&"Health score improved by 21.4%".to_string()));
    assert_eq!(
        c.recommendations,
        vec!["Good progress! Continue monitoring and addressing remaining suggestions"]
    );
}

#[test]
fn test_degraded_index_and_new_criticals() {
    let old = report(&[index("movies", 100)], vec![]);
    let new = report(
        &[index("movies", 100)],
        vec![finding("MEILI-S001", Severity::Critical, Some("movies"))],
    );
    let c = compare(&old, &new);

    assert_eq!(c.index_changes["movies"].change_type, ChangeType::Degraded);
    assert_eq!(c.summary.overall_trend, TrendDirection::Down);
    assert_eq!(
        c.recommendations,
        vec![
            "Address 1 new critical issue(s) as soon as possible",
            "Review degraded indexes: movies",
        ]
    );
    assert_eq!(c.changes_of(ChangeType::Added).count(), 1);
    assert_eq!(c.changes_of(ChangeType::Removed).count(), 0);
}

#[test]
fn test_added_and_removed_indexes() {
    let old = report(
        &[index("movies", 100), index("legacy", 10)],
        vec![finding("MEILI-S004", Severity::Info, Some("legacy"))],
    );
    let new = report(
        &[index("movies", 100), index("products", 20)],
        vec![finding("MEILI-S001", Severity::Critical, Some("products"))],
    );
    let c = compare(&old, &new);

    assert_eq!(c.summary.indexes_added, vec!["products"]);
    assert_eq!(c.summary.indexes_removed, vec!["legacy"]);

    let added = &c.index_changes["products"];
    assert_eq!(added.change_type, ChangeType::Added);
    assert_eq!(added.new_findings.len(), 1);
    assert_eq!(added.document_count.as_ref().unwrap().old_value, None);

    let removed = &c.index_changes["legacy"];
    assert_eq!(removed.change_type, ChangeType::Removed);
    assert_eq!(removed.resolved_findings.len(), 1);
    assert_eq!(removed.document_count.as_ref().unwrap().new_value, None);

    assert!(c.recommendations.contains(
        &"New index 'products' has 1 critical issue(s) - configure settings before adding more documents"
            .to_string()
    ));
}

#[test]
fn test_same_id_on_different_indexes_is_distinct() {
    let old = report(
        &[index("movies", 1), index("books", 1)],
        vec![finding("MEILI-S001", Severity::Critical, Some("movies"))],
    );
    let new = report(
        &[index("movies", 1), index("books", 1)],
        vec![finding("MEILI-S001", Severity::Critical, Some("books"))],
    );
    let c = compare(&old, &new);
    assert_eq!(c.changes_of(ChangeType::Added).count(), 1);
    assert_eq!(c.changes_of(ChangeType::Removed).count(), 1);
    let added = c.changes_of(ChangeType::Added).next().unwrap();
    assert_eq!(added.finding.index_uid.as_deref(), Some("books"));
}

#[test]
fn test_settings_change_with_equal_counts_is_unchanged() {
    let mut tuned = index("movies", 100);
    tuned.settings.searchable_attributes = vec!["title".into()];
    let old = report(&[index("movies", 100)], vec![]);
    let new = report(&[tuned], vec![]);

    let c = compare(&old, &new);
    let movies = &c.index_changes["movies"];
    assert!(movies.settings_changed);
    assert!(movies.settings_diff.contains_key("searchableAttributes"));
    assert_eq!(movies.change_type, ChangeType::Unchanged);
    assert!(c.summary.indexes_changed.is_empty());
}

#[test]
fn test_time_between_reports() {
    let mut old = report(&[], vec![]);
    let mut new = old.clone();
    old.generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    new.generated_at = old.generated_at + Duration::days(7) + Duration::hours(3);
    assert_eq!(compare(&old, &new).summary.time_between, "7 days");
}

#[test]
fn test_comparison_survives_persisted_reports() {
    let old = report(
        &[index("movies", 100)],
        vec![finding("MEILI-S001", Severity::Critical, Some("movies"))],
    );
    let new = report(&[index("movies", 250)], vec![]);
    let reparse = |r: &Report| Report::from_json(&serde_json::to_string(r).unwrap()).unwrap();

    let direct = compare(&old, &new);
    let persisted = compare(&reparse(&old), &reparse(&new));
    assert_eq!(direct.summary, persisted.summary);
    assert_eq!(direct.index_changes, persisted.index_changes);
    assert_eq!(direct.recommendations, persisted.recommendations);
    assert!(direct
        .summary
        .improvement_areas
        .contains(&"Document count grew by 150.0%".to_string()));
}
