use super::comparison::{
    ChangeType, ComparisonReport, ComparisonSummary, FindingChange, IndexChange, MetricChange,
    SettingDelta, TrendDirection, COMPARISON_VERSION,
};
use crate::models::{Finding, Severity};
use crate::report::{IndexAnalysis, Report};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Compare an older report against a newer one.
///
/// Pure: the same two reports always produce the same comparison, apart
/// from `generated_at`.
pub fn compare(old: &Report, new: &Report) -> ComparisonReport {
    let old_uids: BTreeSet<&str> = old.indexes.keys().map(String::as_str).collect();
    let new_uids: BTreeSet<&str> = new.indexes.keys().map(String::as_str).collect();

    let indexes_added: Vec<String> =
        new_uids.difference(&old_uids).map(|u| u.to_string()).collect();
    let indexes_removed: Vec<String> =
        old_uids.difference(&new_uids).map(|u| u.to_string()).collect();

    let (o, n) = (&old.summary, &new.summary);
    let health_score = MetricChange::between("health_score", o.health_score, n.health_score);
    let total_documents = MetricChange::between(
        "total_documents",
        o.total_documents as f64,
        n.total_documents as f64,
    );
    let total_indexes =
        MetricChange::between("total_indexes", o.total_indexes as f64, n.total_indexes as f64);
    let total_findings = MetricChange::between(
        "total_findings",
        old.all_findings().count() as f64,
        new.all_findings().count() as f64,
    );
    let critical_issues = MetricChange::between(
        "critical_issues",
        o.critical_issues as f64,
        n.critical_issues as f64,
    );
    let warnings = MetricChange::between("warnings", o.warnings as f64, n.warnings as f64);
    let suggestions =
        MetricChange::between("suggestions", o.suggestions as f64, n.suggestions as f64);

    let mut index_changes = BTreeMap::new();
    let mut indexes_changed = Vec::new();
    for uid in old_uids.intersection(&new_uids) {
        let change = compare_index(uid, &old.indexes[*uid], &new.indexes[*uid]);
        if change.change_type != ChangeType::Unchanged {
            indexes_changed.push(uid.to_string());
        }
        index_changes.insert(uid.to_string(), change);
    }
    for uid in &indexes_added {
        index_changes.insert(uid.clone(), added_index(uid, &new.indexes[uid]));
    }
    for uid in &indexes_removed {
        index_changes.insert(uid.clone(), removed_index(uid, &old.indexes[uid]));
    }

    let finding_changes = compare_findings(old, new);
    let overall_trend = overall_trend(&health_score, &critical_issues);
    let (improvement_areas, degradation_areas) =
        trend_areas(&health_score, &critical_issues, &warnings, &total_documents);
    let recommendations = recommendations(&finding_changes, &index_changes, overall_trend);

    debug!(
        "Compared reports: {} added, {} removed, {} changed indexes, {} finding changes",
        indexes_added.len(),
        indexes_removed.len(),
        indexes_changed.len(),
        finding_changes.len()
    );

    ComparisonReport {
        version: COMPARISON_VERSION.to_string(),
        generated_at: Utc::now(),
        old_source: old.source.clone(),
        new_source: new.source.clone(),
        summary: ComparisonSummary {
            old_report_date: old.generated_at,
            new_report_date: new.generated_at,
            time_between: format_time_between(old.generated_at, new.generated_at),
            indexes_added,
            indexes_removed,
            indexes_changed,
            health_score,
            total_documents,
            total_indexes,
            total_findings,
            critical_issues,
            warnings,
            suggestions,
            overall_trend,
            improvement_areas,
            degradation_areas,
        },
        index_changes,
        finding_changes,
        recommendations,
    }
}

/// Coarsest non-zero unit between two instants.
///
/// The order of the arguments does not matter.
pub fn format_time_between(old: DateTime<Utc>, new: DateTime<Utc>) -> String {
    let diff = (new - old).abs();
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };
    if diff.num_days() > 0 {
        plural(diff.num_days(), "day")
    } else if diff.num_hours() > 0 {
        plural(diff.num_hours(), "hour")
    } else if diff.num_minutes() > 0 {
        plural(diff.num_minutes(), "minute")
    } else {
        "less than a minute".to_string()
    }
}

fn compare_index(uid: &str, old: &IndexAnalysis, new: &IndexAnalysis) -> IndexChange {
    let old_ids: FxHashSet<&str> = old.findings.iter().map(|f| f.id.as_str()).collect();
    let new_ids: FxHashSet<&str> = new.findings.iter().map(|f| f.id.as_str()).collect();

    let new_findings: Vec<Finding> = new
        .findings
        .iter()
        .filter(|f| !old_ids.contains(f.id.as_str()))
        .cloned()
        .collect();
    let resolved_findings: Vec<Finding> = old
        .findings
        .iter()
        .filter(|f| !new_ids.contains(f.id.as_str()))
        .cloned()
        .collect();

    let settings_diff = diff_settings(&old.settings.current, &new.settings.current);
    let settings_changed = !settings_diff.is_empty();

    // Equal new/resolved counts stay unchanged even when settings moved.
    let change_type = if new_findings.len() > resolved_findings.len() {
        ChangeType::Degraded
    } else if resolved_findings.len() > new_findings.len() {
        ChangeType::Improved
    } else {
        ChangeType::Unchanged
    };

    IndexChange {
        uid: uid.to_string(),
        change_type,
        document_count: Some(MetricChange::between(
            "document_count",
            old.metadata.document_count as f64,
            new.metadata.document_count as f64,
        )),
        field_count: Some(MetricChange::between(
            "field_count",
            old.statistics.field_count as f64,
            new.statistics.field_count as f64,
        )),
        finding_count: Some(MetricChange::between(
            "finding_count",
            old.findings.len() as f64,
            new.findings.len() as f64,
        )),
        new_findings,
        resolved_findings,
        settings_changed,
        settings_diff,
    }
}

fn added_index(uid: &str, new: &IndexAnalysis) -> IndexChange {
    IndexChange {
        uid: uid.to_string(),
        change_type: ChangeType::Added,
        document_count: Some(MetricChange::calculate(
            "document_count",
            None,
            Some(new.metadata.document_count as f64),
        )),
        field_count: None,
        finding_count: Some(MetricChange::calculate(
            "finding_count",
            None,
            Some(new.findings.len() as f64),
        )),
        new_findings: new.findings.clone(),
        resolved_findings: Vec::new(),
        settings_changed: false,
        settings_diff: BTreeMap::new(),
    }
}

fn removed_index(uid: &str, old: &IndexAnalysis) -> IndexChange {
    IndexChange {
        uid: uid.to_string(),
        change_type: ChangeType::Removed,
        document_count: Some(MetricChange::calculate(
            "document_count",
            Some(old.metadata.document_count as f64),
            None,
        )),
        field_count: None,
        finding_count: Some(MetricChange::calculate(
            "finding_count",
            Some(old.findings.len() as f64),
            None,
        )),
        new_findings: Vec::new(),
        resolved_findings: old.findings.clone(),
        settings_changed: false,
        settings_diff: BTreeMap::new(),
    }
}

/// Key-by-key diff; a key missing on one side compares as null.
fn diff_settings(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
) -> BTreeMap<String, SettingDelta> {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let before = old.get(key).cloned().unwrap_or(Value::Null);
            let after = new.get(key).cloned().unwrap_or(Value::Null);
            (before != after).then(|| {
                (
                    key.clone(),
                    SettingDelta {
                        old: before,
                        new: after,
                    },
                )
            })
        })
        .collect()
}

/// Added and removed findings across the whole report, matched on
/// `(id, index_uid)`. Removed findings come first.
fn compare_findings(old: &Report, new: &Report) -> Vec<FindingChange> {
    let old_by_identity = first_by_identity(old);
    let new_by_identity = first_by_identity(new);

    let removed = old_by_identity
        .iter()
        .filter(|(key, _)| !new_by_identity.contains_key(*key))
        .map(|(_, f)| FindingChange {
            finding: (*f).clone(),
            change_type: ChangeType::Removed,
            previous_severity: None,
        });
    let added = new_by_identity
        .iter()
        .filter(|(key, _)| !old_by_identity.contains_key(*key))
        .map(|(_, f)| FindingChange {
            finding: (*f).clone(),
            change_type: ChangeType::Added,
            previous_severity: None,
        });
    removed.chain(added).collect()
}

fn first_by_identity(report: &Report) -> BTreeMap<(&str, Option<&str>), &Finding> {
    let mut map = BTreeMap::new();
    for finding in report.all_findings() {
        map.entry(finding.identity()).or_insert(finding);
    }
    map
}

/// Health trend first; when health is flat, fewer criticals counts as up.
fn overall_trend(health_score: &MetricChange, critical_issues: &MetricChange) -> TrendDirection {
    match health_score.trend {
        TrendDirection::Stable => critical_issues.trend.inverted(),
        trend => trend,
    }
}

fn trend_areas(
    health_score: &MetricChange,
    critical_issues: &MetricChange,
    warnings: &MetricChange,
    total_documents: &MetricChange,
) -> (Vec<String>, Vec<String>) {
    let mut improvements = Vec::new();
    let mut degradations = Vec::new();

    match (health_score.trend, health_score.change_percent) {
        (TrendDirection::Up, Some(pct)) => {
            improvements.push(format!("Health score improved by {:.1}%", pct))
        }
        (TrendDirection::Up, None) => improvements.push("Health score improved".to_string()),
        (TrendDirection::Down, Some(pct)) => {
            degradations.push(format!("Health score decreased by {:.1}%", pct.abs()))
        }
        (TrendDirection::Down, None) => degradations.push("Health score decreased".to_string()),
        (TrendDirection::Stable, _) => {}
    }

    let criticals = critical_issues.change.abs() as u64;
    match critical_issues.trend {
        TrendDirection::Down => {
            improvements.push(format!("Resolved {} critical issue(s)", criticals))
        }
        TrendDirection::Up => {
            degradations.push(format!("Added {} new critical issue(s)", criticals))
        }
        TrendDirection::Stable => {}
    }

    let warns = warnings.change.abs() as u64;
    match warnings.trend {
        TrendDirection::Down => improvements.push(format!("Resolved {} warning(s)", warns)),
        TrendDirection::Up => degradations.push(format!("Added {} new warning(s)", warns)),
        TrendDirection::Stable => {}
    }

    if let Some(pct) = total_documents.change_percent.filter(|p| *p > 10.0) {
        improvements.push(format!("Document count grew by {:.1}%", pct));
    }

    (improvements, degradations)
}

fn recommendations(
    finding_changes: &[FindingChange],
    index_changes: &BTreeMap<String, IndexChange>,
    overall_trend: TrendDirection,
) -> Vec<String> {
    let mut out = Vec::new();

    let new_critical = finding_changes
        .iter()
        .filter(|c| {
            c.change_type == ChangeType::Added && c.finding.severity == Severity::Critical
        })
        .count();
    if new_critical > 0 {
        out.push(format!(
            "Address {} new critical issue(s) as soon as possible",
            new_critical
        ));
    }

    let degraded: Vec<&str> = index_changes
        .iter()
        .filter(|(_, c)| c.change_type == ChangeType::Degraded)
        .map(|(uid, _)| uid.as_str())
        .collect();
    if !degraded.is_empty() {
        out.push(format!("Review degraded indexes: {}", degraded.join(", ")));
    }

    for (uid, change) in index_changes {
        if change.change_type != ChangeType::Added {
            continue;
        }
        let critical = change.critical_new_findings();
        if critical > 0 {
            out.push(format!(
                "New index '{}' has {} critical issue(s) - configure settings before adding more documents",
                uid, critical
            ));
        }
    }

    if out.is_empty() {
        match overall_trend {
            TrendDirection::Up => out.push(
                "Good progress! Continue monitoring and addressing remaining suggestions"
                    .to_string(),
            ),
            TrendDirection::Down => out.push(
                "Configuration health has degraded - prioritize fixing critical issues"
                    .to_string(),
            ),
            TrendDirection::Stable => {}
        }
    }
    out
}
