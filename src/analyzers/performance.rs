//! Performance analyzer (P001-P010)
//!
//! P006 looks at a single index. Everything else reads the instance-wide
//! task history and storage stats, so it runs once as a global analyzer.
//! Tasks whose timestamps or durations do not parse are left out of the
//! statistics they would feed.

use crate::analyzers::base::{Analyzer, GlobalAnalyzer, GlobalContext, IndexAnalyzer};
use crate::config::PerformanceThresholds;
use crate::models::{Category, Finding, Severity};
use crate::snapshot::{IndexSnapshot, InstanceSnapshot, Task, DOCUMENT_ADDITION, DOCUMENT_DELETION};
use anyhow::Result;
use serde_json::json;
use std::collections::BTreeMap;

const DOCS_INDEXING: &str =
    "https://www.meilisearch.com/docs/learn/indexing/indexing_best_practices";
const DOCS_ASYNC: &str =
    "https://www.meilisearch.com/docs/learn/async/understanding-asynchronous-operations";
const DOCS_ERROR_CODES: &str = "https://www.meilisearch.com/docs/reference/errors/error_codes";

const MAX_EXAMPLES: usize = 3;
const MAX_ERROR_CODES: usize = 5;

pub struct PerformanceAnalyzer {
    thresholds: PerformanceThresholds,
}

impl PerformanceAnalyzer {
    pub fn new(thresholds: PerformanceThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(PerformanceThresholds::default())
    }
}

impl Analyzer for PerformanceAnalyzer {
    fn name(&self) -> &'static str {
        "performance"
    }
}

impl IndexAnalyzer for PerformanceAnalyzer {
    fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
        Ok(self.check_field_count(index).into_iter().collect())
    }
}

impl GlobalAnalyzer for PerformanceAnalyzer {
    fn analyze_global(&self, ctx: &GlobalContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        let tasks = ctx.tasks().unwrap_or_default();

        findings.extend(self.check_task_failures(tasks));
        findings.extend(self.check_slow_indexing(tasks));
        findings.extend(self.check_fragmentation(ctx.instance));
        findings.extend(self.check_index_count(ctx.indexes));
        findings.extend(self.check_index_imbalance(ctx.indexes));
        findings.extend(self.check_task_backlog(tasks));
        findings.extend(self.check_tiny_tasks(tasks));
        findings.extend(self.check_oversized_tasks(tasks));
        findings.extend(self.check_recurring_errors(tasks));

        Ok(findings)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl PerformanceAnalyzer {
    /// P006
    fn check_field_count(&self, index: &IndexSnapshot) -> Option<Finding> {
        let fields = index.field_count();
        if fields <= self.thresholds.max_fields {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P006",
                Category::Performance,
                Severity::Warning,
                "Too many unique fields",
            )
            .with_description(format!(
                "Index has {} unique fields. More than {} fields increases memory use \
                 and slows indexing.",
                fields, self.thresholds.max_fields
            ))
            .with_impact("Increased memory usage, slower indexing")
            .for_index(&index.uid)
            .with_current(json!(fields))
            .with_recommended(json!(format!("< {}", self.thresholds.max_fields)))
            .with_reference(DOCS_INDEXING),
        )
    }

    /// P001
    fn check_task_failures(&self, tasks: &[Task]) -> Option<Finding> {
        if tasks.is_empty() || tasks.len() < self.thresholds.failure_min_tasks {
            return None;
        }
        let failed = tasks.iter().filter(|t| t.is_failed()).count();
        let rate = failed as f64 / tasks.len() as f64;
        if rate <= self.thresholds.failure_rate {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P001",
                Category::Performance,
                Severity::Critical,
                "High task failure rate",
            )
            .with_description(format!(
                "Task failure rate is {:.1}% ({} failed out of {}). Review failed tasks \
                 for recurring issues.",
                rate * 100.0,
                failed,
                tasks.len()
            ))
            .with_impact("Documents may not be indexed correctly")
            .with_current(json!(format!("{:.1}%", rate * 100.0)))
            .with_recommended(json!(format!(
                "< {:.0}%",
                self.thresholds.failure_rate * 100.0
            ))),
        )
    }

    /// P002
    fn check_slow_indexing(&self, tasks: &[Task]) -> Option<Finding> {
        let durations: Vec<f64> = tasks
            .iter()
            .filter(|t| t.kind == DOCUMENT_ADDITION || t.kind == DOCUMENT_DELETION)
            .filter(|t| t.is_succeeded())
            .filter_map(Task::duration_secs)
            .collect();
        if durations.is_empty() {
            return None;
        }
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        if mean <= self.thresholds.slow_indexing_secs {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P002",
                Category::Performance,
                Severity::Warning,
                "Slow indexing operations",
            )
            .with_description(format!(
                "Average indexing task duration is {:.1} minutes. Consider smaller \
                 documents or different batch sizes.",
                mean / 60.0
            ))
            .with_impact("Slow data updates and stale search results")
            .with_current(json!(format!("{:.1} minutes", mean / 60.0)))
            .with_recommended(json!(format!(
                "< {:.0} minutes",
                self.thresholds.slow_indexing_secs / 60.0
            ))),
        )
    }

    /// P003
    fn check_fragmentation(&self, instance: &InstanceSnapshot) -> Option<Finding> {
        let db_size = instance.database_size.filter(|n| *n > 0)?;
        let used = instance.used_database_size.filter(|n| *n > 0)?;
        let ratio = used as f64 / db_size as f64;
        if ratio >= self.thresholds.storage_utilization {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P003",
                Category::Performance,
                Severity::Suggestion,
                "Database fragmentation detected",
            )
            .with_description(format!(
                "Database is only {:.0}% utilized ({:.0}% fragmentation). Creating a \
                 dump and re-importing it reclaims the space.",
                ratio * 100.0,
                (1.0 - ratio) * 100.0
            ))
            .with_impact("Increased disk usage")
            .with_current(json!({
                "db_size_bytes": db_size,
                "used_size_bytes": used,
                "utilization": format!("{:.0}%", ratio * 100.0),
            })),
        )
    }

    /// P004
    fn check_index_count(&self, indexes: &[IndexSnapshot]) -> Option<Finding> {
        if indexes.len() <= self.thresholds.max_indexes {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P004",
                Category::Performance,
                Severity::Suggestion,
                "Large number of indexes",
            )
            .with_description(format!(
                "Instance has {} indexes. Many indexes increase memory use and \
                 management overhead; consider consolidating related data.",
                indexes.len()
            ))
            .with_impact("Increased memory usage, management overhead")
            .with_current(json!(indexes.len()))
            .with_recommended(json!(format!("< {}", self.thresholds.max_indexes))),
        )
    }

    /// P005
    fn check_index_imbalance(&self, indexes: &[IndexSnapshot]) -> Option<Finding> {
        if indexes.len() < 2 {
            return None;
        }
        let total: u64 = indexes.iter().map(|i| i.document_count()).sum();
        if total == 0 {
            return None;
        }
        let (index, ratio) = indexes
            .iter()
            .filter(|i| i.document_count() > 0)
            .map(|i| (i, i.document_count() as f64 / total as f64))
            .find(|(_, ratio)| *ratio > self.thresholds.dominant_index_ratio)?;
        Some(
            Finding::new(
                "MEILI-P005",
                Category::Performance,
                Severity::Info,
                "Imbalanced index distribution",
            )
            .with_description(format!(
                "Index '{}' contains {:.0}% of all documents ({} of {}). This may be \
                 intentional, but verify the data distribution.",
                index.uid,
                ratio * 100.0,
                index.document_count(),
                total
            ))
            .with_impact("Potential resource concentration")
            .with_current(json!({
                "dominant_index": index.uid,
                "percentage": format!("{:.0}%", ratio * 100.0),
            })),
        )
    }

    /// P007
    fn check_task_backlog(&self, tasks: &[Task]) -> Option<Finding> {
        if tasks.len() < self.thresholds.backlog_min_tasks {
            return None;
        }
        let waits: Vec<f64> = tasks.iter().filter_map(Task::queue_secs).collect();
        if waits.is_empty() || waits.len() < self.thresholds.backlog_min_timed {
            return None;
        }
        let mean = waits.iter().sum::<f64>() / waits.len() as f64;
        if mean <= self.thresholds.backlog_queue_secs {
            return None;
        }
        let max = waits.iter().copied().fold(0.0_f64, f64::max);
        let delayed = waits
            .iter()
            .filter(|w| **w > self.thresholds.backlog_delay_secs)
            .count();
        Some(
            Finding::new(
                "MEILI-P007",
                Category::Performance,
                Severity::Warning,
                "Sustained task queue backlog detected",
            )
            .with_description(format!(
                "Tasks wait an average of {:.0} seconds in the queue before processing \
                 starts (max: {:.0}s). {} of {} timed tasks waited more than {:.0}s.",
                mean,
                max,
                delayed,
                waits.len(),
                self.thresholds.backlog_delay_secs
            ))
            .with_impact("Increased latency for document updates and search freshness")
            .with_current(json!({
                "avg_queue_time_seconds": round1(mean),
                "max_queue_time_seconds": round1(max),
                "tasks_analyzed": waits.len(),
                "tasks_delayed": delayed,
            }))
            .with_recommended(json!(format!(
                "< {:.0} seconds average queue time",
                self.thresholds.backlog_queue_secs
            )))
            .with_reference(DOCS_ASYNC),
        )
    }

    /// P008
    fn check_tiny_tasks(&self, tasks: &[Task]) -> Option<Finding> {
        let additions: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.kind == DOCUMENT_ADDITION && t.is_succeeded())
            .collect();
        if additions.is_empty() || additions.len() < self.thresholds.tiny_min_document_tasks {
            return None;
        }
        let tiny = additions
            .iter()
            .filter_map(|t| t.document_count())
            .filter(|n| *n < self.thresholds.tiny_task_documents)
            .count();
        let ratio = tiny as f64 / additions.len() as f64;
        if ratio <= self.thresholds.tiny_ratio || tiny < self.thresholds.tiny_min_count {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-P008",
                Category::Performance,
                Severity::Suggestion,
                "Many tiny indexing tasks detected",
            )
            .with_description(format!(
                "{} of {} document addition tasks ({:.0}%) contain fewer than {} \
                 documents each. Batch documents client-side to reduce task overhead.",
                tiny,
                additions.len(),
                ratio * 100.0,
                self.thresholds.tiny_task_documents
            ))
            .with_impact("Increased task queue overhead, slower overall indexing throughput")
            .with_current(json!({
                "tiny_tasks": tiny,
                "total_doc_tasks": additions.len(),
                "tiny_ratio": format!("{:.0}%", ratio * 100.0),
            }))
            .with_recommended(json!(
                "Batch documents into larger groups (100-10,000 per request)"
            ))
            .with_reference(DOCS_INDEXING),
        )
    }

    /// P009
    fn check_oversized_tasks(&self, tasks: &[Task]) -> Option<Finding> {
        let slow: Vec<(&Task, f64)> = tasks
            .iter()
            .filter(|t| t.kind == DOCUMENT_ADDITION)
            .filter_map(|t| t.duration_secs().map(|secs| (t, secs)))
            .filter(|(_, secs)| *secs > self.thresholds.oversized_task_secs)
            .collect();
        if slow.is_empty() {
            return None;
        }
        let mean = slow.iter().map(|(_, secs)| secs).sum::<f64>() / slow.len() as f64;
        let examples: Vec<_> = slow
            .iter()
            .take(MAX_EXAMPLES)
            .map(|(task, secs)| {
                json!({
                    "uid": task.uid,
                    "duration_seconds": round1(*secs),
                    "documents": task.document_count().unwrap_or(0),
                    "index": task.index_uid,
                })
            })
            .collect();
        Some(
            Finding::new(
                "MEILI-P009",
                Category::Performance,
                Severity::Suggestion,
                "Oversized indexing tasks detected",
            )
            .with_description(format!(
                "Found {} indexing tasks taking over {:.0} minutes each (average: {:.1} \
                 minutes). Split large imports into smaller batches.",
                slow.len(),
                self.thresholds.oversized_task_secs / 60.0,
                mean / 60.0
            ))
            .with_impact("Long-running tasks block other operations and increase memory pressure")
            .with_current(json!({
                "slow_task_count": slow.len(),
                "avg_duration_minutes": round1(mean / 60.0),
                "examples": examples,
            }))
            .with_recommended(json!(format!(
                "Keep individual tasks under {:.0} minutes",
                self.thresholds.oversized_task_secs / 60.0
            )))
            .with_reference(DOCS_INDEXING),
        )
    }

    /// P010
    fn check_recurring_errors(&self, tasks: &[Task]) -> Option<Finding> {
        let failed: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.is_failed() && t.error.is_some())
            .collect();
        if failed.len() < self.thresholds.recurring_error_min {
            return None;
        }

        // code -> (count, first message)
        let mut codes: BTreeMap<&str, (usize, &str)> = BTreeMap::new();
        for task in &failed {
            if let Some(error) = &task.error {
                let code = if error.code.is_empty() {
                    "unknown"
                } else {
                    error.code.as_str()
                };
                codes.entry(code).or_insert((0, error.message.as_str())).0 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, &str)> = codes
            .into_iter()
            .map(|(code, (count, message))| (code, count, message))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let recurring: Vec<_> = ranked
            .into_iter()
            .take(MAX_ERROR_CODES)
            .filter(|(_, count, _)| *count >= self.thresholds.recurring_error_min)
            .collect();
        if recurring.is_empty() {
            return None;
        }

        let total: usize = recurring.iter().map(|(_, count, _)| count).sum();
        let summary: Vec<_> = recurring
            .iter()
            .map(|(code, count, message)| {
                json!({
                    "code": code,
                    "count": count,
                    "message": message.chars().take(100).collect::<String>(),
                })
            })
            .collect();
        Some(
            Finding::new(
                "MEILI-P010",
                Category::Performance,
                Severity::Warning,
                "Recurring task failures detected",
            )
            .with_description(format!(
                "Found {} failed tasks with recurring error patterns. Top error codes: \
                 {}.",
                total,
                recurring
                    .iter()
                    .map(|(code, _, _)| *code)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .with_impact("Repeated failures point to a systematic data or client issue")
            .with_current(json!({
                "total_failed": failed.len(),
                "recurring_errors": summary,
            }))
            .with_reference(DOCS_ERROR_CODES),
        )
    }
}
