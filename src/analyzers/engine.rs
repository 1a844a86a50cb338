//! Analysis engine with parallel per-index execution
//!
//! The AnalysisEngine orchestrates every registered analyzer:
//! - Runs per-index analyzers for different indexes in parallel using rayon
//! - Runs global analyzers once, after all per-index passes
//! - Isolates failures: an error or panic in one analyzer is logged and skipped
//! - Files findings into a `ReportBuilder` from a single append point
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    AnalysisEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Register index + global analyzers                   │
//! │  2. Register every index with the report builder        │
//! │  3. Per-index analyzers, indexes in parallel (rayon)    │
//! │  4. Append outcomes serially                            │
//! │  5. Global analyzers, sequentially                      │
//! │  6. Finalize: summary, score, action plan               │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::analyzers::base::{AnalyzerOutcome, GlobalAnalyzer, GlobalContext, IndexAnalyzer};
use crate::analyzers::{
    BestPracticesAnalyzer, DocumentAnalyzer, InstanceConfigAnalyzer, PerformanceAnalyzer,
    SchemaAnalyzer, SearchProbeAnalyzer,
};
use crate::config::AnalysisPolicy;
use crate::models::Finding;
use crate::report::{Report, ReportBuilder};
use crate::scoring::HealthScorer;
use crate::snapshot::{AnalysisInput, IndexSnapshot};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Upper bound accepted for an explicit worker count
pub const MAX_WORKERS: usize = 64;

/// Orchestrates one analysis run across all registered analyzers
pub struct AnalysisEngine {
    index_analyzers: Vec<Arc<dyn IndexAnalyzer>>,
    global_analyzers: Vec<Arc<dyn GlobalAnalyzer>>,
    /// Number of worker threads for per-index analysis
    workers: usize,
    scorer: HealthScorer,
}

impl AnalysisEngine {
    /// Create an empty engine
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers.min(MAX_WORKERS)
        };

        Self {
            index_analyzers: Vec::new(),
            global_analyzers: Vec::new(),
            workers: actual_workers,
            scorer: HealthScorer::default(),
        }
    }

    /// Engine with the six built-in analyzers configured from `policy`
    pub fn from_policy(policy: &AnalysisPolicy, workers: usize) -> Self {
        let mut engine = Self::new(workers).with_scorer(HealthScorer::new(policy.scoring));

        let performance = Arc::new(PerformanceAnalyzer::new(policy.performance.clone()));
        let best_practices = Arc::new(BestPracticesAnalyzer::new(
            policy.best_practices.clone(),
            policy.current_stable_version.clone(),
        ));

        engine.register_index(Arc::new(SchemaAnalyzer::new(policy.schema.clone())));
        engine.register_index(Arc::new(DocumentAnalyzer::new(
            policy.documents.clone(),
            policy.detect_sensitive,
        )));
        engine.register_index(performance.clone());
        engine.register_index(best_practices.clone());

        engine.register_global(performance);
        engine.register_global(best_practices);
        engine.register_global(Arc::new(InstanceConfigAnalyzer::new(
            policy.instance_config.clone(),
        )));
        engine.register_global(Arc::new(SearchProbeAnalyzer::new(
            policy.search_probe.clone(),
        )));

        engine
    }

    pub fn with_scorer(mut self, scorer: HealthScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Register a per-index analyzer
    pub fn register_index(&mut self, analyzer: Arc<dyn IndexAnalyzer>) {
        debug!("Registering index analyzer: {}", analyzer.name());
        self.index_analyzers.push(analyzer);
    }

    /// Register a global analyzer
    pub fn register_global(&mut self, analyzer: Arc<dyn GlobalAnalyzer>) {
        debug!("Registering global analyzer: {}", analyzer.name());
        self.global_analyzers.push(analyzer);
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn analyzer_count(&self) -> usize {
        self.index_analyzers.len() + self.global_analyzers.len()
    }

    /// Names of registered analyzers, per-index first
    pub fn analyzer_names(&self) -> Vec<&'static str> {
        self.index_analyzers
            .iter()
            .map(|a| a.name())
            .chain(self.global_analyzers.iter().map(|a| a.name()))
            .collect()
    }

    /// Run every analyzer over the bundle and finalize a report.
    ///
    /// Only a failure to build the thread pool is returned as an error;
    /// analyzer failures are logged and skipped.
    pub fn run(&self, input: &AnalysisInput) -> Result<Report> {
        let start = Instant::now();
        info!(
            "Starting analysis of {} indexes with {} analyzers on {} workers",
            input.indexes.len(),
            self.analyzer_count(),
            self.workers
        );

        let mut builder = ReportBuilder::new(input.source.clone())
            .database_size(input.instance.database_size);
        for index in &input.indexes {
            builder.add_index(index);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let per_index: Vec<Vec<AnalyzerOutcome>> = pool.install(|| {
            input
                .indexes
                .par_iter()
                .map(|index| self.run_index(index))
                .collect()
        });

        let mut succeeded = 0;
        let mut total = 0;
        for outcome in per_index.into_iter().flatten() {
            total += 1;
            if self.absorb(&mut builder, outcome) {
                succeeded += 1;
            }
        }

        let ctx = GlobalContext {
            indexes: &input.indexes,
            instance: &input.instance,
            probe_results: input.probe_results.as_deref(),
        };
        for analyzer in &self.global_analyzers {
            total += 1;
            let outcome = run_isolated(analyzer.name(), None, || analyzer.analyze_global(&ctx));
            if self.absorb(&mut builder, outcome) {
                succeeded += 1;
            }
        }

        let report = builder.finalize(&self.scorer);
        info!(
            "Analysis complete: {} findings from {}/{} analyzer runs in {:?} (health {})",
            report.summary.total_findings,
            succeeded,
            total,
            start.elapsed(),
            report.summary.health_score
        );
        Ok(report)
    }

    /// Run every per-index analyzer against one index
    fn run_index(&self, index: &IndexSnapshot) -> Vec<AnalyzerOutcome> {
        self.index_analyzers
            .iter()
            .map(|analyzer| {
                run_isolated(analyzer.name(), Some(&index.uid), || analyzer.analyze(index))
            })
            .collect()
    }

    /// Append an outcome's findings. Returns whether the analyzer succeeded.
    fn absorb(&self, builder: &mut ReportBuilder, outcome: AnalyzerOutcome) -> bool {
        if !outcome.success {
            warn!(
                "Analyzer {} failed on {}: {}",
                outcome.analyzer_name,
                outcome.index_uid.as_deref().unwrap_or("<global>"),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
            return false;
        }
        builder.add_findings(outcome.findings);
        true
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::from_policy(&AnalysisPolicy::default(), 0)
    }
}

/// Run one analyzer body, converting errors and panics into a failed outcome
fn run_isolated(
    name: &'static str,
    index_uid: Option<&str>,
    body: impl FnOnce() -> Result<Vec<Finding>>,
) -> AnalyzerOutcome {
    let start = Instant::now();
    let target = index_uid.unwrap_or("<global>");
    debug!("Running analyzer {} on {}", name, target);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(body));
    let duration = start.elapsed().as_millis() as u64;
    let index_uid = index_uid.map(str::to_string);

    match result {
        Ok(Ok(findings)) => {
            debug!(
                "Analyzer {} found {} findings on {} in {}ms",
                name,
                findings.len(),
                target,
                duration
            );
            AnalyzerOutcome::success(name.to_string(), index_uid, findings, duration)
        }
        Ok(Err(e)) => {
            debug!("Analyzer {} returned an error on {}: {}", name, target, e);
            AnalyzerOutcome::failure(name.to_string(), index_uid, e.to_string(), duration)
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("Analyzer {} panicked on {}: {}", name, target, panic_msg);
            AnalyzerOutcome::failure(
                name.to_string(),
                index_uid,
                format!("Panic: {}", panic_msg),
                duration,
            )
        }
    }
}

/// Builder for creating an AnalysisEngine with custom analyzers
pub struct AnalysisEngineBuilder {
    workers: usize,
    scorer: HealthScorer,
    index_analyzers: Vec<Arc<dyn IndexAnalyzer>>,
    global_analyzers: Vec<Arc<dyn GlobalAnalyzer>>,
}

impl AnalysisEngineBuilder {
    pub fn new() -> Self {
        Self {
            workers: 0,
            scorer: HealthScorer::default(),
            index_analyzers: Vec::new(),
            global_analyzers: Vec::new(),
        }
    }

    /// Set number of worker threads
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn scorer(mut self, scorer: HealthScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Add a per-index analyzer
    pub fn index_analyzer(mut self, analyzer: Arc<dyn IndexAnalyzer>) -> Self {
        self.index_analyzers.push(analyzer);
        self
    }

    /// Add a global analyzer
    pub fn global_analyzer(mut self, analyzer: Arc<dyn GlobalAnalyzer>) -> Self {
        self.global_analyzers.push(analyzer);
        self
    }

    /// Build the engine
    pub fn build(self) -> AnalysisEngine {
        let mut engine = AnalysisEngine::new(self.workers).with_scorer(self.scorer);
        for analyzer in self.index_analyzers {
            engine.register_index(analyzer);
        }
        for analyzer in self.global_analyzers {
            engine.register_global(analyzer);
        }
        engine
    }
}

impl Default for AnalysisEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::base::Analyzer;
    use crate::models::{Category, Severity};
    use crate::snapshot::{InstanceSnapshot, SourceInfo};

    enum Behavior {
        Emit,
        Fail,
        Panic,
    }

    struct MockAnalyzer {
        name: &'static str,
        behavior: Behavior,
    }

    impl MockAnalyzer {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self { name, behavior })
        }
    }

    impl Analyzer for MockAnalyzer {
        fn name(&self) -> &'static str {
            self.name
        }
    }

    impl IndexAnalyzer for MockAnalyzer {
        fn analyze(&self, index: &IndexSnapshot) -> Result<Vec<Finding>> {
            match self.behavior {
                Behavior::Emit => Ok(vec![Finding::new(
                    "MEILI-S001",
                    Category::Schema,
                    Severity::Warning,
                    "mock",
                )
                .for_index(&index.uid)]),
                Behavior::Fail => anyhow::bail!("mock failure"),
                Behavior::Panic => panic!("mock panic"),
            }
        }
    }

    impl GlobalAnalyzer for MockAnalyzer {
        fn analyze_global(&self, _ctx: &GlobalContext<'_>) -> Result<Vec<Finding>> {
            match self.behavior {
                Behavior::Emit => Ok(vec![Finding::new(
                    "MEILI-P001",
                    Category::Performance,
                    Severity::Critical,
                    "mock",
                )]),
                Behavior::Fail => anyhow::bail!("mock failure"),
                Behavior::Panic => panic!("mock panic"),
            }
        }
    }

    fn input(uids: &[&str]) -> AnalysisInput {
        AnalysisInput {
            source: SourceInfo::instance("http://localhost:7700"),
            instance: InstanceSnapshot::default(),
            indexes: uids.iter().map(|u| IndexSnapshot::new(*u)).collect(),
            probe_results: None,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = AnalysisEngine::new(4);
        assert_eq!(engine.workers(), 4);
        assert_eq!(engine.analyzer_count(), 0);
    }

    #[test]
    fn test_engine_default_workers() {
        let engine = AnalysisEngine::new(0);
        assert!(engine.workers() > 0);
        assert!(engine.workers() <= 16);
    }

    #[test]
    fn test_from_policy_registers_all() {
        let engine = AnalysisEngine::from_policy(&AnalysisPolicy::default(), 1);
        assert_eq!(
            engine.analyzer_names(),
            vec![
                "schema",
                "documents",
                "performance",
                "best_practices",
                "performance",
                "best_practices",
                "instance_config",
                "search_probe",
            ]
        );
    }

    #[test]
    fn test_findings_filed_per_index() {
        let engine = AnalysisEngineBuilder::new()
            .workers(2)
            .index_analyzer(MockAnalyzer::new("emit", Behavior::Emit))
            .global_analyzer(MockAnalyzer::new("emit", Behavior::Emit))
            .build();
        let report = engine.run(&input(&["movies", "books"])).unwrap();
        assert_eq!(report.indexes["movies"].findings.len(), 1);
        assert_eq!(report.indexes["books"].findings.len(), 1);
        assert_eq!(report.global_findings.len(), 1);
        assert_eq!(report.summary.health_score, 100 - 8 - 8 - 15);
    }

    #[test]
    fn test_failures_are_isolated() {
        let engine = AnalysisEngineBuilder::new()
            .workers(2)
            .index_analyzer(MockAnalyzer::new("panics", Behavior::Panic))
            .index_analyzer(MockAnalyzer::new("fails", Behavior::Fail))
            .index_analyzer(MockAnalyzer::new("emit", Behavior::Emit))
            .global_analyzer(MockAnalyzer::new("global-panics", Behavior::Panic))
            .build();
        let report = engine.run(&input(&["movies", "books"])).unwrap();
        assert_eq!(report.summary.total_findings, 2);
        assert!(report.global_findings.is_empty());
    }

    #[test]
    fn test_run_isolated_reports_panic_message() {
        let outcome = run_isolated("boom", Some("movies"), || panic!("kaput"));
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Panic: kaput"));
        assert_eq!(outcome.index_uid.as_deref(), Some("movies"));
    }

    #[test]
    fn test_empty_input() {
        let report = AnalysisEngine::default().run(&input(&[])).unwrap();
        assert_eq!(report.summary.total_indexes, 0);
        assert_eq!(report.summary.health_score, 100);
    }
}
