//! Rule analyzers for Meilisearch deployments
//!
//! Every analyzer is a pure function over already-collected snapshots.
//! Per-index analyzers see one `IndexSnapshot`; global analyzers see all
//! of them plus the instance state, task history, launch configuration
//! and search probe results.
//!
//! ```text
//!                  ┌──────────────┐
//!  AnalysisInput ──▶│AnalysisEngine│──▶ Report
//!                  └──────┬───────┘
//!          per index      │      once per run
//!      ┌──────────────────┼──────────────────────┐
//!      ▼                  ▼                      ▼
//!   schema (S)      performance (P)       instance_config (I)
//!   documents (D)   best_practices (B)    search_probe (Q)
//! ```
//!
//! `performance` and `best_practices` carry both per-index and global rules.
//!
//! # Rule ids
//!
//! Finding ids (`MEILI-S001`, `MEILI-D004`, ...) are the cross-run identity
//! the differ matches on. Never derive an id from run-specific data.

mod base;
mod best_practices;
mod documents;
mod engine;
mod fields;
mod instance_config;
mod performance;
mod schema;
mod search_probe;

pub use base::{Analyzer, AnalyzerOutcome, GlobalAnalyzer, GlobalContext, IndexAnalyzer};
pub use best_practices::{parse_version, BestPracticesAnalyzer};
pub use documents::{document_depth, walk_document, DocumentAnalyzer, Step, Visit};
pub use engine::{AnalysisEngine, AnalysisEngineBuilder, MAX_WORKERS};
pub use instance_config::InstanceConfigAnalyzer;
pub use performance::PerformanceAnalyzer;
pub use schema::SchemaAnalyzer;
pub use search_probe::SearchProbeAnalyzer;
