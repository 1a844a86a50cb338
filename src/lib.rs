//! meiliscan - health diagnostics for Meilisearch deployments
//!
//! A rule engine over collected snapshots: index settings, stats, sampled
//! documents, task history, launch configuration and search probes go in;
//! a scored report with prioritized findings comes out. Two reports can be
//! compared to see how a deployment's health moved.
//!
//! ```no_run
//! use meiliscan::analyzers::AnalysisEngine;
//! use meiliscan::snapshot::AnalysisInput;
//!
//! # fn main() -> anyhow::Result<()> {
//! let raw = std::fs::read_to_string("snapshot.json")?;
//! let input = AnalysisInput::from_json(&raw)?;
//! let report = AnalysisEngine::default().run(&input)?;
//! println!("health: {}", report.summary.health_score);
//! # Ok(())
//! # }
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod report;
pub mod reporters;
pub mod scoring;
pub mod snapshot;

pub use error::MeiliscanError;
