//! Health scoring
//!
//! The score is a pure function of a finding multiset.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = max(0, 100 - Σ weight(severity))
//!
//! Default weights:
//!   critical   15
//!   warning     8
//!   suggestion  3
//!   info        0
//! ```
//!
//! Weights are non-negative, so adding a finding never raises the score.
//! The label (Excellent, Good, Needs Attention, Poor, Critical) is for
//! display only; comparisons always use the number.

mod health;

pub use health::{HealthLabel, HealthScorer, SeverityWeights, MAX_SCORE};
