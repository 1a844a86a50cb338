//! Historical comparison of two finalized reports
//!
//! ```text
//!   old Report ─┐
//!               ├─▶ compare() ─▶ ComparisonReport
//!   new Report ─┘        │
//!                        ├── metric changes (health, totals, severities)
//!                        ├── per-index changes (new/resolved findings, settings diff)
//!                        ├── finding changes matched on (id, index_uid)
//!                        └── trend areas + recommendations
//! ```
//!
//! Both inputs are usually re-read from disk, so everything here works on
//! the serialized `Report` shape only.

mod comparison;
mod differ;

pub use comparison::{
    ChangeType, ComparisonReport, ComparisonSummary, FindingChange, IndexChange, MetricChange,
    SettingDelta, TrendDirection, COMPARISON_VERSION,
};
pub use differ::{compare, format_time_between};
