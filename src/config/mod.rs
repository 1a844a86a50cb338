//! Configuration module for meiliscan
//!
//! This module handles:
//! - Rule thresholds and the stable-version baseline (meiliscan.toml)
//! - Severity weights for the health score

mod policy;

pub use policy::{
    AnalysisPolicy, BestPracticeThresholds, DocumentThresholds, InstanceThresholds,
    PerformanceThresholds, ProbeThresholds, SchemaThresholds,
};

use crate::error::MeiliscanError;
use std::path::Path;
use tracing::{debug, warn};

pub const POLICY_FILE: &str = "meiliscan.toml";

/// Parse a policy from TOML text.
pub fn parse_policy(raw: &str) -> Result<AnalysisPolicy, MeiliscanError> {
    Ok(toml::from_str(raw)?)
}

/// Load a policy from an explicit file. Errors are returned to the caller.
pub fn load_policy_file(path: &Path) -> Result<AnalysisPolicy, MeiliscanError> {
    let content = std::fs::read_to_string(path)?;
    let policy = parse_policy(&content)?;
    debug!("Loaded analysis policy from {}", path.display());
    Ok(policy)
}

/// Load `meiliscan.toml` from `dir`, falling back to defaults.
///
/// A missing file is silent; a malformed one logs a warning.
pub fn load_policy(dir: &Path) -> AnalysisPolicy {
    let path = dir.join(POLICY_FILE);
    if path.exists() {
        match load_policy_file(&path) {
            Ok(policy) => return policy,
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }
    AnalysisPolicy::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_policy_keeps_defaults() {
        let policy = parse_policy(
            r#"
current_stable_version = "1.14.0"

[documents]
max_depth = 5

[scoring]
critical = 20
"#,
        )
        .unwrap();
        assert_eq!(policy.current_stable_version, "1.14.0");
        assert_eq!(policy.documents.max_depth, 5);
        assert_eq!(policy.documents.empty_ratio, 0.3);
        assert_eq!(policy.scoring.critical, 20);
        assert_eq!(policy.scoring.warning, 8);
        assert_eq!(policy.schema.min_max_total_hits, 100);
        assert!(!policy.detect_sensitive);
    }

    #[test]
    fn test_load_policy_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let policy = load_policy(dir.path());
        assert_eq!(policy.current_stable_version, "1.12.0");
    }

    #[test]
    fn test_load_policy_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(POLICY_FILE), "detect_sensitive = [").unwrap();
        let policy = load_policy(dir.path());
        assert!(!policy.detect_sensitive);
    }

    #[test]
    fn test_load_policy_file_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[documents]\nmax_depth = \"deep\"").unwrap();
        assert!(load_policy_file(&path).is_err());
    }
}
