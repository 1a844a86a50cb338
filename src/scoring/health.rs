use crate::models::{Finding, FindingsSummary, Severity};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u32 = 100;

/// Penalty points per finding of each severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub critical: u32,
    pub warning: u32,
    pub suggestion: u32,
    pub info: u32,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            critical: 15,
            warning: 8,
            suggestion: 3,
            info: 0,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
            Severity::Suggestion => self.suggestion,
            Severity::Info => self.info,
        }
    }
}

/// Display bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthLabel {
    Excellent,
    Good,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    Poor,
    Critical,
}

impl HealthLabel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => HealthLabel::Excellent,
            s if s >= 75 => HealthLabel::Good,
            s if s >= 50 => HealthLabel::NeedsAttention,
            s if s >= 25 => HealthLabel::Poor,
            _ => HealthLabel::Critical,
        }
    }
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthLabel::Excellent => "Excellent",
            HealthLabel::Good => "Good",
            HealthLabel::NeedsAttention => "Needs Attention",
            HealthLabel::Poor => "Poor",
            HealthLabel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    weights: SeverityWeights,
}

impl HealthScorer {
    pub fn new(weights: SeverityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SeverityWeights {
        &self.weights
    }

    pub fn penalty<'a>(&self, findings: impl IntoIterator<Item = &'a Finding>) -> u32 {
        findings
            .into_iter()
            .map(|f| self.weights.weight(f.severity))
            .fold(0u32, u32::saturating_add)
    }

    /// Score in `[0, 100]`
    pub fn score<'a>(&self, findings: impl IntoIterator<Item = &'a Finding>) -> u32 {
        MAX_SCORE.saturating_sub(self.penalty(findings))
    }

    pub fn label(&self, score: u32) -> HealthLabel {
        HealthLabel::from_score(score)
    }

    /// Human-readable breakdown of how a score was reached
    pub fn explain(&self, summary: &FindingsSummary) -> String {
        let w = &self.weights;
        let rows = [
            ("critical", summary.critical, w.critical),
            ("warning", summary.warning, w.warning),
            ("suggestion", summary.suggestion, w.suggestion),
            ("info", summary.info, w.info),
        ];
        let mut lines = vec!["# Health Score\n".to_string()];
        let mut total: u32 = 0;
        for (name, count, weight) in rows {
            let points = (count as u32).saturating_mul(weight);
            total = total.saturating_add(points);
            lines.push(format!("- {:<10} {:>3} x {:>2} = {:>3}", name, count, weight, points));
        }
        let score = MAX_SCORE.saturating_sub(total);
        lines.push(format!(
            "\nScore = max(0, {} - {}) = {} ({})",
            MAX_SCORE,
            total,
            score,
            HealthLabel::from_score(score)
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn finding(severity: Severity) -> Finding {
        Finding::new("MEILI-S001", Category::Schema, severity, "test")
    }

    #[test]
    fn test_empty_is_perfect() {
        let scorer = HealthScorer::default();
        let none: Vec<Finding> = Vec::new();
        assert_eq!(scorer.score(&none), 100);
    }

    #[test]
    fn test_critical_plus_warning() {
        let scorer = HealthScorer::default();
        let findings = vec![finding(Severity::Critical), finding(Severity::Warning)];
        let score = scorer.score(&findings);
        assert_eq!(score, 77);
        assert_eq!(scorer.label(score), HealthLabel::Good);
    }

    #[test]
    fn test_info_is_free() {
        let scorer = HealthScorer::default();
        let findings = vec![finding(Severity::Info); 50];
        assert_eq!(scorer.score(&findings), 100);
    }

    #[test]
    fn test_clamped_at_zero() {
        let scorer = HealthScorer::default();
        let findings = vec![finding(Severity::Critical); 10];
        assert_eq!(scorer.score(&findings), 0);
        assert_eq!(scorer.label(0), HealthLabel::Critical);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(HealthLabel::from_score(90), HealthLabel::Excellent);
        assert_eq!(HealthLabel::from_score(89), HealthLabel::Good);
        assert_eq!(HealthLabel::from_score(75), HealthLabel::Good);
        assert_eq!(HealthLabel::from_score(74), HealthLabel::NeedsAttention);
        assert_eq!(HealthLabel::from_score(50), HealthLabel::NeedsAttention);
        assert_eq!(HealthLabel::from_score(49), HealthLabel::Poor);
        assert_eq!(HealthLabel::from_score(25), HealthLabel::Poor);
        assert_eq!(HealthLabel::from_score(24), HealthLabel::Critical);
        assert_eq!(HealthLabel::NeedsAttention.to_string(), "Needs Attention");
    }

    #[test]
    fn test_custom_weights() {
        let scorer = HealthScorer::new(SeverityWeights {
            info: 1,
            ..Default::default()
        });
        let findings = vec![finding(Severity::Info); 3];
        assert_eq!(scorer.score(&findings), 97);
    }

    #[test]
    fn test_explain_mentions_total() {
        let scorer = HealthScorer::default();
        let summary = FindingsSummary {
            critical: 1,
            warning: 1,
            total: 2,
            ..Default::default()
        };
        let text = scorer.explain(&summary);
        assert!(text.contains("max(0, 100 - 23) = 77 (Good)"));
    }
}
