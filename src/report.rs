//! Findings and the assembled quality report.
//!
//! A [`QualityFinding`] is one unit of checker output; the
//! [`QualityReport`] is the terminal artifact of a run: all findings plus
//! a per-dimension aggregate score, serializable as stable JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checks::features::FeatureRanking;

/// The five quality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Fraction of expected values actually present.
    Completeness,
    /// Uniform formatting/encoding of values for the same concept.
    Consistency,
    /// Conformance to declared ranges and statistical norms.
    Validity,
    /// Outcome skew across demographic subgroups.
    Bias,
    /// Correlation/importance ranking of features (advisory).
    FeatureQuality,
}

impl Dimension {
    /// All dimensions, in report order.
    pub const ALL: [Self; 5] = [
        Self::Completeness,
        Self::Consistency,
        Self::Validity,
        Self::Bias,
        Self::FeatureQuality,
    ];

    /// Stable serialized name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Consistency => "consistency",
            Self::Validity => "validity",
            Self::Bias => "bias",
            Self::FeatureQuality => "feature_quality",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action needed.
    Info,
    /// Worth attention before downstream use.
    Warning,
    /// Blocks downstream use of the affected column(s).
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// One unit of checker output. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityFinding {
    /// The dimension the finding belongs to.
    pub dimension: Dimension,
    /// The column(s) the finding targets. Empty for table-level findings.
    pub columns: Vec<String>,
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Score in [0, 1]; 1 is perfectly clean.
    pub score: f64,
}

impl QualityFinding {
    /// Create a finding targeting a single column. The score is clamped
    /// into [0, 1].
    pub fn new(
        dimension: Dimension,
        column: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            dimension,
            columns: vec![column.into()],
            severity,
            message: message.into(),
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Create a table-level finding with no target column.
    pub fn table_level(
        dimension: Dimension,
        severity: Severity,
        message: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            dimension,
            columns: Vec::new(),
            severity,
            message: message.into(),
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Replace the target columns (for pair findings).
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// A "not applicable" info finding, used by checks that guard
    /// degenerate input (all-missing columns, too few values) instead of
    /// crashing.
    pub fn not_applicable(
        dimension: Dimension,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let column = column.into();
        Self::new(
            dimension,
            column.clone(),
            Severity::Info,
            format!("{column}: not applicable ({})", reason.into()),
            1.0,
        )
    }
}

/// Aggregate for one dimension inside the serialized report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSummary {
    /// Mean of constituent finding scores, or `null` when the dimension
    /// produced no findings ("not evaluated", distinct from score 0).
    pub score: Option<f64>,
    /// Findings for this dimension, in emission order.
    pub findings: Vec<QualityFinding>,
}

/// The terminal artifact of a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    /// All findings, in checker-then-column order.
    pub findings: Vec<QualityFinding>,
    /// Advisory feature-correlation ranking, when numeric columns exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_ranking: Option<FeatureRanking>,
}

impl QualityReport {
    /// Assemble a report from findings.
    #[must_use]
    pub fn from_findings(findings: Vec<QualityFinding>) -> Self {
        Self {
            findings,
            feature_ranking: None,
        }
    }

    /// Attach the advisory feature ranking.
    #[must_use]
    pub fn with_feature_ranking(mut self, ranking: FeatureRanking) -> Self {
        self.feature_ranking = Some(ranking);
        self
    }

    /// Findings for one dimension, in emission order.
    #[must_use]
    pub fn findings_for(&self, dimension: Dimension) -> Vec<&QualityFinding> {
        self.findings
            .iter()
            .filter(|f| f.dimension == dimension)
            .collect()
    }

    /// Aggregate score for a dimension: the mean of its finding scores,
    /// or `None` when the dimension was not evaluated.
    #[must_use]
    pub fn dimension_score(&self, dimension: Dimension) -> Option<f64> {
        let scores: Vec<f64> = self
            .findings
            .iter()
            .filter(|f| f.dimension == dimension)
            .map(|f| f.score)
            .collect();
        if scores.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Per-dimension summaries in [`Dimension::ALL`] order.
    #[must_use]
    pub fn summaries(&self) -> Vec<(Dimension, DimensionSummary)> {
        Dimension::ALL
            .iter()
            .map(|&d| {
                (
                    d,
                    DimensionSummary {
                        score: self.dimension_score(d),
                        findings: self.findings_for(d).into_iter().cloned().collect(),
                    },
                )
            })
            .collect()
    }

    /// Whether any finding is critical.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Critical)
    }

    /// Findings at a given severity.
    #[must_use]
    pub fn findings_at(&self, severity: Severity) -> Vec<&QualityFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    /// Stable JSON rendering:
    /// `{ "dimensions": { name: { "score": float|null, "findings": [...] } },
    ///    "feature_ranking": ... }`.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut dimensions = serde_json::Map::new();
        for (dimension, summary) in self.summaries() {
            dimensions.insert(
                dimension.name().to_string(),
                serde_json::json!({
                    "score": summary.score,
                    "findings": summary.findings,
                }),
            );
        }

        let mut root = serde_json::Map::new();
        root.insert("dimensions".to_string(), dimensions.into());
        if let Some(ranking) = &self.feature_ranking {
            root.insert(
                "feature_ranking".to_string(),
                serde_json::to_value(ranking).unwrap_or(serde_json::Value::Null),
            );
        }
        root.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(dimension: Dimension, score: f64) -> QualityFinding {
        QualityFinding::new(dimension, "col", Severity::Info, "msg", score)
    }

    #[test]
    fn test_score_clamped() {
        assert!((finding(Dimension::Validity, 1.7).score - 1.0).abs() < f64::EPSILON);
        assert!(finding(Dimension::Validity, -0.3).score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_dimension_score_mean() {
        let report = QualityReport::from_findings(vec![
            finding(Dimension::Completeness, 1.0),
            finding(Dimension::Completeness, 0.5),
        ]);
        let score = report.dimension_score(Dimension::Completeness).unwrap();
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_unevaluated_dimension_is_none_not_zero() {
        let report = QualityReport::from_findings(vec![finding(Dimension::Completeness, 0.9)]);
        assert_eq!(report.dimension_score(Dimension::Bias), None);

        let json = report.to_json_value();
        assert!(json["dimensions"]["bias"]["score"].is_null());
        assert!(json["dimensions"]["completeness"]["score"].is_f64());
    }

    #[test]
    fn test_has_critical() {
        let mut report = QualityReport::from_findings(vec![finding(Dimension::Validity, 0.9)]);
        assert!(!report.has_critical());
        report.findings.push(QualityFinding::new(
            Dimension::Validity,
            "age",
            Severity::Critical,
            "bad",
            0.1,
        ));
        assert!(report.has_critical());
    }

    #[test]
    fn test_json_shape() {
        let report = QualityReport::from_findings(vec![QualityFinding::new(
            Dimension::Consistency,
            "sex",
            Severity::Warning,
            "3 of 4 values diverge from canonical form",
            0.25,
        )]);
        let json = report.to_json_value();
        let findings = json["dimensions"]["consistency"]["findings"]
            .as_array()
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0]["severity"], "warning");
        assert_eq!(findings[0]["columns"][0], "sex");
        assert!(json["dimensions"]["validity"]["findings"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_not_applicable_helper() {
        let finding =
            QualityFinding::not_applicable(Dimension::Validity, "notes", "column is all missing");
        assert_eq!(finding.severity, Severity::Info);
        assert!(finding.message.contains("not applicable"));
        assert!((finding.score - 1.0).abs() < f64::EPSILON);
    }
}
