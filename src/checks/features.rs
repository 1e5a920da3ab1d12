//! Advisory correlation ranking of numeric features.

use serde::{Deserialize, Serialize};

use super::QualityCheck;
use crate::{
    config::CheckConfig,
    error::Result,
    report::{Dimension, QualityFinding, Severity},
    schema::SemanticType,
    stats,
    table::Table,
};

/// Correlation between a feature and the target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCorrelation {
    /// Feature column name.
    pub feature: String,
    /// Pearson correlation with the target over pairwise-complete rows.
    pub r: f64,
}

/// Correlation between two feature columns, with `left < right` lexically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    /// Lexically smaller column name.
    pub left: String,
    /// Lexically larger column name.
    pub right: String,
    /// Pearson correlation over pairwise-complete rows.
    pub r: f64,
}

impl CorrelationPair {
    fn new(a: &str, b: &str, r: f64) -> Self {
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        Self {
            left: left.to_string(),
            right: right.to_string(),
            r,
        }
    }
}

/// The advisory output of the feature ranking: how strongly each numeric
/// feature tracks the target, which features barely track it, and which
/// feature pairs are near-duplicates of each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRanking {
    /// Every numeric column pair with a defined correlation, ranked by
    /// `|r|` descending, ties broken by lexical pair order.
    pub pairs: Vec<CorrelationPair>,
    /// Target column the ranking is computed against, when one was
    /// designated and numeric.
    pub target: Option<String>,
    /// Features ranked by `|r|` descending, ties broken by name.
    pub target_correlations: Vec<TargetCorrelation>,
    /// Features whose `|r|` with the target falls below the weak cutoff.
    pub weak_features: Vec<String>,
    /// Feature pairs whose mutual `|r|` exceeds the collinear cutoff.
    pub collinear_pairs: Vec<CorrelationPair>,
}

/// Ranks numeric feature columns by correlation with a designated target
/// and flags weakly-correlated and collinear features. Purely advisory:
/// every finding it emits is informational and scores 1.0, so it never
/// drags a dimension score down.
#[derive(Debug, Clone)]
pub struct FeatureRanker {
    config: CheckConfig,
}

impl FeatureRanker {
    /// Create the ranker with the given correlation cutoffs.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Compute the ranking for a table.
    ///
    /// Only columns typed numeric participate; identifier columns are
    /// excluded even when stored as numbers. Each correlation uses the
    /// rows where both columns are present (pairwise-complete), so a
    /// hole in one column does not discard the row for other pairs.
    #[must_use]
    pub fn rank(&self, table: &Table) -> FeatureRanking {
        let numeric: Vec<(&str, &[Option<f64>])> = table
            .columns()
            .iter()
            .filter(|c| c.semantic_type() == SemanticType::Numeric)
            .filter_map(|c| Some((c.name(), c.numeric()?)))
            .collect();

        let mut ranking = FeatureRanking::default();

        // Every pair among the numeric columns, target included.
        for i in 0..numeric.len() {
            for j in (i + 1)..numeric.len() {
                let (a_name, a) = numeric[i];
                let (b_name, b) = numeric[j];
                if let Some(r) = pairwise_pearson(a, b) {
                    ranking.pairs.push(CorrelationPair::new(a_name, b_name, r));
                }
            }
        }
        ranking.pairs.sort_by(|a, b| {
            b.r.abs()
                .partial_cmp(&a.r.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (&a.left, &a.right).cmp(&(&b.left, &b.right)))
        });

        ranking.collinear_pairs = ranking
            .pairs
            .iter()
            .filter(|p| p.r.abs() > self.config.collinear_correlation)
            .cloned()
            .collect();

        let Some(target_name) = table.schema().target.as_deref() else {
            return ranking;
        };
        let Some((_, target)) = numeric.iter().find(|(name, _)| *name == target_name) else {
            return ranking;
        };
        ranking.target = Some(target_name.to_string());

        for (name, values) in &numeric {
            if *name == target_name {
                continue;
            }
            if let Some(r) = pairwise_pearson(values, target) {
                ranking.target_correlations.push(TargetCorrelation {
                    feature: (*name).to_string(),
                    r,
                });
            }
        }
        ranking.target_correlations.sort_by(|a, b| {
            b.r.abs()
                .partial_cmp(&a.r.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.feature.cmp(&b.feature))
        });

        ranking.weak_features = ranking
            .target_correlations
            .iter()
            .filter(|c| c.r.abs() < self.config.weak_correlation)
            .map(|c| c.feature.clone())
            .collect();

        ranking
    }
}

/// Pearson correlation over the rows where both columns are present.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            xs.push(*x);
            ys.push(*y);
        }
    }
    stats::pearson(&xs, &ys)
}

impl QualityCheck for FeatureRanker {
    fn dimension(&self) -> Dimension {
        Dimension::FeatureQuality
    }

    fn name(&self) -> &'static str {
        "feature_quality"
    }

    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>> {
        let ranking = self.rank(table);
        let mut findings = Vec::new();

        for pair in &ranking.collinear_pairs {
            findings.push(
                QualityFinding::new(
                    self.dimension(),
                    &pair.left,
                    Severity::Info,
                    format!(
                        "{} and {} are nearly collinear (r = {:.3}); one may be redundant",
                        pair.left, pair.right, pair.r
                    ),
                    1.0,
                )
                .with_columns(vec![pair.left.clone(), pair.right.clone()]),
            );
        }

        if let Some(target) = &ranking.target {
            for correlation in &ranking.target_correlations {
                if ranking.weak_features.contains(&correlation.feature) {
                    findings.push(QualityFinding::new(
                        self.dimension(),
                        &correlation.feature,
                        Severity::Info,
                        format!(
                            "{}: weak correlation with {target} (r = {:.3})",
                            correlation.feature, correlation.r
                        ),
                        1.0,
                    ));
                }
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::tests::{table_from_columns, table_with_roles};

    fn ranker() -> FeatureRanker {
        FeatureRanker::new(&CheckConfig::default())
    }

    #[test]
    fn test_ranking_orders_by_absolute_r() {
        let target: Vec<Option<f64>> = (0..8).map(|i| Some(f64::from(i))).collect();
        // strong negative, strong positive, weak
        let neg: Vec<Option<f64>> = (0..8).map(|i| Some(f64::from(-i) * 2.0)).collect();
        let pos: Vec<Option<f64>> = (0..8).map(|i| Some(f64::from(i) + 0.1)).collect();
        let noise: Vec<Option<f64>> = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]
            .iter()
            .map(|v| Some(*v))
            .collect();

        let table = table_with_roles(
            &[("a_neg", &neg), ("b_pos", &pos), ("noise", &noise), ("g3", &target)],
            &[],
            &[],
            &[],
        )
        .with_target("g3");

        let ranking = ranker().rank(&table);
        assert_eq!(ranking.target.as_deref(), Some("g3"));
        let order: Vec<&str> = ranking
            .target_correlations
            .iter()
            .map(|c| c.feature.as_str())
            .collect();
        // Perfectly correlated features first (tie broken by name), noise last
        assert_eq!(order, vec!["a_neg", "b_pos", "noise"]);
        assert!(ranking.target_correlations[0].r < 0.0);
    }

    #[test]
    fn test_collinear_pair_ordered_and_flagged() {
        let x: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i))).collect();
        let y: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i) * 2.0 + 1.0)).collect();
        let table = table_from_columns(&[("zeta", &x), ("alpha", &y)], &[]);

        let ranking = ranker().rank(&table);
        assert_eq!(ranking.collinear_pairs.len(), 1);
        assert_eq!(ranking.collinear_pairs[0].left, "alpha");
        assert_eq!(ranking.collinear_pairs[0].right, "zeta");

        let findings = ranker().run(&table).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!((findings[0].score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pair_ranking_is_deterministic() {
        let a: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i))).collect();
        let b: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i) * 2.0)).collect();
        let c: Vec<Option<f64>> = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0]
            .iter()
            .map(|v| Some(*v))
            .collect();
        let table = table_from_columns(&[("a", &a), ("b", &b), ("c", &c)], &[]);

        let ranking = ranker().rank(&table);
        let order: Vec<(&str, &str)> = ranking
            .pairs
            .iter()
            .map(|p| (p.left.as_str(), p.right.as_str()))
            .collect();
        // (a,b) is perfect; (a,c) and (b,c) share the same |r| because b
        // is an affine image of a, so the lexical tie-break decides.
        assert_eq!(order, vec![("a", "b"), ("a", "c"), ("b", "c")]);
    }

    #[test]
    fn test_weak_feature_flagged() {
        let target: Vec<Option<f64>> = (0..8).map(|i| Some(f64::from(i))).collect();
        // Chosen so the cross products cancel exactly: r is 0
        let flat: Vec<Option<f64>> = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0]
            .iter()
            .map(|v| Some(*v))
            .collect();
        let table =
            table_with_roles(&[("flat", &flat), ("g3", &target)], &[], &[], &[]).with_target("g3");

        let ranking = ranker().rank(&table);
        assert_eq!(ranking.weak_features, vec!["flat"]);

        let findings = ranker().run(&table).unwrap();
        assert!(findings
            .iter()
            .any(|f| f.message.contains("weak correlation")));
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // Row 2 is missing in `a` only; `b` vs target still uses all rows.
        let target: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i))).collect();
        let a: Vec<Option<f64>> = (0..6)
            .map(|i| (i != 2).then(|| f64::from(i) * 3.0))
            .collect();
        let b: Vec<Option<f64>> = (0..6).map(|i| Some(f64::from(i) + 2.0)).collect();
        let table =
            table_with_roles(&[("a", &a), ("b", &b), ("g3", &target)], &[], &[], &[])
                .with_target("g3");

        let ranking = ranker().rank(&table);
        assert_eq!(ranking.target_correlations.len(), 2);
        for c in &ranking.target_correlations {
            assert!((c.r - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_target_still_reports_collinearity() {
        let x: Vec<Option<f64>> = (0..5).map(|i| Some(f64::from(i))).collect();
        let y: Vec<Option<f64>> = (0..5).map(|i| Some(f64::from(i) * -1.0)).collect();
        let table = table_from_columns(&[("x", &x), ("y", &y)], &[]);

        let ranking = ranker().rank(&table);
        assert!(ranking.target.is_none());
        assert!(ranking.target_correlations.is_empty());
        assert_eq!(ranking.collinear_pairs.len(), 1);
    }

    #[test]
    fn test_constant_column_has_no_correlation() {
        let target: Vec<Option<f64>> = (0..5).map(|i| Some(f64::from(i))).collect();
        let constant: Vec<Option<f64>> = (0..5).map(|_| Some(7.0)).collect();
        let table = table_with_roles(&[("c", &constant), ("g3", &target)], &[], &[], &[])
            .with_target("g3");

        let ranking = ranker().rank(&table);
        // Zero variance: pearson is undefined, the column is skipped.
        assert!(ranking.target_correlations.is_empty());
    }
}
