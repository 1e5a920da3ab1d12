//! Declared-range violations and IQR-rule outliers in numeric columns.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use super::{severity_for_score, QualityCheck};
use crate::{
    config::CheckConfig,
    error::Result,
    report::{Dimension, QualityFinding, Severity},
    stats,
    table::Table,
};

/// Minimum non-missing values before the outlier rule is meaningful.
const MIN_OUTLIER_SAMPLES: usize = 4;

/// Range violations above this ratio escalate from warning to critical.
const RANGE_CRITICAL_RATIO: f64 = 0.05;

/// Checks numeric columns against their declared range (when the schema
/// supplies one) and flags statistical outliers with the IQR rule: a
/// value is an outlier when it falls outside
/// `[Q1 - k*IQR, Q3 + k*IQR]` (closed interval, so values exactly on a
/// fence are not outliers). Quartiles use linear interpolation.
#[derive(Debug, Clone)]
pub struct ValidityCheck {
    config: CheckConfig,
}

impl ValidityCheck {
    /// Create the check with the given fence multiplier.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Outlier fences `(lower, upper)` for an ascending-sorted sample.
    #[must_use]
    pub fn fences(&self, sorted: &[f64]) -> Option<(f64, f64)> {
        let q1 = stats::quantile(sorted, 0.25)?;
        let q3 = stats::quantile(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some((
            q1 - self.config.iqr_multiplier * iqr,
            q3 + self.config.iqr_multiplier * iqr,
        ))
    }

    fn range_finding(
        &self,
        name: &str,
        values: &[f64],
        row_count: usize,
        min: Option<f64>,
        max: Option<f64>,
    ) -> QualityFinding {
        let violations = values
            .iter()
            .filter(|&&v| min.is_some_and(|m| v < m) || max.is_some_and(|m| v > m))
            .count();
        let ratio = violations as f64 / row_count as f64;
        let score = 1.0 - ratio;

        // A declared range is a hard contract: any violation is at least
        // a warning, regardless of the score ladder.
        let severity = if violations == 0 {
            Severity::Info
        } else if ratio > RANGE_CRITICAL_RATIO {
            Severity::Critical
        } else {
            Severity::Warning
        };

        let bounds = match (min, max) {
            (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
            (Some(lo), None) => format!("[{lo}, +inf)"),
            (None, Some(hi)) => format!("(-inf, {hi}]"),
            (None, None) => String::from("(unbounded)"),
        };
        QualityFinding::new(
            Dimension::Validity,
            name,
            severity,
            format!("{name}: {violations} values outside declared range {bounds}"),
            score,
        )
    }

    fn outlier_finding(&self, name: &str, values: &[f64], row_count: usize) -> QualityFinding {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let Some((lower, upper)) = self.fences(&sorted) else {
            return QualityFinding::not_applicable(Dimension::Validity, name, "no numeric values");
        };

        let outliers = values.iter().filter(|&&v| v < lower || v > upper).count();
        let score = 1.0 - outliers as f64 / row_count as f64;

        QualityFinding::new(
            Dimension::Validity,
            name,
            severity_for_score(score, &self.config),
            format!("{name}: {outliers} outliers outside [{lower:.2}, {upper:.2}]"),
            score,
        )
    }
}

impl QualityCheck for ValidityCheck {
    fn dimension(&self) -> Dimension {
        Dimension::Validity
    }

    fn name(&self) -> &'static str {
        "validity"
    }

    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>> {
        let mut findings = Vec::new();

        for column in table.columns() {
            let Some(values) = column.numeric() else {
                continue;
            };

            let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
            if present.is_empty() {
                findings.push(QualityFinding::not_applicable(
                    self.dimension(),
                    column.name(),
                    "column is entirely missing",
                ));
                continue;
            }

            if column.spec.has_range() {
                findings.push(self.range_finding(
                    column.name(),
                    &present,
                    table.row_count(),
                    column.spec.min,
                    column.spec.max,
                ));
            }

            if present.len() < MIN_OUTLIER_SAMPLES {
                findings.push(QualityFinding::not_applicable(
                    self.dimension(),
                    column.name(),
                    format!("fewer than {MIN_OUTLIER_SAMPLES} values for the outlier rule"),
                ));
                continue;
            }

            findings.push(self.outlier_finding(column.name(), &present, table.row_count()));
        }

        Ok(findings)
    }
}
