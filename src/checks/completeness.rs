//! Missing-value rates per column.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use super::{severity_for_score, QualityCheck};
use crate::{
    config::CheckConfig,
    error::Result,
    profile::ColumnProfile,
    report::{Dimension, QualityFinding, Severity},
    table::Table,
};

/// Measures `missing_rate = missing_count / row_count` for every column
/// and scores each as `1 - missing_rate`.
#[derive(Debug, Clone)]
pub struct CompletenessCheck {
    config: CheckConfig,
}

impl CompletenessCheck {
    /// Create the check with the given thresholds.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl QualityCheck for CompletenessCheck {
    fn dimension(&self) -> Dimension {
        Dimension::Completeness
    }

    fn name(&self) -> &'static str {
        "completeness"
    }

    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>> {
        let mut findings = Vec::with_capacity(table.columns().len());

        for column in table.columns() {
            let profile = ColumnProfile::compute(column);

            if profile.is_all_missing() {
                findings.push(QualityFinding::new(
                    self.dimension(),
                    column.name(),
                    Severity::Critical,
                    format!("{}: column is entirely missing", column.name()),
                    0.0,
                ));
                continue;
            }

            let score = 1.0 - profile.missing_rate();
            findings.push(QualityFinding::new(
                self.dimension(),
                column.name(),
                severity_for_score(score, &self.config),
                format!(
                    "{}: {} of {} values missing ({:.1}%)",
                    column.name(),
                    profile.missing_count,
                    profile.row_count,
                    profile.missing_rate() * 100.0
                ),
                score,
            ));
        }

        Ok(findings)
    }
}
