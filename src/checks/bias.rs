//! Subgroup outcome skew across designated demographic columns.

use std::collections::HashMap;

use super::QualityCheck;
use crate::{
    config::CheckConfig,
    error::Result,
    report::{Dimension, QualityFinding, Severity},
    stats,
    table::{Column, ColumnValues, Table},
};

/// Compares each outcome column's distribution across the values of each
/// group column. Numeric outcomes compare group means (dispersion = max
/// pairwise mean gap normalized by the overall outcome range); categorical
/// outcomes compare frequency tables (dispersion = max pairwise
/// total-variation distance). Groups below the minimum sample count are
/// excluded and reported as "insufficient data".
#[derive(Debug, Clone)]
pub struct BiasCheck {
    config: CheckConfig,
}

impl BiasCheck {
    /// Create the check with the given thresholds.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn severity_for_dispersion(&self, dispersion: f64) -> Severity {
        if dispersion > self.config.bias_critical_dispersion {
            Severity::Critical
        } else if dispersion > self.config.bias_warning_dispersion {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    /// Findings for one (group column, outcome column) pair.
    fn pair_findings(
        &self,
        table: &Table,
        group_name: &str,
        outcome_name: &str,
    ) -> Vec<QualityFinding> {
        let pair = vec![group_name.to_string(), outcome_name.to_string()];

        let Some(group_column) = table.column(group_name) else {
            return vec![QualityFinding::not_applicable(
                Dimension::Bias,
                group_name,
                "group column not found",
            )];
        };
        let Some(group_values) = group_column.text() else {
            return vec![QualityFinding::not_applicable(
                Dimension::Bias,
                group_name,
                "group column is not categorical",
            )];
        };
        let Some(outcome_column) = table.column(outcome_name) else {
            return vec![QualityFinding::not_applicable(
                Dimension::Bias,
                outcome_name,
                "outcome column not found",
            )];
        };

        // Partition row indices by group value, in sorted group order for
        // deterministic output.
        let mut partitions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row, value) in group_values.iter().enumerate() {
            if let Some(value) = value {
                partitions.entry(value.as_str()).or_default().push(row);
            }
        }
        let mut group_keys: Vec<&str> = partitions.keys().copied().collect();
        group_keys.sort_unstable();

        let mut findings = Vec::new();
        let mut eligible: Vec<&str> = Vec::new();
        for &key in &group_keys {
            let size = partitions[key].len();
            if size < self.config.min_group_size {
                findings.push(
                    QualityFinding::new(
                        Dimension::Bias,
                        group_name,
                        Severity::Info,
                        format!(
                            "{outcome_name} by {group_name}: group '{key}' has {size} rows \
                             (< {}), insufficient data",
                            self.config.min_group_size
                        ),
                        1.0,
                    )
                    .with_columns(pair.clone()),
                );
            } else {
                eligible.push(key);
            }
        }

        if eligible.len() < 2 {
            findings.push(
                QualityFinding::new(
                    Dimension::Bias,
                    group_name,
                    Severity::Info,
                    format!(
                        "{outcome_name} by {group_name}: not applicable \
                         (fewer than two groups with enough samples)"
                    ),
                    1.0,
                )
                .with_columns(pair),
            );
            return findings;
        }

        let dispersion = match &outcome_column.values {
            ColumnValues::Numeric(_) => {
                self.numeric_dispersion(outcome_column, &partitions, &eligible)
            }
            ColumnValues::Text(_) => {
                self.categorical_dispersion(outcome_column, &partitions, &eligible)
            }
        };

        match dispersion {
            Some(dispersion) => findings.push(
                QualityFinding::new(
                    Dimension::Bias,
                    group_name,
                    self.severity_for_dispersion(dispersion),
                    format!(
                        "{outcome_name} by {group_name}: dispersion {dispersion:.3} across \
                         {} groups",
                        eligible.len()
                    ),
                    (1.0 - dispersion).clamp(0.0, 1.0),
                )
                .with_columns(pair),
            ),
            None => findings.push(
                QualityFinding::new(
                    Dimension::Bias,
                    group_name,
                    Severity::Info,
                    format!(
                        "{outcome_name} by {group_name}: not applicable \
                         (outcome has no usable values)"
                    ),
                    1.0,
                )
                .with_columns(pair),
            ),
        }

        findings
    }

    /// Max pairwise gap between group means, normalized by the overall
    /// outcome range. `None` when the outcome has no values; 0 when the
    /// outcome is constant.
    fn numeric_dispersion(
        &self,
        outcome: &Column,
        partitions: &HashMap<&str, Vec<usize>>,
        eligible: &[&str],
    ) -> Option<f64> {
        let values = outcome.numeric()?;

        let all: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        let overall_min = all.iter().copied().fold(f64::INFINITY, f64::min);
        let overall_max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if all.is_empty() {
            return None;
        }
        let range = overall_max - overall_min;

        let mut means = Vec::with_capacity(eligible.len());
        for key in eligible {
            let group: Vec<f64> = partitions[key]
                .iter()
                .filter_map(|&row| values[row])
                .collect();
            if let Some(mean) = stats::mean(&group) {
                means.push(mean);
            }
        }
        if means.len() < 2 {
            return None;
        }

        let max_mean = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_mean = means.iter().copied().fold(f64::INFINITY, f64::min);
        if range == 0.0 {
            return Some(0.0);
        }
        Some((max_mean - min_mean) / range)
    }

    /// Max pairwise total-variation distance between group frequency
    /// tables. `None` when no group has usable outcome values.
    fn categorical_dispersion(
        &self,
        outcome: &Column,
        partitions: &HashMap<&str, Vec<usize>>,
        eligible: &[&str],
    ) -> Option<f64> {
        let values = outcome.text()?;

        let mut tables: Vec<HashMap<String, usize>> = Vec::with_capacity(eligible.len());
        for key in eligible {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for &row in &partitions[key] {
                if let Some(value) = &values[row] {
                    *counts.entry(value.clone()).or_insert(0) += 1;
                }
            }
            if !counts.is_empty() {
                tables.push(counts);
            }
        }
        if tables.len() < 2 {
            return None;
        }

        let mut max_distance = 0.0f64;
        for i in 0..tables.len() {
            for j in (i + 1)..tables.len() {
                max_distance = max_distance.max(stats::total_variation(&tables[i], &tables[j]));
            }
        }
        Some(max_distance)
    }
}

impl QualityCheck for BiasCheck {
    fn dimension(&self) -> Dimension {
        Dimension::Bias
    }

    fn name(&self) -> &'static str {
        "bias"
    }

    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>> {
        let schema = table.schema();
        let mut findings = Vec::new();

        for group in &schema.groups {
            for outcome in &schema.outcomes {
                findings.extend(self.pair_findings(table, group, outcome));
            }
        }

        Ok(findings)
    }
}
