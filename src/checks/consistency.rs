//! Formatting divergence within categorical columns, plus exact
//! duplicate-row detection.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::HashSet;

use super::{severity_for_score, QualityCheck};
use crate::{
    config::CheckConfig,
    error::Result,
    report::{Dimension, QualityFinding},
    schema::SemanticType,
    table::Table,
};

/// Detects case mismatches, stray whitespace and abbreviated synonyms in
/// categorical columns by normalizing every value to a canonical form and
/// counting how many raw values already match it. Reports only; never
/// rewrites the data.
///
/// The canonical form of a value is: trim, lowercase, expand a known
/// abbreviation (config dictionary), then title-case - except that
/// values with no lowercase letters and no expansion (codes like "GP")
/// keep their trimmed form, so all-caps category codes are not punished.
#[derive(Debug, Clone)]
pub struct ConsistencyCheck {
    config: CheckConfig,
}

impl ConsistencyCheck {
    /// Create the check with the given configuration.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Canonical form of a raw value.
    #[must_use]
    pub fn canonical(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();

        if let Some(expansion) = self.config.synonyms.get(&lower) {
            return title_case(expansion);
        }
        if trimmed.chars().any(char::is_lowercase) {
            return title_case(&lower);
        }
        trimmed.to_string()
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl QualityCheck for ConsistencyCheck {
    fn dimension(&self) -> Dimension {
        Dimension::Consistency
    }

    fn name(&self) -> &'static str {
        "consistency"
    }

    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>> {
        let mut findings = Vec::new();

        for column in table.columns() {
            if column.semantic_type() != SemanticType::Categorical {
                continue;
            }
            let Some(values) = column.text() else {
                continue;
            };

            let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
            if present.is_empty() {
                findings.push(QualityFinding::not_applicable(
                    self.dimension(),
                    column.name(),
                    "column is entirely missing",
                ));
                continue;
            }

            let consistent = present
                .iter()
                .filter(|raw| self.canonical(raw) == **raw)
                .count();
            let divergent = present.len() - consistent;
            let score = consistent as f64 / present.len() as f64;

            findings.push(QualityFinding::new(
                self.dimension(),
                column.name(),
                severity_for_score(score, &self.config),
                format!(
                    "{}: {} of {} values diverge from canonical form",
                    column.name(),
                    divergent,
                    present.len()
                ),
                score,
            ));
        }

        if let Some(finding) = self.duplicate_rows(table) {
            findings.push(finding);
        }

        Ok(findings)
    }
}

impl ConsistencyCheck {
    /// Exact duplicate-row finding, or `None` when every row is unique.
    fn duplicate_rows(&self, table: &Table) -> Option<QualityFinding> {
        if table.is_empty() {
            return None;
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(table.row_count());
        let mut duplicates = 0usize;
        for i in 0..table.row_count() {
            let key = table
                .row_as_text(i)
                .into_iter()
                .map(|cell| cell.unwrap_or_else(|| "\u{0}".to_string()))
                .collect::<Vec<_>>()
                .join("\u{1f}");
            if !seen.insert(key) {
                duplicates += 1;
            }
        }

        if duplicates == 0 {
            return None;
        }

        let ratio = duplicates as f64 / table.row_count() as f64;
        let score = 1.0 - ratio;
        Some(QualityFinding::table_level(
            self.dimension(),
            severity_for_score(score, &self.config),
            format!(
                "{} exact duplicate rows out of {} ({:.1}%)",
                duplicates,
                table.row_count(),
                ratio * 100.0
            ),
            score,
        ))
    }
}
