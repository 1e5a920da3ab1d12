//! Runs the check battery over a table and assembles the report.

use crate::{
    checks::{default_checks, FeatureRanker, QualityCheck},
    config::CheckConfig,
    error::Result,
    report::{QualityFinding, QualityReport, Severity},
    table::Table,
};

/// Drives the default check battery over a loaded [`Table`].
///
/// Checks run sequentially in report order. A check returning an error
/// does not abort the run: the error becomes a critical finding in that
/// check's dimension and the remaining checks still execute. Only a
/// misconfigured [`CheckConfig`] is fatal.
#[derive(Debug, Clone, Default)]
pub struct QualityPipeline {
    config: CheckConfig,
}

impl QualityPipeline {
    /// Pipeline with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with custom thresholds.
    #[must_use]
    pub fn with_config(config: CheckConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run every check and assemble the report.
    ///
    /// # Errors
    ///
    /// Returns an error only when the configuration is invalid.
    pub fn run(&self, table: &Table) -> Result<QualityReport> {
        self.config.validate()?;

        let findings = Self::collect_findings(table, default_checks(&self.config))?;
        let ranking = FeatureRanker::new(&self.config).rank(table);
        Ok(QualityReport::from_findings(findings).with_feature_ranking(ranking))
    }

    /// Run each check, downgrading non-fatal errors to critical findings.
    fn collect_findings(
        table: &Table,
        checks: Vec<Box<dyn QualityCheck>>,
    ) -> Result<Vec<QualityFinding>> {
        let mut findings = Vec::new();
        for check in checks {
            match check.run(table) {
                Ok(batch) => findings.extend(batch),
                Err(error) if !error.is_fatal() => {
                    findings.push(QualityFinding::table_level(
                        check.dimension(),
                        Severity::Critical,
                        format!("{} check failed: {error}", check.name()),
                        0.0,
                    ));
                }
                Err(error) => return Err(error),
            }
        }
        Ok(findings)
    }
}
