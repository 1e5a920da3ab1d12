//! The quality checks.
//!
//! Every check implements [`QualityCheck`]: a pure function of the
//! [`Table`] producing findings for one dimension. Checks never mutate
//! the table and never abort the run; the pipeline converts a check's
//! error into a critical finding and keeps going.

mod bias;
mod completeness;
mod consistency;
pub mod features;
mod validity;


pub use bias::BiasCheck;
pub use completeness::CompletenessCheck;
pub use consistency::ConsistencyCheck;
pub use features::{FeatureRanker, FeatureRanking};
pub use validity::ValidityCheck;

use crate::{
    config::CheckConfig,
    error::Result,
    report::{Dimension, QualityFinding, Severity},
    table::Table,
};

/// A single quality check over an immutable table.
pub trait QualityCheck {
    /// The dimension this check reports under.
    fn dimension(&self) -> Dimension;

    /// Human-readable check name, used in "check failed" findings.
    fn name(&self) -> &'static str;

    /// Run the check against a read-only view of the table.
    ///
    /// # Errors
    ///
    /// A check may fail wholesale (e.g. a role column of the wrong
    /// type); the pipeline downgrades such errors to critical findings.
    fn run(&self, table: &Table) -> Result<Vec<QualityFinding>>;
}

/// The severity ladder for score-scaled findings.
pub(crate) fn severity_for_score(score: f64, config: &CheckConfig) -> Severity {
    if score >= config.score_info_cutoff {
        Severity::Info
    } else if score >= config.score_warning_cutoff {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// The default check battery, in report order.
#[must_use]
pub fn default_checks(config: &CheckConfig) -> Vec<Box<dyn QualityCheck>> {
    vec![
        Box::new(CompletenessCheck::new(config)),
        Box::new(ConsistencyCheck::new(config)),
        Box::new(ValidityCheck::new(config)),
        Box::new(BiasCheck::new(config)),
        Box::new(FeatureRanker::new(config)),
    ]
}
