//! Presentation boundary for assessment results.
//!
//! Everything visual sits behind [`ChartRenderer`] so the pipeline stays
//! free of presentation concerns. The built-in [`TextRenderer`] writes a
//! plain-text summary; richer backends plug in behind the same trait.

use std::io::Write;

use crate::{
    error::Result,
    report::{QualityReport, Severity},
    table::Table,
};

/// Renders an assessed table and its report to some presentation medium.
pub trait ChartRenderer {
    /// Render the report for a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails (e.g. I/O).
    fn render(&mut self, table: &Table, report: &QualityReport) -> Result<()>;
}

/// Plain-text renderer over any [`Write`] sink.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    /// Wrap a sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => " ",
        Severity::Warning => "!",
        Severity::Critical => "X",
    }
}

impl<W: Write> ChartRenderer for TextRenderer<W> {
    fn render(&mut self, table: &Table, report: &QualityReport) -> Result<()> {
        writeln!(
            self.writer,
            "Quality report: {} rows, {} columns",
            table.row_count(),
            table.columns().len()
        )?;
        writeln!(self.writer)?;

        for (dimension, summary) in report.summaries() {
            match summary.score {
                Some(score) => {
                    writeln!(self.writer, "{:<16} {score:.3}", dimension.name())?;
                }
                None => writeln!(self.writer, "{:<16} not evaluated", dimension.name())?,
            }
            for finding in &summary.findings {
                writeln!(
                    self.writer,
                    "  {} {}",
                    severity_marker(finding.severity),
                    finding.message
                )?;
            }
        }

        if let Some(ranking) = &report.feature_ranking {
            if let Some(target) = &ranking.target {
                writeln!(self.writer)?;
                writeln!(self.writer, "Feature correlation with {target}:")?;
                for correlation in &ranking.target_correlations {
                    writeln!(
                        self.writer,
                        "  {:<16} {:+.3}",
                        correlation.feature, correlation.r
                    )?;
                }
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}
