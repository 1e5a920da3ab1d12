//! calidad - Tabular Data Quality Assessment in Pure Rust
//!
//! Loads tabular files (CSV/TSV/Parquet) into typed in-memory tables and
//! assesses them along five quality dimensions: completeness,
//! consistency, validity, bias and feature quality. The output is a
//! structured report with per-finding severities and per-dimension
//! scores, serializable as stable JSON.
//!
//! # Design Principles
//!
//! 1. **Assess, never mutate** - checks report on the data as loaded;
//!    nothing is imputed, dropped or rewritten
//! 2. **Pure Rust** - No Python, no FFI
//! 3. **Ecosystem aligned** - Arrow 53, Parquet 53
//! 4. **Degenerate input is a finding, not a crash** - all-missing
//!    columns and tiny samples yield "not applicable" findings
//!
//! # Quick Start
//!
//! ```no_run
//! use calidad::{QualityPipeline, TableLoader};
//!
//! let table = TableLoader::new().load("data/students.csv").unwrap();
//! let report = QualityPipeline::new().run(&table).unwrap();
//!
//! for finding in &report.findings {
//!     println!("[{}] {}", finding.severity, finding.message);
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::redundant_clone,
        clippy::too_many_lines,
        clippy::float_cmp,
        clippy::similar_names,
        clippy::unreadable_literal
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::map_unwrap_or)]

pub mod checks;
/// CLI module for command-line interface
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profile;
pub mod render;
pub mod report;
pub mod schema;
pub mod stats;
pub mod table;

// Re-export arrow types commonly needed
pub use arrow::{array::RecordBatch, datatypes::Schema as ArrowSchema};

pub use checks::{
    BiasCheck, CompletenessCheck, ConsistencyCheck, FeatureRanker, FeatureRanking, QualityCheck,
    ValidityCheck,
};
pub use config::CheckConfig;
pub use error::{Error, Result};
pub use loader::TableLoader;
pub use pipeline::QualityPipeline;
pub use profile::ColumnProfile;
pub use render::{ChartRenderer, TextRenderer};
pub use report::{Dimension, QualityFinding, QualityReport, Severity};
pub use schema::{ColumnSpec, SemanticType, TableSchema};
pub use table::{Column, ColumnValues, Table};
