//! Table schemas with semantic column types.
//!
//! A [`TableSchema`] declares, for each column, the semantic type the
//! quality checks should treat it as (numeric, categorical, datetime or
//! identifier) plus an optional declared valid range for numeric columns.
//! Schemas can be loaded from a JSON file or inferred from Arrow types.

use std::{collections::HashSet, fmt, path::Path};

use arrow::datatypes::{DataType, Schema as ArrowSchema};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Semantic type of a column, driving which checks apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Continuous or discrete numeric values.
    Numeric,
    /// Categorical / free-text values.
    Categorical,
    /// Timestamps or dates, stored as text.
    Datetime,
    /// Unique row identifiers, exempt from consistency checking.
    Identifier,
}

impl SemanticType {
    /// Infer a semantic type from an Arrow data type.
    #[must_use]
    pub fn from_arrow(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64 => Self::Numeric,
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => Self::Datetime,
            _ => Self::Categorical,
        }
    }

    /// Whether values of this type are stored as numbers.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
            Self::Datetime => write!(f, "datetime"),
            Self::Identifier => write!(f, "identifier"),
        }
    }
}

/// Specification for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    /// Declared minimum valid value (numeric columns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Declared maximum valid value (numeric columns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ColumnSpec {
    /// Create a column spec with no declared range.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            min: None,
            max: None,
        }
    }

    /// Declare a valid range for a numeric column.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Whether this spec declares any range bound.
    #[must_use]
    pub fn has_range(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Ordered column specifications plus analysis role assignments.
///
/// Roles designate which columns the bias check pairs up (`groups` x
/// `outcomes`) and which column the feature ranking correlates against
/// (`target`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Ordered column specifications.
    pub columns: Vec<ColumnSpec>,
    /// Demographic / group columns for the bias check.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Outcome columns for the bias check.
    #[serde(default)]
    pub outcomes: Vec<String>,
    /// Target column for the feature ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl TableSchema {
    /// Create a schema from column specs.
    #[must_use]
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            groups: Vec::new(),
            outcomes: Vec::new(),
            target: None,
        }
    }

    /// Infer a schema from an Arrow schema.
    #[must_use]
    pub fn from_arrow(schema: &ArrowSchema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|f| ColumnSpec::new(f.name().clone(), SemanticType::from_arrow(f.data_type())))
            .collect();
        Self::new(columns)
    }

    /// Load a schema from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// schema JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        let schema: Self =
            serde_json::from_str(&text).map_err(|e| Error::schema_file(e.to_string()))?;
        schema.validate_roles()?;
        Ok(schema)
    }

    /// Look up a column spec by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Ordered column names.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Assign bias-check group columns.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Assign bias-check outcome columns.
    #[must_use]
    pub fn with_outcomes(mut self, outcomes: Vec<String>) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Assign the feature-ranking target column.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Verify that every role assignment names a declared column.
    ///
    /// # Errors
    ///
    /// Returns a schema file error naming the first unknown column.
    pub fn validate_roles(&self) -> Result<()> {
        let known: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        for name in self
            .groups
            .iter()
            .chain(self.outcomes.iter())
            .chain(self.target.iter())
        {
            if !known.contains(name.as_str()) {
                return Err(Error::schema_file(format!(
                    "role references unknown column '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Check input column names against this schema.
    ///
    /// Both missing and extra columns are schema mismatches: the loader
    /// refuses to proceed on either, per the no-silent-repair policy.
    ///
    /// # Errors
    ///
    /// Returns a schema mismatch error listing the offending columns.
    pub fn check_columns(&self, actual: &[&str]) -> Result<()> {
        let expected: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let present: HashSet<&str> = actual.iter().copied().collect();

        let mut missing: Vec<&str> = expected.difference(&present).copied().collect();
        let mut extra: Vec<&str> = present.difference(&expected).copied().collect();
        missing.sort_unstable();
        extra.sort_unstable();

        if missing.is_empty() && extra.is_empty() {
            return Ok(());
        }

        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing columns: {missing:?}"));
        }
        if !extra.is_empty() {
            parts.push(format!("extra columns: {extra:?}"));
        }
        Err(Error::schema_mismatch(parts.join("; ")))
    }
}
