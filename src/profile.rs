//! Per-column summary profiles.
//!
//! A [`ColumnProfile`] is a derived, read-only summary of one column:
//! missing/distinct counts, numeric min/max/mean, category frequencies.
//! Profiles are recomputed on demand and never cached.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    schema::SemanticType,
    stats,
    table::{Column, ColumnValues, Table},
};

/// Summary statistics for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Declared semantic type.
    pub semantic_type: SemanticType,
    /// Total row count.
    pub row_count: usize,
    /// Missing cell count.
    pub missing_count: usize,
    /// Distinct non-missing value count.
    pub distinct_count: usize,
    /// Minimum value (numeric columns with data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value (numeric columns with data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Mean value (numeric columns with data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    /// Value frequencies, most frequent first, ties by value
    /// (textual columns only).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub categories: Vec<(String, usize)>,
}

impl ColumnProfile {
    /// Compute a profile for one column.
    #[must_use]
    pub fn compute(column: &Column) -> Self {
        let row_count = column.values.len();
        let missing_count = column.values.missing_count();

        match &column.values {
            ColumnValues::Numeric(values) => {
                let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
                let mut distinct: Vec<u64> = present.iter().map(|v| v.to_bits()).collect();
                distinct.sort_unstable();
                distinct.dedup();

                let min = present.iter().copied().fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.min(v)))
                });
                let max = present.iter().copied().fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.max(v)))
                });

                Self {
                    name: column.name().to_string(),
                    semantic_type: column.semantic_type(),
                    row_count,
                    missing_count,
                    distinct_count: distinct.len(),
                    min,
                    max,
                    mean: stats::mean(&present),
                    categories: Vec::new(),
                }
            }
            ColumnValues::Text(values) => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for value in values.iter().flatten() {
                    *counts.entry(value.as_str()).or_insert(0) += 1;
                }

                let mut categories: Vec<(String, usize)> = counts
                    .into_iter()
                    .map(|(v, c)| (v.to_string(), c))
                    .collect();
                categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

                Self {
                    name: column.name().to_string(),
                    semantic_type: column.semantic_type(),
                    row_count,
                    missing_count,
                    distinct_count: categories.len(),
                    min: None,
                    max: None,
                    mean: None,
                    categories,
                }
            }
        }
    }

    /// Profiles for every column of a table, in schema order.
    #[must_use]
    pub fn for_table(table: &Table) -> Vec<Self> {
        table.columns().iter().map(Self::compute).collect()
    }

    /// Missing rate in [0, 1].
    #[must_use]
    pub fn missing_rate(&self) -> f64 {
        if self.row_count == 0 {
            return 0.0;
        }
        self.missing_count as f64 / self.row_count as f64
    }

    /// Whether every cell of the column is missing.
    #[must_use]
    pub fn is_all_missing(&self) -> bool {
        self.row_count > 0 && self.missing_count == self.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::{ColumnSpec, TableSchema},
        table::Table,
    };

    fn table() -> Table {
        use std::sync::Arc;

        use arrow::{
            array::{Float64Array, RecordBatch, StringArray},
            datatypes::{DataType, Field, Schema},
        };

        let schema = Arc::new(Schema::new(vec![
            Field::new("g", DataType::Float64, true),
            Field::new("school", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![
                    Some(10.0),
                    Some(14.0),
                    None,
                    Some(10.0),
                ])),
                Arc::new(StringArray::from(vec![
                    Some("GP"),
                    Some("GP"),
                    Some("MS"),
                    None,
                ])),
            ],
        )
        .unwrap();

        Table::from_batches(
            &[batch],
            TableSchema::new(vec![
                ColumnSpec::new("g", SemanticType::Numeric),
                ColumnSpec::new("school", SemanticType::Categorical),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_profile() {
        let table = table();
        let profile = ColumnProfile::compute(table.column("g").unwrap());
        assert_eq!(profile.row_count, 4);
        assert_eq!(profile.missing_count, 1);
        assert_eq!(profile.distinct_count, 2);
        assert_eq!(profile.min, Some(10.0));
        assert_eq!(profile.max, Some(14.0));
        assert!((profile.mean.unwrap() - 34.0 / 3.0).abs() < 1e-12);
        assert!((profile.missing_rate() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_profile() {
        let table = table();
        let profile = ColumnProfile::compute(table.column("school").unwrap());
        assert_eq!(profile.distinct_count, 2);
        assert_eq!(profile.categories[0], ("GP".to_string(), 2));
        assert_eq!(profile.categories[1], ("MS".to_string(), 1));
        assert!(profile.min.is_none());
    }

    #[test]
    fn test_for_table_order() {
        let table = table();
        let profiles = ColumnProfile::for_table(&table);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "g");
        assert_eq!(profiles[1].name, "school");
    }

    #[test]
    fn test_all_missing_detection() {
        use std::sync::Arc;

        use arrow::{
            array::{Float64Array, RecordBatch},
            datatypes::{DataType, Field, Schema},
        };

        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Float64, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(vec![None, None] as Vec<Option<f64>>))],
        )
        .unwrap();
        let table = Table::from_batches(
            &[batch],
            TableSchema::new(vec![ColumnSpec::new("x", SemanticType::Numeric)]),
        )
        .unwrap();

        let profile = ColumnProfile::compute(table.column("x").unwrap());
        assert!(profile.is_all_missing());
        assert!((profile.missing_rate() - 1.0).abs() < f64::EPSILON);
    }
}
