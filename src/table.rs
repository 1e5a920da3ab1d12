//! The immutable [`Table`] the quality checks run against.
//!
//! A `Table` is materialized once from Arrow RecordBatches according to a
//! [`TableSchema`]: numeric columns become `Vec<Option<f64>>`, everything
//! else `Vec<Option<String>>`. Checks only ever borrow column slices, so
//! the table is never mutated after loading.

// Statistical pipelines parse dirty input; casts are deliberate
#![allow(clippy::cast_precision_loss)]

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, RecordBatch, StringArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};

use crate::{
    error::{Error, Result},
    schema::{ColumnSpec, SemanticType, TableSchema},
};

/// Values of a single column, stored by semantic type.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    /// Numeric columns. Cells that could not be parsed as numbers are
    /// `None`, the same as genuinely missing cells.
    Numeric(Vec<Option<f64>>),
    /// Categorical, datetime and identifier columns, kept as raw text.
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of cells in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        match self {
            Self::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Self::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Cell rendered as text, for row-level comparisons.
    #[must_use]
    pub fn cell_as_text(&self, index: usize) -> Option<String> {
        match self {
            Self::Numeric(v) => v.get(index).copied().flatten().map(|x| x.to_string()),
            Self::Text(v) => v.get(index).cloned().flatten(),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone)]
pub struct Column {
    /// The column's declared spec (name, semantic type, optional range).
    pub spec: ColumnSpec,
    /// The column's values.
    pub values: ColumnValues,
}

impl Column {
    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Semantic type.
    #[must_use]
    pub fn semantic_type(&self) -> SemanticType {
        self.spec.semantic_type
    }

    /// Numeric values, or `None` for text columns.
    #[must_use]
    pub fn numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Text(_) => None,
        }
    }

    /// Text values, or `None` for numeric columns.
    #[must_use]
    pub fn text(&self) -> Option<&[Option<String>]> {
        match &self.values {
            ColumnValues::Text(v) => Some(v),
            ColumnValues::Numeric(_) => None,
        }
    }
}

/// An immutable in-memory table with semantically typed columns.
///
/// Invariant: every column holds exactly `row_count` cells.
#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Materialize a table from RecordBatches according to a schema.
    ///
    /// The batches must already have been validated against the schema
    /// (the loader does this); columns are pulled by name so the file's
    /// column order does not have to match the schema's.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema column is absent from the batches.
    pub fn from_batches(batches: &[RecordBatch], schema: TableSchema) -> Result<Self> {
        let row_count = batches.iter().map(RecordBatch::num_rows).sum();

        let mut columns = Vec::with_capacity(schema.columns.len());
        for spec in &schema.columns {
            let mut values = if spec.semantic_type.is_numeric() {
                ColumnValues::Numeric(Vec::with_capacity(row_count))
            } else {
                ColumnValues::Text(Vec::with_capacity(row_count))
            };

            for batch in batches {
                let index = batch
                    .schema()
                    .index_of(&spec.name)
                    .map_err(|_| Error::column_not_found(&spec.name))?;
                append_array(&mut values, batch.column(index));
            }

            columns.push(Column {
                spec: spec.clone(),
                values,
            });
        }

        Ok(Self {
            schema,
            columns,
            row_count,
        })
    }

    /// The table's schema.
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Assign bias-check group columns after loading.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.schema = self.schema.with_groups(groups);
        self
    }

    /// Assign bias-check outcome columns after loading.
    #[must_use]
    pub fn with_outcomes(mut self, outcomes: Vec<String>) -> Self {
        self.schema = self.schema.with_outcomes(outcomes);
        self
    }

    /// Assign the feature-ranking target column after loading.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.schema = self.schema.with_target(target);
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Columns in schema order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Numeric values of a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or is not numeric.
    pub fn numeric_column(&self, name: &str) -> Result<&[Option<f64>]> {
        let column = self
            .column(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        column.numeric().ok_or_else(|| {
            Error::check_failed(name, format!("expected numeric, got {}", column.semantic_type()))
        })
    }

    /// Text values of a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or is numeric.
    pub fn text_column(&self, name: &str) -> Result<&[Option<String>]> {
        let column = self
            .column(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        column.text().ok_or_else(|| {
            Error::check_failed(name, format!("expected text, got {}", column.semantic_type()))
        })
    }

    /// One row rendered as text cells, in schema column order.
    ///
    /// Missing cells render as `None`; used for duplicate-row detection.
    #[must_use]
    pub fn row_as_text(&self, index: usize) -> Vec<Option<String>> {
        self.columns
            .iter()
            .map(|c| c.values.cell_as_text(index))
            .collect()
    }
}

/// Append one Arrow array's cells onto a column, converting per the
/// column's storage type.
fn append_array(values: &mut ColumnValues, array: &ArrayRef) {
    for i in 0..array.len() {
        match values {
            ColumnValues::Numeric(out) => out.push(numeric_cell(array, i)),
            ColumnValues::Text(out) => out.push(text_cell(array, i)),
        }
    }
}

/// Extract a cell as f64. Nulls, non-numeric text and non-finite values
/// all become `None`.
fn numeric_cell(array: &ArrayRef, i: usize) -> Option<f64> {
    if array.is_null(i) {
        return None;
    }
    let any = array.as_any();
    let value = if let Some(a) = any.downcast_ref::<Float64Array>() {
        Some(a.value(i))
    } else if let Some(a) = any.downcast_ref::<Float32Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<Int64Array>() {
        Some(a.value(i) as f64)
    } else if let Some(a) = any.downcast_ref::<Int32Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<Int16Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<Int8Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<UInt64Array>() {
        Some(a.value(i) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt32Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<UInt16Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<UInt8Array>() {
        Some(f64::from(a.value(i)))
    } else if let Some(a) = any.downcast_ref::<StringArray>() {
        a.value(i).trim().parse::<f64>().ok()
    } else {
        None
    };
    value.filter(|v| v.is_finite())
}

/// Extract a cell as text. Nulls and empty strings become `None`;
/// non-string arrays are rendered with their Display form.
fn text_cell(array: &ArrayRef, i: usize) -> Option<String> {
    if array.is_null(i) {
        return None;
    }
    let any = array.as_any();
    if let Some(a) = any.downcast_ref::<StringArray>() {
        let value = a.value(i);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    } else if let Some(a) = any.downcast_ref::<Int64Array>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<Int32Array>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<Float64Array>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<Float32Array>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<BooleanArray>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<Date32Array>() {
        Some(a.value(i).to_string())
    } else if let Some(a) = any.downcast_ref::<Date64Array>() {
        Some(a.value(i).to_string())
    } else {
        Some("?".to_string())
    }
}
