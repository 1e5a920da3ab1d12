//! Loading tabular files into a [`Table`].
//!
//! Supports CSV (with header and delimiter options) and Parquet. When an
//! expected schema is supplied the input's columns must match it exactly;
//! missing or extra columns abort the load. Any read failure is fatal and
//! reported to the caller verbatim, never retried.

use std::{
    io::{BufReader, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};

use arrow::{
    array::RecordBatch,
    datatypes::{DataType, Field, Schema as ArrowSchema},
};
use arrow_csv::{reader::Format, ReaderBuilder};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::{
    error::{Error, Result},
    schema::TableSchema,
    table::Table,
};

const CSV_BATCH_SIZE: usize = 8192;
const CSV_INFER_ROWS: usize = 1000;

/// Loads a delimited or Parquet file into an immutable [`Table`].
///
/// # Example
///
/// ```no_run
/// use calidad::loader::TableLoader;
///
/// let table = TableLoader::new().load("student-mat.csv").unwrap();
/// println!("{} rows", table.row_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    schema: Option<TableSchema>,
    delimiter: Option<u8>,
    has_header: bool,
}

impl TableLoader {
    /// Create a loader that infers the schema from the file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: None,
            delimiter: None,
            has_header: true,
        }
    }

    /// Require the input to match an expected schema.
    #[must_use]
    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the CSV field delimiter (the UCI student files use `;`).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether the CSV file has a header row.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Load a table, dispatching on the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the format
    /// is unsupported, the file has no rows, or its columns do not match
    /// the expected schema.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let (batches, typed_schema) = match ext {
            "csv" | "tsv" | "txt" => self.read_csv(path)?,
            "parquet" => {
                let batches = Self::read_parquet(path)?;
                if batches.is_empty() {
                    return Err(Error::EmptyTable);
                }
                let schema = batches[0].schema();
                (batches, schema)
            }
            ext => return Err(Error::unsupported_format(ext)),
        };

        if batches.iter().map(RecordBatch::num_rows).sum::<usize>() == 0 {
            return Err(Error::EmptyTable);
        }

        let actual: Vec<&str> = typed_schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();

        let table_schema = match &self.schema {
            Some(expected) => {
                expected.check_columns(&actual)?;
                expected.clone()
            }
            None => TableSchema::from_arrow(&typed_schema),
        };

        Table::from_batches(&batches, table_schema)
    }

    /// Read a CSV file into RecordBatches, plus the inferred typed schema.
    ///
    /// All cells are read as Utf8: the input is expected to be dirty,
    /// and typing happens against the semantic schema when the table is
    /// materialized. The inferred Arrow types are returned separately so
    /// a loader without an expected schema can still derive semantic
    /// column types from them.
    fn read_csv(&self, path: &Path) -> Result<(Vec<RecordBatch>, Arc<ArrowSchema>)> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let mut buf_reader = BufReader::new(file);

        let mut format = Format::default().with_header(self.has_header);
        if let Some(delim) = self.delimiter {
            format = format.with_delimiter(delim);
        }

        let (inferred, _) = format
            .infer_schema(&mut buf_reader, Some(CSV_INFER_ROWS))
            .map_err(Error::Arrow)?;

        buf_reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::io(e, path))?;

        let raw_fields: Vec<Field> = inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect();
        let raw_schema = Arc::new(ArrowSchema::new(raw_fields));

        let mut builder = ReaderBuilder::new(raw_schema)
            .with_batch_size(CSV_BATCH_SIZE)
            .with_header(self.has_header);
        if let Some(delim) = self.delimiter {
            builder = builder.with_delimiter(delim);
        }

        let reader = builder.build(buf_reader).map_err(Error::Arrow)?;
        let batches = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)?;
        Ok((batches, Arc::new(inferred)))
    }

    /// Read a Parquet file into RecordBatches.
    fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(Error::Parquet)?;
        let reader = builder.build().map_err(Error::Parquet)?;
        reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Arrow)
    }
}
