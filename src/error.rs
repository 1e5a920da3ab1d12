//! Error types for calidad.

use std::path::PathBuf;

/// Result type alias for calidad operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in calidad operations.
///
/// Only load and configuration errors abort a run. Failures inside a
/// single quality check are caught by the pipeline and downgraded to a
/// critical finding in the report.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during data processing.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error during file operations.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Column not found in the table.
    #[error("Column '{name}' not found in table")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// Input columns do not match the expected schema.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema mismatch.
        message: String,
    },

    /// Unsupported file format.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The unsupported format name or extension.
        format: String,
    },

    /// Table has no rows.
    #[error("Table is empty")]
    EmptyTable,

    /// Invalid check configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Schema file could not be parsed.
    #[error("Schema file error: {message}")]
    SchemaFile {
        /// Description of the parse failure.
        message: String,
    },

    /// A quality check failed on a specific column.
    #[error("Check failed on column '{column}': {message}")]
    CheckFailed {
        /// The column the check was running on.
        column: String,
        /// Description of the failure.
        message: String,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a schema file error.
    pub fn schema_file(message: impl Into<String>) -> Self {
        Self::SchemaFile {
            message: message.into(),
        }
    }

    /// Create a check failure error.
    pub fn check_failed(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole run when raised during loading
    /// or configuration, as opposed to a per-check failure that the
    /// pipeline converts into a finding.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CheckFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/data.csv");
        assert!(err.to_string().contains("/path/to/data.csv"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_column_not_found() {
        let err = Error::column_not_found("G3");
        assert!(err.to_string().contains("G3"));
    }

    #[test]
    fn test_schema_mismatch() {
        let err = Error::schema_mismatch("missing columns: [b]");
        assert!(err.to_string().contains("missing columns: [b]"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = Error::unsupported_format("xlsx");
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn test_invalid_config() {
        let err = Error::invalid_config("min_group_size must be at least 1");
        assert!(err.to_string().contains("min_group_size"));
    }

    #[test]
    fn test_check_failed_is_not_fatal() {
        let err = Error::check_failed("age", "no numeric values");
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_load_errors_are_fatal() {
        assert!(Error::EmptyTable.is_fatal());
        assert!(Error::schema_mismatch("x").is_fatal());
        assert!(Error::invalid_config("x").is_fatal());
    }
}
