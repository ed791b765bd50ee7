use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::errors::MetricsError;

/// Errors that can occur while retrieving the daily records.
///
/// None of these are retried; the caller renders a "cannot render" state.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The warehouse could not be reached (bad URL, refused, timed out).
    #[error("Could not connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: diesel::ConnectionError,
    },

    /// The retrieval query failed (e.g. table or column absent, timeout).
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// A snapshot file could not be opened.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The URL scheme is not one this build can talk to.
    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    /// The configured table name is not a plain SQL identifier.
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    /// The source delivered rows without an expected column.
    #[error("Expected column `{0}` is absent from the source")]
    MissingColumn(String),

    /// A column has a type that cannot be coerced.
    #[error("Column `{column}` has unsupported type {dtype}")]
    InvalidColumnType { column: String, dtype: String },

    /// A timestamp is null or not in a recognized format.
    #[error("Unparseable timestamp at row {row}: {value:?}")]
    InvalidTimestamp { row: usize, value: Option<String> },

    /// Two rows map to the same calendar day.
    #[error("Duplicate record for {0}")]
    DuplicateDate(NaiveDate),

    /// The canonicalized frame still violates a series invariant.
    #[error("Loaded frame is not a valid daily series: {0}")]
    Series(#[from] MetricsError),

    /// An error from the Polars library.
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
