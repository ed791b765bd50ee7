use chrono::NaiveDate;
use thiserror::Error;

use crate::source::errors::DataSourceError;

/// Errors raised while filtering a series or deriving a metric from it.
///
/// `InvalidRange` and `EmptySeries` are recoverable: the caller shows a
/// message and skips the chart. The rest indicate schema drift or degenerate
/// input data.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The requested range starts after it ends.
    #[error("End date must fall after start date (start {start}, end {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A column the derivation reads is not part of the series.
    #[error("Required column `{0}` is missing from the series")]
    MissingColumn(String),

    /// A "current value" read was asked of a series with no rows.
    #[error("No data in the selected range")]
    EmptySeries,

    /// A denominator column was zero for the given day.
    #[error("Division by zero: `{column}` is 0 on {date}")]
    DivisionByZero {
        column: &'static str,
        date: NaiveDate,
    },

    /// `revenue_from_fees` left `[0, 1)`; at 1 the ex-fees term is undefined.
    #[error("revenue_from_fees must lie in [0, 1), got {value} on {date}")]
    FeeFractionOutOfRange { value: f64, date: NaiveDate },

    /// A table view was requested with an empty column selection.
    #[error("Please select at least one column to display")]
    NoColumnsSelected,

    /// A column name could not be parsed into a display column.
    #[error("Unknown column: {0:?}")]
    UnknownColumn(String),

    /// The column exists but does not hold numbers.
    #[error("Column `{column}` is not numeric (dtype {dtype})")]
    NotNumeric { column: String, dtype: String },

    /// The frame violates a [`DailySeries`](crate::DailySeries) invariant.
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// An error from the Polars library.
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// The unified error type for the `btc_metrics` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading the daily records failed.
    #[error(transparent)]
    Source(#[from] DataSourceError),

    /// Filtering or deriving failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for [`DashboardConfig`](crate::config::DashboardConfig).
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment lookup failed.
    #[error(transparent)]
    Env(#[from] shared_utils::config::ConfigError),

    /// A generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Polars library.
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
