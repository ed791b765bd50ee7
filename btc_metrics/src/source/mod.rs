//! Data source abstraction for the daily records.
//!
//! This module defines the [`DataSource`] trait, the single boundary between the
//! metrics core and wherever the `btc_daily` table lives. A source performs one
//! fixed, unparameterized retrieval ("all rows ordered by timestamp") and hands
//! back the raw frame; canonicalization happens in [`crate::loader`].
//!
//! Implementations:
//! - [`SqlSource`]: a warehouse table over SQLite (or PostgreSQL with the
//!   `postgres` feature)
//! - [`IpcSource`]: an Arrow IPC / Feather snapshot on disk
//! - [`FrameSource`]: an in-memory frame
//!
//! The trait supports dynamic dispatch so the source can be chosen at runtime
//! from configuration, see [`open_source`].
//!
//! # Example
//!
//! ```rust
//! # use btc_metrics::source::{DataSource, errors::DataSourceError};
//! # use polars::prelude::DataFrame;
//! #[derive(Debug)]
//! struct Empty;
//!
//! impl DataSource for Empty {
//!     fn fetch_daily(&mut self) -> Result<DataFrame, DataSourceError> {
//!         Ok(DataFrame::empty())
//!     }
//!
//!     fn description(&self) -> &str {
//!         "empty"
//!     }
//! }
//! ```
pub mod errors;
mod ipc;
mod memory;
mod sql;

use std::fmt::Debug;
use std::time::Duration;

use polars::prelude::DataFrame;
use secrecy::ExposeSecret;

pub use ipc::IpcSource;
pub use memory::FrameSource;
pub use sql::{SqlBackend, SqlSource, redact_url};

use crate::config::{SourceCfg, SourceKind};
use crate::errors::Error;
use errors::DataSourceError;

/// A place the daily records can be read from.
pub trait DataSource: Debug {
    /// Retrieve every daily row, ordered by timestamp.
    ///
    /// Column names are whatever the source reports; the loader lowercases
    /// them and requires `timestamp` plus the five metric columns.
    fn fetch_daily(&mut self) -> Result<DataFrame, DataSourceError>;

    /// Human-readable description for logs. Must not contain credentials.
    fn description(&self) -> &str;
}

/// Build the source described by the `[source]` config section.
pub fn open_source(cfg: &SourceCfg) -> Result<Box<dyn DataSource>, Error> {
    let url = cfg.url()?;
    let source: Box<dyn DataSource> = match cfg.kind {
        SourceKind::Sql => Box::new(
            SqlSource::new(url, &cfg.table)?.with_timeout(Duration::from_secs(cfg.timeout_secs)),
        ),
        SourceKind::Ipc => Box::new(IpcSource::new(url.expose_secret())),
    };
    tracing::debug!(source = source.description(), "opened data source");
    Ok(source)
}
