//! Daily Bitcoin network metrics.
//!
//! The crate loads one daily time series (difficulty, hash rate, price, fee
//! share, mined volume) from a warehouse table and turns it into chart-ready
//! frames:
//!
//! - [`source`]: the [`DataSource`](source::DataSource) trait plus SQL, Arrow IPC
//!   and in-memory implementations
//! - [`loader`]: canonicalizes the raw rows into a [`DailySeries`]
//! - [`series`]: the immutable, time-sorted table and its date-range filter
//! - [`derive`]: pure derivations, one [`DerivedSeries`](derive::DerivedSeries) per chart
//! - [`io`]: writers for handing frames to an external renderer
//!
//! ```no_run
//! use btc_metrics::{derive, loader::load_series, source::IpcSource};
//! use chrono::NaiveDate;
//!
//! let mut source = IpcSource::new("btc_daily.feather");
//! let series = load_series(&mut source)?;
//! let year = series.filter(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//! )?;
//! let chart = derive::hash_rate_comparison(&year)?;
//! println!("{}", chart.frame());
//! # Ok::<(), btc_metrics::errors::Error>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod derive;
pub mod errors;
pub mod io;
pub mod loader;
pub mod models;
pub mod series;
pub mod source;

pub use errors::{Error, MetricsError};
pub use series::DailySeries;
