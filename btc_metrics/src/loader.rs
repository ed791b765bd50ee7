//! Series loader: turns whatever a [`DataSource`] returns into a canonical
//! [`DailySeries`].
//!
//! Steps, in order:
//! - lowercase column names (`TIMESTAMP` -> `timestamp`)
//! - require `timestamp` and the five metric columns
//! - derive the `time` column by truncating `timestamp` to its UTC date
//! - coerce the metric columns to `Float64`; text that does not parse becomes null
//! - sort by `time`, rejecting two rows on the same day
//!
//! Nothing here retries: a failing source is surfaced to the caller as is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::models::daily_record::{METRIC_COLUMNS, TIME, TIMESTAMP};
use crate::series::{DailySeries, is_numeric};
use crate::source::{DataSource, errors::DataSourceError};

/// Fetch every daily record from `source` and canonicalize it.
pub fn load_series(source: &mut dyn DataSource) -> Result<DailySeries, DataSourceError> {
    let raw = source.fetch_daily()?;
    debug!(
        source = source.description(),
        rows = raw.height(),
        columns = raw.width(),
        "fetched raw daily frame"
    );
    let series = canonicalize(raw)?;
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => info!(
            source = source.description(),
            rows = series.len(),
            %first,
            %last,
            "loaded daily series"
        ),
        _ => warn!(source = source.description(), "source returned no daily records"),
    }
    Ok(series)
}

/// Canonicalize a raw frame as described in the module docs.
pub fn canonicalize(mut raw: DataFrame) -> Result<DailySeries, DataSourceError> {
    lowercase_column_names(&mut raw)?;

    for required in std::iter::once(TIMESTAMP).chain(METRIC_COLUMNS) {
        if raw.column(required).is_err() {
            return Err(DataSourceError::MissingColumn(required.to_string()));
        }
    }

    let timestamps = raw.drop_in_place(TIMESTAMP)?;
    let dates = timestamp_dates(timestamps.as_materialized_series())?;

    for name in METRIC_COLUMNS {
        let coerced = coerce_float(raw.column(name)?.as_materialized_series())?;
        raw.with_column(coerced)?;
    }
    // `time` may already exist if the source carried both; the derived one wins.
    if raw.column(TIME).is_ok() {
        raw.drop_in_place(TIME)?;
    }
    raw.insert_column(0, Column::new(TIME.into(), dates.as_slice()))?;

    let frame = sort_by_day(raw, &dates)?;
    Ok(DailySeries::from_frame(frame)?)
}

fn lowercase_column_names(frame: &mut DataFrame) -> PolarsResult<()> {
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in names {
        let lower = name.trim().to_lowercase();
        if lower != name {
            frame.rename(&name, lower.into())?;
        }
    }
    Ok(())
}

/// UTC calendar day of every timestamp; a null or unparseable value fails
/// the load.
fn timestamp_dates(series: &Series) -> Result<Vec<NaiveDate>, DataSourceError> {
    let dates: Vec<Option<NaiveDate>> = match series.dtype() {
        DataType::Date => series.date()?.as_date_iter().collect(),
        DataType::Datetime(_, _) => {
            let truncated = series.cast(&DataType::Date)?;
            let dates = truncated.date()?.as_date_iter().collect();
            dates
        }
        DataType::String => series
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_timestamp))
            .collect(),
        other => {
            return Err(DataSourceError::InvalidColumnType {
                column: TIMESTAMP.to_string(),
                dtype: other.to_string(),
            });
        }
    };

    dates
        .into_iter()
        .enumerate()
        .map(|(row, day)| {
            day.ok_or_else(|| DataSourceError::InvalidTimestamp {
                row,
                value: series.get(row).ok().map(|v| v.to_string()),
            })
        })
        .collect()
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]` (optionally with a numeric
/// offset, as PostgreSQL renders `timestamptz`), and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.date());
        }
    }
    if let Ok(with_offset) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(with_offset.with_timezone(&Utc).date_naive());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Cast a metric column to `Float64`. Text is parsed value by value so that
/// anything non-numeric turns into a null rather than an error.
fn coerce_float(series: &Series) -> Result<Series, DataSourceError> {
    match series.dtype() {
        DataType::Float64 => Ok(series.clone()),
        DataType::String => {
            let mut rejected = 0usize;
            let mut values = Vec::with_capacity(series.len());
            for value in series.str()?.into_iter() {
                let parsed = value.and_then(|text| text.trim().parse::<f64>().ok());
                if value.is_some() && parsed.is_none() {
                    rejected += 1;
                }
                values.push(parsed);
            }
            if rejected > 0 {
                warn!(column = %series.name(), rejected, "non-numeric values coerced to null");
            }
            Ok(Series::new(series.name().clone(), values))
        }
        DataType::Null => Ok(series.cast(&DataType::Float64)?),
        dtype if is_numeric(dtype) => Ok(series.cast(&DataType::Float64)?),
        other => Err(DataSourceError::InvalidColumnType {
            column: series.name().to_string(),
            dtype: other.to_string(),
        }),
    }
}

/// Reorder rows chronologically; the source promises ordering but a file
/// snapshot may not honour it.
fn sort_by_day(frame: DataFrame, dates: &[NaiveDate]) -> Result<DataFrame, DataSourceError> {
    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&row| dates[row]);

    if let Some(pair) = order.windows(2).find(|pair| dates[pair[0]] == dates[pair[1]]) {
        return Err(DataSourceError::DuplicateDate(dates[pair[0]]));
    }
    if order.iter().enumerate().all(|(position, &row)| position == row) {
        return Ok(frame);
    }

    debug!(rows = dates.len(), "source rows were out of order; sorting by day");
    let indices: Vec<IdxSize> = order.into_iter().map(|row| row as IdxSize).collect();
    let indices = IdxCa::from_vec("".into(), indices);
    Ok(frame.take(&indices)?)
}
