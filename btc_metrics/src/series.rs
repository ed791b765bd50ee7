//! The immutable daily table every derivation reads from.
//!
//! [`DailySeries`] wraps a Polars [`DataFrame`] and guarantees a `time` column
//! of dtype `Date` that is null-free and strictly increasing, i.e. one row per
//! calendar day in chronological order. Positional computations such as the
//! 14-row difficulty lag rely on that ordering.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::errors::MetricsError;
use crate::models::daily_record::{
    DIFFICULTY_LATEST, DailyRecord, HASH_RATE_MEAN, PRICE_USD_CLOSE, REVENUE_FROM_FEES, TIME,
    VOLUME_MINED_SUM,
};
use crate::models::{DateRange, DisplayColumn};

/// A chronologically sorted table of daily records.
#[derive(Debug, Clone)]
pub struct DailySeries {
    frame: DataFrame,
    dates: Vec<NaiveDate>,
}

impl DailySeries {
    /// Wrap a frame that already carries a canonical `time` column.
    ///
    /// Errors:
    /// - [`MetricsError::MissingColumn`] when `time` is absent
    /// - [`MetricsError::InvalidSeries`] when `time` is not a `Date` column, holds
    ///   nulls, or is not strictly increasing
    pub fn from_frame(frame: DataFrame) -> Result<Self, MetricsError> {
        let mut dates = Vec::with_capacity(frame.height());
        for (row, day) in date_values(&frame)?.into_iter().enumerate() {
            let Some(day) = day else {
                return Err(MetricsError::InvalidSeries(format!(
                    "`{TIME}` is null at row {row}"
                )));
            };
            if let Some(previous) = dates.last() {
                if day <= *previous {
                    return Err(MetricsError::InvalidSeries(format!(
                        "`{TIME}` must be strictly increasing, found {day} after {previous} at row {row}"
                    )));
                }
            }
            dates.push(day);
        }
        Ok(Self { frame, dates })
    }

    /// Rows with `start <= time <= end`, order preserved.
    ///
    /// Fails with [`MetricsError::InvalidRange`] when `start > end`; no rows are
    /// produced in that case.
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> Result<Self, MetricsError> {
        let range = DateRange::new(start, end)?;
        self.filter_range(&range)
    }

    /// Same as [`filter`](Self::filter) for an already validated range.
    pub fn filter_range(&self, range: &DateRange) -> Result<Self, MetricsError> {
        let mask: BooleanChunked = self.dates.iter().map(|day| range.contains(*day)).collect();
        let frame = self.frame.filter(&mask)?;
        let dates = self
            .dates
            .iter()
            .copied()
            .filter(|day| range.contains(*day))
            .collect();
        tracing::debug!(%range, rows = frame.height(), "filtered daily series");
        Ok(Self { frame, dates })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Days of the series, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// The `time` column, ready to be placed in a derived frame.
    pub(crate) fn time_column(&self) -> Column {
        Column::new(TIME.into(), self.dates.as_slice())
    }

    /// Values of a numeric column as `f64`, nulls kept as `None`.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>, MetricsError> {
        float_values(&self.frame, name)
    }

    /// Numeric columns a user may chart or tabulate: every numeric column
    /// except `time`, plus the unit-converted hash rate and difficulty views.
    pub fn numeric_columns(&self) -> Vec<DisplayColumn> {
        let mut columns: Vec<DisplayColumn> = self
            .frame
            .get_columns()
            .iter()
            .filter(|column| column.name().as_str() != TIME && is_numeric(column.dtype()))
            .map(|column| DisplayColumn::Raw(column.name().to_string()))
            .collect();
        if self.has_column(HASH_RATE_MEAN) {
            columns.push(DisplayColumn::HashRatePh);
        }
        if self.has_column(DIFFICULTY_LATEST) {
            columns.push(DisplayColumn::DifficultyTh);
        }
        columns
    }

    /// Typed row view. Every metric column must be present; null cells read
    /// as `None`.
    pub fn records(&self) -> Result<Vec<DailyRecord>, MetricsError> {
        let difficulty = self.values(DIFFICULTY_LATEST)?;
        let hash_rate = self.values(HASH_RATE_MEAN)?;
        let price = self.values(PRICE_USD_CLOSE)?;
        let fees = self.values(REVENUE_FROM_FEES)?;
        let volume = self.values(VOLUME_MINED_SUM)?;

        Ok(self
            .dates
            .iter()
            .enumerate()
            .map(|(i, day)| DailyRecord {
                time: *day,
                difficulty_latest: difficulty[i],
                hash_rate_mean: hash_rate[i],
                price_usd_close: price[i],
                revenue_from_fees: fees[i],
                volume_mined_sum: volume[i],
            })
            .collect())
    }
}

/// Dates of the `time` column of any frame.
pub(crate) fn date_values(frame: &DataFrame) -> Result<Vec<Option<NaiveDate>>, MetricsError> {
    let column = frame
        .column(TIME)
        .map_err(|_| MetricsError::MissingColumn(TIME.to_string()))?;
    let series = column.as_materialized_series();
    let dates = series.date().map_err(|_| {
        MetricsError::InvalidSeries(format!(
            "`{TIME}` must have dtype date, found {}",
            series.dtype()
        ))
    })?;
    Ok(dates.as_date_iter().collect())
}

/// Values of a numeric column of any frame, cast to `f64`.
pub(crate) fn float_values(
    frame: &DataFrame,
    name: &str,
) -> Result<Vec<Option<f64>>, MetricsError> {
    let column = frame
        .column(name)
        .map_err(|_| MetricsError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();
    if !is_numeric(series.dtype()) {
        return Err(MetricsError::NotNumeric {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
        });
    }
    let floats = series.cast(&DataType::Float64)?;
    let values = floats.f64()?.into_iter().collect();
    Ok(values)
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}
