use chrono::NaiveDate;
use polars::prelude::Column;

use super::{DerivedKind, DerivedSeries, EX_FEES_VOLUME, HASH_PRICE, with_time};
use crate::errors::MetricsError;
use crate::models::column::PETA;
use crate::models::daily_record::{
    HASH_RATE_MEAN, PRICE_USD_CLOSE, REVENUE_FROM_FEES, VOLUME_MINED_SUM,
};
use crate::series::DailySeries;

/// Mined volume scaled up by the fee share: `v * f / (1 - f) + v`.
///
/// Fails with [`MetricsError::FeeFractionOutOfRange`] on the first day whose
/// `revenue_from_fees` lies outside `[0, 1)` (NaN included).
pub fn ex_fees_volume(series: &DailySeries) -> Result<DerivedSeries, MetricsError> {
    let volume = ex_fees_values(series)?;
    let frame = with_time(series, vec![Column::new(EX_FEES_VOLUME.into(), volume)])?;
    Ok(DerivedSeries::new(DerivedKind::ExFeesVolume, frame))
}

/// USD earned per PH/s per day:
/// `((v * f / (1 - f) + v) * price_usd_close * 1e15) / hash_rate_mean`.
///
/// A day with `hash_rate_mean == 0` fails with [`MetricsError::DivisionByZero`].
pub fn spot_hash_price(series: &DailySeries) -> Result<DerivedSeries, MetricsError> {
    let volume = ex_fees_values(series)?;
    let price = series.values(PRICE_USD_CLOSE)?;
    let hash_rate = series.values(HASH_RATE_MEAN)?;

    let mut hash_price = Vec::with_capacity(series.len());
    for (i, date) in series.dates().iter().enumerate() {
        let value = match (volume[i], price[i], hash_rate[i]) {
            (Some(v), Some(p), Some(h)) => Some(hash_price_of(v, p, h, *date)?),
            _ => None,
        };
        hash_price.push(value);
    }

    let frame = with_time(series, vec![Column::new(HASH_PRICE.into(), hash_price)])?;
    Ok(DerivedSeries::new(DerivedKind::SpotHashPrice, frame))
}

fn ex_fees_values(series: &DailySeries) -> Result<Vec<Option<f64>>, MetricsError> {
    let volume = series.values(VOLUME_MINED_SUM)?;
    let fees = series.values(REVENUE_FROM_FEES)?;
    series
        .dates()
        .iter()
        .zip(volume.into_iter().zip(fees))
        .map(|(date, pair)| match pair {
            (Some(v), Some(f)) => ex_fees_of(v, f, *date).map(Some),
            _ => Ok(None),
        })
        .collect()
}

pub(crate) fn ex_fees_of(volume: f64, fees: f64, date: NaiveDate) -> Result<f64, MetricsError> {
    if !(0.0..1.0).contains(&fees) {
        return Err(MetricsError::FeeFractionOutOfRange { value: fees, date });
    }
    Ok(volume * fees / (1.0 - fees) + volume)
}

pub(crate) fn hash_price_of(
    ex_fees_volume: f64,
    price: f64,
    hash_rate: f64,
    date: NaiveDate,
) -> Result<f64, MetricsError> {
    if hash_rate == 0.0 {
        return Err(MetricsError::DivisionByZero {
            column: HASH_RATE_MEAN,
            date,
        });
    }
    Ok((ex_fees_volume * price * PETA) / hash_rate)
}
