use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::fees::{ex_fees_of, hash_price_of};
use super::{SECONDS_PER_DAY, TARGET_BLOCKS_PER_DAY};
use crate::errors::MetricsError;
use crate::models::column::{PETA, TERA};
use crate::series::DailySeries;

/// "Current value" cards: every headline metric read from the last day of a
/// series. A metric whose inputs are null on that day is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub date: NaiveDate,
    pub price_usd_close: Option<f64>,
    pub hash_rate_ph: Option<f64>,
    pub difficulty_th: Option<f64>,
    pub target_hash_rate: Option<f64>,
    pub revenue_from_fees: Option<f64>,
    pub ex_fees_volume: Option<f64>,
    pub hash_price: Option<f64>,
}

impl fmt::Display for MetricSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = |f: &mut fmt::Formatter<'_>, label: &str, value: Option<f64>| match value {
            Some(v) => writeln!(f, "{label:<24}{v:.2}"),
            None => writeln!(f, "{label:<24}-"),
        };
        writeln!(f, "{:<24}{}", "Date", self.date)?;
        card(f, "Price (USD)", self.price_usd_close)?;
        card(f, "Hash rate (PH/s)", self.hash_rate_ph)?;
        card(f, "Difficulty (T)", self.difficulty_th)?;
        card(f, "Target hash rate", self.target_hash_rate)?;
        card(f, "Fee share", self.revenue_from_fees)?;
        card(f, "Volume ex-fees", self.ex_fees_volume)?;
        card(f, "Hash price (USD/PH/day)", self.hash_price)
    }
}

/// Snapshot of the last row of `series`.
///
/// Fails with [`MetricsError::MissingColumn`] when a metric column is absent,
/// with [`MetricsError::EmptySeries`] when there is no row to read, and with
/// the same guards as the full derivations for that row.
pub fn latest_snapshot(series: &DailySeries) -> Result<MetricSnapshot, MetricsError> {
    let record = series
        .records()?
        .pop()
        .ok_or(MetricsError::EmptySeries)?;
    let date = record.time;

    let ex_fees_volume = match (record.volume_mined_sum, record.revenue_from_fees) {
        (Some(v), Some(f)) => Some(ex_fees_of(v, f, date)?),
        _ => None,
    };
    let hash_price = match (ex_fees_volume, record.price_usd_close, record.hash_rate_mean) {
        (Some(v), Some(p), Some(h)) => Some(hash_price_of(v, p, h, date)?),
        _ => None,
    };

    Ok(MetricSnapshot {
        date,
        price_usd_close: record.price_usd_close,
        hash_rate_ph: record.hash_rate_mean.map(|h| h / PETA),
        difficulty_th: record.difficulty_latest.map(|d| d / TERA),
        target_hash_rate: record
            .difficulty_latest
            .map(|d| d * TARGET_BLOCKS_PER_DAY / SECONDS_PER_DAY),
        revenue_from_fees: record.revenue_from_fees,
        ex_fees_volume,
        hash_price,
    })
}
