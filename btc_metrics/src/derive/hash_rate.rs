use polars::prelude::{Column, DataFrame};

use super::{
    DerivedKind, DerivedSeries, HASH_RATE, OBSERVED_LABEL, RATE_TYPE, SECONDS_PER_DAY,
    TARGET_BLOCKS_PER_DAY, TARGET_HASH_RATE, TARGET_LABEL, with_time,
};
use crate::errors::MetricsError;
use crate::models::daily_record::{DIFFICULTY_LATEST, HASH_RATE_MEAN, TIME};
use crate::series::DailySeries;

/// Hash rate the network would need to find exactly 144 blocks a day at the
/// current difficulty: `difficulty_latest * 144 / 86400`.
pub fn target_hash_rate(series: &DailySeries) -> Result<DerivedSeries, MetricsError> {
    let target = target_values(series)?;
    let frame = with_time(series, vec![Column::new(TARGET_HASH_RATE.into(), target)])?;
    Ok(DerivedSeries::new(DerivedKind::TargetHashRate, frame))
}

/// Target and observed hash rate in long format, ready for a two-line chart.
///
/// Columns `time`, `rate_type`, `hash_rate`. All target rows come first (in
/// date order), followed by all observed rows, so the frame has twice the
/// series' height.
pub fn hash_rate_comparison(series: &DailySeries) -> Result<DerivedSeries, MetricsError> {
    let target = target_values(series)?;
    let observed = series.values(HASH_RATE_MEAN)?;

    let dates: Vec<_> = series.dates().iter().chain(series.dates()).copied().collect();
    let labels: Vec<&str> = std::iter::repeat_n(TARGET_LABEL, target.len())
        .chain(std::iter::repeat_n(OBSERVED_LABEL, observed.len()))
        .collect();
    let rates: Vec<Option<f64>> = target.into_iter().chain(observed).collect();

    let frame = DataFrame::new(vec![
        Column::new(TIME.into(), dates.as_slice()),
        Column::new(RATE_TYPE.into(), labels),
        Column::new(HASH_RATE.into(), rates),
    ])?;
    Ok(DerivedSeries::new(DerivedKind::HashRateComparison, frame))
}

pub(crate) fn target_values(series: &DailySeries) -> Result<Vec<Option<f64>>, MetricsError> {
    Ok(series
        .values(DIFFICULTY_LATEST)?
        .into_iter()
        .map(|difficulty| difficulty.map(|d| d * TARGET_BLOCKS_PER_DAY / SECONDS_PER_DAY))
        .collect())
}
