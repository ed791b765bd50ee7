use polars::prelude::{Column, DataFrame};

use super::{DIFFICULTY_GROWTH, DerivedKind, DerivedSeries, GROWTH_LAG};
use crate::errors::MetricsError;
use crate::models::daily_record::{DIFFICULTY_LATEST, TIME};
use crate::series::DailySeries;

/// Percent change of `difficulty_latest` over the previous 14 rows.
///
/// Only rows whose position in `series` is a multiple of 14 are kept, and
/// rows 0 to 13 never have a lagged value, so the output starts at row 14.
/// The lag is positional: a gap in the dates is not filled in. Rows where
/// either difficulty is null are dropped; a lagged difficulty of 0 fails
/// with [`MetricsError::DivisionByZero`].
pub fn difficulty_growth(series: &DailySeries) -> Result<DerivedSeries, MetricsError> {
    let difficulty = series.values(DIFFICULTY_LATEST)?;
    let dates = series.dates();

    let mut kept_dates = Vec::new();
    let mut growth = Vec::new();
    for row in (GROWTH_LAG..difficulty.len()).step_by(GROWTH_LAG) {
        let (Some(current), Some(previous)) = (difficulty[row], difficulty[row - GROWTH_LAG])
        else {
            continue;
        };
        if previous == 0.0 {
            return Err(MetricsError::DivisionByZero {
                column: DIFFICULTY_LATEST,
                date: dates[row - GROWTH_LAG],
            });
        }
        kept_dates.push(dates[row]);
        growth.push((current / previous - 1.0) * 100.0);
    }

    let frame = DataFrame::new(vec![
        Column::new(TIME.into(), kept_dates.as_slice()),
        Column::new(DIFFICULTY_GROWTH.into(), growth),
    ])?;
    Ok(DerivedSeries::new(DerivedKind::DifficultyGrowth, frame))
}
