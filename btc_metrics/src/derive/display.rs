use indexmap::IndexSet;
use polars::prelude::Column;

use super::{DerivedKind, DerivedSeries, with_time};
use crate::errors::MetricsError;
use crate::models::DisplayColumn;
use crate::series::DailySeries;

/// One column for the interactive single-column chart.
///
/// Raw columns are returned unchanged; `hash_rate_ph` and `difficulty_th` are
/// divided by 10^15 and 10^12 respectively.
pub fn unit_column(
    series: &DailySeries,
    column: &DisplayColumn,
) -> Result<DerivedSeries, MetricsError> {
    let frame = with_time(series, vec![display_values(series, column)?])?;
    Ok(DerivedSeries::new(DerivedKind::UnitColumn, frame))
}

/// `time` plus the selected columns, in selection order, duplicates removed.
pub fn table_view(
    series: &DailySeries,
    columns: &[DisplayColumn],
) -> Result<DerivedSeries, MetricsError> {
    if columns.is_empty() {
        return Err(MetricsError::NoColumnsSelected);
    }
    let selected: IndexSet<&DisplayColumn> = columns.iter().collect();
    let values = selected
        .into_iter()
        .map(|column| display_values(series, column))
        .collect::<Result<Vec<_>, _>>()?;
    let frame = with_time(series, values)?;
    Ok(DerivedSeries::new(DerivedKind::Table, frame))
}

/// Columns a user may pick for [`unit_column`] or [`table_view`].
pub fn numeric_columns(series: &DailySeries) -> Vec<DisplayColumn> {
    series.numeric_columns()
}

fn display_values(series: &DailySeries, column: &DisplayColumn) -> Result<Column, MetricsError> {
    let raw = series.values(column.source_column())?;
    let values: Vec<Option<f64>> = match column {
        DisplayColumn::Raw(_) => raw,
        _ => {
            let divisor = column.divisor();
            raw.into_iter().map(|v| v.map(|v| v / divisor)).collect()
        }
    };
    Ok(Column::new(column.name().into(), values))
}
