//! Command-line shell around the library: resolves the user's range and
//! column selection, then runs one derivation.
pub mod commands;
pub mod params;

pub use commands::{Cli, Commands, OutputArgs, RangeArgs};

use crate::config::DashboardConfig;
use crate::derive::{self, DerivedSeries, MetricSnapshot};
use crate::errors::{Error, MetricsError};
use crate::models::DisplayColumn;
use crate::series::DailySeries;

/// What a command produced.
#[derive(Debug)]
pub enum Rendered {
    Frame(DerivedSeries),
    Snapshot(MetricSnapshot),
    Columns(Vec<DisplayColumn>),
}

/// Filter `series` to the command's range and run its derivation.
///
/// An empty range is reported as [`MetricsError::EmptySeries`] so the shell
/// can show a message instead of an empty chart.
pub fn run_command(
    series: &DailySeries,
    command: &Commands,
    cfg: &DashboardConfig,
) -> Result<Rendered, Error> {
    let Some(range_args) = command.range() else {
        return Ok(Rendered::Columns(derive::numeric_columns(series)));
    };
    let range = params::resolve_range(range_args, &cfg.range)?;
    let selected = series.filter_range(&range)?;
    tracing::debug!(%range, days = range.days(), rows = selected.len(), "resolved range");
    if selected.is_empty() {
        return Err(MetricsError::EmptySeries.into());
    }

    let derived = match command {
        Commands::Summary { .. } => {
            return Ok(Rendered::Snapshot(derive::latest_snapshot(&selected)?));
        }
        Commands::HashRate { .. } => derive::hash_rate_comparison(&selected)?,
        Commands::Target { .. } => derive::target_hash_rate(&selected)?,
        Commands::Fees { .. } => derive::ex_fees_volume(&selected)?,
        Commands::HashPrice { .. } => derive::spot_hash_price(&selected)?,
        Commands::Growth { .. } => derive::difficulty_growth(&selected)?,
        Commands::Column { name, .. } => {
            let column: DisplayColumn = name.parse()?;
            derive::unit_column(&selected, &column)?
        }
        Commands::Table { columns, .. } => {
            let columns = params::resolve_columns(columns.as_deref(), &cfg.table)?;
            derive::table_view(&selected, &columns)?
        }
        Commands::Columns => return Ok(Rendered::Columns(derive::numeric_columns(series))),
    };
    Ok(Rendered::Frame(derived))
}
