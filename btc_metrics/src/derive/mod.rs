//! Metric derivations.
//!
//! Every function here is a pure function of a (usually range-filtered)
//! [`DailySeries`] and returns a fresh [`DerivedSeries`]: a `time` column plus
//! the derived column(s) one chart needs. Nothing is cached or written back
//! to the series, so one derivation can feed any number of renderers.
//!
//! Shared rules:
//! - a column the formula reads but the series lacks is
//!   [`MetricsError::MissingColumn`]
//! - an empty series yields an empty derived frame with the same schema
//! - a null input yields a null output for that row
//! - degenerate denominators fail loudly instead of producing `inf`/`NaN`

mod difficulty;
mod display;
mod fees;
mod hash_rate;
mod snapshot;

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};

pub use difficulty::difficulty_growth;
pub use display::{numeric_columns, table_view, unit_column};
pub use fees::{ex_fees_volume, spot_hash_price};
pub use hash_rate::{hash_rate_comparison, target_hash_rate};
pub use snapshot::{MetricSnapshot, latest_snapshot};

use crate::errors::MetricsError;
use crate::series::{DailySeries, date_values, float_values};

/// Blocks the protocol targets per day (one every ten minutes).
pub const TARGET_BLOCKS_PER_DAY: f64 = 144.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Rows between two difficulty growth samples, roughly one retarget window.
pub const GROWTH_LAG: usize = 14;

pub const TARGET_HASH_RATE: &str = "target_hash_rate";
pub const RATE_TYPE: &str = "rate_type";
pub const HASH_RATE: &str = "hash_rate";
pub const EX_FEES_VOLUME: &str = "ex_fees_volume";
pub const HASH_PRICE: &str = "hash_price";
pub const DIFFICULTY_GROWTH: &str = "difficulty_growth";

/// `rate_type` tag for the target rows of the comparison chart.
pub const TARGET_LABEL: &str = "Target Hash Rate";
/// `rate_type` tag for the observed rows of the comparison chart.
pub const OBSERVED_LABEL: &str = "Observed Hash Rate";

/// Which derivation produced a [`DerivedSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedKind {
    TargetHashRate,
    HashRateComparison,
    ExFeesVolume,
    SpotHashPrice,
    DifficultyGrowth,
    UnitColumn,
    Table,
}

impl DerivedKind {
    /// Chart title used by the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            DerivedKind::TargetHashRate => "Target Hash Rate",
            DerivedKind::HashRateComparison => "Target vs. Observed Hash Rate",
            DerivedKind::ExFeesVolume => "Block Subsidy Volume (ex-fees)",
            DerivedKind::SpotHashPrice => "Spot Hash Price",
            DerivedKind::DifficultyGrowth => "Difficulty Growth (%)",
            DerivedKind::UnitColumn => "Interactive Column Chart",
            DerivedKind::Table => "Data Table",
        }
    }
}

/// A chart-ready table computed from a [`DailySeries`].
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    kind: DerivedKind,
    frame: DataFrame,
}

impl DerivedSeries {
    pub(crate) fn new(kind: DerivedKind, frame: DataFrame) -> Self {
        tracing::debug!(?kind, rows = frame.height(), "derived series");
        Self { kind, frame }
    }

    pub fn kind(&self) -> DerivedKind {
        self.kind
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Values of one numeric output column.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>, MetricsError> {
        float_values(&self.frame, name)
    }

    /// The `time` column. Derived frames never carry a null date.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, MetricsError> {
        Ok(date_values(&self.frame)?.into_iter().flatten().collect())
    }
}

/// `time` of `series` followed by `columns`, all of the series' height.
fn with_time(series: &DailySeries, columns: Vec<Column>) -> Result<DataFrame, MetricsError> {
    let mut all = Vec::with_capacity(columns.len() + 1);
    all.push(series.time_column());
    all.extend(columns);
    Ok(DataFrame::new(all)?)
}
