//! Canonical daily record and the column names shared by the loader and the
//! derivations.
//!
//! The warehouse reports names in upper case (`HASH_RATE_MEAN`); the loader
//! lowercases them, so everything past the loader uses these constants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical day column produced by the loader.
pub const TIME: &str = "time";
/// Raw timestamp column as delivered by the source.
pub const TIMESTAMP: &str = "timestamp";
/// Network difficulty at day close.
pub const DIFFICULTY_LATEST: &str = "difficulty_latest";
/// Observed mean hash rate, hashes per second.
pub const HASH_RATE_MEAN: &str = "hash_rate_mean";
/// Closing USD price.
pub const PRICE_USD_CLOSE: &str = "price_usd_close";
/// Share of the block reward paid as fees, in `[0, 1)`.
pub const REVENUE_FROM_FEES: &str = "revenue_from_fees";
/// BTC mined that day, excluding fees.
pub const VOLUME_MINED_SUM: &str = "volume_mined_sum";

/// The metric columns every source must deliver.
pub const METRIC_COLUMNS: [&str; 5] = [
    DIFFICULTY_LATEST,
    HASH_RATE_MEAN,
    PRICE_USD_CLOSE,
    REVENUE_FROM_FEES,
    VOLUME_MINED_SUM,
];

/// One day of raw network metrics.
///
/// Metrics are optional because the warehouse may hold nulls (or text that
/// failed numeric coercion); derivations propagate the gap instead of
/// substituting zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar day (UTC).
    pub time: NaiveDate,
    pub difficulty_latest: Option<f64>,
    pub hash_rate_mean: Option<f64>,
    pub price_usd_close: Option<f64>,
    pub revenue_from_fees: Option<f64>,
    pub volume_mined_sum: Option<f64>,
}
