//! Column selection for the single-column chart and the data table.
//!
//! A [`DisplayColumn`] is either a numeric column of the series shown as-is,
//! or one of the unit-converted views (`hash_rate_ph`, `difficulty_th`) that
//! take the raw column's slot when selected.
//!
//! ```
//! use btc_metrics::models::DisplayColumn;
//!
//! let col: DisplayColumn = "HASH_RATE_PH".parse().unwrap();
//! assert_eq!(col, DisplayColumn::HashRatePh);
//! assert_eq!(col.source_column(), "hash_rate_mean");
//! ```

use std::{fmt, str::FromStr};

use crate::errors::MetricsError;
use crate::models::daily_record::{DIFFICULTY_LATEST, HASH_RATE_MEAN};

/// Hashes per second in one PH/s.
pub const PETA: f64 = 1e15;
/// Difficulty units in one tera-difficulty.
pub const TERA: f64 = 1e12;

/// A column the user can put on the single-column chart or in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayColumn {
    /// Any numeric column of the series, unchanged.
    Raw(String),
    /// `hash_rate_mean / 10^15`
    HashRatePh,
    /// `difficulty_latest / 10^12`
    DifficultyTh,
}

impl DisplayColumn {
    /// Output column name.
    pub fn name(&self) -> &str {
        match self {
            DisplayColumn::Raw(name) => name,
            DisplayColumn::HashRatePh => "hash_rate_ph",
            DisplayColumn::DifficultyTh => "difficulty_th",
        }
    }

    /// Column of the series the values are read from.
    pub fn source_column(&self) -> &str {
        match self {
            DisplayColumn::Raw(name) => name,
            DisplayColumn::HashRatePh => HASH_RATE_MEAN,
            DisplayColumn::DifficultyTh => DIFFICULTY_LATEST,
        }
    }

    /// Divisor applied to the source values.
    pub fn divisor(&self) -> f64 {
        match self {
            DisplayColumn::Raw(_) => 1.0,
            DisplayColumn::HashRatePh => PETA,
            DisplayColumn::DifficultyTh => TERA,
        }
    }
}

impl fmt::Display for DisplayColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayColumn {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "" => Err(MetricsError::UnknownColumn(s.to_string())),
            "hash_rate_ph" => Ok(DisplayColumn::HashRatePh),
            "difficulty_th" => Ok(DisplayColumn::DifficultyTh),
            _ => Ok(DisplayColumn::Raw(name)),
        }
    }
}
