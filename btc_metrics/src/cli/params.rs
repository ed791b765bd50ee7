use chrono::NaiveDate;

use crate::config::{RangeCfg, TableCfg};
use crate::errors::{Error, MetricsError};
use crate::models::{DateRange, DisplayColumn};

use super::commands::RangeArgs;

/// `--start` / `--end` parser: ISO dates only.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2024-01-31, got {s:?}: {e}"))
}

/// The range to filter on: `--year`, else `--start`/`--end` falling back to
/// the configured defaults one end at a time.
pub fn resolve_range(args: &RangeArgs, defaults: &RangeCfg) -> Result<DateRange, Error> {
    if let Some(year) = args.year {
        return DateRange::calendar_year(year)
            .ok_or_else(|| Error::Config(format!("year {year} is out of range")));
    }
    let start = args.start.unwrap_or(defaults.start);
    let end = args.end.unwrap_or(defaults.end);
    Ok(DateRange::new(start, end)?)
}

/// Column selection for the table view. Without `--columns` the configured
/// selection is used; blank entries are ignored, so `--columns ""` selects
/// nothing.
pub fn resolve_columns(
    names: Option<&[String]>,
    defaults: &TableCfg,
) -> Result<Vec<DisplayColumn>, MetricsError> {
    match names {
        None => defaults.display_columns(),
        Some(names) => names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.parse())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn missing_ends_fall_back_to_config() {
        let args = RangeArgs {
            start: Some(date("2024-03-01")),
            ..Default::default()
        };
        let range = resolve_range(&args, &RangeCfg::default()).unwrap();
        assert_eq!(range.start(), date("2024-03-01"));
        assert_eq!(range.end(), date("2024-12-31"));
    }

    #[test]
    fn inverted_dates_are_an_invalid_range() {
        let args = RangeArgs {
            start: Some(date("2024-05-01")),
            end: Some(date("2024-04-01")),
            year: None,
        };
        assert!(matches!(
            resolve_range(&args, &RangeCfg::default()),
            Err(Error::Metrics(MetricsError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn year_covers_january_to_december() {
        let args = RangeArgs {
            year: Some(2021),
            ..Default::default()
        };
        let range = resolve_range(&args, &RangeCfg::default()).unwrap();
        assert_eq!(range.days(), 365);
        assert_eq!(range.end(), date("2021-12-31"));
    }

    #[test]
    fn blank_selection_is_empty() {
        let blank = vec![String::new()];
        let columns = resolve_columns(Some(&blank), &TableCfg::default()).unwrap();
        assert!(columns.is_empty());
    }

    #[test]
    fn rejects_non_iso_dates() {
        assert!(parse_date("01/31/2024").is_err());
    }
}
