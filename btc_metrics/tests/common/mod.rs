#![allow(dead_code)]

use std::path::PathBuf;

use btc_metrics::DailySeries;
use btc_metrics::loader::canonicalize;
use chrono::{Duration, NaiveDate};
use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use polars::prelude::{Column, DataFrame};
use tempfile::TempDir;

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset as i64)
}

pub fn difficulty(i: usize) -> f64 {
    8.0e13 + i as f64 * 1.0e11
}

pub fn hash_rate(i: usize) -> f64 {
    6.0e20 + i as f64 * 1.0e18
}

pub fn price(i: usize) -> f64 {
    60_000.0 + i as f64
}

pub fn fees(i: usize) -> f64 {
    (i % 5) as f64 * 0.01
}

pub const VOLUME: f64 = 450.0;

/// A frame shaped like the warehouse answer: upper-case names, text
/// timestamps, hash rate as text.
pub fn warehouse_frame(rows: usize) -> DataFrame {
    let timestamps: Vec<String> = (0..rows)
        .map(|i| format!("{} 00:00:00.000", day(i)))
        .collect();
    let hash_rates: Vec<String> = (0..rows).map(|i| hash_rate(i).to_string()).collect();
    DataFrame::new(vec![
        Column::new("TIMESTAMP".into(), timestamps),
        Column::new(
            "DIFFICULTY_LATEST".into(),
            (0..rows).map(difficulty).collect::<Vec<_>>(),
        ),
        Column::new("HASH_RATE_MEAN".into(), hash_rates),
        Column::new(
            "PRICE_USD_CLOSE".into(),
            (0..rows).map(price).collect::<Vec<_>>(),
        ),
        Column::new(
            "REVENUE_FROM_FEES".into(),
            (0..rows).map(fees).collect::<Vec<_>>(),
        ),
        Column::new("VOLUME_MINED_SUM".into(), vec![VOLUME; rows]),
    ])
    .unwrap()
}

/// `rows` consecutive days starting 2024-01-01.
pub fn daily_series(rows: usize) -> DailySeries {
    canonicalize(warehouse_frame(rows)).unwrap()
}

/// A canonical series with only `time` and the given columns.
pub fn series_with(columns: &[(&str, Vec<Option<f64>>)]) -> DailySeries {
    let rows = columns.first().map_or(0, |(_, values)| values.len());
    let days: Vec<NaiveDate> = (0..rows).map(day).collect();
    let mut frame = vec![Column::new("time".into(), days.as_slice())];
    for (name, values) in columns {
        frame.push(Column::new((*name).into(), values.as_slice()));
    }
    DailySeries::from_frame(DataFrame::new(frame).unwrap()).unwrap()
}

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: PathBuf,
}

/// A SQLite file holding `btc_daily` the way the warehouse export lays it
/// out: text timestamps, hash rate as text, rows inserted newest first.
pub fn setup_db(rows: usize) -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("btc.db");
    let mut conn = SqliteConnection::establish(path.to_str().unwrap()).expect("create db");

    let mut sql = String::from(
        "CREATE TABLE btc_daily (
            timestamp TEXT NOT NULL,
            difficulty_latest REAL,
            hash_rate_mean TEXT,
            price_usd_close REAL,
            revenue_from_fees REAL,
            volume_mined_sum REAL
        );",
    );
    for i in (0..rows).rev() {
        sql.push_str(&format!(
            "INSERT INTO btc_daily VALUES ('{} 00:00:00', {:e}, '{:e}', {}, {}, {});",
            day(i),
            difficulty(i),
            hash_rate(i),
            price(i),
            fees(i),
            VOLUME
        ));
    }
    conn.batch_execute(&sql).expect("seed btc_daily");
    TestDb { _dir: dir, path }
}
