mod common;

use btc_metrics::config::{DashboardConfig, SourceKind, load_config_str};
use btc_metrics::loader::load_series;
use btc_metrics::models::daily_record::{HASH_RATE_MEAN, PRICE_USD_CLOSE};
use btc_metrics::source::errors::DataSourceError;
use btc_metrics::source::{DataSource, SqlSource, open_source};
use common::{day, price, setup_db};
use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use secrecy::SecretString;

fn sqlite_url(db: &common::TestDb) -> SecretString {
    SecretString::from(format!("sqlite://{}", db.path.display()))
}

#[test]
fn loads_and_sorts_the_daily_table() {
    let db = setup_db(20);
    let mut source = SqlSource::new(sqlite_url(&db), "btc_daily").unwrap();

    let series = load_series(&mut source).unwrap();

    assert_eq!(series.len(), 20);
    assert_eq!(series.first_date(), Some(day(0)));
    assert_eq!(series.last_date(), Some(day(19)));
    assert_eq!(
        series.values(PRICE_USD_CLOSE).unwrap(),
        (0..20).map(|i| Some(price(i))).collect::<Vec<_>>()
    );
    let hash_rates = series.values(HASH_RATE_MEAN).unwrap();
    assert!(hash_rates.iter().all(Option::is_some));
}

#[test]
fn null_and_textual_hash_rates_become_nulls() {
    let db = setup_db(3);
    let mut conn = SqliteConnection::establish(db.path.to_str().unwrap()).unwrap();
    conn.batch_execute(
        "UPDATE btc_daily SET hash_rate_mean = 'n/a' WHERE timestamp LIKE '2024-01-02%';
         UPDATE btc_daily SET hash_rate_mean = NULL WHERE timestamp LIKE '2024-01-03%';",
    )
    .unwrap();
    drop(conn);

    let mut source = SqlSource::new(sqlite_url(&db), "btc_daily").unwrap();
    let series = load_series(&mut source).unwrap();
    let hash_rates = series.values(HASH_RATE_MEAN).unwrap();
    assert!(hash_rates[0].is_some());
    assert_eq!(&hash_rates[1..], &[None, None]);
}

#[test]
fn missing_table_is_a_query_error() {
    let db = setup_db(1);
    let mut source = SqlSource::new(sqlite_url(&db), "btc_hourly").unwrap();
    assert!(matches!(
        source.fetch_daily(),
        Err(DataSourceError::Query(_))
    ));
}

#[test]
fn config_opens_the_same_table() {
    let db = setup_db(5);
    let cfg: DashboardConfig = load_config_str(&format!(
        "[source]\nkind = \"sql\"\nurl = \"{}\"\ntimeout_secs = 5\n",
        db.path.display()
    ))
    .unwrap();
    assert_eq!(cfg.source.kind, SourceKind::Sql);
    assert_eq!(cfg.source.table, "btc_daily");

    let mut source = open_source(&cfg.source).unwrap();
    assert!(source.description().ends_with("#btc_daily"));
    let series = load_series(source.as_mut()).unwrap();
    assert_eq!(series.len(), 5);
}
