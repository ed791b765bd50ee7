//! Warehouse table source over diesel.
//!
//! The query is fixed: every row of the configured table, ordered by
//! timestamp. `timestamp` and `hash_rate_mean` are read back as text because
//! the warehouse is not consistent about their types; the loader parses them.
//!
//! The URL decides the backend, mirroring how the migrations runner picks one:
//! `postgres://` / `postgresql://` is PostgreSQL (feature `postgres`),
//! `sqlite://`, `sqlite:`, `file:` or a bare path is SQLite.

use std::path::Path;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::sql_types::{Double, Nullable, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection, sql_query};
use polars::prelude::{Column, DataFrame, PolarsResult};
use secrecy::{ExposeSecret, SecretString};

use super::{DataSource, errors::DataSourceError};
use crate::models::daily_record::{
    DIFFICULTY_LATEST, HASH_RATE_MEAN, PRICE_USD_CLOSE, REVENUE_FROM_FEES, TIMESTAMP,
    VOLUME_MINED_SUM,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which diesel backend a URL maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlBackend {
    Sqlite,
    Postgres,
}

impl SqlBackend {
    /// Pick the backend from the URL scheme.
    pub fn from_url(url: &str) -> Result<Self, DataSourceError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            if cfg!(feature = "postgres") {
                Ok(SqlBackend::Postgres)
            } else {
                Err(DataSourceError::UnsupportedUrl(format!(
                    "{} (built without the `postgres` feature)",
                    redact_url(url)
                )))
            }
        } else if url.starts_with("sqlite:") || url.starts_with("file:") || !url.contains("://") {
            Ok(SqlBackend::Sqlite)
        } else {
            Err(DataSourceError::UnsupportedUrl(redact_url(url)))
        }
    }
}

#[derive(QueryableByName, Debug)]
struct DailyRow {
    #[diesel(sql_type = Text)]
    timestamp: String,
    #[diesel(sql_type = Nullable<Double>)]
    difficulty_latest: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    hash_rate_mean: Option<String>,
    #[diesel(sql_type = Nullable<Double>)]
    price_usd_close: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    revenue_from_fees: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    volume_mined_sum: Option<f64>,
}

/// Reads the daily table from a SQL warehouse.
///
/// One connection is opened per fetch and dropped afterwards. The timeout
/// bounds the wait: SQLite gets a `busy_timeout`, PostgreSQL a
/// `connect_timeout` plus a `statement_timeout`.
#[derive(Debug)]
pub struct SqlSource {
    url: SecretString,
    backend: SqlBackend,
    table: String,
    timeout: Duration,
    description: String,
}

impl SqlSource {
    /// Errors:
    /// - [`DataSourceError::UnsupportedUrl`] for schemes other than SQLite/PostgreSQL
    /// - [`DataSourceError::InvalidTable`] when `table` is not `name` or `schema.name`
    pub fn new(url: SecretString, table: &str) -> Result<Self, DataSourceError> {
        let backend = SqlBackend::from_url(url.expose_secret())?;
        let table = table.trim();
        if !is_identifier(table) {
            return Err(DataSourceError::InvalidTable(table.to_string()));
        }
        let description = format!("{}#{table}", redact_url(url.expose_secret()));
        Ok(Self {
            url,
            backend,
            table: table.to_string(),
            timeout: DEFAULT_TIMEOUT,
            description,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The retrieval statement. Identifiers are quoted so PostgreSQL does
    /// not read `timestamp` as the type keyword.
    pub fn query(&self) -> String {
        format!(
            r#"SELECT CAST("{TIMESTAMP}" AS TEXT) AS "{TIMESTAMP}",
       CAST("{DIFFICULTY_LATEST}" AS DOUBLE PRECISION) AS "{DIFFICULTY_LATEST}",
       CAST("{HASH_RATE_MEAN}" AS TEXT) AS "{HASH_RATE_MEAN}",
       CAST("{PRICE_USD_CLOSE}" AS DOUBLE PRECISION) AS "{PRICE_USD_CLOSE}",
       CAST("{REVENUE_FROM_FEES}" AS DOUBLE PRECISION) AS "{REVENUE_FROM_FEES}",
       CAST("{VOLUME_MINED_SUM}" AS DOUBLE PRECISION) AS "{VOLUME_MINED_SUM}"
FROM {table}
ORDER BY "{TIMESTAMP}""#,
            table = self.table
        )
    }

    fn connection_error(&self, source: diesel::ConnectionError) -> DataSourceError {
        DataSourceError::Connection {
            target: self.description.clone(),
            source,
        }
    }

    fn load_sqlite(&self) -> Result<Vec<DailyRow>, DataSourceError> {
        let url = sqlite_read_only_url(self.url.expose_secret())
            .map_err(|source| self.connection_error(source))?;
        let mut conn =
            SqliteConnection::establish(&url).map_err(|source| self.connection_error(source))?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout={};",
            self.timeout.as_millis()
        ))?;
        Ok(sql_query(self.query()).load::<DailyRow>(&mut conn)?)
    }

    #[cfg(feature = "postgres")]
    fn load_postgres(&self) -> Result<Vec<DailyRow>, DataSourceError> {
        let url = with_connect_timeout(self.url.expose_secret(), self.timeout);
        let mut conn = diesel::pg::PgConnection::establish(&url)
            .map_err(|source| self.connection_error(source))?;
        conn.batch_execute(&format!(
            "SET statement_timeout = {};",
            self.timeout.as_millis()
        ))?;
        Ok(sql_query(self.query()).load::<DailyRow>(&mut conn)?)
    }

    #[cfg(not(feature = "postgres"))]
    fn load_postgres(&self) -> Result<Vec<DailyRow>, DataSourceError> {
        Err(DataSourceError::UnsupportedUrl(self.description.clone()))
    }
}

impl DataSource for SqlSource {
    fn fetch_daily(&mut self) -> Result<DataFrame, DataSourceError> {
        let rows = match self.backend {
            SqlBackend::Sqlite => self.load_sqlite()?,
            SqlBackend::Postgres => self.load_postgres()?,
        };
        tracing::info!(source = %self.description, rows = rows.len(), "fetched daily records");
        Ok(rows_to_frame(rows)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

fn rows_to_frame(rows: Vec<DailyRow>) -> PolarsResult<DataFrame> {
    let n = rows.len();
    let mut timestamp = Vec::with_capacity(n);
    let mut difficulty = Vec::with_capacity(n);
    let mut hash_rate = Vec::with_capacity(n);
    let mut price = Vec::with_capacity(n);
    let mut fees = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);

    for row in rows {
        timestamp.push(row.timestamp);
        difficulty.push(row.difficulty_latest);
        hash_rate.push(row.hash_rate_mean);
        price.push(row.price_usd_close);
        fees.push(row.revenue_from_fees);
        volume.push(row.volume_mined_sum);
    }

    DataFrame::new(vec![
        Column::new(TIMESTAMP.into(), timestamp),
        Column::new(DIFFICULTY_LATEST.into(), difficulty),
        Column::new(HASH_RATE_MEAN.into(), hash_rate),
        Column::new(PRICE_USD_CLOSE.into(), price),
        Column::new(REVENUE_FROM_FEES.into(), fees),
        Column::new(VOLUME_MINED_SUM.into(), volume),
    ])
}

/// SQLite creates missing files on connect; the loader only reads, so open
/// existing files read-only and refuse missing ones.
fn sqlite_read_only_url(url: &str) -> Result<String, diesel::ConnectionError> {
    if url.starts_with("file:") || url == ":memory:" {
        return Ok(url.to_string());
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if !Path::new(path).exists() {
        return Err(diesel::ConnectionError::BadConnection(format!(
            "database file {path} does not exist"
        )));
    }
    Ok(format!("file:{}?mode=ro", escape_uri_path(path)))
}

/// `?`, `#` and `%` are URI syntax in SQLite `file:` names.
fn escape_uri_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3F"),
            '#' => escaped.push_str("%23"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(feature = "postgres")]
fn with_connect_timeout(url: &str, timeout: Duration) -> String {
    if url.contains("connect_timeout=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}connect_timeout={}",
        timeout.as_secs().max(1)
    )
}

/// Strip credentials and query parameters from a URL for logging.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let rest = rest.split('?').next().unwrap_or_default();
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, path) = rest.split_at(authority_end);
    match authority.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}{path}"),
        None => format!("{scheme}://{rest}"),
    }
}

/// `name` or `schema.name`, ASCII letters, digits and underscores.
fn is_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
