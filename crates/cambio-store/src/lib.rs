//! # Cambio Store
//!
//! DuckDB-backed durability for cambio: rate observations and conversion
//! history that survive process restarts.
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `rates` | One row per `(base, quote, day)`, replaced on re-observation |
//! | `conversions` | Append-only conversion log in sequence order |
//!
//! All user-derived values are passed as query parameters, never
//! interpolated. The crate is standalone: records cross the boundary as
//! plain-string rows and the caller maps them onto its domain types.

pub mod duckdb;

use std::env;
use std::fs;
use std::path::PathBuf;

use ::duckdb::ToSql;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use duckdb::{DuckDbConnectionManager, PooledConnection};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for the store database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for cambio data.
    pub cambio_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections in the pool.
    pub max_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let cambio_home = resolve_cambio_home();
        let db_path = cambio_home.join("cambio.duckdb");
        Self {
            cambio_home,
            db_path,
            max_pool_size: 2,
        }
    }
}

/// One persisted rate observation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRate {
    pub base: String,
    pub quote: String,
    pub day: String,
    pub rate: f64,
    pub observed_at: String,
}

/// One persisted conversion row, newest rows carrying the highest `seq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConversion {
    pub seq: i64,
    pub amount: f64,
    pub from_code: String,
    pub to_code: String,
    pub converted_amount: f64,
    pub rate: f64,
    pub kind: String,
    pub timestamp: String,
    pub rate_day: String,
}

/// Persistent store for rate and conversion records.
pub struct Store {
    manager: DuckDbConnectionManager,
}

impl Store {
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::new(config.db_path.clone(), config.max_pool_size);
        let store = Self { manager };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS rates (\
                 base VARCHAR NOT NULL,\
                 quote VARCHAR NOT NULL,\
                 day VARCHAR NOT NULL,\
                 rate DOUBLE NOT NULL,\
                 observed_at VARCHAR NOT NULL,\
                 PRIMARY KEY (base, quote, day)\
             );\
             CREATE SEQUENCE IF NOT EXISTS conversions_seq START 1;\
             CREATE TABLE IF NOT EXISTS conversions (\
                 seq BIGINT PRIMARY KEY DEFAULT nextval('conversions_seq'),\
                 amount DOUBLE NOT NULL,\
                 from_code VARCHAR NOT NULL,\
                 to_code VARCHAR NOT NULL,\
                 converted_amount DOUBLE NOT NULL,\
                 rate DOUBLE NOT NULL,\
                 kind VARCHAR NOT NULL,\
                 ts VARCHAR NOT NULL,\
                 rate_day VARCHAR NOT NULL\
             );",
        )?;
        Ok(())
    }

    /// Insert or replace the observation for `(base, quote, day)`.
    pub fn upsert_rate(&self, row: &StoredRate) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 5] = [
            &row.base,
            &row.quote,
            &row.day,
            &row.rate,
            &row.observed_at,
        ];
        connection.execute(
            "INSERT OR REPLACE INTO rates (base, quote, day, rate, observed_at) \
             VALUES (?, ?, ?, ?, ?)",
            params.as_slice(),
        )?;
        Ok(())
    }

    /// Exact lookup for one `(base, quote, day)` key.
    pub fn lookup_rate(
        &self,
        base: &str,
        quote: &str,
        day: &str,
    ) -> Result<Option<StoredRate>, StoreError> {
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 3] = [&base, &quote, &day];
        let mut statement = connection.prepare(
            "SELECT base, quote, day, rate, observed_at FROM rates \
             WHERE base = ? AND quote = ? AND day = ?",
        )?;
        let mut rows = statement.query(params.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(read_rate_row(row)?)),
            None => Ok(None),
        }
    }

    /// Most recent observation for the pair regardless of day.
    pub fn latest_rate_for_pair(
        &self,
        base: &str,
        quote: &str,
    ) -> Result<Option<StoredRate>, StoreError> {
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 2] = [&base, &quote];
        let mut statement = connection.prepare(
            "SELECT base, quote, day, rate, observed_at FROM rates \
             WHERE base = ? AND quote = ? ORDER BY day DESC LIMIT 1",
        )?;
        let mut rows = statement.query(params.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(read_rate_row(row)?)),
            None => Ok(None),
        }
    }

    /// Append one conversion row in sequence order.
    pub fn append_conversion(&self, row: &NewConversion<'_>) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 8] = [
            &row.amount,
            &row.from_code,
            &row.to_code,
            &row.converted_amount,
            &row.rate,
            &row.kind,
            &row.timestamp,
            &row.rate_day,
        ];
        connection.execute(
            "INSERT INTO conversions \
             (amount, from_code, to_code, converted_amount, rate, kind, ts, rate_day) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params.as_slice(),
        )?;
        Ok(())
    }

    /// The `limit` most recent conversions, most-recent-first.
    pub fn recent_conversions(&self, limit: usize) -> Result<Vec<StoredConversion>, StoreError> {
        let connection = self.manager.acquire()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let params: [&dyn ToSql; 1] = [&limit];
        let mut statement = connection.prepare(
            "SELECT seq, amount, from_code, to_code, converted_amount, rate, kind, ts, rate_day \
             FROM conversions ORDER BY seq DESC LIMIT ?",
        )?;
        let mut rows = statement.query(params.as_slice())?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(StoredConversion {
                seq: row.get(0)?,
                amount: row.get(1)?,
                from_code: row.get(2)?,
                to_code: row.get(3)?,
                converted_amount: row.get(4)?,
                rate: row.get(5)?,
                kind: row.get(6)?,
                timestamp: row.get(7)?,
                rate_day: row.get(8)?,
            });
        }
        Ok(out)
    }

    /// Delete the oldest conversions beyond `capacity`. Returns rows removed.
    pub fn trim_conversions(&self, capacity: usize) -> Result<usize, StoreError> {
        let connection = self.manager.acquire()?;
        let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);
        let params: [&dyn ToSql; 1] = [&capacity];
        let removed = connection.execute(
            "DELETE FROM conversions WHERE seq NOT IN \
             (SELECT seq FROM conversions ORDER BY seq DESC LIMIT ?)",
            params.as_slice(),
        )?;
        Ok(removed)
    }

    /// Delete all conversion history.
    pub fn clear_conversions(&self) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        connection.execute("DELETE FROM conversions", [])?;
        Ok(())
    }

    pub fn conversion_count(&self) -> Result<usize, StoreError> {
        let connection = self.manager.acquire()?;
        let count: i64 =
            connection.query_row("SELECT COUNT(*) FROM conversions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// Borrowed insert row for [`Store::append_conversion`]; `seq` is assigned
/// by the database.
#[derive(Debug, Clone, Copy)]
pub struct NewConversion<'a> {
    pub amount: f64,
    pub from_code: &'a str,
    pub to_code: &'a str,
    pub converted_amount: f64,
    pub rate: f64,
    pub kind: &'a str,
    pub timestamp: &'a str,
    pub rate_day: &'a str,
}

fn read_rate_row(row: &::duckdb::Row<'_>) -> Result<StoredRate, ::duckdb::Error> {
    Ok(StoredRate {
        base: row.get(0)?,
        quote: row.get(1)?,
        day: row.get(2)?,
        rate: row.get(3)?,
        observed_at: row.get(4)?,
    })
}

fn resolve_cambio_home() -> PathBuf {
    if let Some(path) = env::var_os("CAMBIO_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".cambio");
    }

    PathBuf::from(".cambio")
}
