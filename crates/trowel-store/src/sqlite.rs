//! SQLite sink.

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use trowel_types::{AssetType, CanonicalRecord, RecordKey};

use crate::row::SinkRow;
use crate::sink::{Sink, SinkError, validate_table_name};

/// Rows inserted per prepared-statement batch.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Append-only SQLite store.
#[derive(Debug)]
pub struct SqliteSink {
    conn: Connection,
    chunk_size: usize,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or its parent
    /// directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.execute_batch(
            r"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        debug!(path = %path.display(), "sqlite sink opened");
        Ok(Self {
            conn,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SinkError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Sets the number of rows inserted per statement batch.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Creates `table` with the record schema if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid table name or a failed statement.
    pub fn ensure_table(&self, table: &str) -> Result<(), SinkError> {
        let table = validate_table_name(table)?;
        self.conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                Date CHAR(10),
                Name VARCHAR(100),
                SellPrice BIGINT,
                BuyPrice BIGINT,
                Symbol CHAR(3),
                TransactionTypeLocal VARCHAR(50),
                TransactionTypeEnglish VARCHAR(50),
                AssetTypeLocal VARCHAR(50),
                AssetTypeEnglish VARCHAR(50),
                ScrapedDate CHAR(10),
                ScrapedTime CHAR(8),
                ScrapedAt DATETIME
            );
            CREATE INDEX IF NOT EXISTS "idx_{table}_key"
                ON "{table}"(Date, Symbol, TransactionTypeEnglish);
            "#
        ))?;
        Ok(())
    }

    /// Returns the number of rows in `table`, or zero if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid table name or a failed query.
    pub fn count_rows(&self, table: &str) -> Result<usize, SinkError> {
        let table = validate_table_name(table)?;
        if !self.table_exists(table)? {
            return Ok(0);
        }
        let count: i64 = self
            .conn
            .query_row(&format!(r#"SELECT COUNT(*) FROM "{table}""#), [], |row| {
                row.get(0)
            })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn table_exists(&self, table: &str) -> Result<bool, SinkError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl Sink for SqliteSink {
    fn load_existing_keys(
        &self,
        table: &str,
        asset_type: AssetType,
    ) -> Result<HashSet<RecordKey>, SinkError> {
        let table = validate_table_name(table)?;
        if !self.table_exists(table)? {
            debug!(table, "table missing, no existing keys");
            return Ok(HashSet::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"SELECT DISTINCT Date, Symbol, TransactionTypeEnglish
               FROM "{table}" WHERE AssetTypeEnglish = ?1"#
        ))?;
        let keys = stmt
            .query_map(params![asset_type.english()], |row| {
                Ok(RecordKey {
                    date: row.get(0)?,
                    symbol: row.get(1)?,
                    transaction_type: row.get(2)?,
                })
            })?
            .collect::<Result<HashSet<_>, _>>()?;

        info!(table, asset_type = %asset_type, keys = keys.len(), "existing keys loaded");
        Ok(keys)
    }

    fn append_rows(&mut self, table: &str, rows: &[CanonicalRecord]) -> Result<usize, SinkError> {
        let table = validate_table_name(table)?;
        if rows.is_empty() {
            return Ok(0);
        }
        self.ensure_table(table)?;

        let sql = format!(
            r#"INSERT INTO "{table}" (
                Date, Name, SellPrice, BuyPrice, Symbol,
                TransactionTypeLocal, TransactionTypeEnglish,
                AssetTypeLocal, AssetTypeEnglish,
                ScrapedDate, ScrapedTime, ScrapedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"#
        );

        let tx = self.conn.transaction()?;
        let mut written = 0;
        for chunk in rows.chunks(self.chunk_size) {
            let mut stmt = tx.prepare_cached(&sql)?;
            for record in chunk {
                let row = SinkRow::from(record);
                written += stmt.execute(params![
                    row.date,
                    row.name,
                    row.sell_price,
                    row.buy_price,
                    row.symbol,
                    row.transaction_type_local,
                    row.transaction_type_english,
                    row.asset_type_local,
                    row.asset_type_english,
                    row.scraped_date,
                    row.scraped_time,
                    row.scraped_at,
                ])?;
            }
            debug!(table, rows = chunk.len(), "chunk inserted");
        }
        tx.commit()?;

        info!(table, rows = written, "rows appended");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trowel_types::{InstrumentMeta, ScrapeStamp, TransactionType};

    fn stamp() -> ScrapeStamp {
        ScrapeStamp::new(
            NaiveDate::from_ymd_opt(2026, 2, 2)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
        )
    }

    fn record(day: u32, kind: Option<TransactionType>) -> CanonicalRecord {
        let meta = InstrumentMeta::new(14, "USD", "دلار آمریکا", kind, AssetType::Currency);
        CanonicalRecord::new(
            &meta,
            Some(format!("1401-01-{day:02}")),
            Some(28_500),
            Some(28_300),
            stamp(),
        )
    }

    #[test]
    fn test_missing_table_has_no_keys() {
        let sink = SqliteSink::open_in_memory().unwrap();
        let keys = sink
            .load_existing_keys("IceAssets", AssetType::Currency)
            .unwrap();
        assert!(keys.is_empty());
        assert_eq!(sink.count_rows("IceAssets").unwrap(), 0);
    }

    #[test]
    fn test_append_then_load_keys() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        let rows = vec![
            record(1, Some(TransactionType::Bill)),
            record(2, Some(TransactionType::WireTransfer)),
            record(3, None),
        ];
        assert_eq!(sink.append_rows("IceAssets", &rows).unwrap(), 3);

        let keys = sink
            .load_existing_keys("IceAssets", AssetType::Currency)
            .unwrap();
        assert_eq!(keys.len(), 3);
        for row in &rows {
            assert!(keys.contains(&row.key()), "missing {}", row.key());
        }

        let other = sink
            .load_existing_keys("IceAssets", AssetType::Commodity)
            .unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_chunked_append() {
        let mut sink = SqliteSink::open_in_memory().unwrap().with_chunk_size(2);
        let rows: Vec<_> = (1..=5)
            .map(|d| record(d, Some(TransactionType::Bill)))
            .collect();
        assert_eq!(sink.append_rows("IceAssets", &rows).unwrap(), 5);
        assert_eq!(sink.count_rows("IceAssets").unwrap(), 5);
    }

    #[test]
    fn test_empty_append_creates_nothing() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        assert_eq!(sink.append_rows("IceAssets", &[]).unwrap(), 0);
        assert!(!sink.table_exists("IceAssets").unwrap());
    }

    #[test]
    fn test_invalid_table_rejected() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        let rows = vec![record(1, None)];
        assert!(matches!(
            sink.append_rows("t\"; DROP", &rows),
            Err(SinkError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trowel.sqlite3");

        {
            let mut sink = SqliteSink::open(&path).unwrap();
            sink.append_rows("IceAssets", &[record(1, Some(TransactionType::Bill))])
                .unwrap();
        }

        let sink = SqliteSink::open(&path).unwrap();
        assert_eq!(sink.count_rows("IceAssets").unwrap(), 1);
        let keys = sink
            .load_existing_keys("IceAssets", AssetType::Currency)
            .unwrap();
        assert!(keys.contains(&record(1, Some(TransactionType::Bill)).key()));
    }
}
