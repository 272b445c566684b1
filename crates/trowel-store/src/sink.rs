//! Sink abstraction and the in-memory sink.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use trowel_types::{AssetType, CanonicalRecord, RecordKey};

/// Errors raised by sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Table name is not a plain identifier.
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable, append-only store of canonical records.
pub trait Sink: Send {
    /// Returns the keys already stored in `table` for `asset_type`.
    ///
    /// A missing table has no keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_existing_keys(
        &self,
        table: &str,
        asset_type: AssetType,
    ) -> Result<HashSet<RecordKey>, SinkError>;

    /// Appends `rows` to `table` and returns the number written.
    ///
    /// Either every row is written or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn append_rows(&mut self, table: &str, rows: &[CanonicalRecord]) -> Result<usize, SinkError>;
}

/// Checks that `name` is a plain SQL identifier.
///
/// # Errors
///
/// Returns [`SinkError::InvalidTable`] otherwise.
pub fn validate_table_name(name: &str) -> Result<&str, SinkError> {
    let mut chars = name.chars();
    let valid = name.len() <= 128
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(SinkError::InvalidTable(name.to_string()))
    }
}

/// Sink that keeps rows in memory, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: HashMap<String, Vec<CanonicalRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rows stored in `table`.
    #[must_use]
    pub fn rows(&self, table: &str) -> &[CanonicalRecord] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Sink for MemorySink {
    fn load_existing_keys(
        &self,
        table: &str,
        asset_type: AssetType,
    ) -> Result<HashSet<RecordKey>, SinkError> {
        validate_table_name(table)?;
        Ok(self
            .rows(table)
            .iter()
            .filter(|r| r.asset_type() == asset_type)
            .map(CanonicalRecord::key)
            .collect())
    }

    fn append_rows(&mut self, table: &str, rows: &[CanonicalRecord]) -> Result<usize, SinkError> {
        validate_table_name(table)?;
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(rows.len())
    }
}
