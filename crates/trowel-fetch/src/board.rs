//! Rendered board snapshots.
//!
//! The board page is rendered by an external browser process that writes the
//! three visible columns to a JSON file. This module only reads that file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a board snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid JSON.
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The columns do not line up.
    #[error("Column length mismatch: {dates} dates, {names} names, {prices} prices")]
    ColumnMismatch {
        /// Number of dates.
        dates: usize,
        /// Number of names.
        names: usize,
        /// Number of prices.
        prices: usize,
    },
}

/// One board row as rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow<'a> {
    /// Date text, usually Persian digits with separators.
    pub date: &'a str,
    /// Instrument display name.
    pub name: &'a str,
    /// Price text.
    pub price: &'a str,
}

/// Column-oriented board contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    dates: Vec<String>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    prices: Vec<String>,
}

impl BoardSnapshot {
    /// Builds a snapshot from its three columns.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::ColumnMismatch`] if the columns differ in length.
    pub fn from_columns(
        dates: Vec<String>,
        names: Vec<String>,
        prices: Vec<String>,
    ) -> Result<Self, SnapshotError> {
        Self {
            dates,
            names,
            prices,
        }
        .validated()
    }

    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the columns differ in length.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str::<Self>(json)?.validated()
    }

    fn validated(self) -> Result<Self, SnapshotError> {
        if self.dates.len() != self.names.len() || self.names.len() != self.prices.len() {
            return Err(SnapshotError::ColumnMismatch {
                dates: self.dates.len(),
                names: self.names.len(),
                prices: self.prices.len(),
            });
        }
        Ok(self)
    }

    /// Returns the rows in page order.
    pub fn rows(&self) -> impl Iterator<Item = BoardRow<'_>> {
        self.dates
            .iter()
            .zip(&self.names)
            .zip(&self.prices)
            .map(|((date, name), price)| BoardRow {
                date: date.trim(),
                name: name.trim(),
                price: price.trim(),
            })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the snapshot has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A source of rendered board snapshots.
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// Returns the current board contents.
    async fn snapshot(&self) -> Result<BoardSnapshot, SnapshotError>;
}

/// Reads a snapshot the renderer wrote to disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BoardSource for SnapshotFile {
    async fn snapshot(&self) -> Result<BoardSnapshot, SnapshotError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        BoardSnapshot::from_json(&json)
    }
}
