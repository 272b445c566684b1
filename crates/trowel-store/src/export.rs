//! Record export to files.

use std::io::Write;
use thiserror::Error;
use trowel_types::CanonicalRecord;

use crate::row::{COLUMNS, SinkRow};

/// Export format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// CSV with a header row.
    #[default]
    Csv,
    /// JSON array.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Writes `records` to `writer` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or serialization fails.
    pub fn write_records<W: Write>(
        &self,
        records: &[CanonicalRecord],
        mut writer: W,
    ) -> Result<(), ExportError> {
        let rows: Vec<SinkRow> = records.iter().map(SinkRow::from).collect();
        match self {
            Self::Csv => {
                writeln!(writer, "{}", COLUMNS.join(","))?;
                for row in &rows {
                    writeln!(writer, "{}", csv_line(row))?;
                }
            }
            Self::Json => {
                serde_json::to_writer_pretty(&mut writer, &rows)?;
                writeln!(writer)?;
            }
            Self::Ndjson => {
                for row in &rows {
                    serde_json::to_writer(&mut writer, row)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Unknown export format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn csv_line(row: &SinkRow) -> String {
    let opt_int = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
    [
        csv_field(row.date.as_deref().unwrap_or_default()),
        csv_field(&row.name),
        opt_int(row.sell_price),
        opt_int(row.buy_price),
        csv_field(&row.symbol),
        csv_field(row.transaction_type_local.unwrap_or_default()),
        csv_field(row.transaction_type_english.unwrap_or_default()),
        csv_field(row.asset_type_local),
        csv_field(row.asset_type_english),
        row.scraped_date.clone(),
        row.scraped_time.clone(),
        row.scraped_at.clone(),
    ]
    .join(",")
}

/// Quotes a field when it holds a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
