//! Record storage for trowel.
//!
//! - [`Sink`] - Read existing keys, append new rows
//! - [`SqliteSink`] - Append-only SQLite store
//! - [`MemorySink`] - In-memory store for tests and dry runs
//! - [`ExportFormat`] - CSV, JSON and NDJSON export of record batches

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod export;
mod row;
mod sink;
mod sqlite;

pub use export::{ExportError, ExportFormat};
pub use row::{COLUMNS, SinkRow};
pub use sink::{MemorySink, Sink, SinkError, validate_table_name};
pub use sqlite::{DEFAULT_CHUNK_SIZE, SqliteSink};
