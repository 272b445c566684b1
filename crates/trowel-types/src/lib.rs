//! Core types for the trowel incremental price loader.
//!
//! This crate provides the data structures shared by every stage:
//!
//! - [`RawItem`] - Untrusted record as returned by a source page
//! - [`CanonicalRecord`] - Normalized row that is deduplicated and persisted
//! - [`RecordKey`] - The `(date, symbol, transaction type)` deduplication key
//! - [`InstrumentMeta`] - Static metadata for one source instrument
//! - [`SkippedReason`] - Why a malformed field was coerced to null

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod instrument;
mod raw;
mod record;
mod skip;

pub use error::{Result, Stage, TrowelError};
pub use instrument::{AssetType, InstrumentMeta, TransactionType};
pub use raw::RawItem;
pub use record::{CanonicalRecord, RecordKey, ScrapeStamp};
pub use skip::{FieldOutcome, SkippedField, SkippedReason};
