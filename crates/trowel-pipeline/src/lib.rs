//! Incremental load pipeline for trowel.
//!
//! - [`find_new`] - Key-based delta between fresh records and stored keys
//! - [`dedup_keys`] - Drops keys repeated within one run
//! - [`IncrementalLoad`] - Fetch, parse, detect and append in one run
//! - [`RunReport`] - Summary of a completed run
//! - [`RunError`] - The stage a failed run stopped at

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod delta;
mod error;
mod report;
mod run;

pub use delta::{dedup_keys, find_new};
pub use error::{RunError, RunFailure};
pub use report::RunReport;
pub use run::{
    ApiCollection, DEFAULT_TABLE, IncrementalLoad, LoadConfig, NoopObserver, RunObserver,
};
