//! Incremental exchange-rate loader with Jalali date normalization.
//!
//! This is a facade crate that re-exports functionality from the trowel
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use trowel_lib::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = InstrumentCatalog::builtin();
//!     let client = ApiClient::with_defaults()?;
//!     let mut sink = SqliteSink::open("trowel.sqlite3")?;
//!
//!     let config = LoadConfig::default();
//!     let report = IncrementalLoad::new(&catalog, &config)
//!         .run_api(&client, &endpoints(&catalog), &mut sink)
//!         .await?;
//!
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use trowel_types::*;

// Re-export normalization
pub use trowel_normalize::{
    CalendarError, DateInput, DateNormalizer, DateStrategy, DateTemplate, JalaliDate,
    NumeralCleaner, PERSIAN_DIGITS, clean_numerals, to_jalali,
};

// Re-export the catalog
pub use trowel_instruments::{CatalogError, InstrumentCatalog};

#[cfg(feature = "fetch")]
pub use trowel_fetch::{
    ApiClient, BoardSnapshot, BoardSource, ClientConfig, Endpoint, FetchError, PageSource,
    PaginationLimits, SnapshotError, SnapshotFile, endpoints, fetch_all,
};

#[cfg(feature = "parse")]
pub use trowel_parse::{BoardParser, RecordParser};

#[cfg(feature = "store")]
pub use trowel_store::{ExportError, ExportFormat, MemorySink, Sink, SinkError, SqliteSink};

#[cfg(feature = "pipeline")]
pub use trowel_pipeline::{
    DEFAULT_TABLE, IncrementalLoad, LoadConfig, NoopObserver, RunError, RunFailure, RunObserver,
    RunReport, dedup_keys, find_new,
};

/// Prelude module for convenient imports.
///
/// ```
/// use trowel_lib::prelude::*;
/// ```
pub mod prelude {
    pub use trowel_types::{
        AssetType, CanonicalRecord, InstrumentMeta, RawItem, RecordKey, Result, ScrapeStamp,
        Stage, TransactionType, TrowelError,
    };

    pub use trowel_instruments::InstrumentCatalog;
    pub use trowel_normalize::{DateNormalizer, DateStrategy, JalaliDate, NumeralCleaner};

    #[cfg(feature = "fetch")]
    pub use trowel_fetch::{ApiClient, ClientConfig, PaginationLimits, SnapshotFile, endpoints};

    #[cfg(feature = "parse")]
    pub use trowel_parse::{BoardParser, RecordParser};

    #[cfg(feature = "store")]
    pub use trowel_store::{ExportFormat, MemorySink, Sink, SqliteSink};

    #[cfg(feature = "pipeline")]
    pub use trowel_pipeline::{IncrementalLoad, LoadConfig, RunReport, find_new};
}
