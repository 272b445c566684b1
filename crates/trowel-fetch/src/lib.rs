//! Source access for trowel.
//!
//! This crate provides the fetch side of the pipeline:
//!
//! - [`url::history_url`] - Constructs history endpoint URLs
//! - [`ApiClient`] - HTTP page client with retries and backoff
//! - [`fetch_all`] - Offset/limit pagination over any [`PageSource`]
//! - [`BoardSnapshot`] - Column data captured from the rendered board page

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod client;
mod paginate;
pub mod url;

pub use board::{BoardRow, BoardSnapshot, BoardSource, SnapshotError, SnapshotFile};
pub use client::{ApiClient, ClientConfig, FetchError, Page, PageQuery, PageSource};
pub use paginate::{
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, FetchCursor, PaginationLimits, fetch_all,
};
pub use url::{Endpoint, endpoints};
